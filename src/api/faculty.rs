//! Faculty dashboard endpoints.

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};

use super::{complaint_not_found, error, success, ApiResult};
use crate::models::{Complaint, ComplaintFilter, ComplaintStats, StatusUpdateRequest, User};
use crate::policy;
use crate::AppState;

/// GET /api/faculty/complaints - Complaints assigned to the faculty member,
/// highest priority first and oldest first within a priority.
pub async fn list_faculty_complaints(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Query(filter): Query<ComplaintFilter>,
) -> ApiResult<Vec<Complaint>> {
    let revision_id = state.complaints.revision().await;
    let mut complaints = filter.apply(state.complaints.get_complaints_by_faculty(user.id).await);
    complaints.sort_by_key(|c| (c.priority(), c.created_at));
    success(complaints, revision_id)
}

/// GET /api/faculty/stats - Counts over the assigned complaints.
pub async fn get_faculty_stats(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> ApiResult<ComplaintStats> {
    let revision_id = state.complaints.revision().await;
    let assigned = state.complaints.get_complaints_by_faculty(user.id).await;
    success(ComplaintStats::from_complaints(&assigned), revision_id)
}

/// PUT /api/faculty/complaints/{id}/status - Set status and reply.
pub async fn update_complaint_status(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<u64>,
    Json(request): Json<StatusUpdateRequest>,
) -> ApiResult<Complaint> {
    let revision_id = state.complaints.revision().await;

    match state
        .complaints
        .update_status_if(id, request.status, &request.reply, |complaint| {
            policy::ensure_faculty_can_update(&user, complaint, request.status)
        })
        .await
    {
        Ok(Some(updated)) => {
            tracing::info!(
                complaint_id = id,
                faculty_id = user.id,
                status = %updated.status,
                "Complaint status updated"
            );
            success(updated, state.complaints.revision().await)
        }
        Ok(None) => complaint_not_found(id, revision_id),
        Err(e) => error(e, revision_id),
    }
}
