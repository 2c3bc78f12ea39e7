//! Student dashboard endpoints.

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};

use super::{complaint_not_found, error, success, ApiResult};
use crate::models::{Complaint, ComplaintFilter, ComplaintUpdate, Status, SubmitComplaint, User};
use crate::policy;
use crate::AppState;

/// GET /api/student/complaints - The student's own complaints.
pub async fn list_student_complaints(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Query(filter): Query<ComplaintFilter>,
) -> ApiResult<Vec<Complaint>> {
    let revision_id = state.complaints.revision().await;
    let complaints = state.complaints.get_complaints_by_student(user.id).await;
    success(filter.apply(complaints), revision_id)
}

/// POST /api/student/complaints - Submit a new complaint.
pub async fn submit_complaint(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(request): Json<SubmitComplaint>,
) -> ApiResult<Complaint> {
    let revision_id = state.complaints.revision().await;

    if let Err(e) = policy::validate_submission(&request) {
        return error(e, revision_id);
    }

    let complaint = state
        .complaints
        .submit_complaint(request, user.id, &user.name)
        .await;
    tracing::info!(complaint_id = complaint.id, student_id = user.id, "Complaint submitted");

    success(complaint, state.complaints.revision().await)
}

/// DELETE /api/student/complaints/{id} - Withdraw a pending complaint.
pub async fn delete_student_complaint(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<u64>,
) -> ApiResult<()> {
    let revision_id = state.complaints.revision().await;

    match state
        .complaints
        .delete_complaint_if(id, |complaint| policy::ensure_student_can_delete(&user, complaint))
        .await
    {
        Ok(true) => {
            tracing::info!(complaint_id = id, student_id = user.id, "Complaint withdrawn");
            success((), state.complaints.revision().await)
        }
        Ok(false) => complaint_not_found(id, revision_id),
        Err(e) => error(e, revision_id),
    }
}

/// POST /api/student/complaints/{id}/complete - Confirm a resolved complaint.
pub async fn complete_complaint(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<u64>,
) -> ApiResult<Complaint> {
    let revision_id = state.complaints.revision().await;

    match state
        .complaints
        .update_complaint_if(id, ComplaintUpdate::status(Status::Completed), |complaint| {
            policy::ensure_student_can_complete(&user, complaint)
        })
        .await
    {
        Ok(Some(updated)) => success(updated, state.complaints.revision().await),
        Ok(None) => complaint_not_found(id, revision_id),
        Err(e) => error(e, revision_id),
    }
}
