//! Admin dashboard endpoints.

use axum::{
    extract::{Path, Query, State},
    Json,
};

use super::{complaint_not_found, error, success, ApiResult};
use crate::errors::AppError;
use crate::models::{
    AssignRequest, Complaint, ComplaintFilter, ComplaintStats, Role, UserProfile, UserSummary,
};
use crate::AppState;

/// GET /api/admin/complaints - All complaints.
pub async fn list_all_complaints(
    State(state): State<AppState>,
    Query(filter): Query<ComplaintFilter>,
) -> ApiResult<Vec<Complaint>> {
    let revision_id = state.complaints.revision().await;
    let complaints = state.complaints.list_complaints().await;
    success(filter.apply(complaints), revision_id)
}

/// GET /api/admin/complaints/{id} - A single complaint.
pub async fn get_complaint(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> ApiResult<Complaint> {
    let revision_id = state.complaints.revision().await;

    match state.complaints.get_complaint(id).await {
        Some(complaint) => success(complaint, revision_id),
        None => complaint_not_found(id, revision_id),
    }
}

/// PUT /api/admin/complaints/{id}/assign - Assign to a faculty member.
pub async fn assign_complaint(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(request): Json<AssignRequest>,
) -> ApiResult<Complaint> {
    let revision_id = state.complaints.revision().await;

    if state.complaints.get_complaint(id).await.is_none() {
        return complaint_not_found(id, revision_id);
    }

    match state
        .complaints
        .assign_complaint(id, request.faculty_id)
        .await
    {
        Some(updated) => {
            tracing::info!(complaint_id = id, faculty_id = request.faculty_id, "Complaint assigned");
            success(updated, state.complaints.revision().await)
        }
        None => error(
            AppError::Validation(format!("User {} is not a faculty member", request.faculty_id)),
            revision_id,
        ),
    }
}

/// DELETE /api/admin/complaints/{id} - Remove a complaint.
pub async fn delete_complaint(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> ApiResult<()> {
    let revision_id = state.complaints.revision().await;

    if state.complaints.delete_complaint(id).await {
        tracing::info!(complaint_id = id, "Complaint deleted by admin");
        success((), state.complaints.revision().await)
    } else {
        complaint_not_found(id, revision_id)
    }
}

/// GET /api/admin/stats - Counts over all complaints.
pub async fn get_admin_stats(State(state): State<AppState>) -> ApiResult<ComplaintStats> {
    let revision_id = state.complaints.revision().await;
    success(state.complaints.get_complaint_stats().await, revision_id)
}

/// GET /api/admin/faculty - Faculty members with their assigned complaint counts.
pub async fn list_faculty(State(state): State<AppState>) -> ApiResult<Vec<UserSummary>> {
    summaries(&state, Role::Faculty, |c, id| c.assigned_to == Some(id)).await
}

/// GET /api/admin/students - Students with their submitted complaint counts.
pub async fn list_students(State(state): State<AppState>) -> ApiResult<Vec<UserSummary>> {
    summaries(&state, Role::Student, |c, id| c.student_id == id).await
}

async fn summaries(
    state: &AppState,
    role: Role,
    linked: impl Fn(&Complaint, u64) -> bool,
) -> ApiResult<Vec<UserSummary>> {
    let revision_id = state.complaints.revision().await;
    let complaints = state.complaints.list_complaints().await;

    let data = state
        .users
        .list_by_role(role)
        .await
        .iter()
        .map(|user| UserSummary {
            user: UserProfile::from(user),
            complaint_count: complaints.iter().filter(|c| linked(c, user.id)).count(),
        })
        .collect();

    success(data, revision_id)
}
