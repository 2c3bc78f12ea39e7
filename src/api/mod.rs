//! REST API module.
//!
//! Handlers for the login screen and the three role dashboards.

mod admin;
mod auth;
mod faculty;
mod student;

pub use admin::*;
pub use auth::*;
pub use faculty::*;
pub use student::*;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::errors::{AppError, AppErrorWithRevision};
use crate::models::{Category, CategoryInfo, RevisionInfo};
use crate::AppState;

/// Success response envelope.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
    pub revision_id: u64,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(data: T, revision_id: u64) -> Self {
        Self {
            success: true,
            data,
            revision_id,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Response type that can be either success or error.
pub type ApiResult<T> = Result<ApiResponse<T>, AppErrorWithRevision>;

/// Create a successful API response.
pub fn success<T: Serialize>(data: T, revision_id: u64) -> ApiResult<T> {
    Ok(ApiResponse::new(data, revision_id))
}

/// Create an error API response.
pub fn error<T: Serialize>(err: AppError, revision_id: u64) -> ApiResult<T> {
    Err(AppErrorWithRevision {
        error: err,
        revision_id,
    })
}

fn complaint_not_found<T: Serialize>(id: u64, revision_id: u64) -> ApiResult<T> {
    error(
        AppError::NotFound(format!("Complaint {} not found", id)),
        revision_id,
    )
}

/// GET /api/revision - Current complaint store revision.
pub async fn get_revision(State(state): State<AppState>) -> ApiResult<RevisionInfo> {
    let revision_id = state.complaints.revision().await;
    success(RevisionInfo { revision_id }, revision_id)
}

/// GET /api/categories - Complaint categories with their triage priority.
pub async fn list_categories(State(state): State<AppState>) -> ApiResult<Vec<CategoryInfo>> {
    let revision_id = state.complaints.revision().await;
    success(
        Category::ALL.into_iter().map(CategoryInfo::from).collect(),
        revision_id,
    )
}
