//! Login, registration, session and profile endpoints.

use axum::{extract::State, Json};

use super::{error, success, ApiResult};
use crate::auth::ClientId;
use crate::models::{AuthState, LoginRequest, ProfileUpdate, RegisterRequest, UserProfile};
use crate::AppState;

/// POST /api/auth/login - Log in, optionally through a role-specific form.
pub async fn login(
    State(state): State<AppState>,
    ClientId(client_id): ClientId,
    Json(request): Json<LoginRequest>,
) -> ApiResult<UserProfile> {
    let revision_id = state.complaints.revision().await;

    let result = match request.role {
        Some(role) => {
            state
                .sessions
                .login_as(&client_id, &request.email, &request.password, role)
                .await
        }
        None => {
            state
                .sessions
                .login(&client_id, &request.email, &request.password)
                .await
        }
    };

    match result {
        Ok(user) => success(UserProfile::from(&user), revision_id),
        Err(e) => error(e, revision_id),
    }
}

/// POST /api/auth/register - Create an account and log it in.
pub async fn register(
    State(state): State<AppState>,
    ClientId(client_id): ClientId,
    Json(request): Json<RegisterRequest>,
) -> ApiResult<UserProfile> {
    let revision_id = state.complaints.revision().await;

    match state.sessions.register(&client_id, request).await {
        Ok(user) => {
            tracing::info!(client_id = %client_id, user_id = user.id, role = %user.role, "User registered");
            success(UserProfile::from(&user), revision_id)
        }
        Err(e) => error(e, revision_id),
    }
}

/// POST /api/auth/logout - Clear this client's session.
pub async fn logout(State(state): State<AppState>, ClientId(client_id): ClientId) -> ApiResult<()> {
    let revision_id = state.complaints.revision().await;

    match state.sessions.logout(&client_id).await {
        Ok(()) => success((), revision_id),
        Err(e) => error(e, revision_id),
    }
}

/// GET /api/auth/session - Current auth state of this client.
pub async fn get_session(
    State(state): State<AppState>,
    ClientId(client_id): ClientId,
) -> ApiResult<AuthState> {
    let revision_id = state.complaints.revision().await;
    success(state.sessions.auth_state(&client_id).await, revision_id)
}

/// PUT /api/profile - Update the logged-in user's profile.
pub async fn update_profile(
    State(state): State<AppState>,
    ClientId(client_id): ClientId,
    Json(update): Json<ProfileUpdate>,
) -> ApiResult<UserProfile> {
    let revision_id = state.complaints.revision().await;

    match state.sessions.update_profile(&client_id, update).await {
        Ok(updated) => {
            tracing::info!(user_id = updated.id, "Profile updated");
            success(UserProfile::from(&updated), revision_id)
        }
        Err(e) => error(e, revision_id),
    }
}
