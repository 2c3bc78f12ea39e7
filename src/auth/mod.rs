//! Client identification and role-based route guards.
//!
//! Each request names its client (one browser) in the `x-client-id` header.
//! Guards resolve that client's session and gate route groups by role.

use std::convert::Infallible;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{request::Parts, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::errors::{AppError, AppErrorWithRevision};
use crate::models::Role;
use crate::AppState;

/// Header carrying the client id.
pub const CLIENT_ID_HEADER: &str = "x-client-id";

/// Client id used when the header is missing or empty.
pub const DEFAULT_CLIENT_ID: &str = "default";

/// Identifies the client whose session a request acts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientId(pub String);

impl ClientId {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let id = headers
            .get(CLIENT_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_CLIENT_ID);
        Self(id.to_string())
    }
}

impl<S: Send + Sync> FromRequestParts<S> for ClientId {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_headers(&parts.headers))
    }
}

/// Any logged-in user.
pub async fn require_session(State(state): State<AppState>, request: Request, next: Next) -> Response {
    guard(state, None, request, next).await
}

pub async fn require_student(State(state): State<AppState>, request: Request, next: Next) -> Response {
    guard(state, Some(Role::Student), request, next).await
}

pub async fn require_faculty(State(state): State<AppState>, request: Request, next: Next) -> Response {
    guard(state, Some(Role::Faculty), request, next).await
}

pub async fn require_admin(State(state): State<AppState>, request: Request, next: Next) -> Response {
    guard(state, Some(Role::Admin), request, next).await
}

/// Resolve the session, check the role and hand the user to the handler
/// as an `Extension<User>`.
async fn guard(state: AppState, role: Option<Role>, mut request: Request, next: Next) -> Response {
    let client = ClientId::from_headers(request.headers());

    let Some(user) = state.sessions.current(&client.0).await else {
        return reject(&state, AppError::Authentication("Login required".to_string())).await;
    };

    if let Some(role) = role {
        if user.role != role {
            tracing::warn!(
                client_id = %client.0,
                user_id = user.id,
                required = %role,
                actual = %user.role,
                "Role guard denied request"
            );
            return reject(
                &state,
                AppError::Forbidden(format!("This area is restricted to {} users", role)),
            )
            .await;
        }
    }

    request.extensions_mut().insert(user);
    next.run(request).await
}

async fn reject(state: &AppState, error: AppError) -> Response {
    AppErrorWithRevision {
        error,
        revision_id: state.complaints.revision().await,
    }
    .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http, http::StatusCode, middleware, routing::get, Extension, Router};
    use tempfile::TempDir;
    use tower::ServiceExt;

    use crate::models::User;

    async fn whoami(Extension(user): Extension<User>) -> String {
        user.email
    }

    async fn app() -> (Router, AppState, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let state = crate::tests::test_state(&temp_dir, false).await;
        let router = Router::new()
            .route("/admin", get(whoami))
            .layer(middleware::from_fn_with_state(state.clone(), require_admin))
            .with_state(state.clone());
        (router, state, temp_dir)
    }

    fn request(client: Option<&str>) -> Request {
        let mut builder = http::Request::builder().uri("/admin");
        if let Some(client) = client {
            builder = builder.header(CLIENT_ID_HEADER, client);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn test_client_id_defaults() {
        let mut headers = HeaderMap::new();
        assert_eq!(ClientId::from_headers(&headers).0, DEFAULT_CLIENT_ID);

        headers.insert(CLIENT_ID_HEADER, "  ".parse().unwrap());
        assert_eq!(ClientId::from_headers(&headers).0, DEFAULT_CLIENT_ID);

        headers.insert(CLIENT_ID_HEADER, "tab-1".parse().unwrap());
        assert_eq!(ClientId::from_headers(&headers).0, "tab-1");
    }

    #[tokio::test]
    async fn test_guard_requires_session() {
        let (router, _state, _dir) = app().await;
        let resp = router.oneshot(request(Some("tab"))).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_guard_rejects_wrong_role() {
        let (router, state, _dir) = app().await;
        state
            .sessions
            .login("tab", "student1_cse@college.com", "1234")
            .await
            .unwrap();

        let resp = router.oneshot(request(Some("tab"))).await.unwrap();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_guard_passes_user_through() {
        let (router, state, _dir) = app().await;
        state
            .sessions
            .login(DEFAULT_CLIENT_ID, "principal@college.com", "1234")
            .await
            .unwrap();

        let resp = router.oneshot(request(None)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"principal@college.com");
    }
}
