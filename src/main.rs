//! Student Complaint Tracker Backend
//!
//! REST backend for students, faculty and admins to file, assign and resolve
//! complaints. Complaints live in memory; each client's session is mirrored to SQLite.

mod api;
mod auth;
mod config;
mod db;
mod errors;
mod models;
mod policy;
mod store;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Config;
use db::LocalStorage;
use errors::AppError;
use store::{seed, ComplaintStore, SessionManager, TransitionPolicy, UserStore};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<UserStore>,
    pub sessions: Arc<SessionManager>,
    pub complaints: Arc<ComplaintStore>,
}

impl AppState {
    /// Load the seeds, open local storage and restore mirrored sessions.
    pub async fn build(config: &Config) -> Result<Self, AppError> {
        let users = Arc::new(UserStore::new(seed::load_users(
            config.users_seed_path.as_deref(),
        )?));
        let complaints = seed::load_complaints(config.complaints_seed_path.as_deref())?;

        let policy = if config.strict_transitions {
            TransitionPolicy::Strict
        } else {
            TransitionPolicy::Permissive
        };
        let complaints = Arc::new(ComplaintStore::new(complaints, users.clone(), policy));

        let pool = db::init_database(&config.db_path).await?;
        let sessions = Arc::new(SessionManager::new(LocalStorage::new(pool), users.clone()));
        let restored = sessions.initialize().await?;

        tracing::info!(
            users = users.count().await,
            complaints = complaints.list_complaints().await.len(),
            sessions = restored,
            "State loaded"
        );

        Ok(Self {
            users,
            sessions,
            complaints,
        })
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    let (json_layer, text_layer) = if config.log_json {
        (Some(tracing_subscriber::fmt::layer().json()), None)
    } else {
        (None, Some(tracing_subscriber::fmt::layer()))
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .init();

    tracing::info!("Starting Complaint Tracker Backend");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Bind address: {}", config.bind_addr);

    if config.strict_transitions {
        tracing::info!("Strict status transitions enabled");
    }

    let state = AppState::build(&config).await?;
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Login page and session lookup
    let public_routes = Router::new()
        .route("/auth/login", post(api::login))
        .route("/auth/register", post(api::register))
        .route("/auth/logout", post(api::logout))
        .route("/auth/session", get(api::get_session))
        .route("/revision", get(api::get_revision))
        .route("/categories", get(api::list_categories));

    let profile_routes = Router::new()
        .route("/profile", put(api::update_profile))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_session,
        ));

    let student_routes = Router::new()
        .route(
            "/complaints",
            get(api::list_student_complaints).post(api::submit_complaint),
        )
        .route("/complaints/{id}", delete(api::delete_student_complaint))
        .route("/complaints/{id}/complete", post(api::complete_complaint))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_student,
        ));

    let faculty_routes = Router::new()
        .route("/complaints", get(api::list_faculty_complaints))
        .route("/complaints/{id}/status", put(api::update_complaint_status))
        .route("/stats", get(api::get_faculty_stats))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_faculty,
        ));

    let admin_routes = Router::new()
        .route("/complaints", get(api::list_all_complaints))
        .route(
            "/complaints/{id}",
            get(api::get_complaint).delete(api::delete_complaint),
        )
        .route("/complaints/{id}/assign", put(api::assign_complaint))
        .route("/stats", get(api::get_admin_stats))
        .route("/faculty", get(api::list_faculty))
        .route("/students", get(api::list_students))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_admin,
        ));

    let api_routes = Router::new()
        .merge(public_routes)
        .merge(profile_routes)
        .nest("/student", student_routes)
        .nest("/faculty", faculty_routes)
        .nest("/admin", admin_routes);

    // Health check
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
