//! Session manager.
//!
//! Holds the current user of each client and mirrors it to local storage under
//! [`SESSION_KEY`]. A client id stands for one browser: clients share the
//! complaint store but never each other's session.
//!
//! Rehydrated sessions are trusted as-is; credentials are not re-checked.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use super::UserStore;
use crate::db::LocalStorage;
use crate::errors::AppError;
use crate::models::{AuthState, ProfileUpdate, RegisterRequest, Role, User};

/// Local storage key of the session mirror.
pub const SESSION_KEY: &str = "currentUser";

pub struct SessionManager {
    storage: LocalStorage,
    users: Arc<UserStore>,
    sessions: RwLock<HashMap<String, User>>,
}

impl SessionManager {
    pub fn new(storage: LocalStorage, users: Arc<UserStore>) -> Self {
        Self {
            storage,
            users,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Restore every mirrored session. Returns how many were restored.
    ///
    /// Entries that do not parse are dropped and the client starts logged out.
    pub async fn initialize(&self) -> Result<usize, AppError> {
        let entries = self.storage.entries(SESSION_KEY).await?;
        let mut sessions = self.sessions.write().await;

        for (client_id, raw) in entries {
            match serde_json::from_str::<User>(&raw) {
                Ok(user) => {
                    sessions.insert(client_id, user);
                }
                Err(e) => {
                    tracing::warn!(client_id = %client_id, "Dropping unreadable session: {}", e);
                    self.storage.remove_item(&client_id, SESSION_KEY).await?;
                }
            }
        }

        Ok(sessions.len())
    }

    pub async fn current(&self, client_id: &str) -> Option<User> {
        self.sessions.read().await.get(client_id).cloned()
    }

    pub async fn auth_state(&self, client_id: &str) -> AuthState {
        AuthState::from_session(self.current(client_id).await.as_ref())
    }

    /// Log in with an exact email and password match.
    pub async fn login(&self, client_id: &str, email: &str, password: &str) -> Result<User, AppError> {
        let Some(user) = self.users.find_by_credentials(email, password).await else {
            tracing::info!(client_id, "Login failed");
            return Err(AppError::Authentication(
                "Invalid email or password".to_string(),
            ));
        };

        self.set_current(client_id, user.clone()).await?;
        tracing::info!(client_id, user_id = user.id, role = %user.role, "Logged in");
        Ok(user)
    }

    /// Log in through a role-specific entry point.
    ///
    /// A role mismatch fails and leaves the existing session untouched.
    pub async fn login_as(
        &self,
        client_id: &str,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<User, AppError> {
        let user = self
            .users
            .find_by_credentials(email, password)
            .await
            .ok_or_else(|| AppError::Authentication("Invalid email or password".to_string()))?;

        if user.role != role {
            tracing::info!(client_id, expected = %role, actual = %user.role, "Login role mismatch");
            return Err(AppError::Authentication(format!(
                "Invalid credentials for {} login",
                role
            )));
        }

        self.set_current(client_id, user.clone()).await?;
        tracing::info!(client_id, user_id = user.id, role = %user.role, "Logged in");
        Ok(user)
    }

    /// Register a new user and log them in.
    pub async fn register(&self, client_id: &str, request: RegisterRequest) -> Result<User, AppError> {
        if request.name.trim().is_empty() {
            return Err(AppError::Validation("Name is required".to_string()));
        }
        if request.email.trim().is_empty() {
            return Err(AppError::Validation("Email is required".to_string()));
        }
        if request.password.is_empty() {
            return Err(AppError::Validation("Password is required".to_string()));
        }

        let user = self.users.register(request).await?;
        self.set_current(client_id, user.clone()).await?;
        Ok(user)
    }

    /// Clear the session and its mirror. Logging out twice is fine.
    pub async fn logout(&self, client_id: &str) -> Result<(), AppError> {
        self.sessions.write().await.remove(client_id);
        self.storage.remove_item(client_id, SESSION_KEY).await?;
        tracing::info!(client_id, "Logged out");
        Ok(())
    }

    /// Merge `update` into the current user and its mirror, then into the
    /// user store record when one exists.
    ///
    /// A session restored after a restart may belong to a registration the
    /// user store no longer holds; the session alone is updated then.
    pub async fn update_profile(
        &self,
        client_id: &str,
        update: ProfileUpdate,
    ) -> Result<User, AppError> {
        let mut user = self
            .current(client_id)
            .await
            .ok_or_else(|| AppError::Authentication("Not logged in".to_string()))?;

        if let Some(email) = &update.email {
            self.users.ensure_email_available(user.id, email).await?;
        }

        user.apply_profile(&update);
        self.set_current(client_id, user.clone()).await?;

        match self.users.apply_profile(user.id, &update).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                tracing::debug!(client_id, user_id = user.id, "No user record to update; session only")
            }
            Err(e) => {
                tracing::warn!(client_id, user_id = user.id, "User record not updated: {}", e)
            }
        }

        tracing::debug!(client_id, user_id = user.id, "Profile updated");
        Ok(user)
    }

    async fn set_current(&self, client_id: &str, user: User) -> Result<(), AppError> {
        let raw = serde_json::to_string(&user)?;
        self.storage.set_item(client_id, SESSION_KEY, &raw).await?;
        self.sessions
            .write()
            .await
            .insert(client_id.to_string(), user);
        Ok(())
    }
}
