//! In-memory user store.
//!
//! Seeded once at startup; registration appends, profile updates replace in place.
//! Nothing here is written back to the seed source.

use subtle::ConstantTimeEq;
use tokio::sync::RwLock;

use crate::errors::AppError;
use crate::models::{ProfileUpdate, RegisterRequest, Role, User};

/// Typed collection of user records.
pub struct UserStore {
    users: RwLock<Vec<User>>,
}

impl UserStore {
    pub fn new(users: Vec<User>) -> Self {
        Self {
            users: RwLock::new(users),
        }
    }

    pub async fn count(&self) -> usize {
        self.users.read().await.len()
    }

    /// Exact match on email and password.
    pub async fn find_by_credentials(&self, email: &str, password: &str) -> Option<User> {
        self.users
            .read()
            .await
            .iter()
            .find(|u| u.email == email && constant_time_compare(&u.password, password))
            .cloned()
    }

    #[cfg(test)]
    pub async fn find_by_email(&self, email: &str) -> Option<User> {
        self.users
            .read()
            .await
            .iter()
            .find(|u| u.email == email)
            .cloned()
    }

    #[cfg(test)]
    pub async fn get(&self, id: u64) -> Option<User> {
        self.users.read().await.iter().find(|u| u.id == id).cloned()
    }

    /// Resolve `id` only if it belongs to a faculty member.
    pub async fn find_faculty(&self, id: u64) -> Option<User> {
        self.users
            .read()
            .await
            .iter()
            .find(|u| u.id == id && u.role == Role::Faculty)
            .cloned()
    }

    pub async fn list_by_role(&self, role: Role) -> Vec<User> {
        self.users
            .read()
            .await
            .iter()
            .filter(|u| u.role == role)
            .cloned()
            .collect()
    }

    /// Append a new user with id `max + 1`.
    ///
    /// Fails without touching the collection when the email is taken.
    pub async fn register(&self, request: RegisterRequest) -> Result<User, AppError> {
        let mut users = self.users.write().await;

        if users.iter().any(|u| u.email == request.email) {
            return Err(AppError::Validation("Email already exists".to_string()));
        }

        let id = users.iter().map(|u| u.id).max().unwrap_or(0) + 1;
        let user = request.into_user(id);
        users.push(user.clone());

        tracing::debug!(user_id = id, role = %user.role, "Registered user");
        Ok(user)
    }

    /// Fail when a user other than `id` already owns `email`.
    pub async fn ensure_email_available(&self, id: u64, email: &str) -> Result<(), AppError> {
        ensure_email_free(&self.users.read().await, id, email)
    }

    /// Merge the present fields of `update` into the stored record with this id.
    ///
    /// Only the fields in `update` change, so edits made through other
    /// sessions of the same user survive. Returns `None` when no record has
    /// this id, which is the case for registrations made before a restart.
    pub async fn apply_profile(
        &self,
        id: u64,
        update: &ProfileUpdate,
    ) -> Result<Option<User>, AppError> {
        let mut users = self.users.write().await;

        if let Some(email) = &update.email {
            ensure_email_free(&users, id, email)?;
        }

        Ok(users.iter_mut().find(|u| u.id == id).map(|existing| {
            existing.apply_profile(update);
            existing.clone()
        }))
    }
}

fn ensure_email_free(users: &[User], id: u64, email: &str) -> Result<(), AppError> {
    if users.iter().any(|u| u.id != id && u.email == email) {
        return Err(AppError::Validation("Email already exists".to_string()));
    }
    Ok(())
}

/// Perform constant-time string comparison.
fn constant_time_compare(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::seed;

    fn store() -> UserStore {
        UserStore::new(seed::load_users(None).unwrap())
    }

    fn registration(email: &str) -> RegisterRequest {
        serde_json::from_value(serde_json::json!({
            "name": "New Student",
            "email": email,
            "password": "secret",
            "department": "Civil Engineering"
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_every_seeded_pair_matches() {
        let users = store();
        for user in seed::load_users(None).unwrap() {
            let found = users
                .find_by_credentials(&user.email, &user.password)
                .await
                .unwrap();
            assert_eq!(found, user);
        }
    }

    #[tokio::test]
    async fn test_wrong_pairs_do_not_match() {
        let users = store();
        assert!(users
            .find_by_credentials("student1_cse@college.com", "12345")
            .await
            .is_none());
        assert!(users
            .find_by_credentials("STUDENT1_CSE@college.com", "1234")
            .await
            .is_none());
        assert!(users.find_by_credentials("", "").await.is_none());
    }

    #[tokio::test]
    async fn test_find_faculty_rejects_other_roles() {
        let users = store();
        let student = users.find_by_email("student1_cse@college.com").await.unwrap();
        let faculty = users.find_by_email("faculty1_cse@college.com").await.unwrap();

        assert!(users.find_faculty(student.id).await.is_none());
        assert_eq!(users.find_faculty(faculty.id).await.unwrap().id, faculty.id);
        assert!(users.find_faculty(9_999).await.is_none());
    }

    #[tokio::test]
    async fn test_register_assigns_max_plus_one() {
        let users = store();
        let max_id = seed::load_users(None)
            .unwrap()
            .iter()
            .map(|u| u.id)
            .max()
            .unwrap();

        let user = users.register(registration("new@college.com")).await.unwrap();
        assert_eq!(user.id, max_id + 1);
        assert_eq!(users.get(user.id).await.unwrap(), user);
    }

    #[tokio::test]
    async fn test_register_duplicate_does_not_mutate() {
        let users = store();
        let before = users.count().await;

        let err = users
            .register(registration("faculty1_cse@college.com"))
            .await
            .unwrap_err();
        assert_eq!(err, AppError::Validation("Email already exists".to_string()));
        assert_eq!(users.count().await, before);
    }

    #[tokio::test]
    async fn test_register_into_empty_store() {
        let users = UserStore::new(Vec::new());
        let user = users.register(registration("first@college.com")).await.unwrap();
        assert_eq!(user.id, 1);
    }

    #[tokio::test]
    async fn test_apply_profile_checks_email_owner() {
        let users = store();
        let student = users.find_by_email("student1_cse@college.com").await.unwrap();

        let taken = ProfileUpdate {
            email: Some("faculty1_cse@college.com".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            users.apply_profile(student.id, &taken).await,
            Err(AppError::Validation(_))
        ));
        assert!(users.ensure_email_available(student.id, "faculty1_cse@college.com").await.is_err());
        assert!(users.ensure_email_available(student.id, &student.email).await.is_ok());

        let fresh = ProfileUpdate {
            email: Some("arjun@college.com".to_string()),
            ..Default::default()
        };
        let updated = users.apply_profile(student.id, &fresh).await.unwrap().unwrap();
        assert_eq!(updated.email, "arjun@college.com");
        assert!(users.find_by_email("arjun@college.com").await.is_some());
    }

    #[tokio::test]
    async fn test_apply_profile_keeps_other_fields() {
        let users = store();
        let student = users.find_by_email("student2_cse@college.com").await.unwrap();

        let phone = ProfileUpdate {
            phone: Some("+91 90000 00001".to_string()),
            ..Default::default()
        };
        let year = ProfileUpdate {
            year: Some("4th Year".to_string()),
            ..Default::default()
        };
        users.apply_profile(student.id, &phone).await.unwrap();
        let stored = users.apply_profile(student.id, &year).await.unwrap().unwrap();

        assert_eq!(stored.phone.as_deref(), Some("+91 90000 00001"));
        assert_eq!(stored.year.as_deref(), Some("4th Year"));
        assert_eq!(stored.name, student.name);
    }

    #[tokio::test]
    async fn test_apply_profile_unknown_id() {
        let users = store();
        let update = ProfileUpdate {
            name: Some("Ghost".to_string()),
            ..Default::default()
        };
        assert_eq!(users.apply_profile(9_999, &update).await.unwrap(), None);
    }

    #[test]
    fn test_constant_time_compare() {
        assert!(constant_time_compare("1234", "1234"));
        assert!(!constant_time_compare("1234", "1235"));
        assert!(!constant_time_compare("short", "much-longer"));
        assert!(constant_time_compare("", ""));
    }
}
