//! User model matching the frontend user record.

use serde::{Deserialize, Serialize};

/// Profile picture attached to every newly registered user.
pub const DEFAULT_PROFILE_PICTURE: &str = "https://images.pexels.com/photos/2379004/pexels-photo-2379004.jpeg?auto=compress&cs=tinysrgb&w=150&h=150&fit=crop";

/// Role of a user. Fixed at creation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Faculty,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Faculty => "faculty",
            Role::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user record as held by the user store and mirrored to local storage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: u64,
    pub email: String,
    pub password: String,
    pub role: Role,
    pub name: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub profile_picture: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Student only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration_number: Option<String>,
    /// Student only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course: Option<String>,
    /// Student only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    /// Faculty and admin only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub designation: Option<String>,
}

impl User {
    /// Shallow-merge the present fields of `update` into this record.
    ///
    /// `id` and `role` are not part of [`ProfileUpdate`] and never change.
    pub fn apply_profile(&mut self, update: &ProfileUpdate) {
        if let Some(name) = &update.name {
            self.name = name.clone();
        }
        if let Some(email) = &update.email {
            self.email = email.clone();
        }
        if let Some(phone) = &update.phone {
            self.phone = Some(phone.clone());
        }
        if let Some(department) = &update.department {
            self.department = department.clone();
        }
        if let Some(picture) = &update.profile_picture {
            self.profile_picture = picture.clone();
        }
        if let Some(number) = &update.registration_number {
            self.registration_number = Some(number.clone());
        }
        if let Some(course) = &update.course {
            self.course = Some(course.clone());
        }
        if let Some(year) = &update.year {
            self.year = Some(year.clone());
        }
        if let Some(designation) = &update.designation {
            self.designation = Some(designation.clone());
        }
    }
}

/// A user as returned by the API. Same as [`User`] minus the password.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: u64,
    pub email: String,
    pub role: Role,
    pub name: String,
    pub department: String,
    pub profile_picture: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub designation: Option<String>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            role: user.role,
            name: user.name.clone(),
            department: user.department.clone(),
            profile_picture: user.profile_picture.clone(),
            phone: user.phone.clone(),
            registration_number: user.registration_number.clone(),
            course: user.course.clone(),
            year: user.year.clone(),
            designation: user.designation.clone(),
        }
    }
}

/// Session view returned to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthState {
    pub user: Option<UserProfile>,
    pub is_authenticated: bool,
}

impl AuthState {
    pub fn from_session(user: Option<&User>) -> Self {
        Self {
            user: user.map(UserProfile::from),
            is_authenticated: user.is_some(),
        }
    }
}

/// Request body for logging in.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    /// Role selected on the login screen, if any
    #[serde(default)]
    pub role: Option<Role>,
}

/// Request body for registering a new user.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default = "default_role")]
    pub role: Role,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub registration_number: Option<String>,
    #[serde(default)]
    pub course: Option<String>,
    #[serde(default)]
    pub year: Option<String>,
    #[serde(default)]
    pub designation: Option<String>,
}

fn default_role() -> Role {
    Role::Student
}

impl RegisterRequest {
    /// Build the stored record for this registration.
    pub fn into_user(self, id: u64) -> User {
        User {
            id,
            email: self.email,
            password: self.password,
            role: self.role,
            name: self.name,
            department: self.department,
            profile_picture: DEFAULT_PROFILE_PICTURE.to_string(),
            phone: self.phone,
            registration_number: self.registration_number,
            course: self.course,
            year: self.year,
            designation: self.designation,
        }
    }
}

/// Partial profile update. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub profile_picture: Option<String>,
    #[serde(default)]
    pub registration_number: Option<String>,
    #[serde(default)]
    pub course: Option<String>,
    #[serde(default)]
    pub year: Option<String>,
    #[serde(default)]
    pub designation: Option<String>,
}

/// A user with the number of complaints linked to them, for admin listings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub user: UserProfile,
    pub complaint_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_student() -> User {
        User {
            id: 7,
            email: "student1_cse@college.com".to_string(),
            password: "1234".to_string(),
            role: Role::Student,
            name: "Arjun Kumar".to_string(),
            department: "Computer Science and Engineering".to_string(),
            profile_picture: DEFAULT_PROFILE_PICTURE.to_string(),
            phone: None,
            registration_number: Some("CSE2024001".to_string()),
            course: Some("B.Tech".to_string()),
            year: Some("1st Year".to_string()),
            designation: None,
        }
    }

    #[test]
    fn test_user_json_uses_camel_case() {
        let json = serde_json::to_value(sample_student()).unwrap();
        assert_eq!(json["role"], "student");
        assert_eq!(json["registrationNumber"], "CSE2024001");
        assert!(json.get("designation").is_none());
    }

    #[test]
    fn test_profile_merge_keeps_identity() {
        let mut user = sample_student();
        user.apply_profile(&ProfileUpdate {
            name: Some("Arjun K".to_string()),
            year: Some("2nd Year".to_string()),
            ..Default::default()
        });
        assert_eq!(user.id, 7);
        assert_eq!(user.role, Role::Student);
        assert_eq!(user.name, "Arjun K");
        assert_eq!(user.year.as_deref(), Some("2nd Year"));
        assert_eq!(user.course.as_deref(), Some("B.Tech"));
    }

    #[test]
    fn test_profile_hides_password() {
        let json = serde_json::to_value(UserProfile::from(&sample_student())).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["email"], "student1_cse@college.com");
    }

    #[test]
    fn test_register_defaults_to_student() {
        let request: RegisterRequest = serde_json::from_str(
            r#"{"name":"New","email":"new@college.com","password":"pw"}"#,
        )
        .unwrap();
        let user = request.into_user(42);
        assert_eq!(user.role, Role::Student);
        assert_eq!(user.profile_picture, DEFAULT_PROFILE_PICTURE);
    }
}
