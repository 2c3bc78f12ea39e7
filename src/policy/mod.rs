//! Role rules of the dashboards.
//!
//! The complaint store accepts any change from any caller. Handlers pass these
//! checks to the store's `*_if` operations, which run them under the write lock.

use crate::errors::AppError;
use crate::models::{Complaint, Role, Status, SubmitComplaint, User};

/// Maximum number of attachments per complaint.
pub const MAX_ATTACHMENTS: usize = 3;

/// Maximum size of a single attachment in bytes.
pub const MAX_ATTACHMENT_SIZE: u64 = 5 * 1024 * 1024;

/// Statuses a faculty member may set.
pub const FACULTY_STATUSES: [Status; 3] = [Status::Pending, Status::InProgress, Status::Resolved];

/// Validate a new complaint before it reaches the store.
pub fn validate_submission(data: &SubmitComplaint) -> Result<(), AppError> {
    if data.title.trim().is_empty() {
        return Err(AppError::Validation("Title is required".to_string()));
    }
    if data.description.trim().is_empty() {
        return Err(AppError::Validation("Description is required".to_string()));
    }
    if data.attachments.len() > MAX_ATTACHMENTS {
        return Err(AppError::Validation(format!(
            "At most {} attachments are allowed",
            MAX_ATTACHMENTS
        )));
    }
    if let Some(file) = data
        .attachments
        .iter()
        .find(|a| a.size > MAX_ATTACHMENT_SIZE)
    {
        return Err(AppError::Validation(format!(
            "File {} is too large. Maximum size is 5MB.",
            file.name
        )));
    }
    Ok(())
}

/// A student may delete their own complaint while it is still pending.
pub fn ensure_student_can_delete(student: &User, complaint: &Complaint) -> Result<(), AppError> {
    ensure_owner(student, complaint)?;
    if complaint.status != Status::Pending {
        return Err(AppError::Forbidden(
            "Only pending complaints can be deleted".to_string(),
        ));
    }
    Ok(())
}

/// A student may mark their own complaint completed once it is resolved.
pub fn ensure_student_can_complete(student: &User, complaint: &Complaint) -> Result<(), AppError> {
    ensure_owner(student, complaint)?;
    if complaint.status != Status::Resolved {
        return Err(AppError::Forbidden(
            "Only resolved complaints can be marked completed".to_string(),
        ));
    }
    Ok(())
}

/// A faculty member may set Pending, In-progress or Resolved on complaints assigned to them.
pub fn ensure_faculty_can_update(
    faculty: &User,
    complaint: &Complaint,
    status: Status,
) -> Result<(), AppError> {
    if faculty.role != Role::Faculty || complaint.assigned_to != Some(faculty.id) {
        return Err(AppError::Forbidden(
            "Complaint is not assigned to you".to_string(),
        ));
    }
    if !FACULTY_STATUSES.contains(&status) {
        return Err(AppError::Forbidden(format!(
            "Faculty cannot set status {}",
            status
        )));
    }
    Ok(())
}

fn ensure_owner(student: &User, complaint: &Complaint) -> Result<(), AppError> {
    if student.role != Role::Student || complaint.student_id != student.id {
        return Err(AppError::Forbidden(
            "Complaint belongs to another student".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Attachment, Category};
    use chrono::Utc;

    fn user(id: u64, role: Role) -> User {
        User {
            id,
            email: format!("user{}@college.com", id),
            password: "1234".to_string(),
            role,
            name: format!("User {}", id),
            department: String::new(),
            profile_picture: String::new(),
            phone: None,
            registration_number: None,
            course: None,
            year: None,
            designation: None,
        }
    }

    fn complaint(student_id: u64, status: Status, assigned_to: Option<u64>) -> Complaint {
        let now = Utc::now();
        Complaint {
            id: 100,
            student_id,
            student_name: "Student".to_string(),
            title: "Title".to_string(),
            category: Category::Library,
            description: "Description".to_string(),
            attachments: Vec::new(),
            status,
            assigned_to,
            assigned_faculty_name: None,
            reply: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    fn attachment(name: &str, size: u64) -> Attachment {
        Attachment {
            name: name.to_string(),
            size,
            mime_type: None,
        }
    }

    #[test]
    fn test_student_delete_only_own_pending() {
        let student = user(9, Role::Student);
        assert!(ensure_student_can_delete(&student, &complaint(9, Status::Pending, None)).is_ok());
        assert!(matches!(
            ensure_student_can_delete(&student, &complaint(9, Status::InProgress, Some(5))),
            Err(AppError::Forbidden(_))
        ));
        assert!(matches!(
            ensure_student_can_delete(&student, &complaint(10, Status::Pending, None)),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn test_student_complete_only_from_resolved() {
        let student = user(9, Role::Student);
        assert!(
            ensure_student_can_complete(&student, &complaint(9, Status::Resolved, Some(5))).is_ok()
        );
        for status in [Status::Pending, Status::InProgress, Status::Completed] {
            assert!(ensure_student_can_complete(&student, &complaint(9, status, Some(5))).is_err());
        }
    }

    #[test]
    fn test_faculty_status_rules() {
        let faculty = user(5, Role::Faculty);
        let assigned = complaint(9, Status::Pending, Some(5));

        for status in FACULTY_STATUSES {
            assert!(ensure_faculty_can_update(&faculty, &assigned, status).is_ok());
        }
        assert!(ensure_faculty_can_update(&faculty, &assigned, Status::Completed).is_err());

        let other = complaint(9, Status::Pending, Some(6));
        assert!(ensure_faculty_can_update(&faculty, &other, Status::Resolved).is_err());
    }

    #[test]
    fn test_submission_validation() {
        let mut data = SubmitComplaint {
            title: "Projector".to_string(),
            category: Category::Facility,
            description: "Broken".to_string(),
            attachments: vec![attachment("a.png", 1024)],
        };
        assert!(validate_submission(&data).is_ok());

        data.attachments = vec![
            attachment("a", 1),
            attachment("b", 1),
            attachment("c", 1),
            attachment("d", 1),
        ];
        assert!(validate_submission(&data).is_err());

        data.attachments = vec![attachment("huge.pdf", MAX_ATTACHMENT_SIZE + 1)];
        let err = validate_submission(&data).unwrap_err();
        assert_eq!(
            err,
            AppError::Validation("File huge.pdf is too large. Maximum size is 5MB.".to_string())
        );

        data.attachments.clear();
        data.title = "   ".to_string();
        assert!(validate_submission(&data).is_err());
    }
}
