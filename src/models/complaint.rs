//! Complaint model matching the frontend complaint record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a complaint.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Status {
    Pending,
    #[serde(rename = "In-progress")]
    InProgress,
    Resolved,
    Completed,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Pending => "Pending",
            Status::InProgress => "In-progress",
            Status::Resolved => "Resolved",
            Status::Completed => "Completed",
        }
    }

    /// The single forward step allowed from this status, if any.
    pub fn next(&self) -> Option<Status> {
        match self {
            Status::Pending => Some(Status::InProgress),
            Status::InProgress => Some(Status::Resolved),
            Status::Resolved => Some(Status::Completed),
            Status::Completed => None,
        }
    }

    /// Whether `target` is reachable under the strict transition table.
    /// Re-setting the current status is always allowed.
    pub fn can_transition_to(&self, target: Status) -> bool {
        *self == target || self.next() == Some(target)
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The nine fixed complaint categories.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Academic,
    Facility,
    Exam,
    Administrative,
    Technical,
    Hostel,
    Library,
    Transport,
    Other,
}

impl Category {
    pub const ALL: [Category; 9] = [
        Category::Academic,
        Category::Facility,
        Category::Exam,
        Category::Administrative,
        Category::Technical,
        Category::Hostel,
        Category::Library,
        Category::Transport,
        Category::Other,
    ];

    /// Triage priority used on the faculty dashboard.
    pub fn priority(&self) -> Priority {
        match self {
            Category::Academic | Category::Exam => Priority::High,
            Category::Facility | Category::Technical => Priority::Medium,
            _ => Priority::Low,
        }
    }
}

/// Triage priority derived from the category. Orders high first.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

/// A category with its triage priority, for the submission form.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryInfo {
    pub name: Category,
    pub priority: Priority,
}

impl From<Category> for CategoryInfo {
    fn from(category: Category) -> Self {
        Self {
            name: category,
            priority: category.priority(),
        }
    }
}

/// Reference to a client-side file. Only the metadata is kept, in memory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub name: String,
    /// Size in bytes
    pub size: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

/// A complaint record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Complaint {
    pub id: u64,
    pub student_id: u64,
    pub student_name: String,
    pub title: String,
    pub category: Category,
    pub description: String,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    pub status: Status,
    #[serde(default)]
    pub assigned_to: Option<u64>,
    #[serde(default)]
    pub assigned_faculty_name: Option<String>,
    #[serde(default)]
    pub reply: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Complaint {
    pub fn priority(&self) -> Priority {
        self.category.priority()
    }

    /// Shallow-merge the present fields of `update` into this record.
    /// Does not touch `updated_at`; the store stamps it.
    pub fn apply(&mut self, update: &ComplaintUpdate) {
        if let Some(title) = &update.title {
            self.title = title.clone();
        }
        if let Some(category) = update.category {
            self.category = category;
        }
        if let Some(description) = &update.description {
            self.description = description.clone();
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(assigned_to) = update.assigned_to {
            self.assigned_to = Some(assigned_to);
        }
        if let Some(name) = &update.assigned_faculty_name {
            self.assigned_faculty_name = Some(name.clone());
        }
        if let Some(reply) = &update.reply {
            self.reply = reply.clone();
        }
    }
}

/// Request body for submitting a complaint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitComplaint {
    pub title: String,
    #[serde(default = "default_category")]
    pub category: Category,
    pub description: String,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

fn default_category() -> Category {
    Category::Academic
}

/// Partial complaint update. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintUpdate {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<Status>,
    #[serde(default)]
    pub assigned_to: Option<u64>,
    #[serde(default)]
    pub assigned_faculty_name: Option<String>,
    #[serde(default)]
    pub reply: Option<String>,
}

impl ComplaintUpdate {
    pub fn status(status: Status) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }
}

/// Request body for assigning a complaint to a faculty member.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignRequest {
    pub faculty_id: u64,
}

/// Request body for a faculty status update.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdateRequest {
    pub status: Status,
    #[serde(default)]
    pub reply: String,
}

/// Search and filter parameters of the dashboards.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ComplaintFilter {
    /// Case-insensitive substring over title, description and student name
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub status: Option<Status>,
    #[serde(default)]
    pub category: Option<Category>,
}

impl ComplaintFilter {
    pub fn matches(&self, complaint: &Complaint) -> bool {
        let matches_search = match self.q.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(term) => {
                let term = term.to_lowercase();
                complaint.title.to_lowercase().contains(&term)
                    || complaint.description.to_lowercase().contains(&term)
                    || complaint.student_name.to_lowercase().contains(&term)
            }
        };
        let matches_status = self.status.map_or(true, |s| complaint.status == s);
        let matches_category = self.category.map_or(true, |c| complaint.category == c);

        matches_search && matches_status && matches_category
    }

    pub fn apply(&self, complaints: Vec<Complaint>) -> Vec<Complaint> {
        complaints.into_iter().filter(|c| self.matches(c)).collect()
    }
}
