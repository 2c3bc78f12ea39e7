//! Dashboard statistics and revision info.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{Category, Complaint, Status};

/// Counts by status and category over a set of complaints.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintStats {
    pub total: usize,
    pub pending: usize,
    pub in_progress: usize,
    pub resolved: usize,
    pub completed: usize,
    pub by_category: BTreeMap<Category, usize>,
    /// Percentage of resolved or completed complaints, rounded
    pub resolution_rate: u32,
}

impl ComplaintStats {
    /// Single pass over `complaints`.
    pub fn from_complaints<'a, I>(complaints: I) -> Self
    where
        I: IntoIterator<Item = &'a Complaint>,
    {
        let mut stats = Self::default();
        for complaint in complaints {
            stats.total += 1;
            match complaint.status {
                Status::Pending => stats.pending += 1,
                Status::InProgress => stats.in_progress += 1,
                Status::Resolved => stats.resolved += 1,
                Status::Completed => stats.completed += 1,
            }
            *stats.by_category.entry(complaint.category).or_insert(0) += 1;
        }

        if stats.total > 0 {
            let done = (stats.resolved + stats.completed) as f64;
            stats.resolution_rate = (done / stats.total as f64 * 100.0).round() as u32;
        }

        stats
    }
}

/// Revision information for change detection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevisionInfo {
    pub revision_id: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn complaint(id: u64, status: Status, category: Category) -> Complaint {
        let now = Utc::now();
        Complaint {
            id,
            student_id: 1,
            student_name: "Student".to_string(),
            title: format!("Complaint {}", id),
            category,
            description: String::new(),
            attachments: Vec::new(),
            status,
            assigned_to: None,
            assigned_faculty_name: None,
            reply: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_empty_stats() {
        let stats = ComplaintStats::from_complaints(&Vec::<Complaint>::new());
        assert_eq!(stats.total, 0);
        assert_eq!(stats.resolution_rate, 0);
        assert!(stats.by_category.is_empty());
    }

    #[test]
    fn test_counts_sum_to_total() {
        let complaints = vec![
            complaint(1, Status::Pending, Category::Academic),
            complaint(2, Status::InProgress, Category::Academic),
            complaint(3, Status::Resolved, Category::Hostel),
            complaint(4, Status::Completed, Category::Library),
            complaint(5, Status::Completed, Category::Academic),
            complaint(6, Status::Pending, Category::Other),
        ];
        let stats = ComplaintStats::from_complaints(&complaints);

        assert_eq!(stats.total, 6);
        assert_eq!(
            stats.pending + stats.in_progress + stats.resolved + stats.completed,
            stats.total
        );
        assert_eq!(stats.by_category.values().sum::<usize>(), stats.total);
        assert_eq!(stats.by_category[&Category::Academic], 3);
        assert_eq!(stats.resolution_rate, 50);
    }

    #[test]
    fn test_by_category_serializes_with_names() {
        let complaints = vec![complaint(1, Status::Pending, Category::Transport)];
        let json = serde_json::to_value(ComplaintStats::from_complaints(&complaints)).unwrap();
        assert_eq!(json["byCategory"]["Transport"], 1);
        assert_eq!(json["inProgress"], 0);
    }
}
