//! In-memory complaint store.
//!
//! The store is trust-the-caller: any status can be written by anyone, and
//! role rules live in [`crate::policy`]. Callers hand those rules to the `*_if`
//! operations, which run them on the current record under the write lock. The
//! store's own rule is the opt-in [`TransitionPolicy::Strict`] check on
//! [`ComplaintStore::update_status_if`].
//!
//! Every successful mutation bumps a revision counter so clients can detect change.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use tokio::sync::RwLock;

use super::UserStore;
use crate::errors::AppError;
use crate::models::{Complaint, ComplaintStats, ComplaintUpdate, Status, SubmitComplaint};

/// How status updates treat the requested status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransitionPolicy {
    /// Any status may follow any other; last write wins.
    #[default]
    Permissive,
    /// Only Pending -> In-progress -> Resolved -> Completed, one step at a time.
    Strict,
}

struct ComplaintState {
    complaints: Vec<Complaint>,
    revision: u64,
}

/// Typed collection of complaints.
pub struct ComplaintStore {
    state: RwLock<ComplaintState>,
    users: Arc<UserStore>,
    policy: TransitionPolicy,
}

impl ComplaintStore {
    pub fn new(complaints: Vec<Complaint>, users: Arc<UserStore>, policy: TransitionPolicy) -> Self {
        Self {
            state: RwLock::new(ComplaintState {
                complaints,
                revision: 0,
            }),
            users,
            policy,
        }
    }

    /// Current revision. Starts at 0 and increases with every mutation.
    pub async fn revision(&self) -> u64 {
        self.state.read().await.revision
    }

    pub async fn list_complaints(&self) -> Vec<Complaint> {
        self.state.read().await.complaints.clone()
    }

    pub async fn get_complaint(&self, id: u64) -> Option<Complaint> {
        self.state
            .read()
            .await
            .complaints
            .iter()
            .find(|c| c.id == id)
            .cloned()
    }

    /// Create a new `Pending`, unassigned complaint owned by the given student.
    pub async fn submit_complaint(
        &self,
        data: SubmitComplaint,
        student_id: u64,
        student_name: &str,
    ) -> Complaint {
        let mut state = self.state.write().await;

        let now = Utc::now();
        let complaint = Complaint {
            id: generate_id(&state.complaints),
            student_id,
            student_name: student_name.to_string(),
            title: data.title,
            category: data.category,
            description: data.description,
            attachments: data.attachments,
            status: Status::Pending,
            assigned_to: None,
            assigned_faculty_name: None,
            reply: String::new(),
            created_at: now,
            updated_at: now,
        };

        state.complaints.push(complaint.clone());
        state.revision += 1;

        tracing::debug!(
            complaint_id = complaint.id,
            student_id,
            category = ?complaint.category,
            "Complaint submitted"
        );
        complaint
    }

    /// Shallow-merge `updates` into the complaint and refresh `updated_at`.
    ///
    /// Returns `None` when no complaint has this id.
    pub async fn update_complaint(&self, id: u64, updates: ComplaintUpdate) -> Option<Complaint> {
        let mut state = self.state.write().await;
        apply_update(&mut state, id, &updates)
    }

    /// Assign a complaint to a faculty member.
    ///
    /// Returns `None` without changes when `faculty_id` is not a faculty user
    /// or the complaint does not exist.
    pub async fn assign_complaint(&self, complaint_id: u64, faculty_id: u64) -> Option<Complaint> {
        let Some(faculty) = self.users.find_faculty(faculty_id).await else {
            tracing::debug!(complaint_id, faculty_id, "Assignment ignored: not a faculty user");
            return None;
        };

        self.update_complaint(
            complaint_id,
            ComplaintUpdate {
                assigned_to: Some(faculty.id),
                assigned_faculty_name: Some(faculty.name),
                ..Default::default()
            },
        )
        .await
    }

    /// Like [`update_complaint`](Self::update_complaint), with `check` run on
    /// the current record under the same write lock. A failed check changes nothing.
    pub async fn update_complaint_if(
        &self,
        id: u64,
        updates: ComplaintUpdate,
        check: impl FnOnce(&Complaint) -> Result<(), AppError>,
    ) -> Result<Option<Complaint>, AppError> {
        let mut state = self.state.write().await;

        let Some(current) = state.complaints.iter().find(|c| c.id == id) else {
            return Ok(None);
        };
        check(current)?;

        Ok(apply_update(&mut state, id, &updates))
    }

    /// Set status and reply together.
    #[cfg(test)]
    pub async fn update_status(
        &self,
        id: u64,
        status: Status,
        reply: &str,
    ) -> Result<Option<Complaint>, AppError> {
        self.update_status_if(id, status, reply, |_| Ok(())).await
    }

    /// Set status and reply together once `check` accepts the current record.
    /// `check` and the strict transition rule run under the write lock.
    pub async fn update_status_if(
        &self,
        id: u64,
        status: Status,
        reply: &str,
        check: impl FnOnce(&Complaint) -> Result<(), AppError>,
    ) -> Result<Option<Complaint>, AppError> {
        let mut state = self.state.write().await;

        let Some(current) = state.complaints.iter().find(|c| c.id == id) else {
            return Ok(None);
        };
        check(current)?;

        if self.policy == TransitionPolicy::Strict && !current.status.can_transition_to(status) {
            return Err(AppError::Validation(format!(
                "Cannot move complaint {} from {} to {}",
                id, current.status, status
            )));
        }

        let updates = ComplaintUpdate {
            status: Some(status),
            reply: Some(reply.to_string()),
            ..Default::default()
        };
        Ok(apply_update(&mut state, id, &updates))
    }

    /// Remove a complaint. Returns whether anything was removed.
    pub async fn delete_complaint(&self, id: u64) -> bool {
        matches!(self.delete_complaint_if(id, |_| Ok(())).await, Ok(true))
    }

    /// Remove a complaint once `check` accepts it, under one write lock.
    /// Returns `Ok(false)` when no complaint has this id.
    pub async fn delete_complaint_if(
        &self,
        id: u64,
        check: impl FnOnce(&Complaint) -> Result<(), AppError>,
    ) -> Result<bool, AppError> {
        let mut state = self.state.write().await;

        let Some(index) = state.complaints.iter().position(|c| c.id == id) else {
            return Ok(false);
        };
        check(&state.complaints[index])?;

        state.complaints.remove(index);
        state.revision += 1;
        tracing::debug!(complaint_id = id, "Complaint deleted");
        Ok(true)
    }

    pub async fn get_complaints_by_student(&self, student_id: u64) -> Vec<Complaint> {
        self.state
            .read()
            .await
            .complaints
            .iter()
            .filter(|c| c.student_id == student_id)
            .cloned()
            .collect()
    }

    pub async fn get_complaints_by_faculty(&self, faculty_id: u64) -> Vec<Complaint> {
        self.state
            .read()
            .await
            .complaints
            .iter()
            .filter(|c| c.assigned_to == Some(faculty_id))
            .cloned()
            .collect()
    }

    pub async fn get_complaint_stats(&self) -> ComplaintStats {
        ComplaintStats::from_complaints(&self.state.read().await.complaints)
    }
}

fn apply_update(state: &mut ComplaintState, id: u64, updates: &ComplaintUpdate) -> Option<Complaint> {
    let complaint = state.complaints.iter_mut().find(|c| c.id == id)?;

    complaint.apply(updates);
    complaint.updated_at = next_timestamp(complaint.updated_at);
    let updated = complaint.clone();
    state.revision += 1;

    tracing::debug!(complaint_id = id, status = %updated.status, "Complaint updated");
    Some(updated)
}

/// Wall-clock now, nudged forward if the clock has not moved past `previous`.
fn next_timestamp(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = Utc::now();
    if now > previous {
        now
    } else {
        previous + Duration::microseconds(1)
    }
}

/// Last six digits of the millisecond clock followed by three random digits.
/// Retries until the id is unused in the current collection.
fn generate_id(existing: &[Complaint]) -> u64 {
    let mut rng = rand::thread_rng();
    loop {
        let millis = Utc::now().timestamp_millis().rem_euclid(1_000_000) as u64;
        let id = millis * 1000 + rng.gen_range(0..1000u64);
        if !existing.iter().any(|c| c.id == id) {
            return id;
        }
    }
}
