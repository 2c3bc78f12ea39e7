//! Seed datasets bundled with the binary.

use std::path::Path;

use serde::de::DeserializeOwned;

use crate::errors::AppError;
use crate::models::{Complaint, User};

const BUNDLED_USERS: &str = include_str!("../../seed/users.json");
const BUNDLED_COMPLAINTS: &str = include_str!("../../seed/complaints.json");

/// Load the users seed from `path`, or the bundled one.
pub fn load_users(path: Option<&Path>) -> Result<Vec<User>, AppError> {
    load(path, BUNDLED_USERS)
}

/// Load the complaints seed from `path`, or the bundled one.
pub fn load_complaints(path: Option<&Path>) -> Result<Vec<Complaint>, AppError> {
    load(path, BUNDLED_COMPLAINTS)
}

fn load<T: DeserializeOwned>(path: Option<&Path>, bundled: &str) -> Result<Vec<T>, AppError> {
    let Some(path) = path else {
        return parse(bundled, "bundled seed");
    };

    let raw = std::fs::read_to_string(path).map_err(|e| {
        AppError::Internal(format!("Failed to read seed {}: {}", path.display(), e))
    })?;
    parse(&raw, &path.display().to_string())
}

fn parse<T: DeserializeOwned>(raw: &str, source: &str) -> Result<Vec<T>, AppError> {
    serde_json::from_str(raw)
        .map_err(|e| AppError::Internal(format!("Invalid seed data in {}: {}", source, e)))
}
