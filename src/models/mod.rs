//! Data models for the complaint tracker.
//!
//! These models serialize to the camelCase JSON shape the frontend uses.

mod complaint;
mod stats;
mod user;

pub use complaint::*;
pub use stats::*;
pub use user::*;
