//! Application state stores.
//!
//! Stores are built once at startup and shared through `Arc`. All reads and
//! writes of users, sessions and complaints go through their methods.

mod complaints;
pub mod seed;
mod session;
mod users;

pub use complaints::*;
pub use session::*;
pub use users::*;
