//! Domain layer of chatdesk: the session reconciliation engine.
//!
//! - [`conversation`]: backend wire records and their normalization
//! - [`session`]: sessions, the ordered store and the current-session resolver
//! - [`navigation`]: address-bar synchronization
//! - [`config`]: configuration model

pub mod config;
pub mod conversation;
pub mod error;
pub mod navigation;
pub mod session;

// Re-export common error type
pub use error::{ChatdeskError, Result};
