//! Application layer for chatdesk.
//!
//! Hosts the use cases that drive the domain types in `chatdesk-core`
//! against a [`ConversationSource`](chatdesk_core::conversation::ConversationSource)
//! and a [`Navigator`](chatdesk_core::navigation::Navigator).

pub mod dashboard;

pub use dashboard::{DashboardView, SessionDashboard};
