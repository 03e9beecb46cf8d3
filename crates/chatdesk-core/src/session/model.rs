//! Session domain model.
//!
//! This module contains the core Session entity that represents
//! one conversation as held by the dashboard.

use super::message::Message;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Title used when the backend does not provide one.
pub const PLACEHOLDER_TITLE: &str = "New Chat";

/// Represents one conversation in the application's domain layer.
///
/// A session contains:
/// - The backend-issued identifier (immutable)
/// - A human-readable title (mutable through rename)
/// - The ordered message history
/// - Timestamps for creation and last update
///
/// Messages are never edited in place; a changed conversation arrives as a
/// whole replacement `Session`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Backend-issued unique identifier
    pub id: String,
    /// Human-readable session title
    pub title: String,
    /// Conversation history in conversational order
    #[serde(default)]
    pub messages: Vec<Message>,
    /// Timestamp when the session was created
    pub created_at: DateTime<Utc>,
    /// Timestamp when the session was last updated; drives list ordering
    pub updated_at: DateTime<Utc>,
}

impl Session {
    /// Creates an empty session stamped with `now` for both timestamps.
    pub fn new(id: impl Into<String>, title: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns the last message, if any.
    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }
}
