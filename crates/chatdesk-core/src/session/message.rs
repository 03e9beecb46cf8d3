//! Conversation message types.
//!
//! This module contains types for representing messages in a conversation,
//! including roles and message content.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Represents the role of a message in a conversation.
///
/// The backend speaks free-form role strings; the engine only distinguishes
/// the user from everything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Message typed by the user.
    User,
    /// Any other turn (model output, tool output, unknown roles).
    Assistant,
}

impl MessageRole {
    /// Classifies a raw backend role string.
    ///
    /// Only an exact `"user"` is a user turn; everything else, including an
    /// absent role, is treated as the assistant.
    pub fn classify(raw: Option<&str>) -> Self {
        match raw {
            Some("user") => Self::User,
            _ => Self::Assistant,
        }
    }
}

/// A single message in a conversation history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Identifier unique within the parent session (`{session_id}-{index}`).
    pub id: String,
    /// The content of the message.
    pub content: String,
    /// The role of the message sender.
    pub role: MessageRole,
    /// When the message was produced.
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Builds the deterministic message id for position `index` in `session_id`.
    pub fn derive_id(session_id: &str, index: usize) -> String {
        format!("{}-{}", session_id, index)
    }
}
