use serde::{Deserialize, Serialize};

use super::Session;

/// Notifications published by the chat surface after the backend has
/// persisted a change.
///
/// Every variant carries the full replacement session; the dashboard never
/// patches individual messages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// A conversational turn finished and was stored.
    TurnCompleted { session: Session },
    /// The conversation title changed on the backend.
    Renamed { session: Session },
}

impl SessionEvent {
    pub fn into_session(self) -> Session {
        match self {
            Self::TurnCompleted { session } | Self::Renamed { session } => session,
        }
    }
}
