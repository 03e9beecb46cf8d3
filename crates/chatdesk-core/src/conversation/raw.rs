//! Wire records returned by the conversation backend.
//!
//! These mirror the backend's JSON exactly and are never handed to the
//! presentation layer; [`super::normalize_conversation`] turns them into
//! domain sessions.

use serde::{Deserialize, Serialize};

/// Response body of "list conversations".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversationList {
    #[serde(default)]
    pub conversations: Vec<RawConversation>,
}

/// One conversation as stored by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawConversation {
    pub uuid: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub history: Option<Vec<RawMessage>>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// One history entry of a [`RawConversation`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawMessage {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl RawConversation {
    /// A record carrying only its id.
    pub fn with_id(uuid: impl Into<String>) -> Self {
        Self {
            uuid: uuid.into(),
            title: None,
            history: None,
            created_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_minimal_record() {
        let raw: RawConversation = serde_json::from_str(r#"{"uuid":"abc"}"#).unwrap();
        assert_eq!(raw, RawConversation::with_id("abc"));
    }

    #[test]
    fn test_deserialize_list_with_history() {
        let json = r#"{
            "conversations": [
                {
                    "uuid": "c1",
                    "title": "Trip planning",
                    "created_at": "2024-05-01T10:00:00Z",
                    "history": [
                        {"role": "user", "content": "hi"},
                        {"role": "bot", "content": "hello"}
                    ]
                }
            ]
        }"#;
        let list: ConversationList = serde_json::from_str(json).unwrap();

        assert_eq!(list.conversations.len(), 1);
        let history = list.conversations[0].history.as_ref().unwrap();
        assert_eq!(history[1].role.as_deref(), Some("bot"));
    }

    #[test]
    fn test_deserialize_empty_body_as_empty_list() {
        let list: ConversationList = serde_json::from_str("{}").unwrap();
        assert!(list.conversations.is_empty());
    }
}
