//! Raw backend records to domain sessions.

use super::raw::{RawConversation, RawMessage};
use crate::session::{Message, MessageRole, PLACEHOLDER_TITLE, Session};
use chrono::{DateTime, NaiveDateTime, Utc};

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Turns one backend record into exactly one [`Session`].
///
/// - A missing or empty title becomes [`PLACEHOLDER_TITLE`].
/// - A missing history becomes an empty message list.
/// - Both `created_at` and `updated_at` come from the record's creation
///   timestamp, or from `now` when the record has none. The backend does not
///   report a separate update time.
///
/// `now` is the moment of normalization; passing it in keeps this a pure
/// function.
pub fn normalize_conversation(raw: RawConversation, now: DateTime<Utc>) -> Session {
    let created_at = raw
        .created_at
        .as_deref()
        .and_then(|value| parse_timestamp(value, &raw.uuid))
        .unwrap_or(now);

    let title = match raw.title {
        Some(title) if !title.is_empty() => title,
        _ => PLACEHOLDER_TITLE.to_string(),
    };

    let messages = raw
        .history
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .map(|(index, entry)| normalize_message(&raw.uuid, index, entry, created_at))
        .collect();

    Session {
        id: raw.uuid,
        title,
        messages,
        created_at,
        updated_at: created_at,
    }
}

/// Normalizes every record of a list response, preserving backend order.
pub fn normalize_all(raw: Vec<RawConversation>, now: DateTime<Utc>) -> Vec<Session> {
    raw.into_iter()
        .map(|conversation| normalize_conversation(conversation, now))
        .collect()
}

fn normalize_message(
    session_id: &str,
    index: usize,
    raw: RawMessage,
    session_created_at: DateTime<Utc>,
) -> Message {
    let timestamp = raw
        .timestamp
        .as_deref()
        .and_then(|value| parse_timestamp(value, session_id))
        .unwrap_or(session_created_at);

    Message {
        id: Message::derive_id(session_id, index),
        content: raw.content,
        role: MessageRole::classify(raw.role.as_deref()),
        timestamp,
    }
}

/// Parses RFC 3339, or a naive ISO-8601 timestamp interpreted as UTC.
fn parse_timestamp(value: &str, session_id: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }

    for format in NAIVE_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, format) {
            return Some(parsed.and_utc());
        }
    }

    tracing::warn!(
        "[Normalizer] Unparseable timestamp '{}' in conversation {}",
        value,
        session_id
    );
    None
}
