//! Error types for the chatdesk engine.

use serde::Serialize;
use thiserror::Error;

/// A shared error type for the entire chatdesk workspace.
///
/// Collaborator adapters (HTTP backend, configuration loader) convert their
/// native failures into these variants so the application layer only has to
/// reason about one taxonomy.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
pub enum ChatdeskError {
    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// The backend could not be reached or the connection failed mid-request
    #[error("Transport error: {0}")]
    Transport(String),

    /// The backend answered with an unexpected status code
    #[error("HTTP error {status}: {message}")]
    Http { status: u16, message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },
}

impl ChatdeskError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a Transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Creates an Http error
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this error came from talking to the backend
    /// (connection failure or non-success status).
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Http { .. })
    }

    /// Check if this is a serialization error
    pub fn is_serialization(&self) -> bool {
        matches!(self, Self::Serialization { .. })
    }

    /// Check if this is a config error
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for ChatdeskError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for ChatdeskError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for ChatdeskError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<url::ParseError> for ChatdeskError {
    fn from(err: url::ParseError) -> Self {
        Self::Config(format!("invalid URL: {}", err))
    }
}

/// A type alias for `Result<T, ChatdeskError>`.
pub type Result<T> = std::result::Result<T, ChatdeskError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_predicate_covers_http_status() {
        assert!(ChatdeskError::transport("connection refused").is_transport());
        assert!(ChatdeskError::http(500, "boom").is_transport());
        assert!(!ChatdeskError::not_found("Conversation", "abc").is_transport());
    }

    #[test]
    fn test_toml_error_converts_to_serialization() {
        let err: ChatdeskError = toml::from_str::<toml::Value>("= broken")
            .unwrap_err()
            .into();
        assert!(err.is_serialization());
    }
}
