//! Configuration model.
//!
//! Every section defaults sensibly so a missing or partial `config.toml`
//! still yields a usable configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use strum::{Display, EnumString};

/// Where a page variant keeps the session identifier in its location.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum IdSource {
    /// `/chat/{id}`
    #[default]
    Path,
    /// `/dashboard?chat={id}`
    Query,
}

/// Per-page-variant navigation settings.
///
/// The route-embedded and query-embedded dashboards share all session logic;
/// only this value differs between them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    pub id_source: IdSource,
    /// Whether an explicit selection appends a history entry (push) instead of
    /// replacing the current one.
    pub selection_writes_history: bool,
    /// Location of the page with no session selected.
    pub base_path: String,
    /// Query parameter carrying the id when `id_source` is `Query`.
    pub query_key: String,
}

impl PageConfig {
    /// The route-embedded variant: `/chat/{id}`.
    pub fn path_variant() -> Self {
        Self {
            id_source: IdSource::Path,
            selection_writes_history: true,
            base_path: "/chat".to_string(),
            query_key: "chat".to_string(),
        }
    }

    /// The query-embedded variant: `/dashboard?chat={id}`.
    pub fn query_variant() -> Self {
        Self {
            id_source: IdSource::Query,
            selection_writes_history: true,
            base_path: "/dashboard".to_string(),
            query_key: "chat".to_string(),
        }
    }

    /// The canonical settings for `source`.
    pub fn for_source(source: IdSource) -> Self {
        match source {
            IdSource::Path => Self::path_variant(),
            IdSource::Query => Self::query_variant(),
        }
    }
}

impl Default for PageConfig {
    fn default() -> Self {
        Self::path_variant()
    }
}

/// Connection settings for the conversation backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL; `/conversations` is appended for requests.
    pub base_url: String,
    /// Per-request timeout. `None` waits indefinitely.
    pub request_timeout_secs: Option<u64>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api".to_string(),
            request_timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub filter: String,
    /// Log directory; the platform data directory is used when unset.
    pub directory: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            directory: None,
        }
    }
}

/// Root of `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RootConfig {
    pub backend: BackendConfig,
    pub page: PageConfig,
    pub logging: LoggingConfig,
}
