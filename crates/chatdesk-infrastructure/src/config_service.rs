//! Configuration service implementation.
//!
//! This module provides a ConfigService that loads the root configuration
//! from the configuration file (~/.config/chatdesk/config.toml).

use crate::paths::ChatdeskPaths;
use chatdesk_core::config::RootConfig;
use chatdesk_core::error::{ChatdeskError, Result};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// Environment variable overriding `backend.base_url`.
pub const BACKEND_URL_ENV: &str = "CHATDESK_BACKEND_URL";

/// Configuration service that loads and caches the root configuration.
///
/// A missing file is not an error: defaults are used. A file that exists but
/// cannot be parsed is reported.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
    /// Cached configuration loaded from file.
    config: Arc<RwLock<Option<RootConfig>>>,
}

impl ConfigService {
    /// Creates a ConfigService reading `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Creates a ConfigService for the platform default location.
    pub fn new_default() -> Result<Self> {
        let path = ChatdeskPaths::config_file().map_err(|e| ChatdeskError::config(e.to_string()))?;
        Ok(Self::new(path))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Gets the root configuration, loading from file if not cached.
    ///
    /// The `CHATDESK_BACKEND_URL` environment variable, when set and
    /// non-empty, overrides `backend.base_url`.
    pub fn get_config(&self) -> Result<RootConfig> {
        {
            let read_lock = self.config.read().unwrap_or_else(|e| e.into_inner());
            if let Some(ref cached) = *read_lock {
                return Ok(cached.clone());
            }
        }

        let loaded = apply_env_overrides(
            Self::load_config(&self.path)?,
            std::env::var(BACKEND_URL_ENV).ok(),
        );

        {
            let mut write_lock = self.config.write().unwrap_or_else(|e| e.into_inner());
            *write_lock = Some(loaded.clone());
        }

        Ok(loaded)
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        let mut write_lock = self.config.write().unwrap_or_else(|e| e.into_inner());
        *write_lock = None;
    }

    fn load_config(path: &Path) -> Result<RootConfig> {
        if !path.exists() {
            tracing::info!(
                "[ConfigService] No config file at {:?}, using defaults",
                path
            );
            return Ok(RootConfig::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: RootConfig = toml::from_str(&content)?;
        tracing::info!("[ConfigService] Loaded config from {:?}", path);
        Ok(config)
    }
}

fn apply_env_overrides(mut config: RootConfig, backend_url: Option<String>) -> RootConfig {
    if let Some(url) = backend_url
        && !url.trim().is_empty()
    {
        tracing::debug!("[ConfigService] {} overrides backend URL", BACKEND_URL_ENV);
        config.backend.base_url = url;
    }
    config
}
