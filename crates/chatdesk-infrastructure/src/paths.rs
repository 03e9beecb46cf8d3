//! Unified path management for chatdesk files.
//!
//! ```text
//! ~/.config/chatdesk/          # Config directory
//! └── config.toml              # Application configuration
//!
//! ~/.local/share/chatdesk/     # Data directory
//! └── logs/                    # Application logs
//!     └── chatdesk.log.YYYY-MM-DD
//! ```

use std::path::PathBuf;

const APP_DIR: &str = "chatdesk";
const CONFIG_FILE: &str = "config.toml";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Platform config directory could not be determined.
    ConfigDirNotFound,
    /// Platform data directory could not be determined.
    DataDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::ConfigDirNotFound => write!(f, "Cannot find config directory"),
            PathError::DataDirNotFound => write!(f, "Cannot find data directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Unified path management for chatdesk.
pub struct ChatdeskPaths;

impl ChatdeskPaths {
    /// Returns the chatdesk configuration directory (e.g. `~/.config/chatdesk/`).
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::ConfigDirNotFound)
    }

    /// Returns the default configuration file path.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join(CONFIG_FILE))
    }

    /// Returns the chatdesk data directory (e.g. `~/.local/share/chatdesk/`).
    pub fn data_dir() -> Result<PathBuf, PathError> {
        dirs::data_local_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::DataDirNotFound)
    }

    /// Returns the default log directory.
    pub fn log_dir() -> Result<PathBuf, PathError> {
        Ok(Self::data_dir()?.join("logs"))
    }
}
