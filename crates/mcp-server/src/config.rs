//! Server settings
//!
//! Tunables live in a plain JSON file (camelCase keys). Every key is
//! optional; a missing file means defaults. The default location is the
//! platform config directory for the server, e.g.
//! `~/.config/ftp-mcp/settings.json` on Linux.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::tools::CHARACTER_LIMIT;

const SETTINGS_FILE: &str = "settings.json";

/// Result type alias for settings operations
pub type Result<T> = std::result::Result<T, SettingsError>;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to read settings file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid settings file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Invalid setting: {0}")]
    Invalid(String),

    #[error("IOError - {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Tunables shared by both tool servers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerSettings {
    /// Longest text returned from a tool call
    pub character_limit: usize,
    /// Upload/download cap in bytes (FTP transfers and WordPress media)
    pub max_file_size: u64,
    /// WordPress HTTP timeout
    pub request_timeout_secs: u64,
    /// WordPress REST prefix appended to the site URL
    pub api_base_path: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            character_limit: CHARACTER_LIMIT,
            max_file_size: remote_fs::DEFAULT_MAX_FILE_SIZE,
            request_timeout_secs: wp_client::DEFAULT_TIMEOUT.as_secs(),
            api_base_path: wp_client::API_BASE_PATH.to_string(),
        }
    }
}

impl ServerSettings {
    /// Load from `path`, or from the default location for `app` when `None`.
    /// A missing file yields defaults; an unreadable or malformed one is an error.
    pub fn load(path: Option<&Path>, app: &str) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match Self::default_path(app) {
                Some(path) => path,
                None => {
                    debug!("No config directory for {}, using default settings", app);
                    return Ok(Self::default());
                }
            },
        };
        Self::load_from_file(&path)
    }

    /// `<config dir>/<app>/settings.json`, when the platform has a config dir
    pub fn default_path(app: &str) -> Option<PathBuf> {
        ProjectDirs::from("co", "ezedit", app).map(|dirs| dirs.config_dir().join(SETTINGS_FILE))
    }

    fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No settings file at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Self =
            serde_json::from_str(&contents).map_err(|source| SettingsError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        settings.check()?;

        debug!("Loaded settings from {:?}", path);
        Ok(settings)
    }

    fn check(&self) -> Result<()> {
        if self.character_limit == 0 {
            return Err(SettingsError::Invalid(
                "characterLimit must be greater than 0".into(),
            ));
        }
        if self.max_file_size == 0 {
            return Err(SettingsError::Invalid(
                "maxFileSize must be greater than 0".into(),
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(SettingsError::Invalid(
                "requestTimeoutSecs must be greater than 0".into(),
            ));
        }
        Ok(())
    }

    /// Write settings atomically through a temp file
    pub async fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let contents = serde_json::to_string_pretty(self)?;

        let temp_path = path.with_extension("tmp");
        tokio::fs::write(&temp_path, &contents).await?;
        tokio::fs::rename(&temp_path, path).await?;

        debug!("Saved settings to {:?}", path);
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn transfer_limits(&self) -> remote_fs::TransferLimits {
        remote_fs::TransferLimits {
            max_file_size: self.max_file_size,
        }
    }
}
