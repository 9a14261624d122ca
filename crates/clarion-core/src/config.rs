//! Console configuration, loaded from `~/.config/clarion/config.toml`.
//!
//! Every section falls back to its default when absent, so a missing file
//! yields a fully usable configuration pointing at the local backend.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
const DEFAULT_POLL_INTERVAL_MS: u64 = 3000;
const DEFAULT_PORTAL_DISMISS_MS: u64 = 5000;
const DEFAULT_PROMPT_DISMISS_MS: u64 = 3000;

/// Where the backend lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub base_url: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

/// Session-history polling cadence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    pub interval_ms: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl PollingConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

/// Auto-dismiss deadlines for the alert banners.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertConfig {
    pub portal_dismiss_ms: u64,
    pub prompt_dismiss_ms: u64,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            portal_dismiss_ms: DEFAULT_PORTAL_DISMISS_MS,
            prompt_dismiss_ms: DEFAULT_PROMPT_DISMISS_MS,
        }
    }
}

/// Root configuration for the console.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ConsoleConfig {
    pub backend: BackendConfig,
    pub polling: PollingConfig,
    pub alerts: AlertConfig,
}

impl ConsoleConfig {
    /// Loads the configuration from the default location.
    ///
    /// Resolution order:
    /// 1. `~/.config/clarion/config.toml` (when present)
    /// 2. built-in defaults
    ///
    /// The `CLARION_BASE_URL` environment variable overrides the backend
    /// base URL either way.
    pub fn load() -> Result<Self> {
        let mut config = match Self::default_path() {
            Some(path) if path.exists() => Self::load_from(&path)?,
            _ => Self::default(),
        };
        if let Ok(base_url) = std::env::var("CLARION_BASE_URL") {
            config.backend.base_url = base_url;
        }
        Ok(config)
    }

    /// Loads and parses a specific config file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = toml::from_str(&content)?;
        Ok(config)
    }

    /// `~/.config/clarion/config.toml`, when a config dir is resolvable.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("clarion").join("config.toml"))
    }
}
