// src/config.rs
use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tracing::info;

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Client configuration. Built programmatically or loaded from a small TOML
/// file for the CLI; `HIREME_API_URL` overrides the base URL either way.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    base_url: Option<String>,
    timeout_secs: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Load configuration for the CLI: explicit file if given, then the
    /// environment, then defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        if let Ok(url) = std::env::var("HIREME_API_URL") {
            config.base_url = url.trim_end_matches('/').to_string();
        }

        info!("Using API base URL: {}", config.base_url);
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::validation(format!("failed to read config {}: {}", path.display(), e))
        })?;

        let file: ConfigFile = toml::from_str(&content).map_err(|e| {
            Error::validation(format!("failed to parse config {}: {}", path.display(), e))
        })?;

        let mut config = match file.base_url {
            Some(url) => Self::new(&url),
            None => Self::default(),
        };
        if let Some(secs) = file.timeout_secs {
            config.timeout = Duration::from_secs(secs);
        }
        Ok(config)
    }
}
