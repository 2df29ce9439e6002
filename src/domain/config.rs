//! Config - Application Configuration
//!
//! Loaded from `catalog.toml`. Every field has a default, so an empty or
//! partial file is valid.

use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::Url;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::constants::{
    CONFIG_FILE_NAME, DEFAULT_BASE_URL, DEFAULT_LOG_LEVEL, DEFAULT_PAGE_SIZE, DEFAULT_TIMEOUT_SECS,
};
use crate::error::{Error, Result};
use crate::helpers::get_or_create_config_dir;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Backend connection
    pub backend: BackendConfig,
    /// Catalog view defaults
    pub catalog: CatalogConfig,
    /// Logging
    pub log: LogConfig,
}

/// Backend connection configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL every endpoint path is appended to
    pub base_url: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl BackendConfig {
    /// Parse and check the base URL
    pub fn url(&self) -> Result<Url> {
        let url = Url::parse(self.base_url.trim()).map_err(|e| Error::Invalid {
            message: format!("Invalid backend base_url {:?}: {e}", self.base_url),
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::Invalid {
                message: format!("Unsupported backend scheme: {}", url.scheme()),
            });
        }

        Ok(url)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

/// Catalog view configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CatalogConfig {
    /// Products per page
    pub page_size: u32,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LogConfig {
    /// Default filter directive, overridden by `RUST_LOG`
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

/// Default configuration file path, in a config dir created on demand
pub fn default_config_path() -> Result<PathBuf> {
    Ok(get_or_create_config_dir()?.join(CONFIG_FILE_NAME))
}

impl AppConfig {
    /// Load from the default location, writing the defaults on first run
    pub fn try_load() -> Result<Self> {
        let path = default_config_path()?;
        Self::load_or_init(&path)
    }

    /// Load `path`, or create it with the default configuration
    pub fn load_or_init(path: &Path) -> Result<Self> {
        if path.exists() {
            return Self::load_from(path);
        }

        let config = Self::default();
        config.save_to(path)?;
        info!(path = ?path, "Wrote default config file");
        Ok(config)
    }

    /// Load from an explicit path
    pub fn load_from(path: &Path) -> Result<Self> {
        info!(path = ?path, "Loading config file");
        let value = std::fs::read_to_string(path)?;
        let config = Self::parse(&value).inspect_err(|e| {
            error!(error = %e, path = ?path, "Failed to parse config file");
        })?;
        Ok(config)
    }

    /// Parse TOML content and validate it
    pub fn parse(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Self = toml::from_str(content)?;
        config.backend.url()?;
        if config.catalog.page_size == 0 {
            return Err(Error::Invalid {
                message: "catalog.page_size must be at least 1".to_string(),
            });
        }
        Ok(config)
    }

    /// Write the configuration back as TOML
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
