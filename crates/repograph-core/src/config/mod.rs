//! Configuration management for RepoGraph.
//!
//! Configuration is loaded from multiple sources with the following priority:
//! 1. Command-line flags (applied by the binary, highest priority)
//! 2. Environment variables
//! 3. Project-local `repograph.toml` file
//! 4. User config `~/.config/repograph/config.toml`
//! 5. Built-in defaults (lowest priority)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

mod defaults;

pub use defaults::*;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Backend connection configuration.
    pub backend: BackendConfig,

    /// Search view configuration.
    pub search: SearchConfig,

    /// Issues view configuration.
    pub issues: IssuesConfig,

    /// Graph listing configuration.
    pub listing: ListingConfig,

    /// Local storage configuration.
    pub storage: StorageConfig,
}

impl Config {
    /// Load configuration from default locations.
    ///
    /// Searches for config in order:
    /// 1. `./repograph.toml` (project local)
    /// 2. `~/.config/repograph/config.toml` (user config)
    /// 3. Falls back to defaults
    ///
    /// Environment overrides are applied in every case.
    pub fn load() -> Result<Self, ConfigError> {
        if Path::new(PROJECT_CONFIG_FILE).exists() {
            return Self::from_file(PROJECT_CONFIG_FILE);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join(USER_CONFIG_DIR).join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        let mut config = Self::default();
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&content)?;

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary key lookup.
    ///
    /// `REPOGRAPH_BACKEND_URL` wins over `NEXT_PUBLIC_BACKEND_URL`.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(ENV_BACKEND_URL).or_else(|| lookup(ENV_PUBLIC_BACKEND_URL)) {
            self.backend.url = url;
        }
        if let Some(secs) = lookup(ENV_TIMEOUT_SECS) {
            if let Ok(n) = secs.parse() {
                self.backend.timeout_secs = n;
            }
        }
        if let Some(secs) = lookup(ENV_POLL_INTERVAL_SECS) {
            if let Ok(n) = secs.parse() {
                self.listing.poll_interval_secs = n;
            }
        }
        if let Some(dir) = lookup(ENV_DATA_DIR) {
            self.storage.data_dir = dir;
        }
    }

    /// Check values that would otherwise fail later at runtime.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.backend.url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::Invalid(format!(
                "backend.url must be an http(s) origin, got '{}'",
                self.backend.url
            )));
        }
        if self.search.semantic_limit == 0 || self.search.query_limit == 0 {
            return Err(ConfigError::Invalid("search limits must be > 0".to_string()));
        }
        if self.issues.page_size == 0 {
            return Err(ConfigError::Invalid("issues.page_size must be > 0".to_string()));
        }
        if self.listing.poll_interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "listing.poll_interval_secs must be > 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Create a default config file content as a string.
    pub fn default_config_string() -> String {
        Config::default().to_toml()
    }

    /// Render this configuration as TOML.
    pub fn to_toml(&self) -> String {
        toml::to_string_pretty(self).unwrap_or_default()
    }
}

/// Backend connection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Origin of `repograph-backend`; every endpoint URL derives from it.
    pub url: String,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_BACKEND_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl BackendConfig {
    /// Request timeout as a `Duration`.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Search view configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Page size for semantic search.
    pub semantic_limit: usize,

    /// Page size for named queries.
    pub query_limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            semantic_limit: DEFAULT_SEMANTIC_LIMIT,
            query_limit: DEFAULT_QUERY_LIMIT,
        }
    }
}

/// Issues view configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IssuesConfig {
    /// Rows per page in an issue detail table.
    pub page_size: usize,
}

impl Default for IssuesConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_ISSUES_PAGE_SIZE,
        }
    }
}

/// Graph listing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingConfig {
    /// Seconds between polls of `/metadata/graphs`.
    pub poll_interval_secs: u64,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
        }
    }
}

impl ListingConfig {
    /// Poll interval as a `Duration`.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}

/// Local storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Base directory for local data (default: ".repograph").
    pub data_dir: String,

    /// Log subdirectory name.
    pub log_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: DEFAULT_DATA_DIR.to_string(),
            log_dir: DEFAULT_LOG_DIR.to_string(),
        }
    }
}

impl StorageConfig {
    /// Get the full path to the log directory.
    pub fn log_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join(&self.log_dir)
    }
}
