//! Configuration loading and validation.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

use crate::cache::DEFAULT_CACHE_KEY;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Presence log cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Name of the cached resource
    #[serde(default = "default_cache_key")]
    pub key: String,

    /// How long a parsed log stays valid, in seconds.
    /// Zero or negative reparses on every request.
    #[serde(default = "default_ttl_seconds")]
    pub ttl_seconds: i64,
}

fn default_cache_key() -> String {
    DEFAULT_CACHE_KEY.to_string()
}

/// Upper bound on `cache.ttl_seconds` in either direction (ten years).
pub const MAX_TTL_SECONDS: i64 = 10 * 365 * 24 * 3600;

fn default_ttl_seconds() -> i64 {
    600
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            key: default_cache_key(),
            ttl_seconds: default_ttl_seconds(),
        }
    }
}

impl CacheConfig {
    /// Configured TTL, clamped to [`MAX_TTL_SECONDS`].
    pub fn ttl(&self) -> chrono::Duration {
        let secs = self.ttl_seconds.clamp(-MAX_TTL_SECONDS, MAX_TTL_SECONDS);
        chrono::Duration::try_seconds(secs).unwrap_or_else(chrono::Duration::zero)
    }
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_cors_origin() -> String {
    "*".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the presence log
    #[serde(default = "default_data_csv")]
    pub data_csv: PathBuf,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

fn default_data_csv() -> PathBuf {
    PathBuf::from("./runtime/data/sample_data.csv")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_csv: default_data_csv(),
            log_level: default_log_level(),
            cache: CacheConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &PathBuf) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cache.key.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "Cache key must not be empty".to_string(),
            ));
        }

        if self.cache.ttl_seconds.abs() > MAX_TTL_SECONDS {
            return Err(ConfigError::ValidationError(format!(
                "Cache ttl_seconds must be within ±{}",
                MAX_TTL_SECONDS
            )));
        }

        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "Server port must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
