//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (SITEMETA_*)
//! 2. TOML config file (if SITEMETA_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (SITEMETA_*)
/// 2. TOML config file (if SITEMETA_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the SQLite metadata database.
    ///
    /// Set via SITEMETA_DB_PATH environment variable. Required: the
    /// process refuses to start when it is absent.
    #[serde(default)]
    pub db_path: PathBuf,

    /// User-Agent string attached to every outbound fetch, identifying
    /// this service to remote servers.
    ///
    /// Set via SITEMETA_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Byte ceiling for stored page sources. Bodies beyond this are
    /// silently truncated.
    ///
    /// Set via SITEMETA_MAX_BODY_BYTES environment variable.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,

    /// HTTP request timeout in milliseconds.
    ///
    /// Set via SITEMETA_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Maximum number of redirects followed per fetch.
    ///
    /// Set via SITEMETA_MAX_REDIRECTS environment variable.
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,

    /// Log verbosity, an `EnvFilter` directive such as "info" or
    /// "sitemeta_server=debug".
    ///
    /// Set via SITEMETA_LOG_LEVEL environment variable.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_user_agent() -> String {
    "sitemeta-bot/0.1".into()
}

fn default_max_body_bytes() -> usize {
    500_000
}

fn default_timeout_ms() -> u64 {
    20_000
}

fn default_max_redirects() -> usize {
    5
}

fn default_log_level() -> String {
    "info".into()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::new(),
            user_agent: default_user_agent(),
            max_body_bytes: default_max_body_bytes(),
            timeout_ms: default_timeout_ms(),
            max_redirects: default_max_redirects(),
            log_level: default_log_level(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `SITEMETA_`
    /// 2. TOML file from `SITEMETA_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading (including a missing db_path)
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("SITEMETA_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("SITEMETA_")
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.db_path, PathBuf::new());
        assert_eq!(config.user_agent, "sitemeta-bot/0.1");
        assert_eq!(config.max_body_bytes, 500_000);
        assert_eq!(config.timeout_ms, 20_000);
        assert_eq!(config.max_redirects, 5);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_timeout_duration() {
        let config = AppConfig::default();
        assert_eq!(config.timeout(), Duration::from_millis(20_000));
    }

    #[test]
    fn test_default_config_fails_validation_without_db_path() {
        let config = AppConfig::default();
        assert!(matches!(config.validate(), Err(ConfigError::Missing { .. })));
    }
}
