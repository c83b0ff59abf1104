//! Main application configuration
//!
//! This module defines the primary configuration structures for the
//! podium-elo batch run, including environment variable loading, TOML file
//! loading and validation.

use crate::config::rating::RatingConfig;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub service: ServiceSettings,
    pub rating: RatingConfig,
    pub cache: CacheSettings,
    pub provider: ProviderSettings,
}

/// Service-level settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Service name for logging
    pub name: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

/// Season cache settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Directory holding one CSV per season
    pub dir: PathBuf,
    /// When false, an in-memory cache is used and nothing touches disk
    pub enabled: bool,
}

/// Result provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    /// Base URL of the results API
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            name: "podium-elo".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("data"),
            enabled: true,
        }
    }
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            base_url: "https://f1api.dev/api".to_string(),
            timeout_seconds: 30,
        }
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| anyhow!("Invalid {} value: {}", key, value))
}

impl AppConfig {
    /// Load configuration from environment variables with fallback to defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Load configuration from a TOML file; environment variables still override it
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config: AppConfig = toml::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config.apply_env()?;
        validate_config(&config)?;
        Ok(config)
    }

    fn apply_env(&mut self) -> Result<()> {
        // Service settings
        if let Ok(name) = env::var("SERVICE_NAME") {
            self.service.name = name;
        }
        if let Ok(log_level) = env::var("LOG_LEVEL") {
            self.service.log_level = log_level;
        }

        // Rating settings
        if let Ok(k) = env::var("ELO_K_FACTOR") {
            self.rating.k_factor = parse_env("ELO_K_FACTOR", &k)?;
        }
        if let Ok(initial) = env::var("ELO_INITIAL_RATING") {
            self.rating.initial_rating = parse_env("ELO_INITIAL_RATING", &initial)?;
        }
        if let Ok(mode) = env::var("ELO_UPDATE_MODE") {
            self.rating.update_mode = parse_env("ELO_UPDATE_MODE", &mode)?;
        }
        if let Ok(policy) = env::var("ELO_CALENDAR_POLICY") {
            self.rating.calendar_policy = parse_env("ELO_CALENDAR_POLICY", &policy)?;
        }

        // Cache settings
        if let Ok(dir) = env::var("CACHE_DIR") {
            self.cache.dir = PathBuf::from(dir);
        }
        if let Ok(enabled) = env::var("CACHE_ENABLED") {
            self.cache.enabled = parse_env("CACHE_ENABLED", &enabled)?;
        }

        // Provider settings
        if let Ok(url) = env::var("PROVIDER_BASE_URL") {
            self.provider.base_url = url;
        }
        if let Ok(timeout) = env::var("PROVIDER_TIMEOUT_SECONDS") {
            self.provider.timeout_seconds = parse_env("PROVIDER_TIMEOUT_SECONDS", &timeout)?;
        }

        Ok(())
    }

    /// Get provider request timeout as Duration
    pub fn provider_timeout(&self) -> Duration {
        Duration::from_secs(self.provider.timeout_seconds)
    }
}

/// Validate configuration values
pub fn validate_config(config: &AppConfig) -> Result<()> {
    // Validate log level
    match config.service.log_level.to_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        _ => return Err(anyhow!("Invalid log level: {}", config.service.log_level)),
    }

    config.rating.validate()?;

    if config.cache.enabled && config.cache.dir.as_os_str().is_empty() {
        return Err(anyhow!("Cache directory cannot be empty when caching is enabled"));
    }

    if config.provider.base_url.is_empty() {
        return Err(anyhow!("Provider base URL cannot be empty"));
    }
    if config.provider.timeout_seconds == 0 {
        return Err(anyhow!("Provider timeout must be greater than 0"));
    }

    Ok(())
}
