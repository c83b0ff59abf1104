//! Configuration management for podium-elo
//!
//! This module handles configuration loading from environment variables and
//! TOML files, validation, and default values for the rating run.

pub mod app;
pub mod rating;

// Re-export commonly used types
pub use app::{validate_config, AppConfig, CacheSettings, ProviderSettings, ServiceSettings};
pub use rating::RatingConfig;
