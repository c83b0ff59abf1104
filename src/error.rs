//! Error types for the rating engine
//!
//! Functions return `anyhow::Result` throughout; the typed variants below are
//! raised with `.into()` and can be recovered with `downcast_ref::<EloError>()`.

use crate::types::{CompetitorId, SeasonId};

/// Result type alias for convenience
pub type Result<T> = anyhow::Result<T>;

/// Custom error types for specific rating scenarios
#[derive(Debug, thiserror::Error)]
pub enum EloError {
    #[error("Missing reference data for season {season}: {reason}")]
    MissingReferenceData { season: SeasonId, reason: String },

    #[error("Missing result data for competitor {competitor_id} in season {season}")]
    MissingCompetitorData {
        season: SeasonId,
        competitor_id: CompetitorId,
    },

    #[error("Upstream data error: {message}")]
    UpstreamDataError { message: String },

    #[error("Cache read failed for season {season}: {message}")]
    CacheReadError { season: SeasonId, message: String },

    #[error("Cache write failed for season {season}: {message}")]
    CacheWriteError { season: SeasonId, message: String },

    #[error("Calendar mismatch in season {season}: {count} result(s) outside the calendar")]
    CalendarMismatch { season: SeasonId, count: usize },

    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },
}

impl EloError {
    /// Whether a cache lookup failing with this error should fall back to recomputation
    pub fn is_cache_miss(&self) -> bool {
        matches!(self, EloError::CacheReadError { .. })
    }
}
