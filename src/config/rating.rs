//! Rating system configuration

use crate::error::EloError;
use crate::types::{CalendarPolicy, UpdateMode};
use serde::{Deserialize, Serialize};

/// Default K-factor for pairwise updates
pub const DEFAULT_K_FACTOR: f64 = 32.0;

/// Default rating for competitors without history
pub const DEFAULT_INITIAL_RATING: f64 = 1000.0;

/// Parameters of the season rating engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RatingConfig {
    /// Sensitivity of a single pairwise comparison
    pub k_factor: f64,
    /// Rating for competitors with no carried-forward value
    pub initial_rating: f64,
    /// How updates within one event are combined
    pub update_mode: UpdateMode,
    /// Handling of results outside the season calendar
    pub calendar_policy: CalendarPolicy,
}

impl Default for RatingConfig {
    fn default() -> Self {
        Self {
            k_factor: DEFAULT_K_FACTOR,
            initial_rating: DEFAULT_INITIAL_RATING,
            update_mode: UpdateMode::default(),
            calendar_policy: CalendarPolicy::default(),
        }
    }
}

impl RatingConfig {
    /// Create conservative configuration (slower rating changes)
    pub fn conservative() -> Self {
        Self {
            k_factor: 16.0,
            ..Self::default()
        }
    }

    /// Create aggressive configuration (faster rating changes)
    pub fn aggressive() -> Self {
        Self {
            k_factor: 40.0,
            ..Self::default()
        }
    }

    pub fn with_k_factor(mut self, k_factor: f64) -> Self {
        self.k_factor = k_factor;
        self
    }

    pub fn with_initial_rating(mut self, initial_rating: f64) -> Self {
        self.initial_rating = initial_rating;
        self
    }

    pub fn with_update_mode(mut self, update_mode: UpdateMode) -> Self {
        self.update_mode = update_mode;
        self
    }

    pub fn with_calendar_policy(mut self, calendar_policy: CalendarPolicy) -> Self {
        self.calendar_policy = calendar_policy;
        self
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> crate::error::Result<()> {
        if !self.k_factor.is_finite() || self.k_factor <= 0.0 {
            return Err(EloError::ConfigurationError {
                message: format!("K-factor must be positive, got {}", self.k_factor),
            }
            .into());
        }

        if !self.initial_rating.is_finite() {
            return Err(EloError::ConfigurationError {
                message: format!("Initial rating must be finite, got {}", self.initial_rating),
            }
            .into());
        }

        Ok(())
    }
}
