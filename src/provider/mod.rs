//! Result provider traits and implementations
//!
//! The rating engine does not fetch anything itself. Season rosters and
//! per-competitor result sequences come from a [`ResultProvider`]; failures
//! are propagated as-is, retry policy belongs to the provider.

pub mod fixed;
pub mod http;

use crate::error::Result;
use crate::types::{CompetitorId, EventId, EventResult, SeasonId};

pub use fixed::StaticResultProvider;
pub use http::HttpResultProvider;

/// Source of season rosters and race results
#[cfg_attr(test, mockall::automock)]
pub trait ResultProvider: Send + Sync {
    /// Competitors active in a season, in a stable order
    fn active_competitors(&self, season: SeasonId) -> Result<Vec<CompetitorId>>;

    /// A competitor's results for a season, in event order
    fn results(&self, competitor_id: &str, season: SeasonId) -> Result<Vec<EventResult>>;

    /// Declared event order for a season, if the source knows it.
    ///
    /// When `None`, the order is taken from the first active competitor's
    /// results.
    fn season_calendar(&self, _season: SeasonId) -> Result<Option<Vec<EventId>>> {
        Ok(None)
    }
}
