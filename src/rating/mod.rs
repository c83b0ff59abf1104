//! Pairwise Elo rating engine
//!
//! This module provides the pairwise update, the season calendar, the
//! per-season engine, the snapshot table and the season range aggregator.

pub mod calendar;
pub mod elo;
pub mod engine;
pub mod season_range;
pub mod table;

// Re-export commonly used types
pub use calendar::{CalendarDivergence, CalendarSource, SeasonCalendar};
pub use engine::SeasonRatingEngine;
pub use season_range::{initial_ratings_from, SeasonRangeAggregator};
pub use table::{RatingSnapshotTable, SnapshotRow};
