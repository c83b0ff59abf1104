//! Podium Elo - pairwise Elo ratings for racing drivers
//!
//! This crate turns per-race finishing positions into season-by-season Elo
//! rating histories. Every race is broken down into head-to-head comparisons
//! between the drivers who took part, and each season starts from the
//! previous season's final ratings.

pub mod cache;
pub mod config;
pub mod error;
pub mod provider;
pub mod rating;
pub mod types;

// Re-export commonly used types and traits
pub use error::{EloError, Result};
pub use types::*;

// Re-export key components
pub use cache::{FileSeasonCache, InMemorySeasonCache, SeasonCache};
pub use provider::{HttpResultProvider, ResultProvider, StaticResultProvider};
pub use rating::{RatingSnapshotTable, SeasonRangeAggregator, SeasonRatingEngine};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
