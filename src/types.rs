//! Common types used throughout the rating engine

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Unique identifier for competitors (drivers)
pub type CompetitorId = String;

/// Unique identifier for events (races)
pub type EventId = String;

/// Season identifier, a calendar year
pub type SeasonId = u32;

/// Ordered result sequences for every competitor of one season
pub type SeasonResults = HashMap<CompetitorId, Vec<EventResult>>;

/// Rating a competitor enters a season with
pub type InitialRatings = HashMap<CompetitorId, f64>;

/// One competitor's finishing position at one event
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventResult {
    pub event_id: EventId,
    /// Finishing position, 1 = winner
    pub position: u32,
}

impl EventResult {
    pub fn new(event_id: impl Into<EventId>, position: u32) -> Self {
        Self {
            event_id: event_id.into(),
            position,
        }
    }
}

/// How pairwise updates within a single event are combined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateMode {
    /// Every pair is scored against the pre-event ratings and all deltas
    /// are applied together once the event has been processed
    #[default]
    Simultaneous,
    /// Each pair overwrites the working ratings immediately, so later pairs
    /// of the same event see earlier updates
    Sequential,
}

impl std::fmt::Display for UpdateMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UpdateMode::Simultaneous => write!(f, "simultaneous"),
            UpdateMode::Sequential => write!(f, "sequential"),
        }
    }
}

impl std::str::FromStr for UpdateMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "simultaneous" | "batch" => Ok(UpdateMode::Simultaneous),
            "sequential" => Ok(UpdateMode::Sequential),
            other => Err(format!("unknown update mode: {}", other)),
        }
    }
}

/// What to do when a competitor has results for events outside the season calendar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalendarPolicy {
    /// Log the divergence and leave those results out of every update
    #[default]
    Exclude,
    /// Abort the season
    Reject,
}

impl std::fmt::Display for CalendarPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CalendarPolicy::Exclude => write!(f, "exclude"),
            CalendarPolicy::Reject => write!(f, "reject"),
        }
    }
}

impl std::str::FromStr for CalendarPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "exclude" => Ok(CalendarPolicy::Exclude),
            "reject" => Ok(CalendarPolicy::Reject),
            other => Err(format!("unknown calendar policy: {}", other)),
        }
    }
}
