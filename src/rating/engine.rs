//! Season rating engine
//!
//! Runs one season of pairwise Elo updates. Every event on the calendar is
//! broken down into all two-competitor comparisons between the competitors
//! who took part in it; after each event the participants' ratings are
//! written to a new snapshot row.

use crate::config::RatingConfig;
use crate::error::{EloError, Result};
use crate::rating::calendar::SeasonCalendar;
use crate::rating::elo;
use crate::rating::table::RatingSnapshotTable;
use crate::types::{
    CalendarPolicy, CompetitorId, InitialRatings, SeasonId, SeasonResults, UpdateMode,
};
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Per-season Elo engine
#[derive(Debug, Clone)]
pub struct SeasonRatingEngine {
    config: RatingConfig,
}

impl SeasonRatingEngine {
    /// Create a new engine, rejecting invalid configuration
    pub fn new(config: RatingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &RatingConfig {
        &self.config
    }

    /// Run a season using the first competitor's results as the calendar
    pub fn run_season(
        &self,
        season: SeasonId,
        competitors: &[CompetitorId],
        results: &SeasonResults,
        initial_ratings: &InitialRatings,
    ) -> Result<RatingSnapshotTable> {
        let calendar = SeasonCalendar::from_reference(season, competitors, results)?;
        self.run_season_with_calendar(season, competitors, results, initial_ratings, &calendar)
    }

    /// Run a season against an explicit calendar
    pub fn run_season_with_calendar(
        &self,
        season: SeasonId,
        competitors: &[CompetitorId],
        results: &SeasonResults,
        initial_ratings: &InitialRatings,
        calendar: &SeasonCalendar,
    ) -> Result<RatingSnapshotTable> {
        if competitors.is_empty() {
            return Err(EloError::MissingReferenceData {
                season,
                reason: "no competitors".to_string(),
            }
            .into());
        }

        // Position lookup per competitor; first occurrence wins for repeated events
        let mut positions: Vec<HashMap<&str, u32>> = Vec::with_capacity(competitors.len());
        for competitor_id in competitors {
            let competitor_results =
                results
                    .get(competitor_id)
                    .ok_or_else(|| EloError::MissingCompetitorData {
                        season,
                        competitor_id: competitor_id.clone(),
                    })?;

            let mut by_event = HashMap::with_capacity(competitor_results.len());
            for result in competitor_results {
                by_event
                    .entry(result.event_id.as_str())
                    .or_insert(result.position);
            }
            positions.push(by_event);
        }

        self.check_calendar(season, competitors, results, calendar)?;

        let mut ratings: Vec<f64> = competitors
            .iter()
            .map(|c| {
                initial_ratings
                    .get(c)
                    .copied()
                    .unwrap_or(self.config.initial_rating)
            })
            .collect();

        let mut table = RatingSnapshotTable::new(competitors.to_vec());
        let mut comparisons = 0usize;

        for event_id in calendar.events() {
            let participants: Vec<usize> = (0..competitors.len())
                .filter(|&i| positions[i].contains_key(event_id.as_str()))
                .collect();

            comparisons += self.apply_event(event_id, &participants, &positions, &mut ratings);

            let row = (0..competitors.len())
                .map(|i| {
                    positions[i]
                        .contains_key(event_id.as_str())
                        .then_some(ratings[i])
                })
                .collect();
            table.push_row(event_id.clone(), row)?;

            debug!(
                "Season {} event {}: {} participants",
                season,
                event_id,
                participants.len()
            );
        }

        info!(
            "Season {} rated: {} events, {} competitors, {} pairwise comparisons ({} updates)",
            season,
            table.len(),
            competitors.len(),
            comparisons,
            self.config.update_mode
        );

        Ok(table)
    }

    /// Apply every pairwise comparison of one event, returning how many were made.
    ///
    /// Pairs are visited in competitor-list order, `(i, j)` with `i < j`.
    fn apply_event(
        &self,
        event_id: &str,
        participants: &[usize],
        positions: &[HashMap<&str, u32>],
        ratings: &mut [f64],
    ) -> usize {
        let k = self.config.k_factor;
        let mut deltas = vec![0.0; ratings.len()];
        let mut comparisons = 0;

        for (n, &a) in participants.iter().enumerate() {
            for &b in &participants[n + 1..] {
                let outcome =
                    elo::outcome_from_positions(positions[a][event_id], positions[b][event_id]);
                comparisons += 1;

                match self.config.update_mode {
                    UpdateMode::Sequential => {
                        let (new_a, new_b) = elo::update(ratings[a], ratings[b], k, outcome);
                        ratings[a] = new_a;
                        ratings[b] = new_b;
                    }
                    UpdateMode::Simultaneous => {
                        let (delta_a, delta_b) =
                            elo::rating_deltas(ratings[a], ratings[b], k, outcome);
                        deltas[a] += delta_a;
                        deltas[b] += delta_b;
                    }
                }
            }
        }

        if self.config.update_mode == UpdateMode::Simultaneous {
            for (rating, delta) in ratings.iter_mut().zip(deltas) {
                *rating += delta;
            }
        }

        comparisons
    }

    fn check_calendar(
        &self,
        season: SeasonId,
        competitors: &[CompetitorId],
        results: &SeasonResults,
        calendar: &SeasonCalendar,
    ) -> Result<()> {
        let divergence = calendar.divergence(competitors, results);
        if divergence.is_empty() {
            return Ok(());
        }

        let sample: Vec<String> = divergence
            .iter()
            .take(5)
            .map(|d| format!("{}@{}", d.competitor_id, d.event_id))
            .collect();
        warn!(
            "Season {}: {} result(s) outside the calendar ({:?}), policy {}",
            season,
            divergence.len(),
            sample,
            self.config.calendar_policy
        );

        match self.config.calendar_policy {
            CalendarPolicy::Exclude => Ok(()),
            CalendarPolicy::Reject => Err(EloError::CalendarMismatch {
                season,
                count: divergence.len(),
            }
            .into()),
        }
    }
}
