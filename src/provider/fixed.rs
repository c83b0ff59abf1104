//! Static result provider
//!
//! Serves results from memory. Used by tests and by callers that already
//! have the data at hand.

use crate::error::{EloError, Result};
use crate::provider::ResultProvider;
use crate::types::{CompetitorId, EventId, EventResult, SeasonId};
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
struct SeasonData {
    competitors: Vec<CompetitorId>,
    results: HashMap<CompetitorId, Vec<EventResult>>,
    calendar: Option<Vec<EventId>>,
}

/// In-memory result provider
#[derive(Debug, Clone, Default)]
pub struct StaticResultProvider {
    seasons: HashMap<SeasonId, SeasonData>,
}

impl StaticResultProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a season with its competitors and their `(event, position)` results.
    ///
    /// Competitors are listed in the given order; the first one is the
    /// calendar reference unless a calendar is declared.
    pub fn with_season<I, C, E>(mut self, season: SeasonId, entries: I) -> Self
    where
        I: IntoIterator<Item = (C, Vec<(E, u32)>)>,
        C: Into<CompetitorId>,
        E: Into<EventId>,
    {
        let data = self.seasons.entry(season).or_default();
        for (competitor, results) in entries {
            let competitor = competitor.into();
            let results = results
                .into_iter()
                .map(|(event, position)| EventResult::new(event, position))
                .collect();
            if !data.competitors.contains(&competitor) {
                data.competitors.push(competitor.clone());
            }
            data.results.insert(competitor, results);
        }
        self
    }

    /// List a competitor as active without any stored results
    pub fn with_roster_only(
        mut self,
        season: SeasonId,
        competitor: impl Into<CompetitorId>,
    ) -> Self {
        let competitor = competitor.into();
        let data = self.seasons.entry(season).or_default();
        if !data.competitors.contains(&competitor) {
            data.competitors.push(competitor);
        }
        self
    }

    /// Declare the event order of a season
    pub fn with_calendar<E: Into<EventId>>(
        mut self,
        season: SeasonId,
        events: impl IntoIterator<Item = E>,
    ) -> Self {
        self.seasons.entry(season).or_default().calendar =
            Some(events.into_iter().map(Into::into).collect());
        self
    }
}

impl ResultProvider for StaticResultProvider {
    fn active_competitors(&self, season: SeasonId) -> Result<Vec<CompetitorId>> {
        self.seasons
            .get(&season)
            .map(|data| data.competitors.clone())
            .filter(|competitors| !competitors.is_empty())
            .ok_or_else(|| {
                EloError::UpstreamDataError {
                    message: format!("No competitors for season {}", season),
                }
                .into()
            })
    }

    fn results(&self, competitor_id: &str, season: SeasonId) -> Result<Vec<EventResult>> {
        self.seasons
            .get(&season)
            .and_then(|data| data.results.get(competitor_id))
            .cloned()
            .ok_or_else(|| {
                EloError::UpstreamDataError {
                    message: format!("No results for {} in season {}", competitor_id, season),
                }
                .into()
            })
    }

    fn season_calendar(&self, season: SeasonId) -> Result<Option<Vec<EventId>>> {
        Ok(self.seasons.get(&season).and_then(|data| data.calendar.clone()))
    }
}
