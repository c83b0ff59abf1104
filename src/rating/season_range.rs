//! Season range aggregation
//!
//! Seasons are rated strictly in ascending order because each season starts
//! from the previous season's final ratings. Cached seasons are returned
//! unchanged; everything else is computed, stored and appended.

use crate::cache::SeasonCache;
use crate::config::RatingConfig;
use crate::error::{EloError, Result};
use crate::provider::ResultProvider;
use crate::rating::calendar::SeasonCalendar;
use crate::rating::engine::SeasonRatingEngine;
use crate::rating::table::RatingSnapshotTable;
use crate::types::{CompetitorId, InitialRatings, SeasonId, SeasonResults};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Carry-forward ratings: each competitor's last finite rating in `previous`.
///
/// Competitors without a finite value there are left out and will start
/// from the configured default.
pub fn initial_ratings_from(
    previous: &RatingSnapshotTable,
    competitors: &[CompetitorId],
) -> InitialRatings {
    competitors
        .iter()
        .filter_map(|c| previous.last_finite(c).map(|rating| (c.clone(), rating)))
        .collect()
}

/// Drives the season engine over a contiguous range of seasons
pub struct SeasonRangeAggregator {
    engine: SeasonRatingEngine,
    provider: Arc<dyn ResultProvider>,
    cache: Arc<dyn SeasonCache>,
}

impl SeasonRangeAggregator {
    pub fn new(
        config: RatingConfig,
        provider: Arc<dyn ResultProvider>,
        cache: Arc<dyn SeasonCache>,
    ) -> Result<Self> {
        Ok(Self {
            engine: SeasonRatingEngine::new(config)?,
            provider,
            cache,
        })
    }

    pub fn engine(&self) -> &SeasonRatingEngine {
        &self.engine
    }

    /// Rate every season from `start` to `end` inclusive and concatenate the tables
    pub fn run_range(&self, start: SeasonId, end: SeasonId) -> Result<RatingSnapshotTable> {
        if start > end {
            return Err(EloError::ConfigurationError {
                message: format!("Season range {}..={} is empty", start, end),
            }
            .into());
        }

        info!("Rating seasons {} to {}", start, end);

        // A table left by an earlier run seeds the first season
        let mut previous = start.checked_sub(1).and_then(|prior| self.cached_table(prior));
        let mut combined = RatingSnapshotTable::default();

        for season in start..=end {
            let table = self.run_season(season, previous.as_ref())?;
            combined.append(&table);
            previous = Some(table);
        }

        info!(
            "Rated {} seasons: {} events, {} competitors",
            end - start + 1,
            combined.len(),
            combined.competitors().len()
        );
        Ok(combined)
    }

    /// Rate one season, using the cache when it has the season.
    ///
    /// `previous` is the finished table of the season before, if any.
    pub fn run_season(
        &self,
        season: SeasonId,
        previous: Option<&RatingSnapshotTable>,
    ) -> Result<RatingSnapshotTable> {
        let competitors = self.active_competitors(season)?;

        if let Some(table) = self.cached_table(season) {
            info!("Season {}: using cached ratings ({} events)", season, table.len());
            return Ok(table);
        }

        let initial_ratings = match previous {
            Some(previous) => {
                let carried = initial_ratings_from(previous, &competitors);
                info!(
                    "Season {}: carrying forward {} of {} ratings",
                    season,
                    carried.len(),
                    competitors.len()
                );
                carried
            }
            None => InitialRatings::new(),
        };

        let table = self.compute_season(season, &competitors, &initial_ratings)?;
        self.cache.store(season, &table)?;
        Ok(table)
    }

    /// Season roster, from the cache if present, otherwise from the provider
    pub fn active_competitors(&self, season: SeasonId) -> Result<Vec<CompetitorId>> {
        match self.cache.load_competitors(season) {
            Ok(Some(competitors)) if !competitors.is_empty() => {
                debug!("Season {}: cached roster of {}", season, competitors.len());
                return Ok(competitors);
            }
            Ok(_) => {}
            Err(e) => warn!("Season {}: ignoring unreadable roster cache: {:#}", season, e),
        }

        let competitors = self.provider.active_competitors(season)?;
        if competitors.is_empty() {
            return Err(EloError::UpstreamDataError {
                message: format!("No active competitors for season {}", season),
            }
            .into());
        }
        self.cache.store_competitors(season, &competitors)?;
        Ok(competitors)
    }

    fn cached_table(&self, season: SeasonId) -> Option<RatingSnapshotTable> {
        match self.cache.load(season) {
            Ok(table) => table,
            Err(e) => {
                warn!("Season {}: recomputing, cached table unusable: {:#}", season, e);
                None
            }
        }
    }

    fn compute_season(
        &self,
        season: SeasonId,
        competitors: &[CompetitorId],
        initial_ratings: &InitialRatings,
    ) -> Result<RatingSnapshotTable> {
        let mut results = SeasonResults::with_capacity(competitors.len());
        for competitor_id in competitors {
            let competitor_results = self.provider.results(competitor_id, season)?;
            debug!(
                "Season {}: {} results for {}",
                season,
                competitor_results.len(),
                competitor_id
            );
            results.insert(competitor_id.clone(), competitor_results);
        }

        let calendar = match self.provider.season_calendar(season)? {
            Some(events) => SeasonCalendar::declared(season, events)?,
            None => SeasonCalendar::from_reference(season, competitors, &results)?,
        };

        self.engine.run_season_with_calendar(
            season,
            competitors,
            &results,
            initial_ratings,
            &calendar,
        )
    }
}
