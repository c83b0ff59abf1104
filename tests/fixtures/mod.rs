//! Test fixtures and instrumented collaborators for integration testing

use podium_elo::cache::{InMemorySeasonCache, SeasonCache};
use podium_elo::error::Result;
use podium_elo::provider::{ResultProvider, StaticResultProvider};
use podium_elo::rating::RatingSnapshotTable;
use podium_elo::types::{CompetitorId, EventId, EventResult, SeasonId};
use std::sync::Mutex;

/// Season cache that records every load and store
#[derive(Debug, Default)]
pub struct RecordingSeasonCache {
    inner: InMemorySeasonCache,
    loads: Mutex<Vec<SeasonId>>,
    stores: Mutex<Vec<SeasonId>>,
}

impl RecordingSeasonCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inner(&self) -> &InMemorySeasonCache {
        &self.inner
    }

    pub fn get_loads(&self) -> Vec<SeasonId> {
        self.loads.lock().map(|l| l.clone()).unwrap_or_default()
    }

    pub fn get_stores(&self) -> Vec<SeasonId> {
        self.stores.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

impl SeasonCache for RecordingSeasonCache {
    fn load(&self, season: SeasonId) -> Result<Option<RatingSnapshotTable>> {
        if let Ok(mut loads) = self.loads.lock() {
            loads.push(season);
        }
        self.inner.load(season)
    }

    fn store(&self, season: SeasonId, table: &RatingSnapshotTable) -> Result<()> {
        if let Ok(mut stores) = self.stores.lock() {
            stores.push(season);
        }
        self.inner.store(season, table)
    }

    fn load_competitors(&self, season: SeasonId) -> Result<Option<Vec<CompetitorId>>> {
        self.inner.load_competitors(season)
    }

    fn store_competitors(&self, season: SeasonId, competitors: &[CompetitorId]) -> Result<()> {
        self.inner.store_competitors(season, competitors)
    }
}

/// Result provider that counts upstream queries
#[derive(Debug)]
pub struct CountingProvider {
    inner: StaticResultProvider,
    roster_calls: Mutex<Vec<SeasonId>>,
    result_calls: Mutex<Vec<(CompetitorId, SeasonId)>>,
}

impl CountingProvider {
    pub fn new(inner: StaticResultProvider) -> Self {
        Self {
            inner,
            roster_calls: Mutex::new(Vec::new()),
            result_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn roster_calls(&self) -> Vec<SeasonId> {
        self.roster_calls
            .lock()
            .map(|c| c.clone())
            .unwrap_or_default()
    }

    /// Number of result queries made for a season
    pub fn result_calls_for(&self, season: SeasonId) -> usize {
        self.result_calls
            .lock()
            .map(|calls| calls.iter().filter(|(_, s)| *s == season).count())
            .unwrap_or_default()
    }
}

impl ResultProvider for CountingProvider {
    fn active_competitors(&self, season: SeasonId) -> Result<Vec<CompetitorId>> {
        if let Ok(mut calls) = self.roster_calls.lock() {
            calls.push(season);
        }
        self.inner.active_competitors(season)
    }

    fn results(&self, competitor_id: &str, season: SeasonId) -> Result<Vec<EventResult>> {
        if let Ok(mut calls) = self.result_calls.lock() {
            calls.push((competitor_id.to_string(), season));
        }
        self.inner.results(competitor_id, season)
    }

    fn season_calendar(&self, season: SeasonId) -> Result<Option<Vec<EventId>>> {
        self.inner.season_calendar(season)
    }
}

/// Three short seasons with a driver change each year
pub fn three_season_provider() -> StaticResultProvider {
    StaticResultProvider::new()
        .with_season(
            2019,
            vec![
                ("hamilton", vec![("aus", 2), ("bhr", 1), ("chn", 1)]),
                ("bottas", vec![("aus", 1), ("bhr", 2), ("chn", 2)]),
                ("vettel", vec![("aus", 4), ("bhr", 5), ("chn", 3)]),
                ("kubica", vec![("aus", 17), ("chn", 16)]),
            ],
        )
        .with_season(
            2020,
            vec![
                ("hamilton", vec![("aut", 4), ("sty", 1)]),
                ("bottas", vec![("aut", 1), ("sty", 3)]),
                ("vettel", vec![("aut", 10), ("sty", 15)]),
                ("latifi", vec![("aut", 11), ("sty", 17)]),
            ],
        )
        .with_season(
            2021,
            vec![
                ("hamilton", vec![("bhr", 1), ("imo", 2)]),
                ("bottas", vec![("bhr", 3)]),
                ("latifi", vec![("bhr", 18), ("imo", 16)]),
                ("tsunoda", vec![("bhr", 9), ("imo", 12)]),
            ],
        )
}
