//! In-memory season cache
//!
//! Tables are kept in their serialized CSV form, the same bytes the file
//! cache writes, so a cached season reads back exactly as it would from disk.

use crate::cache::{read_roster, write_roster, SeasonCache};
use crate::error::{EloError, Result};
use crate::rating::table::RatingSnapshotTable;
use crate::types::{CompetitorId, SeasonId};
use std::collections::HashMap;
use std::sync::RwLock;
use tracing::debug;

/// Season cache backed by process memory
#[derive(Debug, Default)]
pub struct InMemorySeasonCache {
    tables: RwLock<HashMap<SeasonId, Vec<u8>>>,
    rosters: RwLock<HashMap<SeasonId, Vec<u8>>>,
}

impl InMemorySeasonCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put raw bytes under a season key, bypassing serialization
    pub fn store_serialized(&self, season: SeasonId, bytes: Vec<u8>) -> Result<()> {
        let mut tables = self
            .tables
            .write()
            .map_err(|_| EloError::CacheWriteError {
                season,
                message: "Failed to acquire tables write lock".to_string(),
            })?;
        tables.insert(season, bytes);
        Ok(())
    }

    /// Seasons that currently have a table entry, ascending
    pub fn seasons(&self) -> Vec<SeasonId> {
        let mut seasons: Vec<SeasonId> = self
            .tables
            .read()
            .map(|tables| tables.keys().copied().collect())
            .unwrap_or_default();
        seasons.sort_unstable();
        seasons
    }
}

impl SeasonCache for InMemorySeasonCache {
    fn load(&self, season: SeasonId) -> Result<Option<RatingSnapshotTable>> {
        let tables = self.tables.read().map_err(|_| EloError::CacheReadError {
            season,
            message: "Failed to acquire tables read lock".to_string(),
        })?;

        let Some(bytes) = tables.get(&season) else {
            debug!("No cached table for season {}", season);
            return Ok(None);
        };

        RatingSnapshotTable::read_csv(bytes.as_slice())
            .map(Some)
            .map_err(|e| {
                EloError::CacheReadError {
                    season,
                    message: format!("{:#}", e),
                }
                .into()
            })
    }

    fn store(&self, season: SeasonId, table: &RatingSnapshotTable) -> Result<()> {
        let mut bytes = Vec::new();
        table
            .write_csv(&mut bytes)
            .map_err(|e| EloError::CacheWriteError {
                season,
                message: format!("{:#}", e),
            })?;
        self.store_serialized(season, bytes)
    }

    fn load_competitors(&self, season: SeasonId) -> Result<Option<Vec<CompetitorId>>> {
        let rosters = self.rosters.read().map_err(|_| EloError::CacheReadError {
            season,
            message: "Failed to acquire rosters read lock".to_string(),
        })?;

        match rosters.get(&season) {
            Some(bytes) => read_roster(bytes.as_slice()).map(Some).map_err(|e| {
                EloError::CacheReadError {
                    season,
                    message: format!("{:#}", e),
                }
                .into()
            }),
            None => Ok(None),
        }
    }

    fn store_competitors(&self, season: SeasonId, competitors: &[CompetitorId]) -> Result<()> {
        let mut bytes = Vec::new();
        write_roster(&mut bytes, competitors).map_err(|e| EloError::CacheWriteError {
            season,
            message: format!("{:#}", e),
        })?;

        let mut rosters = self
            .rosters
            .write()
            .map_err(|_| EloError::CacheWriteError {
                season,
                message: "Failed to acquire rosters write lock".to_string(),
            })?;
        rosters.insert(season, bytes);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> RatingSnapshotTable {
        let mut table = RatingSnapshotTable::new(vec!["norris".to_string(), "piastri".to_string()]);
        table
            .push_row("silverstone".to_string(), vec![Some(1016.0), Some(984.0)])
            .unwrap();
        table
            .push_row("hungaroring".to_string(), vec![None, Some(1000.5)])
            .unwrap();
        table
    }

    #[test]
    fn test_miss_then_hit() {
        let cache = InMemorySeasonCache::new();
        assert!(cache.load(2023).unwrap().is_none());

        cache.store(2023, &sample_table()).unwrap();
        assert_eq!(cache.load(2023).unwrap(), Some(sample_table()));
        assert!(cache.load(2024).unwrap().is_none());
        assert_eq!(cache.seasons(), vec![2023]);
    }

    #[test]
    fn test_store_replaces_entry() {
        let cache = InMemorySeasonCache::new();
        cache.store(2023, &sample_table()).unwrap();

        let replacement = RatingSnapshotTable::new(vec!["norris".to_string()]);
        cache.store(2023, &replacement).unwrap();
        assert_eq!(cache.load(2023).unwrap(), Some(replacement));
    }

    #[test]
    fn test_corrupt_entry_is_cache_read_error() {
        let cache = InMemorySeasonCache::new();
        cache
            .store_serialized(2023, b"event_id,norris\nsilverstone,oops\n".to_vec())
            .unwrap();

        let err = cache.load(2023).unwrap_err();
        let typed = err.downcast_ref::<EloError>().unwrap();
        assert!(typed.is_cache_miss());
    }

    #[test]
    fn test_roster_storage() {
        let cache = InMemorySeasonCache::new();
        assert!(cache.load_competitors(2023).unwrap().is_none());

        let roster = vec!["norris".to_string(), "piastri".to_string()];
        cache.store_competitors(2023, &roster).unwrap();
        assert_eq!(cache.load_competitors(2023).unwrap(), Some(roster));
        // Rosters and tables are separate keyspaces
        assert!(cache.load(2023).unwrap().is_none());
    }
}
