//! File-backed season cache
//!
//! One CSV per season in a cache directory:
//! `elo_ratings_over_time_{season}.csv` for the rating table and
//! `active_competitors_{season}.csv` for the roster. A missing file means
//! "not cached".

use crate::cache::{read_roster, write_roster, SeasonCache};
use crate::error::{EloError, Result};
use crate::rating::table::RatingSnapshotTable;
use crate::types::{CompetitorId, SeasonId};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Season cache stored as CSV files in a directory
#[derive(Debug, Clone)]
pub struct FileSeasonCache {
    dir: PathBuf,
}

impl FileSeasonCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn table_path(&self, season: SeasonId) -> PathBuf {
        self.dir.join(format!("elo_ratings_over_time_{}.csv", season))
    }

    pub fn roster_path(&self, season: SeasonId) -> PathBuf {
        self.dir.join(format!("active_competitors_{}.csv", season))
    }

    fn open(&self, season: SeasonId, path: &Path) -> Result<Option<BufReader<File>>> {
        if !path.exists() {
            debug!("Cache miss for season {}: {}", season, path.display());
            return Ok(None);
        }

        let file = File::open(path).map_err(|e| EloError::CacheReadError {
            season,
            message: format!("{}: {}", path.display(), e),
        })?;
        Ok(Some(BufReader::new(file)))
    }

    /// Write through a temporary file and rename it into place
    fn write_atomic<F>(&self, season: SeasonId, path: &Path, write: F) -> Result<()>
    where
        F: FnOnce(&mut BufWriter<File>) -> Result<()>,
    {
        let write_error = |message: String| EloError::CacheWriteError { season, message };

        fs::create_dir_all(&self.dir)
            .map_err(|e| write_error(format!("{}: {}", self.dir.display(), e)))?;

        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| write_error(format!("invalid cache path {}", path.display())))?;
        let tmp_path = self.dir.join(format!(".{}.tmp", file_name));

        let file = File::create(&tmp_path)
            .map_err(|e| write_error(format!("{}: {}", tmp_path.display(), e)))?;
        let mut writer = BufWriter::new(file);

        let written = write(&mut writer).and_then(|_| writer.flush().map_err(Into::into));
        if let Err(e) = written {
            let _ = fs::remove_file(&tmp_path);
            return Err(write_error(format!("{:#}", e)).into());
        }
        drop(writer);

        fs::rename(&tmp_path, path)
            .map_err(|e| write_error(format!("{}: {}", path.display(), e)))?;
        debug!("Cached season {} at {}", season, path.display());
        Ok(())
    }
}

impl SeasonCache for FileSeasonCache {
    fn load(&self, season: SeasonId) -> Result<Option<RatingSnapshotTable>> {
        let path = self.table_path(season);
        let Some(reader) = self.open(season, &path)? else {
            return Ok(None);
        };

        let table = RatingSnapshotTable::read_csv(reader).map_err(|e| EloError::CacheReadError {
            season,
            message: format!("{}: {:#}", path.display(), e),
        })?;
        debug!("Cache hit for season {}: {} events", season, table.len());
        Ok(Some(table))
    }

    fn store(&self, season: SeasonId, table: &RatingSnapshotTable) -> Result<()> {
        let path = self.table_path(season);
        self.write_atomic(season, &path, |writer| table.write_csv(writer))
    }

    fn load_competitors(&self, season: SeasonId) -> Result<Option<Vec<CompetitorId>>> {
        let path = self.roster_path(season);
        let Some(reader) = self.open(season, &path)? else {
            return Ok(None);
        };

        let roster = read_roster(reader).map_err(|e| EloError::CacheReadError {
            season,
            message: format!("{}: {:#}", path.display(), e),
        })?;
        Ok(Some(roster))
    }

    fn store_competitors(&self, season: SeasonId, competitors: &[CompetitorId]) -> Result<()> {
        let path = self.roster_path(season);
        self.write_atomic(season, &path, |writer| write_roster(writer, competitors))
    }
}
