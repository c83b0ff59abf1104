//! Season result memoization
//!
//! A season's rating table is expensive to compute (every pair, every
//! event, plus one provider query per competitor), so finished tables are
//! stored under their season id. A stored table is authoritative: it is
//! returned as-is and never merged or invalidated. A companion entry keeps
//! the season's roster so the provider is not asked for it again.

pub mod file;
pub mod memory;

use crate::error::Result;
use crate::rating::table::RatingSnapshotTable;
use crate::types::{CompetitorId, SeasonId};

pub use file::FileSeasonCache;
pub use memory::InMemorySeasonCache;

/// Key-value store from season id to finished rating table
pub trait SeasonCache: Send + Sync {
    /// Cached table for a season.
    ///
    /// `Ok(None)` means not cached. An unreadable entry is an
    /// [`EloError::CacheReadError`](crate::error::EloError::CacheReadError),
    /// which callers treat as a miss.
    fn load(&self, season: SeasonId) -> Result<Option<RatingSnapshotTable>>;

    /// Store a finished table, replacing any previous entry
    fn store(&self, season: SeasonId, table: &RatingSnapshotTable) -> Result<()>;

    /// Cached roster of active competitors for a season
    fn load_competitors(&self, season: SeasonId) -> Result<Option<Vec<CompetitorId>>>;

    /// Store the roster of active competitors for a season
    fn store_competitors(&self, season: SeasonId, competitors: &[CompetitorId]) -> Result<()>;
}

/// Write a roster as a single-column CSV
pub(crate) fn write_roster<W: std::io::Write>(
    writer: W,
    competitors: &[CompetitorId],
) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["competitor_id"])?;
    for competitor in competitors {
        wtr.write_record([competitor])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Read a single-column roster CSV; the header name is not checked
pub(crate) fn read_roster<R: std::io::Read>(reader: R) -> Result<Vec<CompetitorId>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut competitors = Vec::new();
    for record in rdr.records() {
        let record = record?;
        match record.get(0) {
            Some(id) if !id.trim().is_empty() => competitors.push(id.trim().to_string()),
            _ => anyhow::bail!("Empty competitor id in roster"),
        }
    }
    Ok(competitors)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roster_roundtrip() {
        let roster = vec!["max_verstappen".to_string(), "perez".to_string()];
        let mut buf = Vec::new();
        write_roster(&mut buf, &roster).unwrap();
        assert!(String::from_utf8(buf.clone())
            .unwrap()
            .starts_with("competitor_id\n"));
        assert_eq!(read_roster(buf.as_slice()).unwrap(), roster);
    }

    #[test]
    fn test_roster_accepts_foreign_header() {
        let csv = "driverId\nalonso\nstroll\n";
        assert_eq!(
            read_roster(csv.as_bytes()).unwrap(),
            vec!["alonso".to_string(), "stroll".to_string()]
        );
    }

    #[test]
    fn test_roster_rejects_blank_ids() {
        let csv = "competitor_id\nalonso\n\"\"\n";
        assert!(read_roster(csv.as_bytes()).is_err());
    }
}
