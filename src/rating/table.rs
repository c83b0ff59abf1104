//! Rating snapshot tables
//!
//! A [`RatingSnapshotTable`] has one row per event, in calendar order, and
//! one column per competitor. A cell holds the competitor's rating right
//! after that event, or `None` if they did not take part. Row order is a
//! time axis and survives CSV round trips and concatenation.

use crate::types::{CompetitorId, EventId};
use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::io::{Read, Write};

/// Name of the index column in the CSV layout
pub const EVENT_ID_COLUMN: &str = "event_id";

/// Ratings of every competitor after one event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotRow {
    pub event_id: EventId,
    /// Aligned with the owning table's competitor columns
    pub ratings: Vec<Option<f64>>,
}

/// Event-indexed, competitor-columned rating history
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RatingSnapshotTable {
    competitors: Vec<CompetitorId>,
    rows: Vec<SnapshotRow>,
}

impl RatingSnapshotTable {
    /// Create an empty table with the given columns
    pub fn new(competitors: Vec<CompetitorId>) -> Self {
        Self {
            competitors,
            rows: Vec::new(),
        }
    }

    pub fn competitors(&self) -> &[CompetitorId] {
        &self.competitors
    }

    pub fn rows(&self) -> &[SnapshotRow] {
        &self.rows
    }

    pub fn event_ids(&self) -> impl Iterator<Item = &EventId> {
        self.rows.iter().map(|row| &row.event_id)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Append a finalized event row
    pub fn push_row(&mut self, event_id: EventId, ratings: Vec<Option<f64>>) -> Result<()> {
        if ratings.len() != self.competitors.len() {
            bail!(
                "Row for event {} has {} values, table has {} competitors",
                event_id,
                ratings.len(),
                self.competitors.len()
            );
        }
        self.rows.push(SnapshotRow { event_id, ratings });
        Ok(())
    }

    pub fn column_index(&self, competitor_id: &str) -> Option<usize> {
        self.competitors.iter().position(|c| c == competitor_id)
    }

    /// Rating of a competitor at a row, `None` for non-participation or unknown competitor
    pub fn value(&self, row: usize, competitor_id: &str) -> Option<f64> {
        let col = self.column_index(competitor_id)?;
        self.rows.get(row).and_then(|r| r.ratings[col])
    }

    /// Whole rating history of one competitor, or `None` if there is no such column
    pub fn column(&self, competitor_id: &str) -> Option<Vec<Option<f64>>> {
        let col = self.column_index(competitor_id)?;
        Some(self.rows.iter().map(|row| row.ratings[col]).collect())
    }

    /// Last finite rating of a competitor in row order
    pub fn last_finite(&self, competitor_id: &str) -> Option<f64> {
        let col = self.column_index(competitor_id)?;
        self.rows
            .iter()
            .rev()
            .filter_map(|row| row.ratings[col])
            .find(|rating| rating.is_finite())
    }

    /// Concatenate `other` below this table.
    ///
    /// Columns become the union of both tables in first-seen order; cells of
    /// columns a table does not have are `None`.
    pub fn append(&mut self, other: &RatingSnapshotTable) {
        let mut known: HashSet<CompetitorId> = self.competitors.iter().cloned().collect();
        let added: Vec<CompetitorId> = other
            .competitors
            .iter()
            .filter(|c| known.insert((*c).clone()))
            .cloned()
            .collect();

        if !added.is_empty() {
            for row in &mut self.rows {
                row.ratings.resize(row.ratings.len() + added.len(), None);
            }
            self.competitors.extend(added);
        }

        let positions: HashMap<&str, usize> = self
            .competitors
            .iter()
            .enumerate()
            .map(|(i, c)| (c.as_str(), i))
            .collect();
        let mapping: Vec<usize> = other
            .competitors
            .iter()
            .map(|c| positions[c.as_str()])
            .collect();

        for row in &other.rows {
            let mut ratings = vec![None; self.competitors.len()];
            for (src, &dst) in mapping.iter().enumerate() {
                ratings[dst] = row.ratings[src];
            }
            self.rows.push(SnapshotRow {
                event_id: row.event_id.clone(),
                ratings,
            });
        }
    }

    /// Write the table as CSV with an `event_id` index column
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);

        let mut header = Vec::with_capacity(self.competitors.len() + 1);
        header.push(EVENT_ID_COLUMN);
        header.extend(self.competitors.iter().map(String::as_str));
        wtr.write_record(&header)?;

        for row in &self.rows {
            let mut record = Vec::with_capacity(row.ratings.len() + 1);
            record.push(row.event_id.clone());
            record.extend(
                row.ratings
                    .iter()
                    .map(|r| r.map(|v| v.to_string()).unwrap_or_default()),
            );
            wtr.write_record(&record)?;
        }

        wtr.flush().context("Failed to flush rating table CSV")?;
        Ok(())
    }

    /// Read a table written by [`RatingSnapshotTable::write_csv`].
    ///
    /// Empty cells and `NaN` are read as no value. Anything else that is not
    /// a finite number makes the whole table invalid.
    pub fn read_csv<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::Reader::from_reader(reader);

        let headers = rdr.headers().context("Missing rating table header")?.clone();
        if headers.is_empty() {
            bail!("Rating table header is empty");
        }

        let competitors: Vec<CompetitorId> = headers.iter().skip(1).map(str::to_string).collect();
        let mut seen = HashSet::new();
        for competitor in &competitors {
            if !seen.insert(competitor.as_str()) {
                bail!("Duplicate competitor column: {}", competitor);
            }
        }

        let mut table = Self::new(competitors);
        for (line, record) in rdr.records().enumerate() {
            let record = record.with_context(|| format!("Malformed row {}", line + 1))?;
            let event_id = record
                .get(0)
                .ok_or_else(|| anyhow!("Row {} has no event id", line + 1))?
                .to_string();
            let ratings = record
                .iter()
                .skip(1)
                .map(parse_cell)
                .collect::<Result<Vec<_>>>()
                .with_context(|| format!("Invalid rating in row {}", line + 1))?;
            table.push_row(event_id, ratings)?;
        }

        Ok(table)
    }
}

fn parse_cell(cell: &str) -> Result<Option<f64>> {
    let cell = cell.trim();
    if cell.is_empty() || cell.eq_ignore_ascii_case("nan") {
        return Ok(None);
    }
    let value: f64 = cell
        .parse()
        .map_err(|_| anyhow!("Not a number: {:?}", cell))?;
    if !value.is_finite() {
        bail!("Non-finite rating: {}", cell);
    }
    Ok(Some(value))
}
