//! Canonical event order for a season
//!
//! The calendar is the time axis of a season's snapshot table. It is either
//! taken from a reference competitor's result sequence (the first listed
//! competitor) or declared up front by the result provider. Results that
//! fall outside the calendar are reported by [`SeasonCalendar::divergence`].

use crate::error::{EloError, Result};
use crate::types::{CompetitorId, EventId, SeasonId, SeasonResults};
use std::collections::HashSet;

/// Where a calendar's event order came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalendarSource {
    ReferenceCompetitor(CompetitorId),
    Declared,
}

/// A result that has no slot in the calendar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarDivergence {
    pub competitor_id: CompetitorId,
    pub event_id: EventId,
}

/// Ordered event ids of one season
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeasonCalendar {
    season: SeasonId,
    events: Vec<EventId>,
    source: CalendarSource,
}

impl SeasonCalendar {
    /// Derive the calendar from the first competitor's results, keeping
    /// their order and any duplicates
    pub fn from_reference(
        season: SeasonId,
        competitors: &[CompetitorId],
        results: &SeasonResults,
    ) -> Result<Self> {
        let reference = competitors
            .first()
            .ok_or_else(|| EloError::MissingReferenceData {
                season,
                reason: "no competitors".to_string(),
            })?;

        let reference_results =
            results
                .get(reference)
                .ok_or_else(|| EloError::MissingCompetitorData {
                    season,
                    competitor_id: reference.clone(),
                })?;

        if reference_results.is_empty() {
            return Err(EloError::MissingReferenceData {
                season,
                reason: format!("reference competitor {} has no results", reference),
            }
            .into());
        }

        Ok(Self {
            season,
            events: reference_results
                .iter()
                .map(|r| r.event_id.clone())
                .collect(),
            source: CalendarSource::ReferenceCompetitor(reference.clone()),
        })
    }

    /// Use an explicitly declared event order
    pub fn declared(season: SeasonId, events: Vec<EventId>) -> Result<Self> {
        if events.is_empty() {
            return Err(EloError::MissingReferenceData {
                season,
                reason: "declared calendar is empty".to_string(),
            }
            .into());
        }

        Ok(Self {
            season,
            events,
            source: CalendarSource::Declared,
        })
    }

    pub fn season(&self) -> SeasonId {
        self.season
    }

    pub fn events(&self) -> &[EventId] {
        &self.events
    }

    pub fn source(&self) -> &CalendarSource {
        &self.source
    }

    pub fn contains(&self, event_id: &str) -> bool {
        self.events.iter().any(|e| e == event_id)
    }

    /// Every result of the listed competitors whose event is not on the calendar.
    ///
    /// Competitors without an entry in `results` are skipped; the engine
    /// rejects those separately.
    pub fn divergence(
        &self,
        competitors: &[CompetitorId],
        results: &SeasonResults,
    ) -> Vec<CalendarDivergence> {
        let known: HashSet<&str> = self.events.iter().map(String::as_str).collect();

        competitors
            .iter()
            .filter_map(|c| results.get(c).map(|r| (c, r)))
            .flat_map(|(competitor_id, competitor_results)| {
                competitor_results
                    .iter()
                    .filter(|r| !known.contains(r.event_id.as_str()))
                    .map(move |r| CalendarDivergence {
                        competitor_id: competitor_id.clone(),
                        event_id: r.event_id.clone(),
                    })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EventResult;

    fn results(entries: &[(&str, &[(&str, u32)])]) -> SeasonResults {
        entries
            .iter()
            .map(|(competitor, events)| {
                (
                    competitor.to_string(),
                    events
                        .iter()
                        .map(|(event, pos)| EventResult::new(*event, *pos))
                        .collect(),
                )
            })
            .collect()
    }

    fn ids(names: &[&str]) -> Vec<CompetitorId> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_reference_order_is_preserved() {
        let data = results(&[
            ("hamilton", &[("monza", 1), ("spa", 2), ("monza", 3)]),
            ("russell", &[("spa", 1)]),
        ]);
        let calendar =
            SeasonCalendar::from_reference(2022, &ids(&["hamilton", "russell"]), &data).unwrap();

        assert_eq!(calendar.events(), &["monza", "spa", "monza"]);
        assert_eq!(
            calendar.source(),
            &CalendarSource::ReferenceCompetitor("hamilton".to_string())
        );
        assert_eq!(calendar.season(), 2022);
        assert!(calendar.contains("spa"));
        assert!(!calendar.contains("imola"));
    }

    #[test]
    fn test_reference_without_results_fails() {
        let data = results(&[("hamilton", &[]), ("russell", &[("spa", 1)])]);
        let err = SeasonCalendar::from_reference(2022, &ids(&["hamilton", "russell"]), &data)
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<EloError>(),
            Some(EloError::MissingReferenceData { season: 2022, .. })
        ));
    }

    #[test]
    fn test_no_competitors_fails() {
        let err = SeasonCalendar::from_reference(2022, &[], &SeasonResults::new()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<EloError>(),
            Some(EloError::MissingReferenceData { .. })
        ));
    }

    #[test]
    fn test_reference_missing_from_results_fails() {
        let data = results(&[("russell", &[("spa", 1)])]);
        let err = SeasonCalendar::from_reference(2022, &ids(&["hamilton", "russell"]), &data)
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<EloError>(),
            Some(EloError::MissingCompetitorData { .. })
        ));
    }

    #[test]
    fn test_declared_calendar() {
        let calendar =
            SeasonCalendar::declared(2023, vec!["bahrain".to_string(), "jeddah".to_string()])
                .unwrap();
        assert_eq!(calendar.source(), &CalendarSource::Declared);
        assert!(SeasonCalendar::declared(2023, vec![]).is_err());
    }

    #[test]
    fn test_divergence_reports_unlisted_events() {
        let data = results(&[
            ("hamilton", &[("monza", 1)]),
            ("russell", &[("monza", 2), ("imola", 1)]),
            ("bottas", &[]),
        ]);
        let competitors = ids(&["hamilton", "russell", "bottas"]);
        let calendar = SeasonCalendar::from_reference(2022, &competitors, &data).unwrap();

        let divergence = calendar.divergence(&competitors, &data);
        assert_eq!(
            divergence,
            vec![CalendarDivergence {
                competitor_id: "russell".to_string(),
                event_id: "imola".to_string(),
            }]
        );
    }
}
