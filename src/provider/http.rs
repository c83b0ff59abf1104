//! HTTP result provider for f1api.dev style endpoints
//!
//! - `GET {base}/{season}/drivers` lists the season's drivers
//! - `GET {base}/{season}/drivers/{driver_id}` lists one driver's results
//!
//! Entries without a numeric finishing position (NC, DQ, ...) are dropped.

use crate::error::{EloError, Result};
use crate::provider::ResultProvider;
use crate::types::{CompetitorId, EventResult, SeasonId};
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug, Deserialize)]
struct DriversResponse {
    #[serde(default)]
    drivers: Vec<DriverEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DriverEntry {
    driver_id: String,
}

#[derive(Debug, Deserialize)]
struct DriverResultsResponse {
    #[serde(default)]
    results: Vec<ResultEntry>,
}

#[derive(Debug, Deserialize)]
struct ResultEntry {
    race: RaceRef,
    result: PositionRef,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RaceRef {
    race_id: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PositionRef {
    #[serde(default)]
    finishing_position: Value,
}

fn upstream(message: String) -> anyhow::Error {
    EloError::UpstreamDataError { message }.into()
}

/// Blocking HTTP client for the results API
#[derive(Debug, Clone)]
pub struct HttpResultProvider {
    client: Client,
    base_url: String,
}

impl HttpResultProvider {
    /// Create a new provider against `base_url` (e.g. `https://f1api.dev/api`)
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("podium-elo/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| upstream(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn get(&self, url: &str) -> Result<String> {
        debug!("Fetching {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| upstream(format!("Request to {} failed: {}", url, e)))?;

        if !response.status().is_success() {
            return Err(upstream(format!(
                "Request to {} failed with status {}",
                url,
                response.status()
            )));
        }

        response
            .text()
            .map_err(|e| upstream(format!("Failed to read body from {}: {}", url, e)))
    }
}

impl ResultProvider for HttpResultProvider {
    fn active_competitors(&self, season: SeasonId) -> Result<Vec<CompetitorId>> {
        let url = format!("{}/{}/drivers", self.base_url, season);
        let body = self.get(&url)?;
        parse_drivers(season, &body)
    }

    fn results(&self, competitor_id: &str, season: SeasonId) -> Result<Vec<EventResult>> {
        let url = format!("{}/{}/drivers/{}", self.base_url, season, competitor_id);
        let body = self.get(&url)?;
        parse_results(competitor_id, season, &body)
    }
}

pub(crate) fn parse_drivers(season: SeasonId, body: &str) -> Result<Vec<CompetitorId>> {
    let response: DriversResponse = serde_json::from_str(body)
        .map_err(|e| upstream(format!("Invalid driver list for season {}: {}", season, e)))?;

    if response.drivers.is_empty() {
        return Err(upstream(format!("No drivers listed for season {}", season)));
    }

    Ok(response.drivers.into_iter().map(|d| d.driver_id).collect())
}

pub(crate) fn parse_results(
    competitor_id: &str,
    season: SeasonId,
    body: &str,
) -> Result<Vec<EventResult>> {
    let response: DriverResultsResponse = serde_json::from_str(body).map_err(|e| {
        upstream(format!(
            "Invalid results for {} in season {}: {}",
            competitor_id, season, e
        ))
    })?;

    let mut results = Vec::with_capacity(response.results.len());
    for entry in response.results {
        let event_id = match entry.race.race_id {
            Value::String(id) => id,
            Value::Number(n) => n.to_string(),
            other => {
                return Err(upstream(format!(
                    "Invalid race id {} for {} in season {}",
                    other, competitor_id, season
                )))
            }
        };

        match parse_position(&entry.result.finishing_position) {
            Some(position) => results.push(EventResult { event_id, position }),
            None => warn!(
                "Dropping unclassified result {} for {} at {} ({})",
                entry.result.finishing_position, competitor_id, event_id, season
            ),
        }
    }

    Ok(results)
}

fn parse_position(value: &Value) -> Option<u32> {
    let position = match value {
        Value::Number(n) => n.as_u64().and_then(|p| u32::try_from(p).ok()),
        Value::String(s) => s.trim().parse::<u32>().ok(),
        _ => None,
    }?;
    (position > 0).then_some(position)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_drivers() {
        let body = r#"{"season": 2024, "drivers": [
            {"driverId": "max_verstappen", "name": "Max"},
            {"driverId": "leclerc", "name": "Charles"}
        ]}"#;
        assert_eq!(
            parse_drivers(2024, body).unwrap(),
            vec!["max_verstappen".to_string(), "leclerc".to_string()]
        );
    }

    #[test]
    fn test_parse_drivers_empty_or_invalid() {
        let err = parse_drivers(1900, r#"{"drivers": []}"#).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<EloError>(),
            Some(EloError::UpstreamDataError { .. })
        ));
        assert!(parse_drivers(1900, "<html>").is_err());
    }

    #[test]
    fn test_parse_results_mixed_positions() {
        let body = r#"{"results": [
            {"race": {"raceId": "bahrain_2024", "name": "Bahrain"}, "result": {"finishingPosition": 1, "points": 25}},
            {"race": {"raceId": "jeddah_2024"}, "result": {"finishingPosition": "2"}},
            {"race": {"raceId": "melbourne_2024"}, "result": {"finishingPosition": "NC"}},
            {"race": {"raceId": 7}, "result": {"finishingPosition": 5}}
        ]}"#;

        let results = parse_results("max_verstappen", 2024, body).unwrap();
        assert_eq!(
            results,
            vec![
                EventResult::new("bahrain_2024", 1),
                EventResult::new("jeddah_2024", 2),
                EventResult::new("7", 5),
            ]
        );
    }

    #[test]
    fn test_parse_results_missing_list_is_empty() {
        assert!(parse_results("sargeant", 2024, "{}").unwrap().is_empty());
    }

    #[test]
    fn test_parse_results_bad_race_id() {
        let body = r#"{"results": [{"race": {"raceId": null}, "result": {"finishingPosition": 1}}]}"#;
        assert!(parse_results("sargeant", 2024, body).is_err());
    }

    #[test]
    fn test_parse_position() {
        assert_eq!(parse_position(&serde_json::json!(3)), Some(3));
        assert_eq!(parse_position(&serde_json::json!(" 12 ")), Some(12));
        assert_eq!(parse_position(&serde_json::json!(0)), None);
        assert_eq!(parse_position(&serde_json::json!(-1)), None);
        assert_eq!(parse_position(&serde_json::json!("DQ")), None);
        assert_eq!(parse_position(&Value::Null), None);
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let provider =
            HttpResultProvider::new("https://f1api.dev/api/", Duration::from_secs(5)).unwrap();
        assert_eq!(provider.base_url(), "https://f1api.dev/api");
    }
}
