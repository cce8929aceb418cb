//! Provider wire format
//!
//! Typed structures for the Ergast-style JSON the remote provider returns.
//! Every numeric field arrives as a string and may be missing or garbled, so
//! nothing here enters the aggregation core directly: each table normalizes
//! into [`crate::types`] with defensive parsing (unparseable numbers become
//! zero or `None`, incomplete rows are dropped with a warning).

mod race_table;
mod standings_table;

pub use race_table::*;
pub use standings_table::*;

use serde::Deserialize;

use crate::types::Season;

/// Top-level response document.
///
/// The provider wraps every response in an `MRData` envelope carrying the
/// pagination counters and exactly one table for the requested endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope {
    #[serde(rename = "MRData")]
    pub mr_data: MrData,
}

/// Envelope body: pagination counters plus the endpoint's table.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MrData {
    pub limit: Option<String>,
    pub offset: Option<String>,
    pub total: Option<String>,
    #[serde(rename = "RaceTable")]
    pub race_table: Option<RaceTable>,
    #[serde(rename = "StandingsTable")]
    pub standings_table: Option<StandingsTable>,
    #[serde(rename = "SeasonTable")]
    pub season_table: Option<SeasonTable>,
}

impl MrData {
    /// Total record count reported by the provider, zero when absent or
    /// unparseable.
    pub fn total(&self) -> u32 {
        parse_u32(self.total.as_deref()).unwrap_or(0)
    }

    /// Number of top-level records carried by this page. Used to detect an
    /// empty page, which terminates pagination regardless of `total`.
    pub fn record_count(&self) -> usize {
        if let Some(races) = &self.race_table {
            return races.races.len();
        }
        if let Some(standings) = &self.standings_table {
            return standings
                .standings_lists
                .iter()
                .map(|l| l.driver_standings.len() + l.constructor_standings.len())
                .sum();
        }
        if let Some(seasons) = &self.season_table {
            return seasons.seasons.len();
        }
        0
    }
}

/// Season list table (`/seasons.json`).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SeasonTable {
    #[serde(rename = "Seasons")]
    pub seasons: Vec<SeasonRow>,
}

/// One listed season.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SeasonRow {
    pub season: Option<String>,
    pub url: Option<String>,
}

impl SeasonRow {
    /// Normalize into the domain type; rows without a year are dropped.
    pub fn normalize(&self) -> Option<Season> {
        Some(Season {
            year: self.season.clone()?,
            url: self.url.clone().unwrap_or_default(),
        })
    }
}

/// Parse a provider numeric string, `None` when absent or unparseable.
pub(crate) fn parse_u32(value: Option<&str>) -> Option<u32> {
    value.and_then(|v| v.trim().parse().ok())
}

/// Parse a provider float string, zero when absent or unparseable.
pub(crate) fn parse_f64_or_zero(value: Option<&str>) -> f64 {
    value.and_then(|v| v.trim().parse().ok()).unwrap_or(0.0)
}
