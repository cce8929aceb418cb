//! Race table wire structures
//!
//! Schedule, race result, sprint result and qualifying documents all arrive
//! as a `RaceTable` of races; which nested result list is populated depends
//! on the endpoint.

use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use tracing::warn;

use super::parse_f64_or_zero;
use crate::types::{Circuit, ConstructorRef, DriverRef, QualifyingResult, Race, RaceResult};

/// Race list table.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RaceTable {
    pub season: Option<String>,
    #[serde(rename = "Races")]
    pub races: Vec<RaceRow>,
}

/// One race as serialized by the provider.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RaceRow {
    pub season: Option<String>,
    pub round: Option<String>,
    #[serde(rename = "raceName")]
    pub race_name: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    #[serde(rename = "Circuit")]
    pub circuit: Option<CircuitRow>,
    #[serde(rename = "Results")]
    pub results: Vec<ResultRow>,
    #[serde(rename = "SprintResults")]
    pub sprint_results: Vec<ResultRow>,
    #[serde(rename = "QualifyingResults")]
    pub qualifying_results: Vec<QualifyingRow>,
}

/// Circuit block nested in a race.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CircuitRow {
    #[serde(rename = "circuitId")]
    pub circuit_id: Option<String>,
    #[serde(rename = "circuitName")]
    pub circuit_name: Option<String>,
    #[serde(rename = "Location")]
    pub location: Option<LocationRow>,
}

/// Circuit location block.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LocationRow {
    pub locality: Option<String>,
    pub country: Option<String>,
}

/// One race or sprint classification row.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ResultRow {
    pub position: Option<String>,
    #[serde(rename = "positionText")]
    pub position_text: Option<String>,
    pub points: Option<String>,
    pub grid: Option<String>,
    pub status: Option<String>,
    #[serde(rename = "Driver")]
    pub driver: Option<DriverRow>,
    #[serde(rename = "Constructor")]
    pub constructor: Option<ConstructorRow>,
}

/// One qualifying classification row.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct QualifyingRow {
    pub position: Option<String>,
    #[serde(rename = "Driver")]
    pub driver: Option<DriverRow>,
    #[serde(rename = "Constructor")]
    pub constructor: Option<ConstructorRow>,
}

/// Driver block nested in result rows.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DriverRow {
    #[serde(rename = "driverId")]
    pub driver_id: Option<String>,
    #[serde(rename = "givenName")]
    pub given_name: Option<String>,
    #[serde(rename = "familyName")]
    pub family_name: Option<String>,
}

/// Constructor block nested in result rows.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ConstructorRow {
    #[serde(rename = "constructorId")]
    pub constructor_id: Option<String>,
    pub name: Option<String>,
}

impl DriverRow {
    pub(crate) fn normalize(&self) -> Option<DriverRef> {
        let id = self.driver_id.clone()?;
        let name = match (&self.given_name, &self.family_name) {
            (Some(given), Some(family)) => format!("{given} {family}"),
            (Some(given), None) => given.clone(),
            (None, Some(family)) => family.clone(),
            (None, None) => id.clone(),
        };
        Some(DriverRef { id, name })
    }
}

impl ConstructorRow {
    pub(crate) fn normalize(&self) -> Option<ConstructorRef> {
        let id = self.constructor_id.clone()?;
        let name = self.name.clone().unwrap_or_else(|| id.clone());
        Some(ConstructorRef { id, name })
    }
}

impl ResultRow {
    /// Normalize a classification row. Rows without a driver or constructor
    /// are meaningless and dropped.
    ///
    /// The finishing position comes from `positionText`: a numeric value is a
    /// classified finish, anything else ("R", "D", "E", "W", "F", "N") maps
    /// to `None`. This is the only encoding of "did not classify".
    pub fn normalize(&self) -> Option<RaceResult> {
        let driver = self.driver.as_ref()?.normalize()?;
        let constructor = self.constructor.as_ref()?.normalize()?;
        let position_text = self.position_text.as_deref().or(self.position.as_deref());
        Some(RaceResult {
            driver,
            constructor,
            position: super::parse_u32(position_text),
            points: parse_f64_or_zero(self.points.as_deref()),
            grid: super::parse_u32(self.grid.as_deref()),
            status: self.status.clone().unwrap_or_default(),
        })
    }
}

impl QualifyingRow {
    pub fn normalize(&self) -> Option<QualifyingResult> {
        Some(QualifyingResult {
            driver: self.driver.as_ref()?.normalize()?,
            constructor: self.constructor.as_ref()?.normalize()?,
            position: super::parse_u32(self.position.as_deref())?,
        })
    }
}

impl RaceRow {
    /// Normalize a race and whatever session rows it carries.
    ///
    /// Main race rows take precedence; a race fetched from the sprint
    /// endpoint has only `SprintResults` and those feed `results` instead.
    /// Races without a parseable round cannot be keyed and are dropped.
    pub fn normalize(&self) -> Option<Race> {
        let round = match super::parse_u32(self.round.as_deref()) {
            Some(round) => round,
            None => {
                warn!(race = ?self.race_name, "Dropping race without parseable round");
                return None;
            }
        };

        let circuit = self.circuit.as_ref();
        let location = circuit.and_then(|c| c.location.as_ref());
        let source_results =
            if self.results.is_empty() { &self.sprint_results } else { &self.results };

        Some(Race {
            season: self.season.clone().unwrap_or_default(),
            round,
            name: self.race_name.clone().unwrap_or_default(),
            date: self.date.as_deref().and_then(|d| d.parse::<NaiveDate>().ok()),
            time: self
                .time
                .as_deref()
                .and_then(|t| t.trim_end_matches('Z').parse::<NaiveTime>().ok()),
            circuit: Circuit {
                id: circuit.and_then(|c| c.circuit_id.clone()).unwrap_or_default(),
                name: circuit.and_then(|c| c.circuit_name.clone()).unwrap_or_default(),
                locality: location.and_then(|l| l.locality.clone()).unwrap_or_default(),
                country: location.and_then(|l| l.country.clone()).unwrap_or_default(),
            },
            results: source_results.iter().filter_map(ResultRow::normalize).collect(),
            qualifying: self.qualifying_results.iter().filter_map(QualifyingRow::normalize).collect(),
        })
    }
}

/// Merge races collected across page boundaries.
///
/// The provider paginates on result rows, so one race's rows can straddle two
/// pages and the race appears twice in the concatenated list. Rows merge by
/// round, preserving first-seen race metadata.
pub fn merge_races(pages: Vec<Race>) -> Vec<Race> {
    let mut merged: Vec<Race> = Vec::new();
    for race in pages {
        match merged.iter_mut().find(|r| r.round == race.round) {
            Some(existing) => {
                existing.results.extend(race.results);
                existing.qualifying.extend(race.qualifying);
            }
            None => merged.push(race),
        }
    }
    merged
}
