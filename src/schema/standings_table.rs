//! Standings table wire structures
//!
//! Driver and constructor championship standings documents.

use serde::Deserialize;

use super::race_table::{ConstructorRow, DriverRow};
use super::{parse_f64_or_zero, parse_u32};
use crate::types::{ConstructorRef, ConstructorStanding, DriverStanding};

/// Standings table, carrying one or more standings lists.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StandingsTable {
    pub season: Option<String>,
    #[serde(rename = "StandingsLists")]
    pub standings_lists: Vec<StandingsList>,
}

/// Standings snapshot after a given round.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StandingsList {
    pub season: Option<String>,
    pub round: Option<String>,
    #[serde(rename = "DriverStandings")]
    pub driver_standings: Vec<DriverStandingRow>,
    #[serde(rename = "ConstructorStandings")]
    pub constructor_standings: Vec<ConstructorStandingRow>,
}

/// One driver standings row.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DriverStandingRow {
    pub position: Option<String>,
    pub points: Option<String>,
    pub wins: Option<String>,
    #[serde(rename = "Driver")]
    pub driver: Option<DriverRow>,
    /// Every constructor the driver has driven for this season, in season
    /// order; the last entry is the current association.
    #[serde(rename = "Constructors")]
    pub constructors: Vec<ConstructorRow>,
}

/// One constructor standings row.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ConstructorStandingRow {
    pub position: Option<String>,
    pub points: Option<String>,
    pub wins: Option<String>,
    #[serde(rename = "Constructor")]
    pub constructor: Option<ConstructorRow>,
}

impl DriverStandingRow {
    /// Normalize into the domain type; rows without a driver are dropped,
    /// unparseable numerics become zero.
    pub fn normalize(&self) -> Option<DriverStanding> {
        let driver = self.driver.as_ref()?.normalize()?;
        let constructor = self
            .constructors
            .last()
            .and_then(ConstructorRow::normalize)
            .unwrap_or(ConstructorRef { id: String::new(), name: String::new() });
        Some(DriverStanding {
            position: parse_u32(self.position.as_deref()).unwrap_or(0),
            points: parse_f64_or_zero(self.points.as_deref()),
            wins: parse_u32(self.wins.as_deref()).unwrap_or(0),
            driver,
            constructor,
        })
    }
}

impl ConstructorStandingRow {
    /// Normalize into the domain type; rows without a constructor are
    /// dropped, unparseable numerics become zero.
    pub fn normalize(&self) -> Option<ConstructorStanding> {
        Some(ConstructorStanding {
            position: parse_u32(self.position.as_deref()).unwrap_or(0),
            points: parse_f64_or_zero(self.points.as_deref()),
            wins: parse_u32(self.wins.as_deref()).unwrap_or(0),
            constructor: self.constructor.as_ref()?.normalize()?,
        })
    }
}

impl StandingsTable {
    /// All driver standings rows across the table's lists, normalized.
    pub fn driver_standings(&self) -> Vec<DriverStanding> {
        self.standings_lists
            .iter()
            .flat_map(|list| list.driver_standings.iter())
            .filter_map(DriverStandingRow::normalize)
            .collect()
    }

    /// All constructor standings rows across the table's lists, normalized.
    pub fn constructor_standings(&self) -> Vec<ConstructorStanding> {
        self.standings_lists
            .iter()
            .flat_map(|list| list.constructor_standings.iter())
            .filter_map(ConstructorStandingRow::normalize)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn driver_standing_uses_latest_constructor() {
        let row: DriverStandingRow = serde_json::from_str(
            r#"{"position": "12", "points": "30", "wins": "0",
                "Driver": {"driverId": "sainz", "givenName": "Carlos", "familyName": "Sainz"},
                "Constructors": [
                    {"constructorId": "ferrari", "name": "Ferrari"},
                    {"constructorId": "williams", "name": "Williams"}]}"#,
        )
        .unwrap();
        let standing = row.normalize().unwrap();
        assert_eq!(standing.constructor.id, "williams");
        assert_eq!(standing.points, 30.0);
    }

    #[test]
    fn unparseable_numerics_become_zero() {
        let row: ConstructorStandingRow = serde_json::from_str(
            r#"{"position": "-", "points": "n/a", "wins": "",
                "Constructor": {"constructorId": "haas", "name": "Haas F1 Team"}}"#,
        )
        .unwrap();
        let standing = row.normalize().unwrap();
        assert_eq!(standing.position, 0);
        assert_eq!(standing.points, 0.0);
        assert_eq!(standing.wins, 0);
    }

    #[test]
    fn standings_table_flattens_lists() {
        let table: StandingsTable = serde_json::from_str(
            r#"{"season": "2024", "StandingsLists": [{"season": "2024", "round": "24",
                "DriverStandings": [
                    {"position": "1", "points": "437", "wins": "9",
                     "Driver": {"driverId": "max_verstappen", "givenName": "Max", "familyName": "Verstappen"},
                     "Constructors": [{"constructorId": "red_bull", "name": "Red Bull"}]},
                    {"points": "0", "Constructors": []}]}]}"#,
        )
        .unwrap();
        let standings = table.driver_standings();
        // the row without a driver is dropped
        assert_eq!(standings.len(), 1);
        assert_eq!(standings[0].wins, 9);
    }
}
