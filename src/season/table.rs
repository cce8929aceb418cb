//! Interactive season table shaping
//!
//! Indexes results for the per-driver, per-round season table and derives
//! the completed-race column headers.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};

use super::countries::country_code_for_race;
use crate::types::Race;

/// A driver's position within one round's cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundPosition {
    /// Classified finish in the main race.
    Classified(u32),
    /// Started the main race but was not classified (retired, disqualified).
    Unclassified,
    /// No main-race result at all — only a sprint result exists. Skipping
    /// the main race and failing to finish it are different situations and
    /// must not be conflated.
    Unknown,
}

/// One driver's outcome for one round.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundCell {
    pub position: RoundPosition,
    /// Weekend points: main race plus sprint for the same round.
    pub points: f64,
}

/// Column header for the season table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RaceColumn {
    pub round: u32,
    /// Race name with the "Grand Prix" suffix stripped.
    pub name: String,
    pub country_code: Option<&'static str>,
}

/// Strip the "Grand Prix" / "GP" suffix from a race name.
pub fn shorten_race_name(name: &str) -> String {
    name.trim_end_matches(" Grand Prix").trim_end_matches(" GP").to_string()
}

/// Index race and sprint results by driver and round.
///
/// Main-race rows define the cell position; sprint rows only add their
/// points on top. A sprint row without a main-race counterpart produces a
/// cell with [`RoundPosition::Unknown`].
pub fn build_race_by_round_map(
    results: &[Race],
    sprints: &[Race],
) -> HashMap<String, BTreeMap<u32, RoundCell>> {
    let mut map: HashMap<String, BTreeMap<u32, RoundCell>> = HashMap::new();

    for race in results {
        for row in &race.results {
            let position = match row.position {
                Some(p) => RoundPosition::Classified(p),
                None => RoundPosition::Unclassified,
            };
            map.entry(row.driver.id.clone())
                .or_default()
                .insert(race.round, RoundCell { position, points: row.points });
        }
    }

    for race in sprints {
        for row in &race.results {
            let rounds = map.entry(row.driver.id.clone()).or_default();
            match rounds.get_mut(&race.round) {
                Some(cell) => cell.points += row.points,
                None => {
                    rounds.insert(
                        race.round,
                        RoundCell { position: RoundPosition::Unknown, points: row.points },
                    );
                }
            }
        }
    }

    map
}

/// Columns for every race already held as of `now`, in round order.
pub fn build_race_columns(races: &[Race], now: DateTime<Utc>) -> Vec<RaceColumn> {
    let mut completed: Vec<&Race> = races.iter().filter(|r| r.is_completed_at(now)).collect();
    completed.sort_by_key(|r| r.round);
    completed
        .into_iter()
        .map(|race| RaceColumn {
            round: race.round,
            name: shorten_race_name(&race.name),
            country_code: country_code_for_race(&race.name),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Circuit, ConstructorRef, DriverRef, RaceResult};

    fn race(round: u32, name: &str, date: Option<&str>, results: Vec<RaceResult>) -> Race {
        Race {
            season: "2024".to_string(),
            round,
            name: name.to_string(),
            date: date.map(|d| d.parse().unwrap()),
            time: None,
            circuit: Circuit {
                id: String::new(),
                name: String::new(),
                locality: String::new(),
                country: String::new(),
            },
            results,
            qualifying: vec![],
        }
    }

    fn result(driver_id: &str, position: Option<u32>, points: f64) -> RaceResult {
        RaceResult {
            driver: DriverRef { id: driver_id.to_string(), name: driver_id.to_string() },
            constructor: ConstructorRef { id: "team".to_string(), name: "Team".to_string() },
            position,
            points,
            grid: None,
            status: "Finished".to_string(),
        }
    }

    #[test]
    fn weekend_points_sum_race_and_sprint() {
        let results = vec![race(5, "Miami Grand Prix", None, vec![result("max", Some(2), 18.0)])];
        let sprints = vec![race(5, "Miami Grand Prix", None, vec![result("max", Some(1), 8.0)])];

        let map = build_race_by_round_map(&results, &sprints);
        let cell = map["max"][&5];

        assert_eq!(cell.points, 26.0);
        // position comes from the main race, not the sprint
        assert_eq!(cell.position, RoundPosition::Classified(2));
    }

    #[test]
    fn sprint_only_round_is_unknown_not_unclassified() {
        let sprints = vec![race(5, "Miami Grand Prix", None, vec![result("max", Some(1), 8.0)])];

        let map = build_race_by_round_map(&[], &sprints);
        let cell = map["max"][&5];

        assert_eq!(cell.position, RoundPosition::Unknown);
        assert_eq!(cell.points, 8.0);
    }

    #[test]
    fn retirement_maps_to_unclassified() {
        let results = vec![race(3, "Australian Grand Prix", None, vec![result("max", None, 0.0)])];
        let map = build_race_by_round_map(&results, &[]);
        assert_eq!(map["max"][&3].position, RoundPosition::Unclassified);
    }

    #[test]
    fn empty_sessions_contribute_nothing() {
        let results = vec![race(9, "Future Grand Prix", None, vec![])];
        let map = build_race_by_round_map(&results, &[]);
        assert!(map.is_empty());
    }

    #[test]
    fn columns_include_only_completed_races_in_round_order() {
        let races = vec![
            race(2, "Saudi Arabian Grand Prix", Some("2024-03-09"), vec![]),
            race(1, "Bahrain Grand Prix", Some("2024-03-02"), vec![]),
            race(24, "Abu Dhabi Grand Prix", Some("2024-12-08"), vec![]),
        ];
        let now = "2024-06-01T00:00:00Z".parse().unwrap();

        let columns = build_race_columns(&races, now);

        assert_eq!(columns.len(), 2);
        assert_eq!(columns[0].round, 1);
        assert_eq!(columns[0].name, "Bahrain");
        assert_eq!(columns[0].country_code, Some("BH"));
        assert_eq!(columns[1].round, 2);
        assert_eq!(columns[1].country_code, Some("SA"));
    }

    #[test]
    fn shorten_strips_grand_prix_suffixes() {
        assert_eq!(shorten_race_name("Monaco Grand Prix"), "Monaco");
        assert_eq!(shorten_race_name("Silverstone GP"), "Silverstone");
        assert_eq!(shorten_race_name("Indy 500"), "Indy 500");
    }
}
