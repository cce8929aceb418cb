//! Driver and constructor season statistics
//!
//! Standings endpoints are authoritative for position, points and wins, but
//! expose neither pole nor podium counts; those are derived by scanning the
//! season's qualifying and race classifications and merged onto the
//! standings rows.

use std::collections::HashMap;

use crate::types::{
    ConstructorSeasonStats, ConstructorStanding, DriverSeasonStats, DriverStanding, Race,
};

#[derive(Default, Clone, Copy)]
struct DerivedCounts {
    poles: u32,
    podiums: u32,
}

/// Scan race and qualifying classifications for per-driver derived counts.
fn derive_counts(results: &[Race], qualifying: &[Race]) -> HashMap<String, DerivedCounts> {
    let mut counts: HashMap<String, DerivedCounts> = HashMap::new();

    for race in results {
        for row in &race.results {
            if row.is_podium() {
                counts.entry(row.driver.id.clone()).or_default().podiums += 1;
            }
        }
    }
    for race in qualifying {
        for row in &race.qualifying {
            if row.position == 1 {
                counts.entry(row.driver.id.clone()).or_default().poles += 1;
            }
        }
    }
    counts
}

/// Merge authoritative standings with derived pole/podium counts.
///
/// Every driver present in the standings gets a row; a driver the scans
/// never saw (no completed races yet, or a provider gap) keeps zero poles
/// and podiums. Output preserves standings order.
pub fn compute_driver_season_stats(
    standings: &[DriverStanding],
    results: &[Race],
    qualifying: &[Race],
) -> Vec<DriverSeasonStats> {
    let derived = derive_counts(results, qualifying);

    standings
        .iter()
        .map(|standing| {
            let counts = derived.get(&standing.driver.id).copied().unwrap_or_default();
            DriverSeasonStats {
                driver: standing.driver.clone(),
                constructor: standing.constructor.clone(),
                position: standing.position,
                points: standing.points,
                wins: standing.wins,
                poles: counts.poles,
                podiums: counts.podiums,
            }
        })
        .collect()
}

/// Enrich constructor standings with pole/podium counts summed over each
/// constructor's drivers.
///
/// Attribution follows each driver's standings-listed constructor, so a
/// mid-season transfer credits the driver's whole season of poles to the
/// current team. Known approximation.
pub fn compute_constructor_standings(
    standings: &[ConstructorStanding],
    driver_stats: &[DriverSeasonStats],
) -> Vec<ConstructorSeasonStats> {
    standings
        .iter()
        .map(|standing| {
            let (poles, podiums) = driver_stats
                .iter()
                .filter(|stats| stats.constructor.id == standing.constructor.id)
                .fold((0, 0), |(poles, podiums), stats| {
                    (poles + stats.poles, podiums + stats.podiums)
                });
            ConstructorSeasonStats {
                constructor: standing.constructor.clone(),
                position: standing.position,
                points: standing.points,
                wins: standing.wins,
                poles,
                podiums,
            }
        })
        .collect()
}
