//! Teammate head-to-head comparison
//!
//! Compares two drivers who have both competed for the same constructor
//! within a season. Race comparisons are a pure "when both finished" pace
//! metric: a round where either driver went unclassified is excluded from
//! the race tally entirely. Qualifying has no such exclusion since a grid
//! position is always assigned.

use crate::types::Race;

/// Tally of a teammate comparison.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeadToHead {
    pub race_wins_a: u32,
    pub race_wins_b: u32,
    pub quali_wins_a: u32,
    pub quali_wins_b: u32,
    /// Rounds actually compared in the race tally, after exclusions — not
    /// the size of the shared-round set.
    pub total_races: u32,
    /// Rounds actually compared in the qualifying tally.
    pub total_qualis: u32,
}

/// Compare `driver_a` and `driver_b` across the rounds they contested for
/// `constructor_id`.
///
/// Lower position wins a round; ties count for neither driver.
pub fn compute_head_to_head(
    driver_a: &str,
    driver_b: &str,
    constructor_id: &str,
    race_results: &[Race],
    qualifying_results: &[Race],
) -> HeadToHead {
    let mut tally = HeadToHead::default();

    for race in race_results {
        let row_a = race
            .results
            .iter()
            .find(|r| r.driver.id == driver_a && r.constructor.id == constructor_id);
        let row_b = race
            .results
            .iter()
            .find(|r| r.driver.id == driver_b && r.constructor.id == constructor_id);
        let (Some(row_a), Some(row_b)) = (row_a, row_b) else {
            continue;
        };
        // both must be classified for the round to count at all
        let (Some(pos_a), Some(pos_b)) = (row_a.position, row_b.position) else {
            continue;
        };
        tally.total_races += 1;
        if pos_a < pos_b {
            tally.race_wins_a += 1;
        } else if pos_b < pos_a {
            tally.race_wins_b += 1;
        }
    }

    for race in qualifying_results {
        let row_a = race
            .qualifying
            .iter()
            .find(|r| r.driver.id == driver_a && r.constructor.id == constructor_id);
        let row_b = race
            .qualifying
            .iter()
            .find(|r| r.driver.id == driver_b && r.constructor.id == constructor_id);
        let (Some(row_a), Some(row_b)) = (row_a, row_b) else {
            continue;
        };
        tally.total_qualis += 1;
        if row_a.position < row_b.position {
            tally.quali_wins_a += 1;
        } else if row_b.position < row_a.position {
            tally.quali_wins_b += 1;
        }
    }

    tally
}
