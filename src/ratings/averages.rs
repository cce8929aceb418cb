//! Rating aggregation
//!
//! Averages are keyed by the driver+constructor composite: a driver who
//! changes teams mid-season has two separate stints, each averaging only its
//! own races. The race-by-race matrix applies the same per-stint key so both
//! views agree on what a row means.

use std::collections::BTreeMap;

use crate::season::{RaceColumn, country_code_for_race, shorten_race_name};
use crate::types::{AverageRating, DriverRating, SeasonRatings, round_two_places};

/// One per-stint row of the race-by-race matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct MatrixDriverRow {
    pub driver_id: String,
    pub driver_name: String,
    pub constructor_id: String,
    pub constructor_name: String,
    /// Sparse map from round number to the rating given for that round.
    pub ratings_by_round: BTreeMap<u32, f64>,
    /// Mean across however many rounds this stint has a rating for, rounded
    /// to two decimal places.
    pub average: f64,
}

/// Round-ordered table of rated races plus per-stint rating rows.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RatingMatrix {
    pub races: Vec<RaceColumn>,
    pub drivers: Vec<MatrixDriverRow>,
}

struct StintAccumulator {
    driver_name: String,
    constructor_name: String,
    ratings: Vec<f64>,
}

fn collect_stints(season: &SeasonRatings) -> Vec<((String, String), StintAccumulator)> {
    let mut stints: Vec<((String, String), StintAccumulator)> = Vec::new();
    for race in season.races.iter().filter(|race| race.completed) {
        for rating in &race.ratings {
            let key = (rating.driver_id.clone(), rating.constructor_id.clone());
            match stints.iter_mut().find(|(existing, _)| *existing == key) {
                Some((_, acc)) => acc.ratings.push(rating.rating),
                None => stints.push((
                    key,
                    StintAccumulator {
                        driver_name: rating.driver_name.clone(),
                        constructor_name: rating.constructor_name.clone(),
                        ratings: vec![rating.rating],
                    },
                )),
            }
        }
    }
    stints
}

/// Average ratings for a season, ordered by descending average.
///
/// Completed race ratings are the primary source; each stint averages every
/// rating contributed under that exact driver+constructor pairing. Without
/// any completed races, each quick rating synthesizes one row counting as a
/// single race. With neither, the list is empty.
pub fn calculate_averages(
    race_ratings: Option<&SeasonRatings>,
    quick_ratings: &[DriverRating],
) -> Vec<AverageRating> {
    let mut averages: Vec<AverageRating> = match race_ratings {
        Some(season) if season.races.iter().any(|race| race.completed) => collect_stints(season)
            .into_iter()
            .map(|((driver_id, constructor_id), acc)| {
                AverageRating::from_ratings(
                    driver_id,
                    acc.driver_name,
                    constructor_id,
                    acc.constructor_name,
                    acc.ratings,
                )
            })
            .collect(),
        _ => quick_ratings
            .iter()
            .map(|rating| {
                AverageRating::from_ratings(
                    rating.driver_id.clone(),
                    rating.driver_name.clone(),
                    rating.constructor_id.clone(),
                    rating.constructor_name.clone(),
                    vec![rating.rating],
                )
            })
            .collect(),
    };

    averages.sort_by(|a, b| {
        b.average.partial_cmp(&a.average).unwrap_or(std::cmp::Ordering::Equal)
    });
    averages
}

/// Build the race-by-race matrix from a season's stored ratings.
///
/// Columns are the completed rated rounds in numeric round order, with
/// shortened names and country codes; rows are per-stint, sparse over the
/// rounds that stint was rated for.
pub fn build_matrix(race_ratings: Option<&SeasonRatings>) -> RatingMatrix {
    let Some(season) = race_ratings else {
        return RatingMatrix::default();
    };

    let mut rated: Vec<_> = season.races.iter().filter(|race| race.completed).collect();
    rated.sort_by_key(|race| race.round_number());

    let races = rated
        .iter()
        .map(|race| RaceColumn {
            round: race.round_number(),
            name: shorten_race_name(&race.race_name),
            country_code: country_code_for_race(&race.race_name),
        })
        .collect();

    let mut rows: Vec<MatrixDriverRow> = Vec::new();
    for race in &rated {
        let round = race.round_number();
        for rating in &race.ratings {
            let row = rows.iter_mut().find(|row| {
                row.driver_id == rating.driver_id && row.constructor_id == rating.constructor_id
            });
            match row {
                Some(row) => {
                    row.ratings_by_round.insert(round, rating.rating);
                }
                None => rows.push(MatrixDriverRow {
                    driver_id: rating.driver_id.clone(),
                    driver_name: rating.driver_name.clone(),
                    constructor_id: rating.constructor_id.clone(),
                    constructor_name: rating.constructor_name.clone(),
                    ratings_by_round: BTreeMap::from([(round, rating.rating)]),
                    average: 0.0,
                }),
            }
        }
    }
    for row in &mut rows {
        let sum: f64 = row.ratings_by_round.values().sum();
        row.average = round_two_places(sum / row.ratings_by_round.len() as f64);
    }
    rows.sort_by(|a, b| b.average.partial_cmp(&a.average).unwrap_or(std::cmp::Ordering::Equal));

    RatingMatrix { races, drivers: rows }
}
