//! User-entered performance ratings
//!
//! Rating records persist until an explicit clear or import-overwrite; they
//! have no expiry. Serialization uses camelCase field names so export
//! documents round-trip with the original browser-stored format.

use serde::{Deserialize, Serialize};

/// Smallest assignable rating.
pub const RATING_MIN: f64 = 0.5;
/// Largest assignable rating.
pub const RATING_MAX: f64 = 10.0;
/// Rating assigned when a driver is saved while still unrated (exact 0).
pub const RATING_DEFAULT: f64 = 5.0;

/// Snap a raw rating into the valid scale: half-point increments within
/// [[`RATING_MIN`], [`RATING_MAX`]]. An exact 0 means "unrated" and becomes
/// [`RATING_DEFAULT`].
pub fn normalize_rating(rating: f64) -> f64 {
    if rating == 0.0 {
        return RATING_DEFAULT;
    }
    let snapped = (rating * 2.0).round() / 2.0;
    snapped.clamp(RATING_MIN, RATING_MAX)
}

/// Round to two decimal places, the precision displayed for averages.
pub fn round_two_places(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// One driver's rating for a race, with name snapshots captured at rating
/// time (never re-resolved later).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverRating {
    pub driver_id: String,
    pub driver_name: String,
    pub constructor_id: String,
    pub constructor_name: String,
    pub rating: f64,
}

/// Ratings for one round of a season, plus race metadata snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RaceRatings {
    /// Round number kept as a string (provider convention); compare with
    /// [`RaceRatings::round_number`], not lexically.
    pub round: String,
    pub race_name: String,
    pub date: String,
    /// Set true once any save occurs for this round.
    pub completed: bool,
    pub ratings: Vec<DriverRating>,
}

impl RaceRatings {
    /// Numeric round for ordering. Unparseable rounds sort first.
    pub fn round_number(&self) -> u32 {
        self.round.parse().unwrap_or(0)
    }
}

/// All rated rounds of one season, ordered by creation (not by round).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonRatings {
    pub season: String,
    pub races: Vec<RaceRatings>,
}

impl SeasonRatings {
    /// Empty ratings set for a season.
    pub fn new(season: impl Into<String>) -> Self {
        Self { season: season.into(), races: Vec::new() }
    }
}

/// Derived average for one driver+constructor stint.
///
/// Keyed by the composite so a mid-season transfer averages each stint
/// separately. `average` is always recomputed from `ratings` — construct via
/// [`AverageRating::from_ratings`] to keep the two consistent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AverageRating {
    pub driver_id: String,
    pub driver_name: String,
    pub constructor_id: String,
    pub constructor_name: String,
    /// Individual ratings contributing to the average, in rating order.
    pub ratings: Vec<f64>,
    /// How many races contributed.
    pub total_races: usize,
    /// Arithmetic mean of `ratings`, rounded to two decimal places.
    pub average: f64,
}

impl AverageRating {
    /// Build an average row from the individual ratings of one stint.
    pub fn from_ratings(
        driver_id: impl Into<String>,
        driver_name: impl Into<String>,
        constructor_id: impl Into<String>,
        constructor_name: impl Into<String>,
        ratings: Vec<f64>,
    ) -> Self {
        let total_races = ratings.len();
        let average = if ratings.is_empty() {
            0.0
        } else {
            round_two_places(ratings.iter().sum::<f64>() / ratings.len() as f64)
        };
        Self {
            driver_id: driver_id.into(),
            driver_name: driver_name.into(),
            constructor_id: constructor_id.into(),
            constructor_name: constructor_name.into(),
            ratings,
            total_races,
            average,
        }
    }
}
