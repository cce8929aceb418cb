//! Rating store
//!
//! Persists user-entered performance ratings in two independent key
//! namespaces of the injected store: one maps season to its race-by-race
//! ratings, the other maps season to a flat "quick rate" list. Entries are
//! JSON-serialized and have no expiry; they change only through explicit
//! saves, clears and import-overwrites.
//!
//! Every operation here is synchronous by design: a read-modify-write on a
//! season must not straddle a suspension point, or a concurrent save to the
//! same season could interleave. Storage failures are logged and leave the
//! prior state intact — callers cannot assume a save succeeded without
//! separately checking storage availability.

mod averages;
mod transfer;

pub use averages::{MatrixDriverRow, RatingMatrix};
pub use transfer::ImportSummary;

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{info, warn};

use crate::error::Result;
use crate::store::KeyValueStore;
use crate::types::{AverageRating, DriverRating, RaceRatings, SeasonRatings, normalize_rating};

const RACE_RATINGS_KEY: &str = "gridbook:race-ratings";
const QUICK_RATINGS_KEY: &str = "gridbook:quick-ratings";

type RaceRatingsBySeason = HashMap<String, SeasonRatings>;
type QuickRatingsBySeason = HashMap<String, Vec<DriverRating>>;

/// Store for user-entered race and quick ratings.
pub struct RatingStore {
    store: Arc<dyn KeyValueStore>,
}

impl RatingStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    fn load<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        let raw = match self.store.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return T::default(),
            Err(err) => {
                warn!(key, error = %err, "Rating read failed, treating as empty");
                return T::default();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(err) => {
                warn!(key, error = %err, "Corrupt rating entry, treating as empty");
                T::default()
            }
        }
    }

    fn persist<T: Serialize>(&self, key: &str, value: &T, operation: &str) {
        let serialized = match serde_json::to_string(value) {
            Ok(serialized) => serialized,
            Err(err) => {
                warn!(operation, error = %err, "Rating serialization failed, keeping prior state");
                return;
            }
        };
        if let Err(err) = self.store.set(key, &serialized) {
            warn!(operation, error = %err, "Rating write failed, keeping prior state");
        }
    }

    fn load_race_ratings(&self) -> RaceRatingsBySeason {
        self.load(RACE_RATINGS_KEY)
    }

    fn load_quick_ratings(&self) -> QuickRatingsBySeason {
        self.load(QUICK_RATINGS_KEY)
    }

    /// All race-by-race ratings stored for a season.
    pub fn season_ratings(&self, season: &str) -> Option<SeasonRatings> {
        self.load_race_ratings().remove(season)
    }

    /// The quick-rate list stored for a season.
    pub fn quick_ratings(&self, season: &str) -> Vec<DriverRating> {
        self.load_quick_ratings().remove(season).unwrap_or_default()
    }

    /// Upsert the ratings for one round.
    ///
    /// The round's whole rating set is replaced atomically — individual
    /// driver entries are never merged — and the round is marked completed.
    /// Ratings are snapped onto the half-point scale; an exact 0 ("unrated")
    /// becomes the default of 5.
    pub fn save_race_ratings(
        &self,
        season: &str,
        round: &str,
        race_name: &str,
        date: &str,
        ratings: Vec<DriverRating>,
    ) {
        let ratings: Vec<DriverRating> = ratings
            .into_iter()
            .map(|mut rating| {
                rating.rating = normalize_rating(rating.rating);
                rating
            })
            .collect();

        let race = RaceRatings {
            round: round.to_string(),
            race_name: race_name.to_string(),
            date: date.to_string(),
            completed: true,
            ratings,
        };

        let mut all = self.load_race_ratings();
        let season_ratings =
            all.entry(season.to_string()).or_insert_with(|| SeasonRatings::new(season));
        match season_ratings.races.iter_mut().find(|r| r.round == round) {
            Some(existing) => *existing = race,
            // creation order, not round order
            None => season_ratings.races.push(race),
        }
        self.persist(RACE_RATINGS_KEY, &all, "save race ratings");
        info!(season, round, "Saved race ratings");
    }

    /// Replace the entire quick-rate list for a season.
    pub fn save_quick_ratings(&self, season: &str, ratings: Vec<DriverRating>) {
        let ratings: Vec<DriverRating> = ratings
            .into_iter()
            .map(|mut rating| {
                rating.rating = normalize_rating(rating.rating);
                rating
            })
            .collect();
        let mut all = self.load_quick_ratings();
        all.insert(season.to_string(), ratings);
        self.persist(QUICK_RATINGS_KEY, &all, "save quick ratings");
        info!(season, "Saved quick ratings");
    }

    /// Delete both rating namespaces for one season; other seasons are
    /// untouched.
    pub fn clear_season_ratings(&self, season: &str) {
        let mut races = self.load_race_ratings();
        races.remove(season);
        self.persist(RACE_RATINGS_KEY, &races, "clear season ratings");

        let mut quick = self.load_quick_ratings();
        quick.remove(season);
        self.persist(QUICK_RATINGS_KEY, &quick, "clear season ratings");
        info!(season, "Cleared season ratings");
    }

    /// Per-stint average ratings for a season, ordered by descending
    /// average. Falls back to quick ratings when no completed race ratings
    /// exist; empty when neither does.
    pub fn calculate_averages(&self, season: &str) -> Vec<AverageRating> {
        let race_ratings = self.season_ratings(season);
        let quick = self.quick_ratings(season);
        averages::calculate_averages(race_ratings.as_ref(), &quick)
    }

    /// Round-ordered table of rated races and per-stint rating rows.
    pub fn race_by_race_matrix(&self, season: &str) -> RatingMatrix {
        averages::build_matrix(self.season_ratings(season).as_ref())
    }

    /// Serialize a season's full ratings bundle as a versioned document.
    pub fn export_ratings(&self, season: &str) -> Result<String> {
        let document = transfer::export_document(
            season,
            self.season_ratings(season),
            self.quick_ratings(season),
            Utc::now(),
        );
        transfer::serialize_document(&document)
    }

    /// Validate and apply an exported ratings document.
    ///
    /// Malformed JSON or a missing `season` field rejects the whole import
    /// with no mutation at all. A valid document fully replaces both rating
    /// namespaces for its season (no merge).
    pub fn import_ratings(&self, json: &str) -> Result<ImportSummary> {
        let document = transfer::parse_document(json)?;
        let season = document.season;

        let mut races = self.load_race_ratings();
        let races_imported = match document.race_ratings {
            Some(mut season_ratings) => {
                season_ratings.season = season.clone();
                let count = season_ratings.races.len();
                races.insert(season.clone(), season_ratings);
                count
            }
            None => {
                races.remove(&season);
                0
            }
        };
        self.persist(RACE_RATINGS_KEY, &races, "import ratings");

        let mut quick = self.load_quick_ratings();
        let quick_imported = match document.quick_ratings {
            Some(ratings) => {
                let count = ratings.len();
                quick.insert(season.clone(), ratings);
                count
            }
            None => {
                quick.remove(&season);
                0
            }
        };
        self.persist(QUICK_RATINGS_KEY, &quick, "import ratings");

        info!(season, races_imported, quick_imported, "Imported ratings");
        Ok(ImportSummary::new(season, races_imported, quick_imported))
    }
}
