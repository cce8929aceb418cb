//! Season statistics and driver performance ratings for Formula 1.
//!
//! Gridbook sits on top of an Ergast-compatible statistics provider and
//! turns its raw race, qualifying and standings documents into season-wide
//! views, while keeping user-entered driver ratings in an injected local
//! store.
//!
//! # Features
//!
//! - **Cached fetching**: read-through response cache with season-aware TTL
//!   and stale-serving under provider rate limits
//! - **Season aggregation**: poles, podiums and points-by-round derived from
//!   full-season scans and merged onto authoritative standings
//! - **Head-to-head**: teammate race and qualifying comparisons restricted
//!   to rounds both drivers finished
//! - **Ratings**: per-race and quick-rate season ratings with per-stint
//!   averages and export/import
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use gridbook::{Gridbook, MemoryStore};
//!
//! #[tokio::main]
//! async fn main() -> gridbook::Result<()> {
//!     let book = Gridbook::new(Arc::new(MemoryStore::new()))?;
//!
//!     let stats = book.driver_season_stats("2024").await?;
//!     for row in &stats {
//!         println!("{}: {} poles, {} podiums", row.driver.name, row.poles, row.podiums);
//!     }
//!
//!     let h2h = book.head_to_head("lando_norris", "oscar_piastri", "mclaren", "2024").await?;
//!     println!("race score {}-{}", h2h.race_wins_a, h2h.race_wins_b);
//!     Ok(())
//! }
//! ```

// Core types and error handling
mod error;
pub mod store;
#[cfg(test)]
mod test_utils;
pub mod types;

// Data access
pub mod client;
pub mod schema;

// Derivation logic
pub mod ratings;
pub mod season;

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::Utc;
use futures::join;
use tracing::warn;

// Core exports
pub use error::{Result, StatsError};
pub use store::{KeyValueStore, MemoryStore};
pub use types::*;

// Data access exports
pub use client::retry::RetryPolicy;
pub use client::transport::{HttpResponse, HttpTransport, Transport};
pub use client::{ApiClient, ClientConfig, DatasetResult, SeasonDataset};

// Derivation exports
pub use ratings::{ImportSummary, MatrixDriverRow, RatingMatrix, RatingStore};
pub use season::{
    HeadToHead, RaceColumn, RoundCell, RoundPosition, compute_constructor_standings,
    compute_driver_season_stats, compute_head_to_head,
};

/// Unified entry point: remote statistics client plus local rating store
/// over one injected key-value store.
///
/// The two halves are independent — ratings never touch the network — but
/// share the storage capability so an embedder wires a single backend.
pub struct Gridbook {
    client: ApiClient,
    ratings: RatingStore,
}

impl Gridbook {
    /// Build over the default HTTP transport.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Result<Self> {
        let client = ApiClient::new(Arc::clone(&store))?;
        Ok(Self { client, ratings: RatingStore::new(store) })
    }

    /// Build over an explicit client, used by tests and custom deployments.
    pub fn with_client(client: ApiClient, store: Arc<dyn KeyValueStore>) -> Self {
        Self { client, ratings: RatingStore::new(store) }
    }

    /// The remote data client.
    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// The rating store.
    pub fn ratings(&self) -> &RatingStore {
        &self.ratings
    }

    /// Per-driver season statistics: authoritative standings merged with
    /// derived pole and podium counts.
    ///
    /// Standings are required; the derived scans degrade to zero counts when
    /// their datasets cannot be fetched.
    pub async fn driver_season_stats(&self, season: &str) -> Result<Vec<DriverSeasonStats>> {
        let standings = self.client.driver_standings(season).await?;
        let (results, qualifying) =
            join!(self.client.season_results(season), self.client.season_qualifying(season));
        let results = degrade_to_empty("results", results);
        let qualifying = degrade_to_empty("qualifying", qualifying);
        Ok(compute_driver_season_stats(&standings, &results, &qualifying))
    }

    /// Per-constructor season statistics with summed driver pole/podium
    /// counts.
    pub async fn constructor_season_stats(
        &self,
        season: &str,
    ) -> Result<Vec<ConstructorSeasonStats>> {
        let standings = self.client.constructor_standings(season).await?;
        // the driver scan re-fetches through the cache, so this costs no
        // extra network round trips in the common case
        let driver_stats = self.driver_season_stats(season).await?;
        Ok(compute_constructor_standings(&standings, &driver_stats))
    }

    /// Column headers for every race of the season already held.
    pub async fn race_columns(&self, season: &str) -> Result<Vec<RaceColumn>> {
        let schedule = self.client.season_schedule(season).await?;
        Ok(season::build_race_columns(&schedule, Utc::now()))
    }

    /// Per-driver, per-round cells for the interactive season table.
    /// Sprint-less seasons simply contribute no sprint points.
    pub async fn race_by_round(
        &self,
        season: &str,
    ) -> Result<HashMap<String, BTreeMap<u32, RoundCell>>> {
        let (results, sprints) =
            join!(self.client.season_results(season), self.client.season_sprints(season));
        let results = results?;
        let sprints = degrade_to_empty("sprints", sprints);
        Ok(season::build_race_by_round_map(&results, &sprints))
    }

    /// Teammate head-to-head across a season for one constructor.
    pub async fn head_to_head(
        &self,
        driver_a: &str,
        driver_b: &str,
        constructor_id: &str,
        season: &str,
    ) -> Result<HeadToHead> {
        let (results, qualifying) =
            join!(self.client.season_results(season), self.client.season_qualifying(season));
        Ok(compute_head_to_head(driver_a, driver_b, constructor_id, &results?, &qualifying?))
    }
}

fn degrade_to_empty<T>(label: &str, fetched: Result<Vec<T>>) -> Vec<T> {
    match fetched {
        Ok(records) => records,
        Err(err) => {
            warn!(dataset = label, error = %err, "Dataset unavailable, continuing without it");
            Vec::new()
        }
    }
}
