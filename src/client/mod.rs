//! Remote data client
//!
//! Fetches season, race, standings and qualifying documents from the
//! provider while shielding callers from its pagination and rate limiting:
//! page requests go through a read-through cache with season-aware TTL, and
//! rate-limited pages are retried on a bounded backoff policy before either
//! falling back to a stale cache entry or surfacing the distinguishable
//! rate-limit error.

pub mod cache;
pub mod retry;
pub mod transport;

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures::join;
use tracing::{debug, info, warn};

use crate::error::{Result, StatsError};
use crate::schema::{Envelope, MrData, RaceRow, SeasonRow, merge_races};
use crate::store::KeyValueStore;
use crate::types::{ConstructorStanding, DriverStanding, Race, Season};

use cache::{CacheLookup, ResponseCache};
use retry::RetryPolicy;
use transport::{HttpTransport, Transport};

/// Client configuration. The defaults match the public Jolpica/Ergast
/// deployment: pages of 100 records and a 15 second request timeout.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Provider base URL, without a trailing slash.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Page size for paginated collections (provider maximum is 100).
    pub page_size: u32,
    /// Rate-limit retry policy applied to every page request.
    pub retry: RetryPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.jolpi.ca/ergast/f1".to_string(),
            timeout: Duration::from_secs(15),
            page_size: 100,
            retry: RetryPolicy::default(),
        }
    }
}

/// Outcome of one independently-fetched dataset.
///
/// A dashboard view needs several datasets at once and must keep rendering
/// the ones that arrived; this records, per dataset, whether it is usable,
/// was refused by the rate limiter, or failed some other way. The last two
/// are different user-facing situations and must not be conflated.
#[derive(Debug, Clone)]
pub enum DatasetResult<T> {
    Available(T),
    RateLimited,
    Unavailable,
}

impl<T> DatasetResult<T> {
    fn from_fetch(label: &str, fetched: Result<T>) -> Self {
        match fetched {
            Ok(value) => DatasetResult::Available(value),
            Err(err) if err.is_rate_limited() => {
                warn!(dataset = label, "Dataset unavailable: rate limited");
                DatasetResult::RateLimited
            }
            Err(err) => {
                warn!(dataset = label, error = %err, "Dataset unavailable");
                DatasetResult::Unavailable
            }
        }
    }

    /// The fetched value, if available.
    pub fn value(&self) -> Option<&T> {
        match self {
            DatasetResult::Available(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, DatasetResult::Available(_))
    }

    pub fn is_rate_limited(&self) -> bool {
        matches!(self, DatasetResult::RateLimited)
    }
}

impl<T> DatasetResult<Vec<T>> {
    /// The fetched records, empty when the dataset is unavailable.
    pub fn records(&self) -> &[T] {
        self.value().map(Vec::as_slice).unwrap_or_default()
    }
}

/// Everything one season view needs, each dataset tracked independently.
#[derive(Debug, Clone)]
pub struct SeasonDataset {
    pub results: DatasetResult<Vec<Race>>,
    pub sprints: DatasetResult<Vec<Race>>,
    pub qualifying: DatasetResult<Vec<Race>>,
    pub driver_standings: DatasetResult<Vec<DriverStanding>>,
    pub constructor_standings: DatasetResult<Vec<ConstructorStanding>>,
}

/// Client for the remote statistics provider.
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    cache: ResponseCache,
    config: ClientConfig,
}

impl ApiClient {
    /// Build a client over the default HTTP transport, caching responses in
    /// `store`.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Result<Self> {
        let config = ClientConfig::default();
        let transport = Arc::new(HttpTransport::new(config.timeout)?);
        Ok(Self::with_transport(transport, store, config))
    }

    /// Build a client over an explicit transport, used by tests and custom
    /// deployments.
    pub fn with_transport(
        transport: Arc<dyn Transport>,
        store: Arc<dyn KeyValueStore>,
        config: ClientConfig,
    ) -> Self {
        Self { transport, cache: ResponseCache::new(store), config }
    }

    fn url_for(&self, endpoint: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), endpoint)
    }

    /// Fetch one endpoint, retrying rate-limited responses per the policy.
    ///
    /// Only HTTP 429 is retried; any other failure is immediately the
    /// caller's problem. The suspension here blocks only this request, never
    /// unrelated in-flight fetches.
    async fn fetch_with_retry(&self, endpoint: &str) -> Result<String> {
        let url = self.url_for(endpoint);
        let mut attempt = 0u32;
        loop {
            let response = self.transport.get(&url).await?;
            if response.is_rate_limited() {
                if self.config.retry.allows_retry(attempt) {
                    let delay = self.config.retry.delay_for_attempt(attempt);
                    debug!(endpoint, attempt, ?delay, "Rate limited, backing off");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                    continue;
                }
                return Err(StatsError::rate_limited(endpoint, attempt + 1));
            }
            if !response.is_success() {
                return Err(StatsError::fetch_failed(
                    endpoint,
                    format!("HTTP {}", response.status),
                ));
            }
            return Ok(response.body);
        }
    }

    /// Read-through fetch for one request (endpoint plus query).
    ///
    /// A fresh cache entry short-circuits the network entirely. When the
    /// live fetch is rate limited after all retries, an existing cache entry
    /// is served even if expired; the rate-limit error only propagates when
    /// no cached value exists at all.
    async fn get_cached(&self, endpoint: &str) -> Result<String> {
        let now = Utc::now();
        let stale = match self.cache.lookup(endpoint, now) {
            CacheLookup::Fresh(body) => {
                debug!(endpoint, "Cache hit");
                return Ok(body);
            }
            CacheLookup::Stale(body) => Some(body),
            CacheLookup::Miss => None,
        };

        match self.fetch_with_retry(endpoint).await {
            Ok(body) => {
                self.cache.put(endpoint, &body, now);
                Ok(body)
            }
            Err(err) if err.is_rate_limited() => match stale {
                Some(body) => {
                    info!(endpoint, "Rate limited, serving stale cache entry");
                    Ok(body)
                }
                None => Err(err),
            },
            Err(err) => Err(err),
        }
    }

    /// Fetch every page of a paginated collection sequentially.
    ///
    /// The provider reports a total record count per page; the loop advances
    /// the offset by one page size until it passes that total or a page
    /// comes back empty. Each page gets the full cache-and-retry treatment;
    /// pagination itself is sequential because one page's total is needed to
    /// decide on the next request.
    pub async fn fetch_paginated_collection(&self, endpoint: &str) -> Result<Vec<MrData>> {
        let mut pages = Vec::new();
        let mut offset = 0u32;
        loop {
            let path = format!("{endpoint}?limit={}&offset={offset}", self.config.page_size);
            let body = self.get_cached(&path).await?;
            let envelope: Envelope = serde_json::from_str(&body)?;
            let page = envelope.mr_data;
            let count = page.record_count();
            let total = page.total();
            debug!(endpoint, offset, count, total, "Fetched page");
            pages.push(page);
            offset = offset.saturating_add(self.config.page_size);
            if count == 0 || offset >= total {
                break;
            }
        }
        Ok(pages)
    }

    /// Fetch a non-paginated single document.
    pub async fn fetch_single_resource(&self, endpoint: &str) -> Result<MrData> {
        let body = self.get_cached(endpoint).await?;
        let envelope: Envelope = serde_json::from_str(&body)?;
        Ok(envelope.mr_data)
    }

    fn races_from_pages(pages: Vec<MrData>) -> Vec<Race> {
        let races = pages
            .into_iter()
            .filter_map(|page| page.race_table)
            .flat_map(|table| table.races)
            .filter_map(|row: RaceRow| row.normalize())
            .collect();
        merge_races(races)
    }

    /// All seasons the provider knows about.
    pub async fn seasons(&self) -> Result<Vec<Season>> {
        let pages = self.fetch_paginated_collection("seasons.json").await?;
        Ok(pages
            .into_iter()
            .filter_map(|page| page.season_table)
            .flat_map(|table| table.seasons)
            .filter_map(|row: SeasonRow| row.normalize())
            .collect())
    }

    /// The race calendar for a season, without results.
    pub async fn season_schedule(&self, season: &str) -> Result<Vec<Race>> {
        let pages = self.fetch_paginated_collection(&format!("{season}.json")).await?;
        Ok(Self::races_from_pages(pages))
    }

    /// Every main-race classification of a season.
    pub async fn season_results(&self, season: &str) -> Result<Vec<Race>> {
        let pages = self.fetch_paginated_collection(&format!("{season}/results.json")).await?;
        Ok(Self::races_from_pages(pages))
    }

    /// Every sprint classification of a season. Seasons without sprints
    /// yield an empty list, not an error.
    pub async fn season_sprints(&self, season: &str) -> Result<Vec<Race>> {
        let pages = self.fetch_paginated_collection(&format!("{season}/sprint.json")).await?;
        Ok(Self::races_from_pages(pages))
    }

    /// Every qualifying classification of a season.
    pub async fn season_qualifying(&self, season: &str) -> Result<Vec<Race>> {
        let pages = self.fetch_paginated_collection(&format!("{season}/qualifying.json")).await?;
        Ok(Self::races_from_pages(pages))
    }

    /// Classification of a single round.
    pub async fn round_results(&self, season: &str, round: u32) -> Result<Option<Race>> {
        let pages =
            self.fetch_paginated_collection(&format!("{season}/{round}/results.json")).await?;
        Ok(Self::races_from_pages(pages).into_iter().next())
    }

    /// Driver championship standings for a season.
    pub async fn driver_standings(&self, season: &str) -> Result<Vec<DriverStanding>> {
        let page = self.fetch_single_resource(&format!("{season}/driverStandings.json")).await?;
        Ok(page.standings_table.map(|table| table.driver_standings()).unwrap_or_default())
    }

    /// Constructor championship standings for a season.
    pub async fn constructor_standings(&self, season: &str) -> Result<Vec<ConstructorStanding>> {
        let page =
            self.fetch_single_resource(&format!("{season}/constructorStandings.json")).await?;
        Ok(page.standings_table.map(|table| table.constructor_standings()).unwrap_or_default())
    }

    /// Fetch everything a season view needs, concurrently and independently.
    ///
    /// One dataset failing (rate limited or otherwise) never blocks the
    /// others from being used; each outcome is tracked on its own.
    pub async fn season_dataset(&self, season: &str) -> SeasonDataset {
        let (results, sprints, qualifying, drivers, constructors) = join!(
            self.season_results(season),
            self.season_sprints(season),
            self.season_qualifying(season),
            self.driver_standings(season),
            self.constructor_standings(season),
        );
        SeasonDataset {
            results: DatasetResult::from_fetch("results", results),
            sprints: DatasetResult::from_fetch("sprints", sprints),
            qualifying: DatasetResult::from_fetch("qualifying", qualifying),
            driver_standings: DatasetResult::from_fetch("driver standings", drivers),
            constructor_standings: DatasetResult::from_fetch("constructor standings", constructors),
        }
    }
}
