//! Read-through response cache
//!
//! Response bodies are cached in the key-value store under keys derived from
//! the full request (endpoint plus query parameters), wrapped with an expiry
//! stamp. The TTL depends on the requested season: current and future
//! seasons still change and expire quickly, strictly past seasons are
//! immutable history and live for a day, and requests whose season cannot be
//! determined get a conservative middle ground.
//!
//! Expired entries are kept in place rather than evicted: a stale body is
//! the fallback of choice when the provider rate-limits a refresh.

use std::sync::Arc;

use chrono::{DateTime, Datelike, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::store::KeyValueStore;

/// TTL in seconds for current or future seasons, still accumulating results.
pub const TTL_CURRENT_SEASON_SECS: i64 = 2 * 60;
/// TTL in seconds for strictly past seasons.
pub const TTL_PAST_SEASON_SECS: i64 = 24 * 60 * 60;
/// TTL in seconds when the season cannot be determined from the request.
pub const TTL_UNKNOWN_SEASON_SECS: i64 = 10 * 60;

/// One cached response body with its expiry stamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
    pub expires_at: DateTime<Utc>,
    pub data: String,
}

impl CacheEntry {
    /// Wrap a response body with an expiry `ttl` from `now`.
    pub fn new(data: String, ttl: Duration, now: DateTime<Utc>) -> Self {
        Self { expires_at: now + ttl, data }
    }

    /// Whether the entry has expired as of `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

/// Outcome of a cache lookup.
#[derive(Debug, Clone)]
pub enum CacheLookup {
    /// Entry present and within its TTL.
    Fresh(String),
    /// Entry present but expired; usable as a rate-limit fallback.
    Stale(String),
    /// No entry stored.
    Miss,
}

/// Derive the season a request is about from its endpoint path.
///
/// Provider endpoints lead with the season (`2024/results.json`,
/// `2024.json`); anything else (`seasons.json`) has no single season.
pub fn season_hint(endpoint: &str) -> Option<i32> {
    let segment = endpoint.split(['/', '?', '.']).next()?;
    if segment.len() == 4 && segment.chars().all(|c| c.is_ascii_digit()) {
        segment.parse().ok()
    } else {
        None
    }
}

/// TTL for a request about `season`, evaluated against `now`'s year.
pub fn ttl_for_season(season: Option<i32>, now: DateTime<Utc>) -> Duration {
    let seconds = match season {
        Some(year) if year >= now.year() => TTL_CURRENT_SEASON_SECS,
        Some(_) => TTL_PAST_SEASON_SECS,
        None => TTL_UNKNOWN_SEASON_SECS,
    };
    Duration::seconds(seconds)
}

/// Read-through cache over the injected key-value store.
///
/// Storage failures never propagate: a failed read degrades to a miss and a
/// failed write leaves the previous entry intact, both logged.
pub struct ResponseCache {
    store: Arc<dyn KeyValueStore>,
}

impl ResponseCache {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Cache key for a request path including its query string.
    pub fn cache_key(endpoint: &str) -> String {
        format!("cache:{endpoint}")
    }

    /// Look up the cached body for `endpoint`, classifying freshness.
    pub fn lookup(&self, endpoint: &str, now: DateTime<Utc>) -> CacheLookup {
        let key = Self::cache_key(endpoint);
        let raw = match self.store.get(&key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return CacheLookup::Miss,
            Err(err) => {
                warn!(endpoint, error = %err, "Cache read failed, treating as miss");
                return CacheLookup::Miss;
            }
        };
        match serde_json::from_str::<CacheEntry>(&raw) {
            Ok(entry) if entry.is_expired_at(now) => CacheLookup::Stale(entry.data),
            Ok(entry) => CacheLookup::Fresh(entry.data),
            Err(err) => {
                warn!(endpoint, error = %err, "Corrupt cache entry, treating as miss");
                CacheLookup::Miss
            }
        }
    }

    /// Store a fresh body for `endpoint` with a season-appropriate TTL.
    pub fn put(&self, endpoint: &str, body: &str, now: DateTime<Utc>) {
        let ttl = ttl_for_season(season_hint(endpoint), now);
        let entry = CacheEntry::new(body.to_string(), ttl, now);
        let serialized = match serde_json::to_string(&entry) {
            Ok(serialized) => serialized,
            Err(err) => {
                warn!(endpoint, error = %err, "Cache entry serialization failed");
                return;
            }
        };
        if let Err(err) = self.store.set(&Self::cache_key(endpoint), &serialized) {
            warn!(endpoint, error = %err, "Cache write failed, keeping previous entry");
        } else {
            debug!(endpoint, ttl_seconds = ttl.num_seconds(), "Cached response");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn now() -> DateTime<Utc> {
        "2026-08-06T12:00:00Z".parse().unwrap()
    }

    #[test]
    fn season_hint_reads_leading_year() {
        assert_eq!(season_hint("2024/results.json?limit=100&offset=0"), Some(2024));
        assert_eq!(season_hint("2024.json"), Some(2024));
        assert_eq!(season_hint("1950/1/results.json"), Some(1950));
        assert_eq!(season_hint("seasons.json"), None);
    }

    #[test]
    fn ttl_depends_on_season_recency() {
        let now = now();
        assert_eq!(ttl_for_season(Some(2026), now), Duration::seconds(TTL_CURRENT_SEASON_SECS));
        assert_eq!(ttl_for_season(Some(2027), now), Duration::seconds(TTL_CURRENT_SEASON_SECS));
        assert_eq!(ttl_for_season(Some(2021), now), Duration::seconds(TTL_PAST_SEASON_SECS));
        assert_eq!(ttl_for_season(None, now), Duration::seconds(TTL_UNKNOWN_SEASON_SECS));
    }

    #[test]
    fn lookup_classifies_fresh_stale_miss() {
        let store = Arc::new(MemoryStore::new());
        let cache = ResponseCache::new(store.clone());
        let now = now();

        assert!(matches!(cache.lookup("2021/results.json", now), CacheLookup::Miss));

        cache.put("2021/results.json", "body", now);
        assert!(matches!(cache.lookup("2021/results.json", now), CacheLookup::Fresh(_)));

        let later = now + Duration::seconds(TTL_PAST_SEASON_SECS + 1);
        match cache.lookup("2021/results.json", later) {
            CacheLookup::Stale(body) => assert_eq!(body, "body"),
            other => panic!("expected stale entry, got {other:?}"),
        }
    }

    #[test]
    fn corrupt_entries_degrade_to_miss() {
        let store = Arc::new(MemoryStore::new());
        store.set(&ResponseCache::cache_key("2021/results.json"), "not json").unwrap();
        let cache = ResponseCache::new(store);
        assert!(matches!(cache.lookup("2021/results.json", now()), CacheLookup::Miss));
    }
}
