//! Key-value storage capability.
//!
//! Both the response cache and the rating store persist through this trait,
//! so the aggregation logic can be exercised against an in-memory backend
//! instead of real browser storage. Backends translate their own failure
//! types (quota exceeded, storage disabled) into [`StatsError::Storage`] via
//! `anyhow`.
//!
//! The trait is deliberately synchronous: read-modify-write sequences on a
//! key must complete without a suspension point in between, otherwise a
//! second save to the same season could interleave.

use std::collections::HashMap;
use std::sync::RwLock;

use anyhow::anyhow;

use crate::error::{Result, StatsError};

/// Capability interface over a string key-value store.
///
/// Models the subset of browser local storage the crate needs: get, set,
/// remove and key enumeration. Values are JSON-serialized by callers.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove the value stored under `key`. Removing a missing key is not an
    /// error.
    fn remove(&self, key: &str) -> Result<()>;

    /// Enumerate every key currently present.
    fn keys(&self) -> Result<Vec<String>>;
}

/// In-memory store used in tests and non-browser embedders.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_poisoned(operation: &str) -> StatsError {
        StatsError::storage(operation.to_string(), anyhow!("store lock poisoned"))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.read().map_err(|_| Self::lock_poisoned("get"))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.write().map_err(|_| Self::lock_poisoned("set"))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.write().map_err(|_| Self::lock_poisoned("remove"))?;
        entries.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        let entries = self.entries.read().map_err(|_| Self::lock_poisoned("keys"))?;
        Ok(entries.keys().cloned().collect())
    }
}
