//! TTL-checked cache service

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::clock::{Clock, SystemClock};
use super::storage::{CacheStore, MemoryStore, SqliteStore};
use super::{CACHE_TTL, CacheCategory};
use crate::error::CacheError;

/// Stored form of a cached listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    pub data: Vec<T>,
    /// Epoch milliseconds at write time
    pub timestamp: i64,
}

#[derive(Serialize)]
struct EntryRef<'a, T> {
    data: &'a [T],
    timestamp: i64,
}

/// Just the write time, for checks that must not decode the payload
#[derive(Deserialize)]
struct EntryStamp {
    timestamp: i64,
}

/// Cache of listings keyed by [`CacheCategory`]
pub struct LocalCache {
    store: Box<dyn CacheStore>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
}

impl LocalCache {
    pub fn new(store: Box<dyn CacheStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            ttl: CACHE_TTL,
        }
    }

    /// Persistent cache at the default location, falling back to a
    /// session-only store when the database cannot be opened.
    pub fn open_default() -> Self {
        let store: Box<dyn CacheStore> = match SqliteStore::open() {
            Ok(store) => Box::new(store),
            Err(e) => {
                warn!("Persistent cache unavailable, using memory: {}", e);
                Box::new(MemoryStore::new())
            }
        };
        Self::new(store, Arc::new(SystemClock))
    }

    /// Where entries are persisted, if anywhere
    pub fn location(&self) -> Option<&std::path::Path> {
        self.store.location()
    }

    fn is_fresh(&self, timestamp: i64) -> bool {
        let age = self.clock.now_millis().saturating_sub(timestamp);
        age < self.ttl.as_millis() as i64
    }

    /// Cached payload of `category`, while still valid.
    ///
    /// Stale or undecodable entries are removed.
    pub fn get<T: DeserializeOwned>(&self, category: CacheCategory) -> Option<Vec<T>> {
        let key = category.key();
        let payload = match self.store.load(key) {
            Ok(Some(payload)) => payload,
            Ok(None) => return None,
            Err(e) => {
                warn!("Cache read failed for {}: {}", key, e);
                return None;
            }
        };

        match serde_json::from_str::<CacheEntry<T>>(&payload) {
            Ok(entry) if self.is_fresh(entry.timestamp) => Some(entry.data),
            Ok(_) => {
                debug!("Cache entry {} expired", key);
                self.discard(key);
                None
            }
            Err(e) => {
                warn!("Discarding unreadable cache entry {}: {}", key, e);
                self.discard(key);
                None
            }
        }
    }

    fn discard(&self, key: &str) {
        if let Err(e) = self.store.remove(key) {
            warn!("Failed to remove cache entry {}: {}", key, e);
        }
    }

    /// Store `data` under `category`, stamped with the current time.
    pub fn put<T: Serialize>(&self, category: CacheCategory, data: &[T]) -> Result<(), CacheError> {
        let entry = EntryRef {
            data,
            timestamp: self.clock.now_millis(),
        };
        let payload = serde_json::to_string(&entry)?;
        self.store.store(category.key(), &payload)
    }

    /// Remove every category. Returns how many entries existed.
    pub fn invalidate_all(&self) -> Result<usize, CacheError> {
        let mut removed = 0;
        for category in CacheCategory::ALL {
            if self.store.remove(category.key())? {
                removed += 1;
            }
        }
        Ok(removed)
    }

    /// Validity of every category. Reads only; nothing is evicted.
    pub fn status(&self) -> BTreeMap<CacheCategory, bool> {
        CacheCategory::ALL
            .into_iter()
            .map(|category| {
                let valid = self
                    .store
                    .load(category.key())
                    .ok()
                    .flatten()
                    .and_then(|payload| serde_json::from_str::<EntryStamp>(&payload).ok())
                    .is_some_and(|stamp| self.is_fresh(stamp.timestamp));
                (category, valid)
            })
            .collect()
    }
}
