use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use std::{
    collections::HashMap,
    fmt::Display,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

use crate::models::{CombinedResults, DetailsRecord, MediaType, SearchOptions};

use super::clock::{Clock, SystemClock};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    Search { query: String, options: SearchOptions },
    Details { media_type: MediaType, id: String },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchKeyRepr<'a> {
    query: &'a str,
    #[serde(flatten)]
    options: &'a SearchOptions,
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheKey::Search { query, options } => {
                let repr = serde_json::to_string(&SearchKeyRepr { query, options })
                    .map_err(|_| std::fmt::Error)?;
                f.write_str(&repr)
            }
            CacheKey::Details { media_type, id } => write!(f, "details-{}-{}", media_type, id),
        }
    }
}

/// Values the gateway keeps in the cache
#[derive(Debug, Clone, PartialEq)]
pub enum CachedValue {
    Search(Arc<CombinedResults>),
    Details(Arc<DetailsRecord>),
}

#[derive(Debug, Clone)]
struct CacheEntry {
    value: CachedValue,
    expires_at: DateTime<Utc>,
}

/// Every this many inserts, expired entries are swept from the map
const SWEEP_EVERY: usize = 64;

/// In-process response cache with per-entry deadlines
///
/// Entries are never updated in place; an insert replaces the whole entry.
/// Expiry is checked on read, so a reader sees either a live value or a miss.
/// Keys that are never read again are dropped by the periodic sweep on insert.
pub struct ResponseCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    inserts: AtomicUsize,
    clock: Arc<dyn Clock>,
}

/// Deadline `ttl` seconds after `now`; TTLs too large to represent never expire
fn deadline(now: DateTime<Utc>, ttl: u64) -> DateTime<Utc> {
    i64::try_from(ttl)
        .ok()
        .and_then(Duration::try_seconds)
        .and_then(|ttl| now.checked_add_signed(ttl))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

impl ResponseCache {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            inserts: AtomicUsize::new(0),
            clock,
        }
    }

    /// Retrieves a live value by key, evicting it if its deadline has passed
    pub fn get(&self, key: &CacheKey) -> Option<CachedValue> {
        let key = key.to_string();
        let now = self.clock.now();

        {
            let entries = self.entries.read();
            match entries.get(&key) {
                Some(entry) if now < entry.expires_at => return Some(entry.value.clone()),
                Some(_) => {}
                None => return None,
            }
        }

        let mut entries = self.entries.write();
        if entries.get(&key).is_some_and(|e| now >= e.expires_at) {
            entries.remove(&key);
            tracing::debug!(key = %key, "Cache entry expired");
        }
        None
    }

    /// Stores a value that stays visible for `ttl` seconds
    pub fn insert(&self, key: &CacheKey, value: CachedValue, ttl: u64) {
        let now = self.clock.now();
        let expires_at = deadline(now, ttl);
        let sweep = (self.inserts.fetch_add(1, Ordering::Relaxed) + 1) % SWEEP_EVERY == 0;

        let mut entries = self.entries.write();
        if sweep {
            let before = entries.len();
            entries.retain(|_, entry| now < entry.expires_at);
            tracing::debug!(removed = before - entries.len(), "Swept expired cache entries");
        }
        entries.insert(key.to_string(), CacheEntry { value, expires_at });
    }

    /// Removes an entry; absent keys are ignored
    pub fn remove(&self, key: &CacheKey) {
        self.entries.write().remove(&key.to_string());
    }

    /// Drops every expired entry and returns how many were removed
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, entry| now < entry.expires_at);
        before - entries.len()
    }

    /// Number of stored entries, including ones not yet purged
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
