//! Short-lived result cache keyed by (type, country, horizon).
//!
//! Entries are superseded on write and never deleted; staleness is judged at
//! read time. The key space is 30 entries at most, so there is no eviction.

use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::DashMap;

use crate::domain::{QueryKey, Quote};

/// Default freshness window.
pub const DEFAULT_TTL: Duration = Duration::from_secs(15 * 60);

#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    pub key: QueryKey,
    pub stored_at: DateTime<Utc>,
    pub payload: Quote,
}

/// Store the pipeline reads through; swap in a fake for tests.
pub trait QuoteCache: Send + Sync {
    /// A fresh entry for `key`, or `None` on miss or staleness.
    fn get(&self, key: &QueryKey) -> Option<CacheEntry>;

    /// Store `payload`, superseding any previous entry for `key`.
    fn put(&self, key: QueryKey, payload: Quote);
}

/// Process-lifetime in-memory cache.
///
/// `DashMap` gives per-shard atomic insert, so concurrent writers for the
/// same key both succeed and the last one wins. Concurrent misses are not
/// coalesced.
pub struct MemoryCache {
    entries: DashMap<QueryKey, CacheEntry>,
    ttl: chrono::Duration,
}

impl MemoryCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl: chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::MAX),
        }
    }

    pub fn get_at(&self, key: &QueryKey, now: DateTime<Utc>) -> Option<CacheEntry> {
        let entry = self.entries.get(key)?;
        if now - entry.stored_at < self.ttl {
            Some(entry.clone())
        } else {
            None
        }
    }

    pub fn put_at(&self, key: QueryKey, payload: Quote, now: DateTime<Utc>) {
        self.entries.insert(
            key,
            CacheEntry {
                key,
                stored_at: now,
                payload,
            },
        );
    }
}

#[cfg(test)]
impl MemoryCache {
    /// Number of keys ever stored (fresh or not).
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl QuoteCache for MemoryCache {
    fn get(&self, key: &QueryKey) -> Option<CacheEntry> {
        self.get_at(key, Utc::now())
    }

    fn put(&self, key: QueryKey, payload: Quote) {
        self.put_at(key, payload, Utc::now());
    }
}
