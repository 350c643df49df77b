//! The bounded, URL-keyed cache store.
//!
//! `CacheStore` itself carries no internal synchronization: callers that need
//! concurrent access wrap it in a [`Governor`](crate::governor::Governor),
//! which enforces the reader/writer protocol around the operations this
//! module defines. That split keeps the eviction algorithm testable in
//! isolation from the locking protocol.

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::CacheConfig;
use crate::entry::CacheEntry;
use crate::error::CacheError;

/// A bounded, LRU-evicting store of cached HTTP responses.
///
/// Keys are URLs (`Arc<str>`), values are [`CacheEntry`]. The store never
/// holds two entries under the same key, and never exceeds its configured
/// byte budget.
#[derive(Debug)]
pub struct CacheStore {
    config: CacheConfig,
    entries: HashMap<Arc<str>, Arc<CacheEntry>>,
    used: u64,
    evictions: u64,
}

impl CacheStore {
    /// Creates an empty store governed by `config`.
    pub fn new(config: CacheConfig) -> Self {
        Self {
            config,
            entries: HashMap::new(),
            used: 0,
            evictions: 0,
        }
    }

    /// Total bytes currently held across all entries.
    pub fn used(&self) -> u64 {
        self.used
    }

    /// Number of entries evicted over the lifetime of this store.
    pub fn evictions(&self) -> u64 {
        self.evictions
    }

    /// The largest single response eligible for caching.
    pub fn object_max(&self) -> u64 {
        self.config.object_max()
    }

    /// Number of entries currently held.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store currently holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Looks up `url`, touching the entry's last-access timestamp on a hit.
    ///
    /// Returns a cheap `Arc` clone of the cached bytes so the caller can
    /// relay them without holding any lock on the store itself.
    pub fn lookup(&self, url: &str) -> Option<Arc<[u8]>> {
        let entry = self.entries.get(url)?;
        entry.touch();
        Some(entry.bytes())
    }

    /// Inserts `bytes` under `url`, evicting least-recently-used entries as
    /// needed to stay within the configured byte budget.
    ///
    /// Returns [`CacheError::ObjectTooLarge`] without modifying the store if
    /// `bytes` alone exceeds the per-object cap; the caller should still
    /// relay such a response to the client, it is simply never cached.
    pub fn insert(&mut self, url: Arc<str>, bytes: Arc<[u8]>) -> Result<(), CacheError> {
        let size = bytes.len() as u64;
        if size > self.config.object_max() {
            return Err(CacheError::ObjectTooLarge {
                size,
                limit: self.config.object_max(),
            });
        }

        // Replacing an existing entry under the same URL first frees its
        // bytes from the budget, preserving key uniqueness structurally.
        if let Some(old) = self.entries.remove(&url) {
            self.used -= old.size();
        }

        while self.used + size > self.config.capacity() && !self.entries.is_empty() {
            self.evict_one();
        }

        self.used += size;
        self.entries.insert(Arc::clone(&url), Arc::new(CacheEntry::new(url, bytes)));
        Ok(())
    }

    /// Evicts the entry with the oldest `last_access`, scanning every live
    /// entry. This mirrors the reference proxy's linear `find_LRU` scan:
    /// there is no secondary ordering structure to keep consistent on every
    /// hit, only a timestamp compared at eviction time.
    fn evict_one(&mut self) {
        let victim = self
            .entries
            .values()
            .min_by_key(|entry| entry.last_access())
            .map(|entry| Arc::clone(entry.url()));

        if let Some(url) = victim {
            if let Some(entry) = self.entries.remove(&url) {
                self.used -= entry.size();
                self.evictions += 1;
            }
        }
    }
}
