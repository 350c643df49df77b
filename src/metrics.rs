//! Cache metrics reporting.
//!
//! A single counters struct replaces the teacher's per-algorithm metrics
//! hierarchy (`CoreCacheMetrics` plus an `LruCacheMetrics`/`LfuCacheMetrics`/…
//! wrapper per algorithm): there is only one algorithm here, so
//! [`CacheMetrics`] carries the core counters directly. The `BTreeMap`
//! reporting shape is kept as-is, for the same reason the teacher chose it —
//! deterministic key ordering makes snapshots diffable in logs and tests.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Point-in-time counters describing a [`Governor`](crate::governor::Governor)'s
/// activity.
#[derive(Debug, Default, Clone, Copy)]
pub struct CacheMetrics {
    /// Total lookups performed, hit or miss.
    pub requests: u64,
    /// Lookups that found a live entry.
    pub hits: u64,
    /// Bytes served directly from cached entries.
    pub bytes_served_from_cache: u64,
    /// Bytes written into the cache via `insert`.
    pub bytes_written_to_cache: u64,
    /// Entries evicted to stay within the byte budget.
    pub evictions: u64,
    /// Bytes currently held across all live entries.
    pub bytes_in_use: u64,
}

impl CacheMetrics {
    /// Reports the hit ratio as a value in `[0.0, 1.0]`, or `0.0` if there
    /// have been no requests yet.
    pub fn hit_ratio(&self) -> f64 {
        if self.requests == 0 {
            0.0
        } else {
            self.hits as f64 / self.requests as f64
        }
    }

    /// Renders the counters as a `BTreeMap` for deterministic, diffable
    /// reporting (e.g. structured log fields).
    pub fn to_btreemap(&self) -> BTreeMap<String, f64> {
        let mut map = BTreeMap::new();
        map.insert("requests".to_string(), self.requests as f64);
        map.insert("hits".to_string(), self.hits as f64);
        map.insert("hit_ratio".to_string(), self.hit_ratio());
        map.insert(
            "bytes_served_from_cache".to_string(),
            self.bytes_served_from_cache as f64,
        );
        map.insert(
            "bytes_written_to_cache".to_string(),
            self.bytes_written_to_cache as f64,
        );
        map.insert("evictions".to_string(), self.evictions as f64);
        map.insert("bytes_in_use".to_string(), self.bytes_in_use as f64);
        map
    }
}

/// Atomic counters a [`Governor`](crate::governor::Governor) updates as it
/// serves requests; never blocks a reader or writer to do so.
#[derive(Debug, Default)]
pub struct MetricsRecorder {
    requests: AtomicU64,
    hits: AtomicU64,
    bytes_served_from_cache: AtomicU64,
    bytes_written_to_cache: AtomicU64,
}

impl MetricsRecorder {
    /// Records a lookup and whether it hit.
    pub fn record_lookup(&self, hit: bool, bytes: u64) {
        self.requests.fetch_add(1, Ordering::Relaxed);
        if hit {
            self.hits.fetch_add(1, Ordering::Relaxed);
            self.bytes_served_from_cache
                .fetch_add(bytes, Ordering::Relaxed);
        }
    }

    /// Records an insert of `bytes` bytes into the cache.
    pub fn record_insert(&self, bytes: u64) {
        self.bytes_written_to_cache
            .fetch_add(bytes, Ordering::Relaxed);
    }

    /// Snapshots the recorder into a [`CacheMetrics`], filling in the
    /// store-derived fields (`evictions`, `bytes_in_use`) from the caller.
    pub fn snapshot(&self, evictions: u64, bytes_in_use: u64) -> CacheMetrics {
        CacheMetrics {
            requests: self.requests.load(Ordering::Relaxed),
            hits: self.hits.load(Ordering::Relaxed),
            bytes_served_from_cache: self.bytes_served_from_cache.load(Ordering::Relaxed),
            bytes_written_to_cache: self.bytes_written_to_cache.load(Ordering::Relaxed),
            evictions,
            bytes_in_use,
        }
    }
}
