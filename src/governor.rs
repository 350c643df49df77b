//! The concurrency governor: readers-writer access around a [`CacheStore`].
//!
//! This is a direct translation of the classic readers-preference
//! readers/writers protocol (Silberschatz et al., the "first
//! readers-writers problem") onto three primitives:
//!
//! - `reader_count_mx` — a short-held mutex guarding the reader count.
//! - `rw_write` — a lock held for the *duration* of a reader cohort, not a
//!   single call: the first reader to arrive locks it, the last reader to
//!   leave unlocks it. A writer takes it directly.
//! - an atomic timestamp on each entry standing in for `lru_mx`, so no
//!   reader ever blocks another reader merely to record an access.
//!
//! The first-reader/last-reader handoff is asymmetric across calls and
//! cannot be expressed with a scoped guard, so `rw_write` is a
//! [`parking_lot::RawMutex`] driven directly through [`lock_api::RawMutex`]'s
//! `lock`/`unlock` rather than through `parking_lot::Mutex`.

use std::cell::UnsafeCell;
use std::sync::Arc;

use lock_api::RawMutex as _;
use parking_lot::{Mutex, RawMutex};

use crate::config::CacheConfig;
use crate::error::CacheError;
use crate::metrics::{CacheMetrics, MetricsRecorder};
use crate::store::CacheStore;

/// Thread-safe front door for [`CacheStore`], implementing the reader/writer
/// protocol the request pipeline relies on: any number of lookups may run
/// concurrently, but an insert has exclusive access while it runs.
pub struct Governor {
    store: UnsafeCell<CacheStore>,
    reader_count: Mutex<usize>,
    rw_write: RawMutex,
    metrics: MetricsRecorder,
}

// SAFETY: all access to `store` happens either under `rw_write` held
// exclusively (writers, and the first/last reader in a cohort) or while the
// cohort's write-lock is known to be held on the reader's behalf (readers
// 2..n, who observe `reader_count > 0` under `reader_count`'s own mutex
// before touching the store). No two threads ever dereference the
// `UnsafeCell` for a write and a read (or two writes) at the same time.
unsafe impl Sync for Governor {}

impl Governor {
    /// Creates a governor around a freshly constructed, empty store.
    pub fn new(config: CacheConfig) -> Self {
        Self {
            store: UnsafeCell::new(CacheStore::new(config)),
            reader_count: Mutex::new(0),
            rw_write: RawMutex::INIT,
            metrics: MetricsRecorder::default(),
        }
    }

    /// Looks up `url` under the reader-cohort protocol. Any number of
    /// lookups may proceed concurrently with each other.
    pub fn lookup(&self, url: &str) -> Option<Arc<[u8]>> {
        self.enter_as_reader();
        // SAFETY: see the `unsafe impl Sync` note above.
        let result = unsafe { (*self.store.get()).lookup(url) };
        self.leave_as_reader();
        let bytes = result.as_ref().map_or(0, |b| b.len() as u64);
        self.metrics.record_lookup(result.is_some(), bytes);
        result
    }

    /// Inserts `bytes` under `url` with exclusive access, evicting as
    /// needed. See [`CacheStore::insert`] for the eviction algorithm and
    /// error semantics.
    pub fn insert(&self, url: Arc<str>, bytes: Arc<[u8]>) -> Result<(), CacheError> {
        let size = bytes.len() as u64;
        self.rw_write.lock();
        // SAFETY: `rw_write` is held exclusively for the duration of the
        // call, and no reader cohort can be concurrently active while it is
        // held.
        let result = unsafe { (*self.store.get()).insert(url, bytes) };
        // SAFETY: this thread is the one that locked `rw_write` above.
        unsafe { self.rw_write.unlock() };
        if result.is_ok() {
            self.metrics.record_insert(size);
        }
        result
    }

    /// Bytes currently held across all entries.
    pub fn used(&self) -> u64 {
        self.enter_as_reader();
        // SAFETY: see the `unsafe impl Sync` note above.
        let used = unsafe { (*self.store.get()).used() };
        self.leave_as_reader();
        used
    }

    /// The largest single response eligible for caching, as configured.
    /// This never changes after construction, but is still read under the
    /// reader protocol for consistency with the rest of the store's state.
    pub fn object_max(&self) -> u64 {
        self.enter_as_reader();
        // SAFETY: see the `unsafe impl Sync` note above.
        let object_max = unsafe { (*self.store.get()).object_max() };
        self.leave_as_reader();
        object_max
    }

    /// A point-in-time snapshot of this governor's counters.
    pub fn metrics(&self) -> CacheMetrics {
        self.enter_as_reader();
        // SAFETY: see the `unsafe impl Sync` note above.
        let (evictions, used) =
            unsafe { ((*self.store.get()).evictions(), (*self.store.get()).used()) };
        self.leave_as_reader();
        self.metrics.snapshot(evictions, used)
    }

    fn enter_as_reader(&self) {
        let mut count = self.reader_count.lock();
        *count += 1;
        if *count == 1 {
            self.rw_write.lock();
        }
    }

    fn leave_as_reader(&self) {
        let mut count = self.reader_count.lock();
        *count -= 1;
        if *count == 0 {
            // SAFETY: this thread was the first reader in the cohort and
            // locked `rw_write` in `enter_as_reader`; it is also the last
            // reader to leave, so it is the one responsible for unlocking.
            unsafe { self.rw_write.unlock() };
        }
    }
}

impl std::fmt::Debug for Governor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Governor")
            .field("used", &self.used())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn bytes(n: usize) -> Arc<[u8]> {
        Arc::from(vec![0u8; n].into_boxed_slice())
    }

    #[test]
    fn insert_then_lookup_round_trips() {
        let governor = Governor::new(CacheConfig::new(1024, 512));
        governor.insert(Arc::from("http://example.com/"), bytes(10)).unwrap();
        assert_eq!(governor.lookup("http://example.com/").unwrap().len(), 10);
    }

    #[test]
    fn concurrent_readers_and_writers_do_not_corrupt_the_budget() {
        const NUM_THREADS: usize = 8;
        let governor = Arc::new(Governor::new(CacheConfig::new(4096, 512)));

        let mut handles = Vec::with_capacity(NUM_THREADS);
        for i in 0..NUM_THREADS {
            let governor = Arc::clone(&governor);
            handles.push(thread::spawn(move || {
                let url: Arc<str> = Arc::from(format!("http://example.com/{i}"));
                for _ in 0..50 {
                    governor.insert(Arc::clone(&url), bytes(64)).unwrap();
                    let _ = governor.lookup(&url);
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        assert!(governor.used() <= 4096);
    }
}
