//! Cached response entry.
//!
//! `CacheEntry` is the unit the store keeps per cached URL. Both `url` and
//! `bytes` are immutable once constructed: a hit clones the `Arc`, never the
//! bytes, and no code path ever mutates a live entry's content. Only
//! `last_access` changes after construction, and it does so through an
//! atomic so a reader never blocks another reader just to record that it
//! looked at the entry.

use core::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// A single cached HTTP response, keyed externally by its URL.
///
/// # Examples
///
/// ```
/// use proxy_cache::entry::CacheEntry;
/// use std::sync::Arc;
///
/// let entry = CacheEntry::new(Arc::from("http://example.com/"), Arc::from(b"hello".as_slice()));
/// assert_eq!(entry.size(), 5);
/// ```
pub struct CacheEntry {
    url: Arc<str>,
    bytes: Arc<[u8]>,
    last_access: AtomicU64,
}

impl CacheEntry {
    /// Builds a new entry, stamping its initial `last_access` to now.
    pub fn new(url: Arc<str>, bytes: Arc<[u8]>) -> Self {
        Self {
            url,
            bytes,
            last_access: AtomicU64::new(now_millis()),
        }
    }

    /// The URL this entry was cached under.
    pub fn url(&self) -> &Arc<str> {
        &self.url
    }

    /// A cheap, refcount-bump clone of the cached bytes.
    pub fn bytes(&self) -> Arc<[u8]> {
        Arc::clone(&self.bytes)
    }

    /// Size in bytes of the cached response, as charged against the cache's
    /// byte budget.
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Milliseconds since `UNIX_EPOCH` at which this entry was last read.
    pub fn last_access(&self) -> u64 {
        self.last_access.load(Ordering::Relaxed)
    }

    /// Records a read of this entry at the current time.
    pub fn touch(&self) {
        self.last_access.store(now_millis(), Ordering::Relaxed);
    }
}

impl fmt::Debug for CacheEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheEntry")
            .field("url", &self.url)
            .field("size", &self.bytes.len())
            .field("last_access", &self.last_access())
            .finish()
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
