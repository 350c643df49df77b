//! Error types for the cache store.

use thiserror::Error;

/// Failure modes surfaced by [`CacheStore`](crate::store::CacheStore) and
/// [`Governor`](crate::governor::Governor).
#[derive(Debug, Error)]
pub enum CacheError {
    /// The response is larger than the store's per-object cap and must not
    /// be cached at all; the caller should still relay it to the client.
    #[error("object of {size} bytes exceeds the {limit} byte per-object cap")]
    ObjectTooLarge {
        /// Size of the rejected response, in bytes.
        size: u64,
        /// The configured per-object cap.
        limit: u64,
    },
}
