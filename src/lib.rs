#![doc = include_str!("../README.md")]
//!
//! ---
//!
//! # Module Map
//!
//! | Module | Responsibility |
//! |---|---|
//! | [`config`] | Sizing knobs: total byte budget, per-object cap |
//! | [`entry`] | A single cached response: URL, bytes, last-access timestamp |
//! | [`store`] | The unsynchronized `HashMap` + eviction algorithm |
//! | [`governor`] | The readers-writer protocol wrapped around [`store::CacheStore`] |
//! | [`error`] | `CacheError` for conditions the caller must handle |
//! | [`metrics`] | Counters for request/hit/eviction reporting |
//!
//! # Example
//!
//! ```
//! use proxy_cache::config::CacheConfig;
//! use proxy_cache::governor::Governor;
//! use std::sync::Arc;
//!
//! let governor = Governor::new(CacheConfig::default());
//! governor
//!     .insert(Arc::from("http://example.com/"), Arc::from(b"hello".as_slice()))
//!     .unwrap();
//! assert_eq!(&*governor.lookup("http://example.com/").unwrap(), b"hello");
//! ```

/// Cache sizing configuration (total budget, per-object cap).
pub mod config;

/// The cached-response entry type.
pub mod entry;

/// Error types returned by the cache store and governor.
pub mod error;

/// The concurrency governor implementing the reader/writer protocol.
pub mod governor;

/// Request/hit/eviction counters.
pub mod metrics;

/// The bounded, LRU-evicting cache store.
pub mod store;

pub use config::CacheConfig;
pub use entry::CacheEntry;
pub use error::CacheError;
pub use governor::Governor;
pub use metrics::CacheMetrics;
pub use store::CacheStore;
