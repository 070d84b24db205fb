//! Fetch cache module
//!
//! This module persists raw page bodies keyed by URL so that repeated runs
//! against the same URL set never touch the network twice.
//!
//! The whole mapping is loaded once at startup and rewritten in full on every
//! insert. There is no append log and no locking: a single writer is assumed.

mod store;

pub use store::FetchCache;

use thiserror::Error;

/// Errors raised while persisting the cache
///
/// Loading never fails: a missing or unreadable cache file is treated as an
/// empty cache.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Failed to write cache file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to serialize cache: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result type for cache operations
pub type CacheResult<T> = Result<T, CacheError>;
