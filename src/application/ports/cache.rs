//! Cache port — key/value store with a fixed time-to-live
//!
//! Values are opaque serialized payloads. The TTL is a property of the
//! store, so every `set` restarts the entry's lifetime.

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache backend unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait CacheStore: Send + Sync {
    /// The stored value, or `None` when absent or expired.
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Store `value` under `key`; last write wins.
    async fn set(&self, key: &str, value: String) -> Result<(), CacheError>;

    /// Drop expired entries and return how many were removed.
    async fn purge_expired(&self) -> usize;
}
