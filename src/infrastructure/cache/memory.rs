//! In-process TTL cache backed by `DashMap`.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;

use crate::application::ports::{CacheError, CacheStore};

struct CacheEntry {
    value: String,
    expires_at: Instant,
}

/// Default lifetime of a cached analytics payload.
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

pub struct InMemoryCache {
    entries: DashMap<String, CacheEntry>,
    ttl: Duration,
}

impl InMemoryCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get_at(&self, key: &str, now: Instant) -> Option<String> {
        let expired = match self.entries.get(key) {
            Some(entry) if now < entry.expires_at => return Some(entry.value.clone()),
            Some(_) => true,
            None => false,
        };

        if expired {
            self.entries.remove_if(key, |_, e| now >= e.expires_at);
        }
        None
    }

    pub fn set_at(&self, key: &str, value: String, now: Instant) {
        self.entries.insert(
            key.to_string(),
            CacheEntry {
                value,
                expires_at: now + self.ttl,
            },
        );
    }

    pub fn purge_expired_at(&self, now: Instant) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, e| now < e.expires_at);
        before.saturating_sub(self.entries.len())
    }
}

impl Default for InMemoryCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

#[async_trait]
impl CacheStore for InMemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        Ok(self.get_at(key, Instant::now()))
    }

    async fn set(&self, key: &str, value: String) -> Result<(), CacheError> {
        self.set_at(key, value, Instant::now());
        Ok(())
    }

    async fn purge_expired(&self) -> usize {
        self.purge_expired_at(Instant::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_is_served_until_ttl_elapses() {
        let cache = InMemoryCache::new(Duration::from_secs(300));
        let t0 = Instant::now();
        cache.set_at("analytics:daily:1:2024-05-01", "{}".into(), t0);

        assert_eq!(
            cache.get_at("analytics:daily:1:2024-05-01", t0 + Duration::from_secs(299)),
            Some("{}".to_string())
        );
        assert_eq!(
            cache.get_at("analytics:daily:1:2024-05-01", t0 + Duration::from_secs(300)),
            None
        );
        assert!(cache.is_empty());
    }

    #[test]
    fn set_resets_the_ttl_and_last_write_wins() {
        let cache = InMemoryCache::new(Duration::from_secs(10));
        let t0 = Instant::now();
        cache.set_at("k", "first".into(), t0);
        cache.set_at("k", "second".into(), t0 + Duration::from_secs(8));

        assert_eq!(
            cache.get_at("k", t0 + Duration::from_secs(15)),
            Some("second".to_string())
        );
    }

    #[test]
    fn purge_removes_only_expired_entries() {
        let cache = InMemoryCache::new(Duration::from_secs(10));
        let t0 = Instant::now();
        cache.set_at("old", "a".into(), t0);
        cache.set_at("new", "b".into(), t0 + Duration::from_secs(5));

        assert_eq!(cache.purge_expired_at(t0 + Duration::from_secs(12)), 1);
        assert_eq!(cache.len(), 1);
        assert_eq!(
            cache.get_at("new", t0 + Duration::from_secs(12)),
            Some("b".to_string())
        );
    }

    #[tokio::test]
    async fn missing_key_is_absent() {
        let cache = InMemoryCache::default();
        assert_eq!(cache.get("nope").await.unwrap(), None);
        assert_eq!(cache.ttl(), DEFAULT_TTL);
    }
}
