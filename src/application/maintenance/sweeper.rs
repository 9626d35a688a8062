//! Periodic sweep of expired cache entries and idle rate-limit windows.
//!
//! Runs in a `tokio::spawn` loop until the shutdown signal fires.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio::time::Duration;
use tracing::{debug, info};

use crate::application::ports::{CacheStore, RateLimiter};
use crate::shared::shutdown::ShutdownSignal;

/// Start the sweeper. `limiter` is `None` when rate limiting is disabled.
pub fn start_state_sweeper(
    cache: Arc<dyn CacheStore>,
    limiter: Option<Arc<dyn RateLimiter>>,
    shutdown: ShutdownSignal,
    interval_secs: u64,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(interval = interval_secs, "🧹 State sweeper started");

        let mut interval = tokio::time::interval(Duration::from_secs(interval_secs.max(1)));

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    sweep(cache.as_ref(), limiter.as_deref()).await;
                }
                _ = shutdown.wait() => {
                    info!("🧹 State sweeper shutting down");
                    break;
                }
            }
        }
    })
}

async fn sweep(cache: &dyn CacheStore, limiter: Option<&dyn RateLimiter>) {
    let expired = cache.purge_expired().await;
    let idle = limiter.map(|l| l.purge_idle()).unwrap_or(0);

    if expired > 0 || idle > 0 {
        debug!(
            expired_cache_entries = expired,
            idle_rate_limit_keys = idle,
            "Swept stale state"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    use crate::infrastructure::{InMemoryCache, SlidingWindowRateLimiter};

    #[tokio::test]
    async fn sweep_purges_expired_entries() {
        let cache = InMemoryCache::new(Duration::ZERO);
        cache.set_at("k", "v".into(), Instant::now());
        let limiter = SlidingWindowRateLimiter::new(5, Duration::ZERO);
        limiter.check("user:1:meals");

        sweep(&cache, Some(&limiter)).await;

        assert!(cache.is_empty());
        assert_eq!(limiter.tracked_keys(), 0);
    }

    #[tokio::test]
    async fn task_stops_on_shutdown() {
        let shutdown = ShutdownSignal::new();
        let handle = start_state_sweeper(
            Arc::new(InMemoryCache::default()),
            None,
            shutdown.clone(),
            3600,
        );

        shutdown.trigger();
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("sweeper should stop after shutdown")
            .unwrap();
    }
}
