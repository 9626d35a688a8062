//! Rate limiter port

use std::time::Duration;

/// Outcome of recording one request against a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
    pub allowed: bool,
    /// Configured maximum per window
    pub limit: u32,
    /// Requests still available in the current window
    pub remaining: u32,
    /// Time until the oldest recorded request leaves the window
    pub reset_after: Duration,
}

pub trait RateLimiter: Send + Sync {
    /// Record a request for `key` if it fits in the window.
    /// Rejected requests are not recorded.
    fn check(&self, key: &str) -> RateLimitDecision;

    /// Forget keys with no requests left in the window; returns how many.
    fn purge_idle(&self) -> usize;
}
