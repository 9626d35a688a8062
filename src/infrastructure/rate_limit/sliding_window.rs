//! Sliding-window log rate limiter.
//!
//! Each key keeps the timestamps of its admitted requests. A request is
//! admitted while fewer than `max_requests` timestamps fall inside the
//! trailing `window`; the window moves with every check rather than
//! resetting on fixed boundaries.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use dashmap::DashMap;

use crate::application::ports::{RateLimitDecision, RateLimiter};

pub struct SlidingWindowRateLimiter {
    windows: DashMap<String, VecDeque<Instant>>,
    max_requests: u32,
    window: Duration,
}

impl SlidingWindowRateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            windows: DashMap::new(),
            max_requests,
            window,
        }
    }

    pub fn tracked_keys(&self) -> usize {
        self.windows.len()
    }

    pub fn check_at(&self, key: &str, now: Instant) -> RateLimitDecision {
        let mut log = self.windows.entry(key.to_string()).or_default();

        while log
            .front()
            .is_some_and(|t| now.duration_since(*t) >= self.window)
        {
            log.pop_front();
        }

        let used = log.len() as u32;
        if used >= self.max_requests {
            return RateLimitDecision {
                allowed: false,
                limit: self.max_requests,
                remaining: 0,
                reset_after: self.until_oldest_expires(&log, now),
            };
        }

        log.push_back(now);
        RateLimitDecision {
            allowed: true,
            limit: self.max_requests,
            remaining: self.max_requests - used - 1,
            reset_after: self.until_oldest_expires(&log, now),
        }
    }

    pub fn purge_idle_at(&self, now: Instant) -> usize {
        let before = self.windows.len();
        self.windows.retain(|_, log| {
            log.back()
                .is_some_and(|t| now.duration_since(*t) < self.window)
        });
        before.saturating_sub(self.windows.len())
    }

    fn until_oldest_expires(&self, log: &VecDeque<Instant>, now: Instant) -> Duration {
        log.front()
            .map(|oldest| self.window.saturating_sub(now.duration_since(*oldest)))
            .unwrap_or(self.window)
    }
}

impl RateLimiter for SlidingWindowRateLimiter {
    fn check(&self, key: &str) -> RateLimitDecision {
        self.check_at(key, Instant::now())
    }

    fn purge_idle(&self) -> usize {
        self.purge_idle_at(Instant::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINUTE: Duration = Duration::from_secs(60);

    #[test]
    fn request_after_threshold_is_rejected() {
        let limiter = SlidingWindowRateLimiter::new(3, MINUTE);
        let t0 = Instant::now();

        for i in 0..3 {
            let d = limiter.check_at("user:1:meals", t0 + Duration::from_secs(i));
            assert!(d.allowed);
            assert_eq!(d.remaining, 2 - i as u32);
        }

        let fourth = limiter.check_at("user:1:meals", t0 + Duration::from_secs(3));
        assert!(!fourth.allowed);
        assert_eq!(fourth.remaining, 0);
        assert_eq!(fourth.reset_after, Duration::from_secs(57));
    }

    #[test]
    fn window_slides_instead_of_resetting() {
        let limiter = SlidingWindowRateLimiter::new(2, MINUTE);
        let t0 = Instant::now();

        assert!(limiter.check_at("k", t0).allowed);
        assert!(limiter.check_at("k", t0 + Duration::from_secs(30)).allowed);
        assert!(!limiter.check_at("k", t0 + Duration::from_secs(59)).allowed);

        // The first request has left the window, the second has not.
        assert!(limiter.check_at("k", t0 + Duration::from_secs(60)).allowed);
        assert!(!limiter.check_at("k", t0 + Duration::from_secs(61)).allowed);
        assert!(limiter.check_at("k", t0 + Duration::from_secs(90)).allowed);
    }

    #[test]
    fn rejected_requests_are_not_counted() {
        let limiter = SlidingWindowRateLimiter::new(1, MINUTE);
        let t0 = Instant::now();

        assert!(limiter.check_at("k", t0).allowed);
        for s in 1..50 {
            assert!(!limiter.check_at("k", t0 + Duration::from_secs(s)).allowed);
        }
        assert!(limiter.check_at("k", t0 + MINUTE).allowed);
    }

    #[test]
    fn keys_are_independent() {
        let limiter = SlidingWindowRateLimiter::new(1, MINUTE);
        let t0 = Instant::now();

        assert!(limiter.check_at("user:1:meals", t0).allowed);
        assert!(limiter.check_at("user:2:meals", t0).allowed);
        assert!(limiter.check_at("user:1:foods", t0).allowed);
        assert!(!limiter.check_at("user:1:meals", t0).allowed);
    }

    #[test]
    fn idle_keys_are_purged() {
        let limiter = SlidingWindowRateLimiter::new(5, MINUTE);
        let t0 = Instant::now();
        limiter.check_at("old", t0);
        limiter.check_at("fresh", t0 + Duration::from_secs(50));

        assert_eq!(limiter.purge_idle_at(t0 + Duration::from_secs(70)), 1);
        assert_eq!(limiter.tracked_keys(), 1);
    }
}
