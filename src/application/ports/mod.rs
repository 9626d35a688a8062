//! Ports — interfaces the application layer depends on and the
//! infrastructure layer implements.

pub mod cache;
pub mod rate_limit;

pub use cache::{CacheError, CacheStore};
pub use rate_limit::{RateLimitDecision, RateLimiter};
