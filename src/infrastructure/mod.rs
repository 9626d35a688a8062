//! Infrastructure layer - external concerns

pub mod cache;
pub mod crypto;
pub mod database;
pub mod rate_limit;

pub use cache::InMemoryCache;
pub use database::repositories::SeaOrmRepositoryProvider;
pub use database::{init_database, DatabaseConfig};
pub use rate_limit::SlidingWindowRateLimiter;
