//! # Wellora
//!
//! Meal logging and nutrition analytics backend.
//!
//! ## Architecture
//!
//! - **domain**: users, foods, meals and the pure analytics core
//!   (aggregation windows, totals, recommendation rules)
//! - **application**: use-case services, the analytics cache read path and
//!   the cache / rate-limiter ports
//! - **infrastructure**: SeaORM persistence, JWT and bcrypt, the in-memory
//!   TTL cache and the sliding-window rate limiter
//! - **interfaces**: REST API with Swagger documentation
//! - **server**: runtime lifecycle shared by the CLI

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use config::{default_config_path, AppConfig};

pub use infrastructure::{init_database, DatabaseConfig, SeaOrmRepositoryProvider};

pub use interfaces::http::{create_api_router, ApiContext};
