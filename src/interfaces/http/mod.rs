//! HTTP REST API
//!
//! - `common`: response envelopes, error mapping and validating extractors
//! - `middleware`: bearer-token authentication
//! - `rate_limit`: per-(subject, action) write limiting
//! - `modules`: handlers and DTOs per resource
//! - `router`: API router with Swagger documentation

pub mod common;
pub mod middleware;
pub mod modules;
pub mod rate_limit;
pub mod router;

pub use router::{create_api_router, ApiContext};
