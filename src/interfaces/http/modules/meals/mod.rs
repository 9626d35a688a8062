//! Meals module: per-user meal log

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
