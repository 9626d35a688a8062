//! Users module: caller profile and admin user management

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
