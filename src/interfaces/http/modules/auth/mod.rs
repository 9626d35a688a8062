//! Auth module: registration, login and token refresh

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
