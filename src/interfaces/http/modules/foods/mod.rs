//! Foods module: catalog browsing and admin maintenance

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
