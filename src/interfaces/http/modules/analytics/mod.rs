//! Analytics module: cached nutrition totals and recommendations

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
