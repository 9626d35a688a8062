//! Food catalog use-cases

pub mod service;

pub use service::FoodService;
