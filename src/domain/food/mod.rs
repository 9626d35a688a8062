//! Food aggregate

pub mod dto;
pub mod model;
pub mod repository;

pub use dto::{CreateFoodDto, GetFoodDto, UpdateFoodDto};
pub use model::Food;
pub use repository::FoodRepository;
