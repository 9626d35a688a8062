//! Meal aggregate

pub mod dto;
pub mod model;
pub mod repository;

pub use dto::{CreateMealDto, GetMealDto, UpdateMealDto};
pub use model::{Meal, MealEntry, MAX_NOTES_LEN, MAX_SERVINGS};
pub use repository::MealRepository;
