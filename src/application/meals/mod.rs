//! Meal logging use-cases

pub mod service;

pub use service::{LogMeal, LoggedMeal, MealService};
