//! Meal log entries

use chrono::{DateTime, Utc};

use crate::domain::analytics::NutrientTotals;
use crate::domain::food::Food;

pub const MAX_NOTES_LEN: usize = 500;
/// Upper bound on servings per logged meal
pub const MAX_SERVINGS: f64 = 100.0;

/// A user's logged consumption of a food.
#[derive(Debug, Clone, PartialEq)]
pub struct Meal {
    pub id: i32,
    pub user_id: i32,
    pub food_id: i32,
    /// Quantity in servings of the referenced food
    pub servings: f64,
    pub consumed_at: DateTime<Utc>,
    pub notes: Option<String>,
    pub idempotency_key: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A meal joined with the food it references.
#[derive(Debug, Clone, PartialEq)]
pub struct MealEntry {
    pub meal: Meal,
    pub food: Food,
}

impl MealEntry {
    /// Nutrients contributed by this meal: servings × per-serving density.
    pub fn nutrients(&self) -> NutrientTotals {
        self.food.nutrients_per_serving().scaled(self.meal.servings)
    }
}
