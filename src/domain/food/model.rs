//! Food catalog entry

use chrono::{DateTime, Utc};

use crate::domain::analytics::NutrientTotals;

/// A catalog food. Nutrient fields are per serving, which is the unit meal
/// quantities are expressed in.
#[derive(Debug, Clone, PartialEq)]
pub struct Food {
    pub id: i32,
    pub name: String,
    pub serving_size_g: f64,
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Food {
    pub fn nutrients_per_serving(&self) -> NutrientTotals {
        NutrientTotals {
            calories: self.calories,
            protein_g: self.protein_g,
            carbs_g: self.carbs_g,
            fat_g: self.fat_g,
        }
    }
}
