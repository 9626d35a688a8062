//! Cacheable analytics payloads.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::analytics::{DailyTotals, FoodFocus, NutrientTotals, Suggestion};
use crate::domain::Food;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CalorieStatus {
    #[serde(rename = "On Track")]
    OnTrack,
    #[serde(rename = "Exceeded")]
    Exceeded,
}

impl CalorieStatus {
    pub fn evaluate(calories: f64, goal: f64) -> Self {
        if calories <= goal {
            CalorieStatus::OnTrack
        } else {
            CalorieStatus::Exceeded
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CalorieStatus::OnTrack => "On Track",
            CalorieStatus::Exceeded => "Exceeded",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyReport {
    pub date: NaiveDate,
    pub totals: NutrientTotals,
    pub daily_calorie_goal: f64,
    pub remaining_calories: f64,
    pub status: CalorieStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyReport {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub totals: NutrientTotals,
    /// Seven entries, oldest first
    pub days: Vec<DailyTotals>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestedFood {
    pub id: i32,
    pub name: String,
    pub serving_size_g: f64,
    pub nutrients: NutrientTotals,
}

impl From<Food> for SuggestedFood {
    fn from(food: Food) -> Self {
        Self {
            nutrients: food.nutrients_per_serving(),
            id: food.id,
            name: food.name,
            serving_size_g: food.serving_size_g,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationReport {
    pub date: NaiveDate,
    pub daily_calorie_goal: f64,
    pub rationale: String,
    pub focus: Option<FoodFocus>,
    pub suggestions: Vec<Suggestion>,
    pub foods: Vec<SuggestedFood>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_is_on_track_up_to_the_goal() {
        assert_eq!(CalorieStatus::evaluate(2000.0, 2000.0), CalorieStatus::OnTrack);
        assert_eq!(CalorieStatus::evaluate(2000.5, 2000.0), CalorieStatus::Exceeded);
        assert_eq!(
            serde_json::to_string(&CalorieStatus::OnTrack).unwrap(),
            "\"On Track\""
        );
    }
}
