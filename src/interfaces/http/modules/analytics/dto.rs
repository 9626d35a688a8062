//! Analytics response DTOs

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::application::analytics::{
    DailyReport, RecommendationReport, SuggestedFood, WeeklyReport,
};
use crate::domain::analytics::{Direction, FoodFocus, Suggestion};
use crate::domain::{AnalyticsWindow, DailyTotals, NutrientTotals};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
pub struct NutrientsDto {
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
}

impl From<NutrientTotals> for NutrientsDto {
    fn from(t: NutrientTotals) -> Self {
        Self {
            calories: t.calories,
            protein_g: t.protein_g,
            carbs_g: t.carbs_g,
            fat_g: t.fat_g,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DateQuery {
    /// Reference date `YYYY-MM-DD`; defaults to today (UTC)
    pub date: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TotalsQuery {
    /// `day` or `week`; defaults to `day`
    pub window: Option<String>,
    /// Reference date `YYYY-MM-DD`; defaults to today (UTC)
    pub date: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DailyAnalyticsDto {
    pub date: NaiveDate,
    #[serde(flatten)]
    pub totals: NutrientsDto,
    pub daily_calorie_goal: f64,
    pub remaining_calories: f64,
    /// `On Track` or `Exceeded`
    pub status: String,
}

impl From<DailyReport> for DailyAnalyticsDto {
    fn from(r: DailyReport) -> Self {
        Self {
            date: r.date,
            totals: r.totals.into(),
            daily_calorie_goal: r.daily_calorie_goal,
            remaining_calories: r.remaining_calories,
            status: r.status.as_str().to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DayTotalsDto {
    pub date: NaiveDate,
    #[serde(flatten)]
    pub totals: NutrientsDto,
}

impl From<DailyTotals> for DayTotalsDto {
    fn from(d: DailyTotals) -> Self {
        Self {
            date: d.date,
            totals: d.totals.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct WeeklyAnalyticsDto {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(flatten)]
    pub totals: NutrientsDto,
    /// Seven days, oldest first
    pub daily_breakdown: Vec<DayTotalsDto>,
}

impl From<WeeklyReport> for WeeklyAnalyticsDto {
    fn from(r: WeeklyReport) -> Self {
        Self {
            start_date: r.start_date,
            end_date: r.end_date,
            totals: r.totals.into(),
            daily_breakdown: r.days.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SuggestionDto {
    pub nutrient: String,
    /// `increase` or `decrease`
    pub direction: String,
    pub message: String,
}

impl From<Suggestion> for SuggestionDto {
    fn from(s: Suggestion) -> Self {
        Self {
            nutrient: s.nutrient.as_str().to_string(),
            direction: match s.direction {
                Direction::Increase => "increase",
                Direction::Decrease => "decrease",
            }
            .to_string(),
            message: s.message,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SuggestedFoodDto {
    pub id: i32,
    pub name: String,
    pub serving_size_g: f64,
    /// Per serving
    pub nutrients: NutrientsDto,
}

impl From<SuggestedFood> for SuggestedFoodDto {
    fn from(f: SuggestedFood) -> Self {
        Self {
            id: f.id,
            name: f.name,
            serving_size_g: f.serving_size_g,
            nutrients: f.nutrients.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RecommendationDto {
    pub date: NaiveDate,
    pub daily_calorie_goal: f64,
    pub rationale: String,
    /// `lower_calorie`, `protein_dense` or null
    pub focus: Option<String>,
    pub suggestions: Vec<SuggestionDto>,
    pub recommended_foods: Vec<SuggestedFoodDto>,
}

impl From<RecommendationReport> for RecommendationDto {
    fn from(r: RecommendationReport) -> Self {
        Self {
            date: r.date,
            daily_calorie_goal: r.daily_calorie_goal,
            rationale: r.rationale,
            focus: r.focus.map(|f| {
                match f {
                    FoodFocus::LowerCalorie => "lower_calorie",
                    FoodFocus::ProteinDense => "protein_dense",
                }
                .to_string()
            }),
            suggestions: r.suggestions.into_iter().map(Into::into).collect(),
            recommended_foods: r.foods.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TotalsDto {
    pub window: String,
    pub date: NaiveDate,
    /// Nutrient name → summed quantity
    pub totals: BTreeMap<String, f64>,
}

impl TotalsDto {
    pub fn new(window: AnalyticsWindow, date: NaiveDate, totals: NutrientTotals) -> Self {
        Self {
            window: window.as_str().to_string(),
            date,
            totals: totals
                .as_map()
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        }
    }
}
