//! Meal log DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::domain::{MealEntry, UpdateMealDto};
use crate::interfaces::http::modules::analytics::NutrientsDto;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MealDto {
    pub id: i32,
    pub food_id: i32,
    pub food_name: String,
    pub servings: f64,
    pub consumed_at: DateTime<Utc>,
    pub notes: Option<String>,
    pub idempotency_key: Option<String>,
    /// Nutrients contributed by this meal (servings × per-serving values)
    pub nutrients: NutrientsDto,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<MealEntry> for MealDto {
    fn from(entry: MealEntry) -> Self {
        let nutrients = entry.nutrients().into();
        let MealEntry { meal, food } = entry;
        Self {
            id: meal.id,
            food_id: meal.food_id,
            food_name: food.name,
            servings: meal.servings,
            consumed_at: meal.consumed_at,
            notes: meal.notes,
            idempotency_key: meal.idempotency_key,
            nutrients,
            created_at: meal.created_at,
            updated_at: meal.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LogMealRequest {
    pub food_id: i32,
    #[validate(range(
        exclusive_min = 0.0,
        max = 100.0,
        message = "servings must be greater than 0 and at most 100"
    ))]
    pub servings: f64,
    /// Defaults to the time of the request
    pub consumed_at: Option<DateTime<Utc>>,
    #[validate(length(max = 500, message = "notes must be at most 500 characters"))]
    pub notes: Option<String>,
}

/// Partial update; servings and notes are checked by the meal service.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateMealRequest {
    pub servings: Option<f64>,
    pub consumed_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

impl From<UpdateMealRequest> for UpdateMealDto {
    fn from(r: UpdateMealRequest) -> Self {
        Self {
            servings: r.servings,
            consumed_at: r.consumed_at,
            notes: r.notes,
        }
    }
}

#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListMealsParams {
    /// Inclusive lower bound: RFC 3339 timestamp, or `YYYY-MM-DD` for the start of that day (UTC)
    pub start_date: Option<String>,
    /// Inclusive upper bound: RFC 3339 timestamp, or `YYYY-MM-DD` for the end of that day (UTC)
    pub end_date: Option<String>,
    #[validate(range(min = 1))]
    pub page: Option<u32>,
    #[validate(range(min = 1, max = 100))]
    pub limit: Option<u32>,
}
