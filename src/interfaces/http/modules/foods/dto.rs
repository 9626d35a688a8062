//! Food catalog DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::domain::{CreateFoodDto, Food, UpdateFoodDto};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FoodDto {
    pub id: i32,
    pub name: String,
    pub serving_size_g: f64,
    /// Per serving
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Food> for FoodDto {
    fn from(f: Food) -> Self {
        Self {
            id: f.id,
            name: f.name,
            serving_size_g: f.serving_size_g,
            calories: f.calories,
            protein_g: f.protein_g,
            carbs_g: f.carbs_g,
            fat_g: f.fat_g,
            created_at: f.created_at,
            updated_at: f.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateFoodRequest {
    #[validate(length(min = 1, max = 200, message = "name must be 1-200 characters"))]
    pub name: String,
    #[validate(range(exclusive_min = 0.0, message = "serving_size_g must be positive"))]
    pub serving_size_g: f64,
    #[validate(range(min = 0.0, message = "calories must not be negative"))]
    pub calories: f64,
    #[validate(range(min = 0.0, message = "protein_g must not be negative"))]
    pub protein_g: f64,
    #[validate(range(min = 0.0, message = "carbs_g must not be negative"))]
    pub carbs_g: f64,
    #[validate(range(min = 0.0, message = "fat_g must not be negative"))]
    pub fat_g: f64,
}

impl From<CreateFoodRequest> for CreateFoodDto {
    fn from(r: CreateFoodRequest) -> Self {
        Self {
            name: r.name,
            serving_size_g: r.serving_size_g,
            calories: r.calories,
            protein_g: r.protein_g,
            carbs_g: r.carbs_g,
            fat_g: r.fat_g,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateFoodRequest {
    #[validate(length(min = 1, max = 200, message = "name must be 1-200 characters"))]
    pub name: Option<String>,
    #[validate(range(exclusive_min = 0.0, message = "serving_size_g must be positive"))]
    pub serving_size_g: Option<f64>,
    #[validate(range(min = 0.0, message = "calories must not be negative"))]
    pub calories: Option<f64>,
    #[validate(range(min = 0.0, message = "protein_g must not be negative"))]
    pub protein_g: Option<f64>,
    #[validate(range(min = 0.0, message = "carbs_g must not be negative"))]
    pub carbs_g: Option<f64>,
    #[validate(range(min = 0.0, message = "fat_g must not be negative"))]
    pub fat_g: Option<f64>,
}

impl From<UpdateFoodRequest> for UpdateFoodDto {
    fn from(r: UpdateFoodRequest) -> Self {
        Self {
            name: r.name,
            serving_size_g: r.serving_size_g,
            calories: r.calories,
            protein_g: r.protein_g,
            carbs_g: r.carbs_g,
            fat_g: r.fat_g,
        }
    }
}

#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListFoodsParams {
    /// Case-insensitive substring of the food name
    pub search: Option<String>,
    #[validate(range(min = 1))]
    pub page: Option<u32>,
    #[validate(range(min = 1, max = 100))]
    pub limit: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeletedFoodResponse {
    pub id: i32,
    /// Meals removed together with the food
    pub removed_meals: u64,
}
