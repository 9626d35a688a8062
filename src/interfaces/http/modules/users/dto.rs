//! User DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::domain::{ProfileFields, User};

/// User API representation (never exposes the password hash)
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserDto {
    pub id: i32,
    pub name: String,
    pub email: String,
    /// `user` or `admin`
    pub role: String,
    pub gender: Option<String>,
    pub age: Option<i32>,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub activity_level: Option<String>,
    pub daily_calorie_goal: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserDto {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            name: u.name,
            email: u.email,
            role: u.role.as_str().to_string(),
            gender: u.gender,
            age: u.age,
            height_cm: u.height_cm,
            weight_kg: u.weight_kg,
            activity_level: u.activity_level,
            daily_calorie_goal: u.daily_calorie_goal,
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

/// Optional nutrition profile attributes
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct ProfileRequest {
    #[validate(length(max = 20, message = "gender must be at most 20 characters"))]
    pub gender: Option<String>,
    #[validate(range(min = 0, max = 150, message = "age must be between 0 and 150"))]
    pub age: Option<i32>,
    #[validate(range(exclusive_min = 0.0, message = "height_cm must be positive"))]
    pub height_cm: Option<f64>,
    #[validate(range(exclusive_min = 0.0, message = "weight_kg must be positive"))]
    pub weight_kg: Option<f64>,
    #[validate(length(max = 50, message = "activity_level must be at most 50 characters"))]
    pub activity_level: Option<String>,
    #[validate(range(exclusive_min = 0.0, message = "daily_calorie_goal must be positive"))]
    pub daily_calorie_goal: Option<f64>,
}

impl From<ProfileRequest> for ProfileFields {
    fn from(p: ProfileRequest) -> Self {
        Self {
            gender: p.gender,
            age: p.age,
            height_cm: p.height_cm,
            weight_kg: p.weight_kg,
            activity_level: p.activity_level,
            daily_calorie_goal: p.daily_calorie_goal,
        }
    }
}

/// Partial profile update
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 100, message = "name must be 1-100 characters"))]
    pub name: Option<String>,
    #[serde(flatten)]
    #[validate(nested)]
    pub profile: ProfileRequest,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ChangeRoleRequest {
    /// `user` or `admin`
    pub role: String,
}

#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListUsersParams {
    /// Substring match on name or email
    pub search: Option<String>,
    /// Filter by role (`user`, `admin`)
    pub role: Option<String>,
    #[validate(range(min = 1))]
    pub page: Option<u32>,
    #[validate(range(min = 1, max = 100))]
    pub limit: Option<u32>,
}
