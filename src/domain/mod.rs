pub mod analytics;
pub mod food;
pub mod meal;
pub mod repositories;
pub mod user;

pub use analytics::{AnalyticsWindow, DailyTotals, NutrientTotals};
pub use food::{CreateFoodDto, Food, FoodRepository, GetFoodDto, UpdateFoodDto};
pub use meal::{CreateMealDto, GetMealDto, Meal, MealEntry, MealRepository, UpdateMealDto};
pub use repositories::{DomainResult, RepositoryProvider};
pub use user::{
    CreateUserDto, GetUserDto, ProfileFields, UpdateUserDto, User, UserRepository, UserRole,
};

pub use crate::shared::DomainError;
