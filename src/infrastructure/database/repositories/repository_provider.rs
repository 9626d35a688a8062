//! SeaORM implementation of RepositoryProvider

use sea_orm::DatabaseConnection;

use crate::domain::{FoodRepository, MealRepository, RepositoryProvider, UserRepository};

use super::food_repository::SeaOrmFoodRepository;
use super::meal_repository::SeaOrmMealRepository;
use super::user_repository::SeaOrmUserRepository;

/// Unified repository provider backed by SeaORM.
///
/// Holds one connection pool and exposes per-aggregate repository accessors.
///
/// ```ignore
/// let repos = SeaOrmRepositoryProvider::new(db.clone());
/// let food = repos.foods().find_by_id(7).await?;
/// ```
pub struct SeaOrmRepositoryProvider {
    users: SeaOrmUserRepository,
    foods: SeaOrmFoodRepository,
    meals: SeaOrmMealRepository,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            users: SeaOrmUserRepository::new(db.clone()),
            foods: SeaOrmFoodRepository::new(db.clone()),
            meals: SeaOrmMealRepository::new(db),
        }
    }
}

impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn users(&self) -> &dyn UserRepository {
        &self.users
    }

    fn foods(&self) -> &dyn FoodRepository {
        &self.foods
    }

    fn meals(&self) -> &dyn MealRepository {
        &self.meals
    }
}
