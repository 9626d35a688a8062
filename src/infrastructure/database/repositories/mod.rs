//! Database repository implementations
//!
//! Per-aggregate SeaORM repositories + unified RepositoryProvider.

pub mod food_repository;
pub mod meal_repository;
pub mod repository_provider;
pub mod user_repository;

pub use food_repository::SeaOrmFoodRepository;
pub use meal_repository::SeaOrmMealRepository;
pub use repository_provider::SeaOrmRepositoryProvider;
pub use user_repository::SeaOrmUserRepository;

use crate::shared::{DomainError, InfraError};

fn db_err(e: sea_orm::DbErr) -> DomainError {
    InfraError::Database(e).into()
}
