use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{CreateMealDto, GetMealDto, Meal, MealEntry, UpdateMealDto};
use crate::domain::DomainResult;
use crate::shared::PaginatedResult;

#[async_trait]
pub trait MealRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<MealEntry>>;
    async fn find_by_idempotency_key(
        &self,
        user_id: i32,
        key: &str,
    ) -> DomainResult<Option<MealEntry>>;
    async fn create(&self, dto: CreateMealDto) -> DomainResult<Meal>;
    async fn update(&self, id: i32, dto: UpdateMealDto) -> DomainResult<Meal>;
    async fn delete(&self, id: i32) -> DomainResult<()>;

    /// The user's meals, newest first.
    async fn list(&self, dto: GetMealDto) -> DomainResult<PaginatedResult<MealEntry>>;

    /// Meals with `start <= consumed_at < end`, joined with their foods.
    /// Meals whose food no longer exists are skipped.
    async fn find_entries_between(
        &self,
        user_id: i32,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<Vec<MealEntry>>;
}
