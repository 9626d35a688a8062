use async_trait::async_trait;

use super::{CreateFoodDto, Food, GetFoodDto, UpdateFoodDto};
use crate::domain::DomainResult;
use crate::shared::PaginatedResult;

#[async_trait]
pub trait FoodRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Food>>;
    async fn list(&self, dto: GetFoodDto) -> DomainResult<PaginatedResult<Food>>;
    async fn create(&self, dto: CreateFoodDto) -> DomainResult<Food>;
    async fn update(&self, id: i32, dto: UpdateFoodDto) -> DomainResult<Food>;

    /// Delete a food together with every meal that references it.
    /// Returns the number of meals removed.
    async fn delete(&self, id: i32) -> DomainResult<u64>;

    /// Foods with fewer calories per serving than `max_calories`, lowest first.
    async fn find_below_calories(&self, max_calories: f64, limit: u64) -> DomainResult<Vec<Food>>;
    /// Foods ordered by protein per serving, highest first.
    async fn find_protein_dense(&self, limit: u64) -> DomainResult<Vec<Food>>;
}
