//! Food catalog service

use std::sync::Arc;

use tracing::info;

use crate::domain::{
    CreateFoodDto, DomainError, DomainResult, Food, GetFoodDto, RepositoryProvider, UpdateFoodDto,
};
use crate::shared::PaginatedResult;

pub struct FoodService {
    repos: Arc<dyn RepositoryProvider>,
}

impl FoodService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    pub async fn list(&self, dto: GetFoodDto) -> DomainResult<PaginatedResult<Food>> {
        self.repos.foods().list(dto).await
    }

    pub async fn get(&self, id: i32) -> DomainResult<Food> {
        self.repos
            .foods()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Food", id))
    }

    pub async fn create(&self, mut dto: CreateFoodDto) -> DomainResult<Food> {
        dto.validate()?;
        dto.name = dto.name.trim().to_string();
        let food = self.repos.foods().create(dto).await?;
        info!(food_id = food.id, name = %food.name, "Food created");
        Ok(food)
    }

    pub async fn update(&self, id: i32, mut dto: UpdateFoodDto) -> DomainResult<Food> {
        dto.validate()?;
        dto.name = dto.name.map(|n| n.trim().to_string());
        let food = self.repos.foods().update(id, dto).await?;
        info!(food_id = id, "Food updated");
        Ok(food)
    }

    /// Delete a food and every meal referencing it.
    pub async fn delete(&self, id: i32) -> DomainResult<u64> {
        let removed_meals = self.repos.foods().delete(id).await?;
        info!(food_id = id, removed_meals, "Food deleted");
        Ok(removed_meals)
    }
}
