//! SeaORM implementation of FoodRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::info;

use super::db_err;
use crate::domain::{
    CreateFoodDto, DomainError, DomainResult, Food, FoodRepository, GetFoodDto, UpdateFoodDto,
};
use crate::infrastructure::database::entities::{food, meal};
use crate::shared::{validate_pagination, PaginatedResult};

pub(crate) fn food_model_to_domain(f: food::Model) -> Food {
    Food {
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

pub struct SeaOrmFoodRepository {
    db: DatabaseConnection,
}

impl SeaOrmFoodRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl FoodRepository for SeaOrmFoodRepository {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Food>> {
        let model = food::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(food_model_to_domain))
    }

    async fn list(&self, dto: GetFoodDto) -> DomainResult<PaginatedResult<Food>> {
        let pagination = validate_pagination(dto.page, dto.limit);

        let mut query = food::Entity::find();
        if let Some(search) = dto.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            query = query.filter(food::Column::Name.contains(search));
        }

        let total = query.clone().count(&self.db).await.map_err(db_err)?;
        let models = query
            .order_by_asc(food::Column::Name)
            .order_by_asc(food::Column::Id)
            .offset(pagination.offset())
            .limit(pagination.limit as u64)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(PaginatedResult::new(
            models.into_iter().map(food_model_to_domain).collect(),
            total,
            pagination.page,
            pagination.limit,
        ))
    }

    async fn create(&self, dto: CreateFoodDto) -> DomainResult<Food> {
        let now = Utc::now();
        let model = food::ActiveModel {
            name: Set(dto.name),
            serving_size_g: Set(dto.serving_size_g),
            calories: Set(dto.calories),
            protein_g: Set(dto.protein_g),
            carbs_g: Set(dto.carbs_g),
            fat_g: Set(dto.fat_g),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        let result = model.insert(&self.db).await.map_err(db_err)?;
        info!(food_id = result.id, name = %result.name, "Food created");
        Ok(food_model_to_domain(result))
    }

    async fn update(&self, id: i32, dto: UpdateFoodDto) -> DomainResult<Food> {
        let existing = food::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or_else(|| DomainError::not_found("Food", id))?;

        let mut active: food::ActiveModel = existing.into();
        if let Some(name) = dto.name {
            active.name = Set(name);
        }
        if let Some(v) = dto.serving_size_g {
            active.serving_size_g = Set(v);
        }
        if let Some(v) = dto.calories {
            active.calories = Set(v);
        }
        if let Some(v) = dto.protein_g {
            active.protein_g = Set(v);
        }
        if let Some(v) = dto.carbs_g {
            active.carbs_g = Set(v);
        }
        if let Some(v) = dto.fat_g {
            active.fat_g = Set(v);
        }
        active.updated_at = Set(Utc::now());

        let model = active.update(&self.db).await.map_err(db_err)?;
        Ok(food_model_to_domain(model))
    }

    async fn delete(&self, id: i32) -> DomainResult<u64> {
        let txn = self.db.begin().await.map_err(db_err)?;

        // Cascade to meals inside the same transaction
        let meals_removed = meal::Entity::delete_many()
            .filter(meal::Column::FoodId.eq(id))
            .exec(&txn)
            .await
            .map_err(db_err)?
            .rows_affected;

        let result = food::Entity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(db_err)?;

        if result.rows_affected == 0 {
            txn.rollback().await.map_err(db_err)?;
            return Err(DomainError::not_found("Food", id));
        }

        txn.commit().await.map_err(db_err)?;
        info!(food_id = id, meals_removed, "Food deleted");
        Ok(meals_removed)
    }

    async fn find_below_calories(&self, max_calories: f64, limit: u64) -> DomainResult<Vec<Food>> {
        let models = food::Entity::find()
            .filter(food::Column::Calories.lt(max_calories))
            .order_by_asc(food::Column::Calories)
            .order_by_asc(food::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(food_model_to_domain).collect())
    }

    async fn find_protein_dense(&self, limit: u64) -> DomainResult<Vec<Food>> {
        let models = food::Entity::find()
            .order_by_desc(food::Column::ProteinG)
            .order_by_asc(food::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(food_model_to_domain).collect())
    }
}
