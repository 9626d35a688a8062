//! SeaORM implementation of MealRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Select, Set,
};

use super::db_err;
use super::food_repository::food_model_to_domain;
use crate::domain::{
    CreateMealDto, DomainError, DomainResult, GetMealDto, Meal, MealEntry, MealRepository,
    UpdateMealDto,
};
use crate::infrastructure::database::entities::{food, meal};
use crate::shared::{validate_pagination, PaginatedResult};

fn meal_model_to_domain(m: meal::Model) -> Meal {
    Meal {
        id: m.id,
        user_id: m.user_id,
        food_id: m.food_id,
        servings: m.servings,
        consumed_at: m.consumed_at,
        notes: m.notes,
        idempotency_key: m.idempotency_key,
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

/// Pair a meal row with its food; rows whose food is gone yield `None`.
fn to_entry((m, f): (meal::Model, Option<food::Model>)) -> Option<MealEntry> {
    f.map(|f| MealEntry {
        meal: meal_model_to_domain(m),
        food: food_model_to_domain(f),
    })
}

pub struct SeaOrmMealRepository {
    db: DatabaseConnection,
}

impl SeaOrmMealRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn first_entry(&self, query: Select<meal::Entity>) -> DomainResult<Option<MealEntry>> {
        let row = query
            .find_also_related(food::Entity)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(row.and_then(to_entry))
    }

    async fn find_model(&self, id: i32) -> DomainResult<meal::Model> {
        meal::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or_else(|| DomainError::not_found("Meal", id))
    }
}

#[async_trait]
impl MealRepository for SeaOrmMealRepository {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<MealEntry>> {
        self.first_entry(meal::Entity::find_by_id(id)).await
    }

    async fn find_by_idempotency_key(
        &self,
        user_id: i32,
        key: &str,
    ) -> DomainResult<Option<MealEntry>> {
        self.first_entry(
            meal::Entity::find()
                .filter(meal::Column::UserId.eq(user_id))
                .filter(meal::Column::IdempotencyKey.eq(key)),
        )
        .await
    }

    async fn create(&self, dto: CreateMealDto) -> DomainResult<Meal> {
        let now = Utc::now();
        let model = meal::ActiveModel {
            user_id: Set(dto.user_id),
            food_id: Set(dto.food_id),
            servings: Set(dto.servings),
            consumed_at: Set(dto.consumed_at),
            notes: Set(dto.notes),
            idempotency_key: Set(dto.idempotency_key),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model.insert(&self.db).await.map_err(|e| {
            if e.to_string().contains("UNIQUE") {
                DomainError::Conflict("Idempotency key already used".to_string())
            } else {
                db_err(e)
            }
        })?;
        Ok(meal_model_to_domain(result))
    }

    async fn update(&self, id: i32, dto: UpdateMealDto) -> DomainResult<Meal> {
        let existing = self.find_model(id).await?;
        let mut active: meal::ActiveModel = existing.into();

        if let Some(servings) = dto.servings {
            active.servings = Set(servings);
        }
        if let Some(consumed_at) = dto.consumed_at {
            active.consumed_at = Set(consumed_at);
        }
        if let Some(notes) = dto.notes {
            active.notes = Set(Some(notes));
        }
        active.updated_at = Set(Utc::now());

        let model = active.update(&self.db).await.map_err(db_err)?;
        Ok(meal_model_to_domain(model))
    }

    async fn delete(&self, id: i32) -> DomainResult<()> {
        let result = meal::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        if result.rows_affected == 0 {
            return Err(DomainError::not_found("Meal", id));
        }
        Ok(())
    }

    async fn list(&self, dto: GetMealDto) -> DomainResult<PaginatedResult<MealEntry>> {
        let pagination = validate_pagination(dto.page, dto.limit);

        let mut query = meal::Entity::find().filter(meal::Column::UserId.eq(dto.user_id));
        if let Some(start) = dto.start {
            query = query.filter(meal::Column::ConsumedAt.gte(start));
        }
        if let Some(end) = dto.end {
            query = query.filter(meal::Column::ConsumedAt.lte(end));
        }

        let total = query.clone().count(&self.db).await.map_err(db_err)?;
        let rows = query
            .order_by_desc(meal::Column::ConsumedAt)
            .order_by_desc(meal::Column::Id)
            .offset(pagination.offset())
            .limit(pagination.limit as u64)
            .find_also_related(food::Entity)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(PaginatedResult::new(
            rows.into_iter().filter_map(to_entry).collect(),
            total,
            pagination.page,
            pagination.limit,
        ))
    }

    async fn find_entries_between(
        &self,
        user_id: i32,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<Vec<MealEntry>> {
        let rows = meal::Entity::find()
            .filter(meal::Column::UserId.eq(user_id))
            .filter(meal::Column::ConsumedAt.gte(start))
            .filter(meal::Column::ConsumedAt.lt(end))
            .order_by_asc(meal::Column::ConsumedAt)
            .find_also_related(food::Entity)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(rows.into_iter().filter_map(to_entry).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CreateFoodDto, CreateUserDto, FoodRepository, UserRepository, UserRole};
    use crate::infrastructure::database::connect_in_memory;
    use crate::infrastructure::database::repositories::{
        SeaOrmFoodRepository, SeaOrmUserRepository,
    };
    use chrono::TimeZone;

    struct Fixture {
        meals: SeaOrmMealRepository,
        foods: SeaOrmFoodRepository,
        user_id: i32,
        food_id: i32,
    }

    async fn fixture() -> Fixture {
        let db = connect_in_memory().await;
        let users = SeaOrmUserRepository::new(db.clone());
        let foods = SeaOrmFoodRepository::new(db.clone());
        let user = users
            .create_user(CreateUserDto {
                name: "Ann".into(),
                email: "ann@example.com".into(),
                password_hash: "hash".into(),
                role: UserRole::User,
                profile: Default::default(),
            })
            .await
            .unwrap();
        let food = foods
            .create(CreateFoodDto {
                name: "Egg".into(),
                serving_size_g: 50.0,
                calories: 70.0,
                protein_g: 6.0,
                carbs_g: 0.5,
                fat_g: 5.0,
            })
            .await
            .unwrap();
        Fixture {
            meals: SeaOrmMealRepository::new(db),
            foods,
            user_id: user.id,
            food_id: food.id,
        }
    }

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, day, hour, 0, 0).unwrap()
    }

    fn meal_at(f: &Fixture, consumed_at: DateTime<Utc>) -> CreateMealDto {
        CreateMealDto {
            user_id: f.user_id,
            food_id: f.food_id,
            servings: 1.0,
            consumed_at,
            notes: None,
            idempotency_key: None,
        }
    }

    #[tokio::test]
    async fn range_is_half_open() {
        let f = fixture().await;
        f.meals.create(meal_at(&f, at(1, 0))).await.unwrap();
        f.meals.create(meal_at(&f, at(1, 23))).await.unwrap();
        f.meals.create(meal_at(&f, at(2, 0))).await.unwrap();

        let entries = f
            .meals
            .find_entries_between(f.user_id, at(1, 0), at(2, 0))
            .await
            .unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| e.food.name == "Egg"));
    }

    #[tokio::test]
    async fn list_is_newest_first_and_filtered() {
        let f = fixture().await;
        for day in 1..=4 {
            f.meals.create(meal_at(&f, at(day, 8))).await.unwrap();
        }

        let page = f
            .meals
            .list(GetMealDto {
                user_id: f.user_id,
                start: Some(at(2, 0)),
                end: Some(at(4, 0)),
                page: None,
                limit: None,
            })
            .await
            .unwrap();
        assert_eq!(page.total, 2);
        assert_eq!(page.items[0].meal.consumed_at, at(3, 8));
        assert_eq!(page.items[1].meal.consumed_at, at(2, 8));
    }

    #[tokio::test]
    async fn idempotency_key_lookup_is_per_user() {
        let f = fixture().await;
        let mut dto = meal_at(&f, at(1, 8));
        dto.idempotency_key = Some("k-1".into());
        let meal = f.meals.create(dto.clone()).await.unwrap();

        let found = f
            .meals
            .find_by_idempotency_key(f.user_id, "k-1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.meal.id, meal.id);
        assert!(f
            .meals
            .find_by_idempotency_key(f.user_id + 1, "k-1")
            .await
            .unwrap()
            .is_none());

        let err = f.meals.create(dto).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn deleting_food_removes_its_meals() {
        let f = fixture().await;
        f.meals.create(meal_at(&f, at(1, 8))).await.unwrap();
        f.meals.create(meal_at(&f, at(1, 9))).await.unwrap();

        let removed = f.foods.delete(f.food_id).await.unwrap();
        assert_eq!(removed, 2);

        let entries = f
            .meals
            .find_entries_between(f.user_id, at(1, 0), at(2, 0))
            .await
            .unwrap();
        assert!(entries.is_empty());
    }

    #[tokio::test]
    async fn update_and_delete_missing_meal_is_not_found() {
        let f = fixture().await;
        assert!(matches!(
            f.meals.update(7, UpdateMealDto::default()).await,
            Err(DomainError::NotFound { .. })
        ));
        assert!(matches!(
            f.meals.delete(7).await,
            Err(DomainError::NotFound { .. })
        ));
    }
}
