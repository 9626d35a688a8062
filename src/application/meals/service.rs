//! Meal logging service
//!
//! Meals are only ever visible to their owner; a meal belonging to someone
//! else is reported exactly like a missing one.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::domain::meal::dto::{validate_notes, validate_servings};
use crate::domain::{
    CreateMealDto, DomainError, DomainResult, GetMealDto, MealEntry, RepositoryProvider,
    UpdateMealDto,
};
use crate::shared::PaginatedResult;

pub const MAX_IDEMPOTENCY_KEY_LEN: usize = 255;

/// A meal-logging request from `user_id`.
#[derive(Debug, Clone)]
pub struct LogMeal {
    pub user_id: i32,
    pub food_id: i32,
    pub servings: f64,
    /// Defaults to now
    pub consumed_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub idempotency_key: Option<String>,
}

/// Outcome of [`MealService::log_meal`].
#[derive(Debug, Clone)]
pub struct LoggedMeal {
    pub entry: MealEntry,
    /// `false` when an earlier meal with the same idempotency key was returned
    pub created: bool,
}

pub struct MealService {
    repos: Arc<dyn RepositoryProvider>,
}

impl MealService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    pub async fn log_meal(&self, input: LogMeal) -> DomainResult<LoggedMeal> {
        validate_servings(input.servings)?;
        validate_notes(input.notes.as_deref())?;
        let key = normalize_key(input.idempotency_key)?;

        if let Some(ref key) = key {
            if let Some(entry) = self.replay(input.user_id, key).await? {
                return Ok(LoggedMeal {
                    entry,
                    created: false,
                });
            }
        }

        let food = self
            .repos
            .foods()
            .find_by_id(input.food_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Food", input.food_id))?;

        let created = self
            .repos
            .meals()
            .create(CreateMealDto {
                user_id: input.user_id,
                food_id: input.food_id,
                servings: input.servings,
                consumed_at: input.consumed_at.unwrap_or_else(Utc::now),
                notes: input.notes,
                idempotency_key: key.clone(),
            })
            .await;

        let meal = match (created, key) {
            (Ok(meal), _) => meal,
            // A concurrent request with the same key won the insert
            (Err(DomainError::Conflict(_)), Some(key)) => {
                if let Some(entry) = self.replay(input.user_id, &key).await? {
                    return Ok(LoggedMeal {
                        entry,
                        created: false,
                    });
                }
                return Err(DomainError::Conflict(
                    "Idempotency key already in use".into(),
                ));
            }
            (Err(e), _) => return Err(e),
        };

        info!(
            meal_id = meal.id,
            user_id = meal.user_id,
            food_id = meal.food_id,
            servings = meal.servings,
            "Meal logged"
        );
        Ok(LoggedMeal {
            entry: MealEntry { meal, food },
            created: true,
        })
    }

    pub async fn list(&self, dto: GetMealDto) -> DomainResult<PaginatedResult<MealEntry>> {
        dto.validate()?;
        self.repos.meals().list(dto).await
    }

    pub async fn get(&self, user_id: i32, meal_id: i32) -> DomainResult<MealEntry> {
        self.repos
            .meals()
            .find_by_id(meal_id)
            .await?
            .filter(|entry| entry.meal.user_id == user_id)
            .ok_or_else(|| DomainError::not_found("Meal", meal_id))
    }

    pub async fn update(
        &self,
        user_id: i32,
        meal_id: i32,
        dto: UpdateMealDto,
    ) -> DomainResult<MealEntry> {
        dto.validate()?;
        let existing = self.get(user_id, meal_id).await?;
        let meal = self.repos.meals().update(meal_id, dto).await?;
        info!(meal_id, user_id, "Meal updated");
        Ok(MealEntry {
            meal,
            food: existing.food,
        })
    }

    pub async fn delete(&self, user_id: i32, meal_id: i32) -> DomainResult<()> {
        self.get(user_id, meal_id).await?;
        self.repos.meals().delete(meal_id).await?;
        info!(meal_id, user_id, "Meal deleted");
        Ok(())
    }

    async fn replay(&self, user_id: i32, key: &str) -> DomainResult<Option<MealEntry>> {
        let entry = self
            .repos
            .meals()
            .find_by_idempotency_key(user_id, key)
            .await?;
        if let Some(ref e) = entry {
            debug!(meal_id = e.meal.id, user_id, "Idempotent replay of meal log");
        }
        Ok(entry)
    }
}

fn normalize_key(key: Option<String>) -> DomainResult<Option<String>> {
    let Some(key) = key else {
        return Ok(None);
    };
    let key = key.trim();
    if key.is_empty() {
        return Ok(None);
    }
    if key.len() > MAX_IDEMPOTENCY_KEY_LEN {
        return Err(DomainError::Validation(format!(
            "Idempotency key must be at most {} characters",
            MAX_IDEMPOTENCY_KEY_LEN
        )));
    }
    Ok(Some(key.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CreateFoodDto, CreateUserDto, UserRole};
    use crate::infrastructure::database::connect_in_memory;
    use crate::infrastructure::SeaOrmRepositoryProvider;

    struct Fixture {
        svc: MealService,
        repos: Arc<dyn RepositoryProvider>,
        ann: i32,
        bob: i32,
        food_id: i32,
    }

    async fn fixture() -> Fixture {
        let db = connect_in_memory().await;
        let repos: Arc<dyn RepositoryProvider> = Arc::new(SeaOrmRepositoryProvider::new(db));

        let mut ids = Vec::new();
        for (name, email) in [("Ann", "ann@example.com"), ("Bob", "bob@example.com")] {
            let user = repos
                .users()
                .create_user(CreateUserDto {
                    name: name.into(),
                    email: email.into(),
                    password_hash: "hash".into(),
                    role: UserRole::User,
                    profile: Default::default(),
                })
                .await
                .unwrap();
            ids.push(user.id);
        }
        let food = repos
            .foods()
            .create(CreateFoodDto {
                name: "Apple".into(),
                serving_size_g: 180.0,
                calories: 95.0,
                protein_g: 0.5,
                carbs_g: 25.0,
                fat_g: 0.3,
            })
            .await
            .unwrap();

        Fixture {
            svc: MealService::new(repos.clone()),
            repos,
            ann: ids[0],
            bob: ids[1],
            food_id: food.id,
        }
    }

    fn log(f: &Fixture, key: Option<&str>) -> LogMeal {
        LogMeal {
            user_id: f.ann,
            food_id: f.food_id,
            servings: 2.0,
            consumed_at: None,
            notes: Some("snack".into()),
            idempotency_key: key.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn logged_meal_carries_scaled_nutrients() {
        let f = fixture().await;
        let logged = f.svc.log_meal(log(&f, None)).await.unwrap();
        assert!(logged.created);
        assert_eq!(logged.entry.nutrients().calories, 190.0);
        assert_eq!(logged.entry.food.name, "Apple");
    }

    #[tokio::test]
    async fn repeated_idempotency_key_returns_the_original_meal() {
        let f = fixture().await;
        let first = f.svc.log_meal(log(&f, Some("abc-1"))).await.unwrap();
        let second = f.svc.log_meal(log(&f, Some("abc-1"))).await.unwrap();

        assert!(first.created);
        assert!(!second.created);
        assert_eq!(first.entry.meal.id, second.entry.meal.id);

        let all = f
            .svc
            .list(GetMealDto {
                user_id: f.ann,
                start: None,
                end: None,
                page: None,
                limit: None,
            })
            .await
            .unwrap();
        assert_eq!(all.total, 1);
    }

    #[tokio::test]
    async fn idempotency_keys_are_scoped_per_user() {
        let f = fixture().await;
        let ann = f.svc.log_meal(log(&f, Some("same"))).await.unwrap();
        let mut bob_input = log(&f, Some("same"));
        bob_input.user_id = f.bob;
        let bob = f.svc.log_meal(bob_input).await.unwrap();

        assert!(bob.created);
        assert_ne!(ann.entry.meal.id, bob.entry.meal.id);
    }

    #[tokio::test]
    async fn unknown_food_and_bad_servings_are_rejected() {
        let f = fixture().await;

        let mut input = log(&f, None);
        input.food_id = 999;
        assert!(matches!(
            f.svc.log_meal(input).await,
            Err(DomainError::NotFound { entity: "Food", .. })
        ));

        let mut input = log(&f, None);
        input.servings = 0.0;
        assert!(matches!(f.svc.log_meal(input).await, Err(DomainError::Validation(_))));

        let mut input = log(&f, None);
        input.servings = 1e308;
        assert!(matches!(f.svc.log_meal(input).await, Err(DomainError::Validation(_))));
    }

    #[tokio::test]
    async fn other_users_meals_look_missing() {
        let f = fixture().await;
        let meal_id = f.svc.log_meal(log(&f, None)).await.unwrap().entry.meal.id;

        assert!(f.svc.get(f.ann, meal_id).await.is_ok());
        assert!(matches!(
            f.svc.get(f.bob, meal_id).await,
            Err(DomainError::NotFound { .. })
        ));
        assert!(matches!(
            f.svc.update(f.bob, meal_id, UpdateMealDto::default()).await,
            Err(DomainError::NotFound { .. })
        ));
        assert!(matches!(
            f.svc.delete(f.bob, meal_id).await,
            Err(DomainError::NotFound { .. })
        ));
        assert!(f.repos.meals().find_by_id(meal_id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn owner_can_update_and_delete() {
        let f = fixture().await;
        let meal_id = f.svc.log_meal(log(&f, None)).await.unwrap().entry.meal.id;

        let updated = f
            .svc
            .update(
                f.ann,
                meal_id,
                UpdateMealDto {
                    servings: Some(1.0),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.meal.servings, 1.0);
        assert_eq!(updated.nutrients().calories, 95.0);

        let bad = UpdateMealDto {
            servings: Some(-1.0),
            ..Default::default()
        };
        assert!(matches!(
            f.svc.update(f.ann, meal_id, bad).await,
            Err(DomainError::Validation(_))
        ));

        f.svc.delete(f.ann, meal_id).await.unwrap();
        assert!(matches!(
            f.svc.get(f.ann, meal_id).await,
            Err(DomainError::NotFound { .. })
        ));
    }
}
