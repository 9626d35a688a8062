use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Condition;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

use super::db_err;
use crate::domain::{
    CreateUserDto, DomainError, DomainResult, GetUserDto, UpdateUserDto, User, UserRepository,
    UserRole,
};
use crate::infrastructure::database::entities::user;
use crate::shared::{validate_pagination, PaginatedResult};

pub struct SeaOrmUserRepository {
    db: DatabaseConnection,
}

impl SeaOrmUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn find_model(&self, id: i32) -> DomainResult<user::Model> {
        user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or_else(|| DomainError::not_found("User", id))
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn entity_role_to_domain(role: user::UserRole) -> UserRole {
    match role {
        user::UserRole::Admin => UserRole::Admin,
        user::UserRole::User => UserRole::User,
    }
}

fn domain_role_to_entity(role: UserRole) -> user::UserRole {
    match role {
        UserRole::Admin => user::UserRole::Admin,
        UserRole::User => user::UserRole::User,
    }
}

fn user_model_to_domain(model: user::Model) -> User {
    User {
        id: model.id,
        name: model.name,
        email: model.email,
        password_hash: model.password_hash,
        gender: model.gender,
        age: model.age,
        height_cm: model.height_cm,
        weight_kg: model.weight_kg,
        activity_level: model.activity_level,
        daily_calorie_goal: model.daily_calorie_goal,
        role: entity_role_to_domain(model.role),
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

// ── Repository implementation ───────────────────────────────────

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn create_user(&self, dto: CreateUserDto) -> DomainResult<User> {
        let now = Utc::now();
        let profile = dto.profile;

        let new_user = user::ActiveModel {
            name: Set(dto.name),
            email: Set(dto.email),
            password_hash: Set(dto.password_hash),
            gender: Set(profile.gender),
            age: Set(profile.age),
            height_cm: Set(profile.height_cm),
            weight_kg: Set(profile.weight_kg),
            activity_level: Set(profile.activity_level),
            daily_calorie_goal: Set(profile.daily_calorie_goal),
            role: Set(domain_role_to_entity(dto.role)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = new_user.insert(&self.db).await.map_err(|e| {
            if e.to_string().contains("UNIQUE") || e.to_string().contains("duplicate") {
                DomainError::Conflict("Email already registered".to_string())
            } else {
                db_err(e)
            }
        })?;

        Ok(user_model_to_domain(model))
    }

    async fn list_users(&self, dto: GetUserDto) -> DomainResult<PaginatedResult<User>> {
        let pagination = validate_pagination(dto.page, dto.limit);

        let mut query = user::Entity::find();

        if let Some(ref search) = dto.search {
            query = query.filter(
                Condition::any()
                    .add(user::Column::Name.contains(search))
                    .add(user::Column::Email.contains(search)),
            );
        }

        if let Some(role) = dto.role {
            query = query.filter(user::Column::Role.eq(domain_role_to_entity(role)));
        }

        let total = query.clone().count(&self.db).await.map_err(db_err)?;

        let models = query
            .order_by_asc(user::Column::Id)
            .offset(pagination.offset())
            .limit(pagination.limit as u64)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        let items: Vec<User> = models.into_iter().map(user_model_to_domain).collect();

        Ok(PaginatedResult::new(
            items,
            total,
            pagination.page,
            pagination.limit,
        ))
    }

    async fn get_user_by_id(&self, id: i32) -> DomainResult<Option<User>> {
        let model = user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(model.map(user_model_to_domain))
    }

    async fn get_user_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        let model = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(model.map(user_model_to_domain))
    }

    async fn count_users(&self) -> DomainResult<u64> {
        user::Entity::find().count(&self.db).await.map_err(db_err)
    }

    async fn update_user(&self, id: i32, dto: UpdateUserDto) -> DomainResult<User> {
        let existing = self.find_model(id).await?;
        let mut active: user::ActiveModel = existing.into();
        let profile = dto.profile;

        if let Some(name) = dto.name {
            active.name = Set(name);
        }
        if let Some(gender) = profile.gender {
            active.gender = Set(Some(gender));
        }
        if let Some(age) = profile.age {
            active.age = Set(Some(age));
        }
        if let Some(height) = profile.height_cm {
            active.height_cm = Set(Some(height));
        }
        if let Some(weight) = profile.weight_kg {
            active.weight_kg = Set(Some(weight));
        }
        if let Some(level) = profile.activity_level {
            active.activity_level = Set(Some(level));
        }
        if let Some(goal) = profile.daily_calorie_goal {
            active.daily_calorie_goal = Set(Some(goal));
        }
        active.updated_at = Set(Utc::now());

        let model = active.update(&self.db).await.map_err(db_err)?;
        Ok(user_model_to_domain(model))
    }

    async fn update_role(&self, id: i32, role: UserRole) -> DomainResult<User> {
        let existing = self.find_model(id).await?;
        let mut active: user::ActiveModel = existing.into();
        active.role = Set(domain_role_to_entity(role));
        active.updated_at = Set(Utc::now());

        let model = active.update(&self.db).await.map_err(db_err)?;
        Ok(user_model_to_domain(model))
    }
}
