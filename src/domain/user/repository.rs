use async_trait::async_trait;

use super::{CreateUserDto, GetUserDto, UpdateUserDto, User, UserRole};
use crate::domain::DomainResult;
use crate::shared::PaginatedResult;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create_user(&self, dto: CreateUserDto) -> DomainResult<User>;

    async fn list_users(&self, dto: GetUserDto) -> DomainResult<PaginatedResult<User>>;
    async fn get_user_by_id(&self, id: i32) -> DomainResult<Option<User>>;
    async fn get_user_by_email(&self, email: &str) -> DomainResult<Option<User>>;
    async fn count_users(&self) -> DomainResult<u64>;

    async fn update_user(&self, id: i32, dto: UpdateUserDto) -> DomainResult<User>;
    async fn update_role(&self, id: i32, role: UserRole) -> DomainResult<User>;
}
