//! Create meals table

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_users::Users;
use super::m20240101_000002_create_foods::Foods;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Meals::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Meals::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Meals::UserId).integer().not_null())
                    .col(ColumnDef::new(Meals::FoodId).integer().not_null())
                    .col(ColumnDef::new(Meals::Servings).double().not_null())
                    .col(
                        ColumnDef::new(Meals::ConsumedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Meals::Notes).string_len(500))
                    .col(ColumnDef::new(Meals::IdempotencyKey).string_len(255))
                    .col(
                        ColumnDef::new(Meals::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Meals::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_meals_user")
                            .from(Meals::Table, Meals::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_meals_food")
                            .from(Meals::Table, Meals::FoodId)
                            .to(Foods::Table, Foods::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Analytics scans meals per user over a time range
        manager
            .create_index(
                Index::create()
                    .name("idx_meals_user_consumed_at")
                    .table(Meals::Table)
                    .col(Meals::UserId)
                    .col(Meals::ConsumedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_meals_user_idempotency_key")
                    .table(Meals::Table)
                    .col(Meals::UserId)
                    .col(Meals::IdempotencyKey)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Meals::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Meals {
    Table,
    Id,
    UserId,
    FoodId,
    Servings,
    ConsumedAt,
    Notes,
    IdempotencyKey,
    CreatedAt,
    UpdatedAt,
}
