//! Create foods table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Foods::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Foods::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Foods::Name).string_len(200).not_null())
                    .col(ColumnDef::new(Foods::ServingSizeG).double().not_null())
                    .col(ColumnDef::new(Foods::Calories).double().not_null().default(0.0))
                    .col(ColumnDef::new(Foods::ProteinG).double().not_null().default(0.0))
                    .col(ColumnDef::new(Foods::CarbsG).double().not_null().default(0.0))
                    .col(ColumnDef::new(Foods::FatG).double().not_null().default(0.0))
                    .col(
                        ColumnDef::new(Foods::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Foods::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_foods_name")
                    .table(Foods::Table)
                    .col(Foods::Name)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Foods::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Foods {
    Table,
    Id,
    Name,
    ServingSizeG,
    Calories,
    ProteinG,
    CarbsG,
    FatG,
    CreatedAt,
    UpdatedAt,
}
