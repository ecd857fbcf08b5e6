//! Create `blog_category` table.
//!
//! Categories are managed elsewhere; feeds only reference them.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(BlogCategory::Table)
                    .if_not_exists()
                    .col(big_integer(BlogCategory::Id).auto_increment().primary_key())
                    .col(string_len(BlogCategory::Name, 128).not_null())
                    .col(string_len(BlogCategory::Status, 32).not_null())
                    .col(timestamp_with_time_zone(BlogCategory::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(BlogCategory::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(BlogCategory::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum BlogCategory { Table, Id, Name, Status, CreatedAt, UpdatedAt }
