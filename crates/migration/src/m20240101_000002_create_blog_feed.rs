//! Create `blog_feed` table with FK to `blog_category`.
//!
//! Rows are never removed by the application; `status` carries the soft delete.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(BlogFeed::Table)
                    .if_not_exists()
                    .col(big_integer(BlogFeed::Id).auto_increment().primary_key())
                    .col(big_integer(BlogFeed::CategoryId).not_null())
                    .col(string_len(BlogFeed::FeedUrl, 512).not_null())
                    .col(string_len(BlogFeed::Status, 32).not_null())
                    .col(timestamp_with_time_zone(BlogFeed::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(BlogFeed::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_blog_feed_category")
                            .from(BlogFeed::Table, BlogFeed::CategoryId)
                            .to(BlogCategory::Table, BlogCategory::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(BlogFeed::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum BlogFeed { Table, Id, CategoryId, FeedUrl, Status, CreatedAt, UpdatedAt }

#[derive(DeriveIden)]
enum BlogCategory { Table, Id }
