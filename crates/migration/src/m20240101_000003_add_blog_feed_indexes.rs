use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// Partial index: soft-deleted rows may share a URL with a live one.
// Server startup rebuilds it when the configured deleted label differs.
const UNIQUE_LIVE_FEED_URL: &str = "CREATE UNIQUE INDEX IF NOT EXISTS uniq_blog_feed_live_url \
    ON blog_feed (feed_url) WHERE status <> 'deleted'";

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(UNIQUE_LIVE_FEED_URL)
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_blog_feed_status")
                    .table(BlogFeed::Table)
                    .col(BlogFeed::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_blog_category_status")
                    .table(BlogCategory::Table)
                    .col(BlogCategory::Status)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_blog_category_status").table(BlogCategory::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_blog_feed_status").table(BlogFeed::Table).to_owned())
            .await?;
        manager
            .get_connection()
            .execute_unprepared("DROP INDEX IF EXISTS uniq_blog_feed_live_url")
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum BlogFeed { Table, Status }

#[derive(DeriveIden)]
enum BlogCategory { Table, Status }
