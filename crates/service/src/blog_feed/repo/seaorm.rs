use chrono::{DateTime, FixedOffset};
use sea_orm::DatabaseConnection;

use crate::blog_feed::domain::{BlogFeedEdit, BlogFeedRow, CategoryRow, ListPage, ListQuery, NewBlogFeed};
use crate::blog_feed::repository::BlogFeedRepository;
use crate::db::blog_feed_service;
use crate::errors::ServiceError;

/// SeaORM-backed repository implementation.
pub struct SeaOrmBlogFeedRepository {
    pub db: DatabaseConnection,
}

#[async_trait::async_trait]
impl BlogFeedRepository for SeaOrmBlogFeedRepository {
    async fn list(&self, query: &ListQuery) -> Result<ListPage, ServiceError> {
        blog_feed_service::list_blog_feeds(&self.db, query).await
    }

    async fn categories_by_status(&self, statuses: &[String]) -> Result<Vec<CategoryRow>, ServiceError> {
        blog_feed_service::list_categories(&self.db, statuses).await
    }

    async fn count_live_with_url(&self, feed_url: &str, deleted_status: &str, exclude_id: Option<i64>) -> Result<u64, ServiceError> {
        blog_feed_service::count_live_with_url(&self.db, feed_url, deleted_status, exclude_id).await
    }

    async fn add(&self, feed: NewBlogFeed) -> Result<u64, ServiceError> {
        blog_feed_service::create_blog_feed(&self.db, feed).await
    }

    async fn fetch(&self, id: i64, status: &str) -> Result<Option<BlogFeedRow>, ServiceError> {
        blog_feed_service::get_blog_feed(&self.db, id, status).await
    }

    async fn edit(&self, edit: BlogFeedEdit) -> Result<u64, ServiceError> {
        blog_feed_service::update_blog_feed(&self.db, edit).await
    }

    async fn update_status(&self, id: i64, status: &str, at: DateTime<FixedOffset>) -> Result<u64, ServiceError> {
        blog_feed_service::set_blog_feed_status(&self.db, &[id], status, at).await
    }

    async fn set_status_many(&self, ids: &[i64], status: &str, at: DateTime<FixedOffset>) -> Result<u64, ServiceError> {
        blog_feed_service::set_blog_feed_status(&self.db, ids, status, at).await
    }
}
