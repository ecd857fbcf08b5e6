use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};

use super::domain::{BlogFeedEdit, BlogFeedRow, CategoryRow, ListPage, ListQuery, NewBlogFeed};
use crate::errors::ServiceError;

/// Persistence port for blog feeds. Counts returned are rows affected/matched.
#[async_trait]
pub trait BlogFeedRepository: Send + Sync {
    async fn list(&self, query: &ListQuery) -> Result<ListPage, ServiceError>;
    async fn categories_by_status(&self, statuses: &[String]) -> Result<Vec<CategoryRow>, ServiceError>;
    /// Rows with `feed_url` whose status differs from `deleted_status`, skipping `exclude_id`.
    async fn count_live_with_url(&self, feed_url: &str, deleted_status: &str, exclude_id: Option<i64>) -> Result<u64, ServiceError>;
    async fn add(&self, feed: NewBlogFeed) -> Result<u64, ServiceError>;
    async fn fetch(&self, id: i64, status: &str) -> Result<Option<BlogFeedRow>, ServiceError>;
    async fn edit(&self, edit: BlogFeedEdit) -> Result<u64, ServiceError>;
    async fn update_status(&self, id: i64, status: &str, at: DateTime<FixedOffset>) -> Result<u64, ServiceError>;
    async fn set_status_many(&self, ids: &[i64], status: &str, at: DateTime<FixedOffset>) -> Result<u64, ServiceError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use crate::blog_feed::domain::SortField;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct State {
        feeds: Vec<BlogFeedRow>,
        categories: Vec<(CategoryRow, String)>,
        next_id: i64,
    }

    /// Keeps rows in memory and counts every call per operation.
    #[derive(Default)]
    pub struct MockBlogFeedRepository {
        state: Mutex<State>,
        calls: Mutex<HashMap<&'static str, usize>>,
        total_calls: AtomicUsize,
        fail_writes: Mutex<bool>,
        conflict_writes: Mutex<bool>,
    }

    impl MockBlogFeedRepository {
        pub fn new() -> Self { Self::default() }

        pub fn with_category(self, id: i64, name: &str, status: &str) -> Self {
            self.state.lock().unwrap().categories.push((CategoryRow { id, name: name.to_string() }, status.to_string()));
            self
        }

        /// Insert a row directly, bypassing call accounting. Returns its id.
        pub fn seed(&self, category_id: i64, feed_url: &str, status: &str, at: DateTime<FixedOffset>) -> i64 {
            let mut st = self.state.lock().unwrap();
            st.next_id += 1;
            let id = st.next_id;
            let category_name = st.categories.iter().find(|(c, _)| c.id == category_id).map(|(c, _)| c.name.clone());
            st.feeds.push(BlogFeedRow {
                id,
                category_id,
                category_name,
                feed_url: feed_url.to_string(),
                status: status.to_string(),
                created_at: at,
                updated_at: at,
            });
            id
        }

        /// Make every write report zero affected rows.
        pub fn fail_writes(&self) { *self.fail_writes.lock().unwrap() = true; }

        /// Make add and edit fail the way a unique index violation does.
        pub fn conflict_writes(&self) { *self.conflict_writes.lock().unwrap() = true; }

        pub fn rows(&self) -> Vec<BlogFeedRow> { self.state.lock().unwrap().feeds.clone() }

        pub fn row(&self, id: i64) -> Option<BlogFeedRow> {
            self.state.lock().unwrap().feeds.iter().find(|f| f.id == id).cloned()
        }

        pub fn calls(&self, op: &str) -> usize { *self.calls.lock().unwrap().get(op).unwrap_or(&0) }

        pub fn total_calls(&self) -> usize { self.total_calls.load(Ordering::SeqCst) }

        fn record(&self, op: &'static str) {
            *self.calls.lock().unwrap().entry(op).or_insert(0) += 1;
            self.total_calls.fetch_add(1, Ordering::SeqCst);
        }

        fn writes_fail(&self) -> bool { *self.fail_writes.lock().unwrap() }

        fn conflict(&self) -> Result<(), ServiceError> {
            if *self.conflict_writes.lock().unwrap() {
                return Err(ServiceError::Conflict("uniq_blog_feed_live_url".into()));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl BlogFeedRepository for MockBlogFeedRepository {
        async fn list(&self, query: &ListQuery) -> Result<ListPage, ServiceError> {
            self.record("list");
            let st = self.state.lock().unwrap();
            let needle = query.search.as_ref().map(|s| s.to_lowercase());
            let mut rows: Vec<BlogFeedRow> = st
                .feeds
                .iter()
                .filter(|f| f.status != query.exclude_status)
                .filter(|f| query.status.as_ref().map_or(true, |s| &f.status == s))
                .filter(|f| {
                    needle.as_ref().map_or(true, |n| {
                        f.feed_url.to_lowercase().contains(n)
                            || f.category_name.as_ref().is_some_and(|c| c.to_lowercase().contains(n))
                    })
                })
                .cloned()
                .collect();
            rows.sort_by(|a, b| {
                let ord = match query.sort.field {
                    SortField::Id => a.id.cmp(&b.id),
                    SortField::FeedUrl => a.feed_url.cmp(&b.feed_url),
                    SortField::CategoryName => a.category_name.cmp(&b.category_name),
                    SortField::Status => a.status.cmp(&b.status),
                    SortField::CreatedAt => a.created_at.cmp(&b.created_at),
                    SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
                };
                if query.sort.descending { ord.reverse() } else { ord }
            });
            let total = rows.len() as u64;
            let (_, per_page) = query.pagination.normalize();
            let rows = rows
                .into_iter()
                .skip(query.pagination.offset() as usize)
                .take(per_page as usize)
                .collect();
            Ok(ListPage { rows, total })
        }

        async fn categories_by_status(&self, statuses: &[String]) -> Result<Vec<CategoryRow>, ServiceError> {
            self.record("categories_by_status");
            let st = self.state.lock().unwrap();
            Ok(st
                .categories
                .iter()
                .filter(|(_, s)| statuses.contains(s))
                .map(|(c, _)| c.clone())
                .collect())
        }

        async fn count_live_with_url(&self, feed_url: &str, deleted_status: &str, exclude_id: Option<i64>) -> Result<u64, ServiceError> {
            self.record("count_live_with_url");
            let st = self.state.lock().unwrap();
            Ok(st
                .feeds
                .iter()
                .filter(|f| f.feed_url == feed_url && f.status != deleted_status && Some(f.id) != exclude_id)
                .count() as u64)
        }

        async fn add(&self, feed: NewBlogFeed) -> Result<u64, ServiceError> {
            self.record("add");
            self.conflict()?;
            if self.writes_fail() { return Ok(0); }
            let mut st = self.state.lock().unwrap();
            st.next_id += 1;
            let id = st.next_id;
            let category_name = st.categories.iter().find(|(c, _)| c.id == feed.category_id).map(|(c, _)| c.name.clone());
            st.feeds.push(BlogFeedRow {
                id,
                category_id: feed.category_id,
                category_name,
                feed_url: feed.feed_url,
                status: feed.status,
                created_at: feed.created_at,
                updated_at: feed.updated_at,
            });
            Ok(1)
        }

        async fn fetch(&self, id: i64, status: &str) -> Result<Option<BlogFeedRow>, ServiceError> {
            self.record("fetch");
            let st = self.state.lock().unwrap();
            Ok(st.feeds.iter().find(|f| f.id == id && f.status == status).cloned())
        }

        async fn edit(&self, edit: BlogFeedEdit) -> Result<u64, ServiceError> {
            self.record("edit");
            self.conflict()?;
            if self.writes_fail() { return Ok(0); }
            let mut st = self.state.lock().unwrap();
            let category_name = st.categories.iter().find(|(c, _)| c.id == edit.category_id).map(|(c, _)| c.name.clone());
            match st.feeds.iter_mut().find(|f| f.id == edit.id) {
                Some(f) => {
                    f.category_id = edit.category_id;
                    f.category_name = category_name;
                    f.feed_url = edit.feed_url;
                    f.updated_at = edit.updated_at;
                    Ok(1)
                }
                None => Ok(0),
            }
        }

        async fn update_status(&self, id: i64, status: &str, at: DateTime<FixedOffset>) -> Result<u64, ServiceError> {
            self.record("update_status");
            if self.writes_fail() { return Ok(0); }
            let mut st = self.state.lock().unwrap();
            match st.feeds.iter_mut().find(|f| f.id == id) {
                Some(f) => {
                    f.status = status.to_string();
                    f.updated_at = at;
                    Ok(1)
                }
                None => Ok(0),
            }
        }

        async fn set_status_many(&self, ids: &[i64], status: &str, at: DateTime<FixedOffset>) -> Result<u64, ServiceError> {
            self.record("set_status_many");
            if self.writes_fail() { return Ok(0); }
            let mut st = self.state.lock().unwrap();
            let mut n = 0;
            for f in st.feeds.iter_mut().filter(|f| ids.contains(&f.id)) {
                f.status = status.to_string();
                f.updated_at = at;
                n += 1;
            }
            Ok(n)
        }
    }
}
