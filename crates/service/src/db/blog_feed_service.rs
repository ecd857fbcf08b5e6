use chrono::{DateTime, FixedOffset};
use sea_orm::{
    sea_query::{Expr, Func, LikeExpr},
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, Order, PaginatorTrait, QueryFilter, QueryOrder, Select,
};
use models::{blog_category, blog_feed};

use crate::blog_feed::domain::{BlogFeedEdit, BlogFeedRow, CategoryRow, ListPage, ListQuery, NewBlogFeed, SortField};
use crate::errors::ServiceError;

fn to_row(feed: blog_feed::Model, category: Option<blog_category::Model>) -> BlogFeedRow {
    BlogFeedRow {
        id: feed.id,
        category_id: feed.category_id,
        category_name: category.map(|c| c.name),
        feed_url: feed.feed_url,
        status: feed.status,
        created_at: feed.created_at,
        updated_at: feed.updated_at,
    }
}

fn filtered(query: &ListQuery) -> Select<blog_feed::Entity> {
    let mut select = blog_feed::Entity::find()
        .filter(blog_feed::Column::Status.ne(query.exclude_status.clone()));
    if let Some(s) = &query.status {
        select = select.filter(blog_feed::Column::Status.eq(s.clone()));
    }
    select
}

/// Lowercased `%term%` with `%`, `_` and `\` escaped so the term matches literally.
fn contains_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.to_lowercase().chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

/// List live feeds with category names, filtered, sorted and paged.
pub async fn list_blog_feeds(db: &DatabaseConnection, query: &ListQuery) -> Result<ListPage, ServiceError> {
    let mut select = filtered(query).find_also_related(blog_category::Entity);
    if let Some(term) = &query.search {
        let pattern = LikeExpr::new(contains_pattern(term)).escape('\\');
        select = select.filter(
            Condition::any()
                .add(Expr::expr(Func::lower(Expr::col((blog_feed::Entity, blog_feed::Column::FeedUrl)))).like(pattern.clone()))
                .add(Expr::expr(Func::lower(Expr::col((blog_category::Entity, blog_category::Column::Name)))).like(pattern)),
        );
    }
    let order = if query.sort.descending { Order::Desc } else { Order::Asc };
    select = match query.sort.field {
        SortField::Id => select.order_by(blog_feed::Column::Id, order),
        SortField::FeedUrl => select.order_by(blog_feed::Column::FeedUrl, order),
        SortField::CategoryName => select.order_by(blog_category::Column::Name, order),
        SortField::Status => select.order_by(blog_feed::Column::Status, order),
        SortField::CreatedAt => select.order_by(blog_feed::Column::CreatedAt, order),
        SortField::UpdatedAt => select.order_by(blog_feed::Column::UpdatedAt, order),
    };
    if query.sort.field != SortField::Id {
        select = select.order_by_desc(blog_feed::Column::Id);
    }

    let (page_idx, per_page) = query.pagination.normalize();
    let paginator = select.paginate(db, per_page);
    let total = paginator.num_items().await?;
    let rows = paginator
        .fetch_page(page_idx)
        .await?
        .into_iter()
        .map(|(f, c)| to_row(f, c))
        .collect();
    Ok(ListPage { rows, total })
}

/// Categories whose status is one of `statuses`.
pub async fn list_categories(db: &DatabaseConnection, statuses: &[String]) -> Result<Vec<CategoryRow>, ServiceError> {
    let rows = blog_category::list_by_status(db, statuses).await?;
    Ok(rows.into_iter().map(|c| CategoryRow { id: c.id, name: c.name }).collect())
}

/// Count non-deleted feeds using `feed_url`, optionally ignoring one id.
pub async fn count_live_with_url(
    db: &DatabaseConnection,
    feed_url: &str,
    deleted_status: &str,
    exclude_id: Option<i64>,
) -> Result<u64, ServiceError> {
    let mut select = blog_feed::Entity::find()
        .filter(blog_feed::Column::FeedUrl.eq(feed_url.to_string()))
        .filter(blog_feed::Column::Status.ne(deleted_status.to_string()));
    if let Some(id) = exclude_id {
        select = select.filter(blog_feed::Column::Id.ne(id));
    }
    Ok(select.count(db).await?)
}

/// Insert a feed; the returned count is 1 on success.
pub async fn create_blog_feed(db: &DatabaseConnection, feed: NewBlogFeed) -> Result<u64, ServiceError> {
    let _created = blog_feed::create(db, feed.category_id, &feed.feed_url, &feed.status, feed.created_at).await?;
    Ok(1)
}

/// Get a feed by id restricted to `status`.
pub async fn get_blog_feed(db: &DatabaseConnection, id: i64, status: &str) -> Result<Option<BlogFeedRow>, ServiceError> {
    let found = blog_feed::Entity::find_by_id(id)
        .filter(blog_feed::Column::Status.eq(status.to_string()))
        .find_also_related(blog_category::Entity)
        .one(db)
        .await?;
    Ok(found.map(|(f, c)| to_row(f, c)))
}

/// Update category, url and `updated_at`; returns rows affected.
pub async fn update_blog_feed(db: &DatabaseConnection, edit: BlogFeedEdit) -> Result<u64, ServiceError> {
    let feed_url = blog_feed::normalize_feed_url(&edit.feed_url)?;
    let res = blog_feed::Entity::update_many()
        .col_expr(blog_feed::Column::CategoryId, Expr::value(edit.category_id))
        .col_expr(blog_feed::Column::FeedUrl, Expr::value(feed_url))
        .col_expr(blog_feed::Column::UpdatedAt, Expr::value(edit.updated_at))
        .filter(blog_feed::Column::Id.eq(edit.id))
        .exec(db)
        .await?;
    Ok(res.rows_affected)
}

/// Set status on the listed feeds; returns rows affected.
pub async fn set_blog_feed_status(
    db: &DatabaseConnection,
    ids: &[i64],
    status: &str,
    at: DateTime<FixedOffset>,
) -> Result<u64, ServiceError> {
    Ok(blog_feed::set_status_many(db, ids, status, at).await?)
}
