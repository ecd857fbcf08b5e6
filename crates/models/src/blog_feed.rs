use sea_orm::{
    entity::prelude::*, sea_query::Expr, ConnectionTrait, DatabaseConnection, DbBackend, Set, Statement, TransactionTrait,
};
use serde::{Deserialize, Serialize};

use crate::{blog_category, errors};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "blog_feed")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub category_id: i64,
    pub feed_url: String,
    pub status: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Category }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Category => Entity::belongs_to(blog_category::Entity)
                .from(Column::CategoryId)
                .to(blog_category::Column::Id)
                .into(),
        }
    }
}

impl Related<blog_category::Entity> for Entity {
    fn to() -> RelationDef { Relation::Category.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// Trim and require a non-empty feed URL.
pub fn normalize_feed_url(u: &str) -> Result<String, errors::ModelError> {
    let trimmed = u.trim();
    if trimmed.is_empty() {
        return Err(errors::ModelError::Validation("feed_url must not be empty".into()));
    }
    Ok(trimmed.to_string())
}

pub async fn create(
    db: &DatabaseConnection,
    category_id: i64,
    feed_url: &str,
    status: &str,
    now: DateTimeWithTimeZone,
) -> Result<Model, errors::ModelError> {
    let feed_url = normalize_feed_url(feed_url)?;
    let am = ActiveModel {
        category_id: Set(category_id),
        feed_url: Set(feed_url),
        status: Set(status.to_string()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    Ok(am.insert(db).await?)
}

/// Set `status` and `updated_at` on every listed row; returns rows affected.
pub async fn set_status_many(
    db: &DatabaseConnection,
    ids: &[i64],
    status: &str,
    now: DateTimeWithTimeZone,
) -> Result<u64, errors::ModelError> {
    if ids.is_empty() { return Ok(0); }
    let res = Entity::update_many()
        .col_expr(Column::Status, Expr::value(status.to_string()))
        .col_expr(Column::UpdatedAt, Expr::value(now))
        .filter(Column::Id.is_in(ids.iter().copied()))
        .exec(db)
        .await?;
    Ok(res.rows_affected)
}

/// Partial unique index keeping urls unique among rows not in the deleted state.
pub const LIVE_URL_INDEX: &str = "uniq_blog_feed_live_url";

fn quote_literal(label: &str) -> String {
    format!("'{}'", label.replace('\'', "''"))
}

pub fn live_url_index_sql(deleted_label: &str) -> String {
    format!(
        "CREATE UNIQUE INDEX IF NOT EXISTS {} ON blog_feed (feed_url) WHERE status <> {}",
        LIVE_URL_INDEX,
        quote_literal(deleted_label)
    )
}

/// Postgres renders the predicate as `((status)::text <> 'label'::text)`.
pub(crate) fn index_excludes(indexdef: &str, deleted_label: &str) -> bool {
    indexdef.contains(&quote_literal(deleted_label))
}

/// Rebuild the live-url index when its predicate names another deleted label.
/// Returns whether the index was (re)created.
pub async fn ensure_live_url_index(db: &DatabaseConnection, deleted_label: &str) -> Result<bool, errors::ModelError> {
    let stmt = Statement::from_sql_and_values(
        DbBackend::Postgres,
        "SELECT indexdef FROM pg_indexes WHERE indexname = $1",
        [LIVE_URL_INDEX.into()],
    );
    let current: Option<String> = match db.query_one(stmt).await? {
        Some(row) => Some(row.try_get("", "indexdef")?),
        None => None,
    };
    if current.as_deref().is_some_and(|d| index_excludes(d, deleted_label)) {
        return Ok(false);
    }

    let txn = db.begin().await?;
    txn.execute_unprepared(&format!("DROP INDEX IF EXISTS {}", LIVE_URL_INDEX)).await?;
    txn.execute_unprepared(&live_url_index_sql(deleted_label)).await?;
    txn.commit().await?;
    tracing::info!(deleted_label, "live feed url index rebuilt");
    Ok(true)
}
