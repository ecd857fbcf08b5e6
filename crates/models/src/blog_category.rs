use sea_orm::{entity::prelude::*, Set, DatabaseConnection, QueryOrder};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "blog_category")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub status: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { BlogFeed }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::BlogFeed => Entity::has_many(crate::blog_feed::Entity).into(),
        }
    }
}

impl Related<crate::blog_feed::Entity> for Entity {
    fn to() -> RelationDef { Relation::BlogFeed.def() }
}

impl ActiveModelBehavior for ActiveModel {}

pub async fn create(db: &DatabaseConnection, name: &str, status: &str) -> Result<Model, errors::ModelError> {
    if name.trim().is_empty() { return Err(errors::ModelError::Validation("category name required".into())); }
    let now = Utc::now().into();
    let am = ActiveModel {
        name: Set(name.trim().to_string()),
        status: Set(status.to_string()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    Ok(am.insert(db).await?)
}

/// Categories whose status is one of `statuses`, ordered by name.
pub async fn list_by_status(db: &DatabaseConnection, statuses: &[String]) -> Result<Vec<Model>, errors::ModelError> {
    let rows = Entity::find()
        .filter(Column::Status.is_in(statuses.iter().cloned()))
        .order_by_asc(Column::Name)
        .all(db)
        .await?;
    Ok(rows)
}
