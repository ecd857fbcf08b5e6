//! Migrator registering entity-specific migrations in dependency order.
//! Indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_blog_category;
mod m20240101_000002_create_blog_feed;
mod m20240101_000003_add_blog_feed_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_blog_category::Migration),
            Box::new(m20240101_000002_create_blog_feed::Migration),
            // Indexes should always be applied last
            Box::new(m20240101_000003_add_blog_feed_indexes::Migration),
        ]
    }
}
