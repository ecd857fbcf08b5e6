//! Service layer for the blog feed admin module.
//! - Ports (`crypto`, `i18n`, `validation`, `support`) with default adapters.
//! - Repository abstraction over SeaORM with an in-memory mock for tests.
//! - `BlogFeedService` returning `Result<Outcome, DomainError>` per operation.

pub mod errors;
pub mod pagination;
pub mod crypto;
pub mod i18n;
pub mod validation;
pub mod support;
pub mod db;
pub mod blog_feed;
#[cfg(test)]
pub mod test_support;
