//! Blog feed module: domain types, repository port, and the admin service.

pub mod domain;
pub mod errors;
pub mod repository;
pub mod repo;
pub mod service;

pub use service::{BlogFeedService, ServiceSettings};
