pub mod errors;
pub mod db;
pub mod status;
pub mod blog_category;
pub mod blog_feed;
