pub mod blog_feed_service;
