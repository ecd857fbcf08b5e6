use std::sync::Arc;

use service::blog_feed::BlogFeedService;

use crate::envelope::Responder;

/// Shared, read-only handler state.
#[derive(Clone)]
pub struct AppState {
    pub blog_feeds: Arc<BlogFeedService>,
    pub responder: Arc<Responder>,
}

impl AppState {
    pub fn new(blog_feeds: BlogFeedService, responder: Responder) -> Self {
        Self { blog_feeds: Arc::new(blog_feeds), responder: Arc::new(responder) }
    }
}
