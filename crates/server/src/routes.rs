pub mod blog_feeds;

use axum::{
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;

use common::types::Health;

use crate::metrics::encode_metrics;
use crate::openapi::ApiDoc;
use crate::state::AppState;

#[utoipa::path(get, path = "/health", responses((status = 200, body = crate::openapi::HealthResponse)), tag = "health")]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn metrics() -> impl IntoResponse {
    encode_metrics()
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Build the full application router: blog feed admin routes plus health, metrics and docs.
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    let blog_feed = Router::new()
        .route("/list", post(blog_feeds::list).options(blog_feeds::list))
        .route(
            "/active-category-list",
            post(blog_feeds::active_category_list).options(blog_feeds::active_category_list),
        )
        .route("/add", post(blog_feeds::add).options(blog_feeds::add))
        .route("/fetch", post(blog_feeds::fetch).options(blog_feeds::fetch))
        .route("/edit", post(blog_feeds::edit).options(blog_feeds::edit))
        .route("/update-status", post(blog_feeds::update_status).options(blog_feeds::update_status))
        .route("/delete", post(blog_feeds::delete).options(blog_feeds::delete));

    Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .route("/api-docs/openapi.json", get(openapi_json))
        .nest("/admin/blog-feed", blog_feed)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
