//! `/admin/blog-feed/*` handlers. Each answers POST and OPTIONS with an envelope.

use std::future::Future;
use std::sync::Arc;

use axum::{body::Bytes, extract::State, http::Method, Json};
use common::types::Envelope;
use serde::de::{DeserializeOwned, IgnoredAny};
use service::blog_feed::domain::{
    AddRequest, DeleteRequest, EditRequest, FetchRequest, ListRequest, Outcome, UpdateStatusRequest,
};
use service::blog_feed::errors::DomainError;
use service::blog_feed::BlogFeedService;
use service::errors::ServiceError;

use crate::metrics;
use crate::state::AppState;

/// Empty or whitespace-only bodies read as `{}`.
fn parse_body<T: DeserializeOwned + Default>(body: &[u8]) -> Result<T, ServiceError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body).map_err(|e| ServiceError::BadRequest(e.to_string()))
}

async fn dispatch<T, F, Fut>(state: &AppState, operation: &'static str, method: Method, body: Bytes, call: F) -> Json<Envelope>
where
    T: DeserializeOwned + Default,
    F: FnOnce(Arc<BlogFeedService>, T) -> Fut,
    Fut: Future<Output = Result<Outcome, DomainError>>,
{
    if method == Method::OPTIONS {
        metrics::record(operation, "options");
        return Json(state.responder.options());
    }

    let timer = metrics::REQUEST_DURATION.with_label_values(&[operation]).start_timer();
    let result = match parse_body::<T>(&body) {
        Ok(req) => call(Arc::clone(&state.blog_feeds), req).await,
        Err(e) => Err(e.into()),
    };
    timer.observe_duration();
    metrics::record(operation, result.as_ref().map_or_else(DomainError::kind, |_| "success"));
    Json(state.responder.render(operation, result))
}

#[utoipa::path(
    post,
    path = "/admin/blog-feed/list",
    request_body = crate::openapi::ListRequestDoc,
    responses((status = 200, description = "Page of feeds as {items, total}", body = crate::openapi::EnvelopeDoc)),
    tag = "blog-feed"
)]
pub async fn list(State(state): State<AppState>, method: Method, body: Bytes) -> Json<Envelope> {
    dispatch(&state, "list", method, body, |svc, req: ListRequest| async move { svc.list(req).await }).await
}

#[utoipa::path(
    post,
    path = "/admin/blog-feed/active-category-list",
    responses((status = 200, description = "Active categories", body = crate::openapi::EnvelopeDoc)),
    tag = "blog-feed"
)]
pub async fn active_category_list(State(state): State<AppState>, method: Method, body: Bytes) -> Json<Envelope> {
    dispatch(&state, "active_category_list", method, body, |svc, _: IgnoredAny| async move {
        svc.active_categories().await
    })
    .await
}

#[utoipa::path(
    post,
    path = "/admin/blog-feed/add",
    request_body = crate::openapi::AddRequestDoc,
    responses((status = 200, body = crate::openapi::EnvelopeDoc)),
    tag = "blog-feed"
)]
pub async fn add(State(state): State<AppState>, method: Method, body: Bytes) -> Json<Envelope> {
    dispatch(&state, "add", method, body, |svc, req: AddRequest| async move { svc.add(req).await }).await
}

#[utoipa::path(
    post,
    path = "/admin/blog-feed/fetch",
    request_body = crate::openapi::FetchRequestDoc,
    responses((status = 200, description = "A single active feed", body = crate::openapi::EnvelopeDoc)),
    tag = "blog-feed"
)]
pub async fn fetch(State(state): State<AppState>, method: Method, body: Bytes) -> Json<Envelope> {
    dispatch(&state, "fetch", method, body, |svc, req: FetchRequest| async move { svc.fetch(req).await }).await
}

#[utoipa::path(
    post,
    path = "/admin/blog-feed/edit",
    request_body = crate::openapi::EditRequestDoc,
    responses((status = 200, body = crate::openapi::EnvelopeDoc)),
    tag = "blog-feed"
)]
pub async fn edit(State(state): State<AppState>, method: Method, body: Bytes) -> Json<Envelope> {
    dispatch(&state, "edit", method, body, |svc, req: EditRequest| async move { svc.edit(req).await }).await
}

#[utoipa::path(
    post,
    path = "/admin/blog-feed/update-status",
    request_body = crate::openapi::UpdateStatusRequestDoc,
    responses((status = 200, body = crate::openapi::EnvelopeDoc)),
    tag = "blog-feed"
)]
pub async fn update_status(State(state): State<AppState>, method: Method, body: Bytes) -> Json<Envelope> {
    dispatch(&state, "update_status", method, body, |svc, req: UpdateStatusRequest| async move {
        svc.update_status(req).await
    })
    .await
}

#[utoipa::path(
    post,
    path = "/admin/blog-feed/delete",
    request_body = crate::openapi::DeleteRequestDoc,
    responses((status = 200, body = crate::openapi::EnvelopeDoc)),
    tag = "blog-feed"
)]
pub async fn delete(State(state): State<AppState>, method: Method, body: Bytes) -> Json<Envelope> {
    dispatch(&state, "delete", method, body, |svc, req: DeleteRequest| async move { svc.delete(req).await }).await
}
