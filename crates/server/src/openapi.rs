use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

/// `{status: "success"|"error", msg, data}`; always sent with HTTP 200.
#[derive(ToSchema)]
pub struct EnvelopeDoc {
    pub status: String,
    pub msg: String,
    #[schema(value_type = Object)]
    pub data: serde_json::Value,
}

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct ListRequestDoc {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub status: Option<String>,
    pub search: Option<String>,
    /// `[-]field`, e.g. `-createdAt`.
    pub sort: Option<String>,
}

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct AddRequestDoc { pub blog_category_id: i64, pub blog_feed_url: String }

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct FetchRequestDoc { pub blog_feed_id: String }

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct EditRequestDoc { pub blog_feed_id: String, pub blog_category_id: i64, pub blog_feed_url: String }

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct UpdateStatusRequestDoc { pub blog_feed_id: String, pub status: String }

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct DeleteRequestDoc { pub blog_feed_id: Vec<String> }

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::blog_feeds::list,
        crate::routes::blog_feeds::active_category_list,
        crate::routes::blog_feeds::add,
        crate::routes::blog_feeds::fetch,
        crate::routes::blog_feeds::edit,
        crate::routes::blog_feeds::update_status,
        crate::routes::blog_feeds::delete,
    ),
    components(
        schemas(
            HealthResponse,
            EnvelopeDoc,
            ListRequestDoc,
            AddRequestDoc,
            FetchRequestDoc,
            EditRequestDoc,
            UpdateStatusRequestDoc,
            DeleteRequestDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "blog-feed")
    )
)]
pub struct ApiDoc;
