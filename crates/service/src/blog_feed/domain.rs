use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize, Serializer};

use crate::errors::ServiceError;
use crate::i18n::Message;
use crate::pagination::Pagination;

/// A body value that may arrive as a JSON number or a string.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Int(i64),
    Text(String),
}

impl Scalar {
    /// Textual form used for presence checks.
    pub fn as_text(&self) -> String {
        match self {
            Scalar::Int(n) => n.to_string(),
            Scalar::Text(s) => s.clone(),
        }
    }

    pub fn to_i64(&self, field: &str) -> Result<i64, ServiceError> {
        match self {
            Scalar::Int(n) => Ok(*n),
            Scalar::Text(s) => s
                .trim()
                .parse::<i64>()
                .map_err(|_| ServiceError::Validation(format!("{} must be numeric", field))),
        }
    }

    /// Empty strings and zero count as "not provided", like an omitted key.
    fn to_positive_u32(&self, field: &str) -> Result<Option<u32>, ServiceError> {
        if let Scalar::Text(s) = self {
            if s.trim().is_empty() { return Ok(None); }
        }
        let n = self.to_i64(field)?;
        match n {
            0 => Ok(None),
            n if n < 0 || n > u32::MAX as i64 => Err(ServiceError::Validation(format!("{} out of range", field))),
            n => Ok(Some(n as u32)),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListRequest {
    pub page: Option<Scalar>,
    pub limit: Option<Scalar>,
    pub status: Option<String>,
    pub search: Option<String>,
    pub sort: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddRequest {
    pub blog_category_id: Option<Scalar>,
    pub blog_feed_url: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchRequest {
    pub blog_feed_id: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditRequest {
    pub blog_feed_id: Option<String>,
    pub blog_category_id: Option<Scalar>,
    pub blog_feed_url: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusRequest {
    pub blog_feed_id: Option<String>,
    pub status: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteRequest {
    pub blog_feed_id: Option<Vec<String>>,
}

/// Columns a list request may order by.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortField {
    Id,
    FeedUrl,
    CategoryName,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SortSpec {
    pub field: SortField,
    pub descending: bool,
}

impl Default for SortSpec {
    fn default() -> Self { Self { field: SortField::Id, descending: true } }
}

impl SortSpec {
    /// `[-]field`; a leading `-` means descending. Unknown fields (incl. `null`) fall back to newest first.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        let (descending, name) = match raw.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, raw),
        };
        let field = match name {
            "id" | "blogFeedId" => SortField::Id,
            "blogFeedUrl" | "feedUrl" => SortField::FeedUrl,
            "categoryName" => SortField::CategoryName,
            "status" => SortField::Status,
            "createdAt" => SortField::CreatedAt,
            "updatedAt" => SortField::UpdatedAt,
            _ => return Self::default(),
        };
        Self { field, descending }
    }
}

/// Fully resolved list query handed to the repository.
#[derive(Clone, Debug, PartialEq)]
pub struct ListQuery {
    pub pagination: Pagination,
    pub status: Option<String>,
    pub search: Option<String>,
    pub sort: SortSpec,
    /// Rows with this status never appear in listings.
    pub exclude_status: String,
}

impl ListRequest {
    pub fn resolve(self, defaults: configs::ListingConfig, exclude_status: &str) -> Result<ListQuery, ServiceError> {
        let page = match &self.page {
            Some(p) => p.to_positive_u32("page")?.unwrap_or(defaults.page),
            None => defaults.page,
        };
        let limit = match &self.limit {
            Some(l) => l.to_positive_u32("limit")?.unwrap_or(defaults.limit),
            None => defaults.limit,
        };
        let non_empty = |s: Option<String>| s.map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        Ok(ListQuery {
            pagination: Pagination { page, per_page: limit },
            status: non_empty(self.status),
            search: non_empty(self.search),
            sort: SortSpec::parse(self.sort.as_deref().unwrap_or("-null")),
            exclude_status: exclude_status.to_string(),
        })
    }
}

/// Stored feed joined with its category name.
#[derive(Clone, Debug, PartialEq)]
pub struct BlogFeedRow {
    pub id: i64,
    pub category_id: i64,
    pub category_name: Option<String>,
    pub feed_url: String,
    pub status: String,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ListPage {
    pub rows: Vec<BlogFeedRow>,
    /// Matching rows across all pages.
    pub total: u64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CategoryRow {
    pub id: i64,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewBlogFeed {
    pub category_id: i64,
    pub feed_url: String,
    pub status: String,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BlogFeedEdit {
    pub id: i64,
    pub category_id: i64,
    pub feed_url: String,
    pub updated_at: DateTime<FixedOffset>,
}

/// Wire view of a feed; the id is the encrypted token.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogFeedView {
    pub blog_feed_id: String,
    pub blog_category_id: i64,
    pub category_name: Option<String>,
    pub blog_feed_url: String,
    pub status: String,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryView {
    pub blog_category_id: i64,
    pub name: String,
}

impl From<CategoryRow> for CategoryView {
    fn from(c: CategoryRow) -> Self { Self { blog_category_id: c.id, name: c.name } }
}

/// `data` member of the response envelope.
#[derive(Clone, Debug, PartialEq)]
pub enum Payload {
    Empty,
    List { items: Vec<BlogFeedView>, total: u64 },
    Record(BlogFeedView),
    Categories(Vec<CategoryView>),
}

impl Serialize for Payload {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct ListData<'a> { items: &'a [BlogFeedView], total: u64 }

        match self {
            Payload::Empty => s.serialize_str(""),
            Payload::List { items, total } => ListData { items, total: *total }.serialize(s),
            Payload::Record(r) => r.serialize(s),
            Payload::Categories(c) => c.serialize(s),
        }
    }
}

/// Successful result of an operation: what to say and what to return.
#[derive(Clone, Debug, PartialEq)]
pub struct Outcome {
    pub message: Message,
    pub data: Payload,
}

impl Outcome {
    pub fn message(message: Message) -> Self { Self { message, data: Payload::Empty } }

    pub fn with_data(message: Message, data: Payload) -> Self { Self { message, data } }
}
