use std::sync::Arc;

use tracing::{debug, info, instrument};

use super::domain::{
    AddRequest, BlogFeedEdit, BlogFeedRow, BlogFeedView, DeleteRequest, EditRequest, FetchRequest, ListRequest,
    NewBlogFeed, Outcome, Payload, Scalar, UpdateStatusRequest,
};
use super::errors::DomainError;
use super::repository::BlogFeedRepository;
use crate::crypto::IdCipher;
use crate::errors::ServiceError;
use crate::i18n::{Message, MessageKey};
use crate::support::{Clock, SystemClock};
use crate::validation::{FieldRules, FieldValidator, RuleValidator};

const FEED_URL_LABEL: &str = "Blog Feed URL";

/// Values the service needs from configuration.
#[derive(Clone, Debug, Default)]
pub struct ServiceSettings {
    pub listing: configs::ListingConfig,
    pub status: configs::StatusLabels,
}

impl From<&configs::AppConfig> for ServiceSettings {
    fn from(c: &configs::AppConfig) -> Self {
        Self { listing: c.listing, status: c.status.clone() }
    }
}

/// Blog feed admin operations, independent of the web framework.
pub struct BlogFeedService<R: BlogFeedRepository + ?Sized = dyn BlogFeedRepository> {
    repo: Arc<R>,
    cipher: Arc<dyn IdCipher>,
    validator: Arc<dyn FieldValidator>,
    clock: Arc<dyn Clock>,
    settings: ServiceSettings,
}

impl<R: BlogFeedRepository + ?Sized> BlogFeedService<R> {
    pub fn new(repo: Arc<R>, cipher: Arc<dyn IdCipher>, settings: ServiceSettings) -> Self {
        Self { repo, cipher, validator: Arc::new(RuleValidator), clock: Arc::new(SystemClock), settings }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_validator(mut self, validator: Arc<dyn FieldValidator>) -> Self {
        self.validator = validator;
        self
    }

    fn view(&self, row: BlogFeedRow) -> BlogFeedView {
        BlogFeedView {
            blog_feed_id: self.cipher.encrypt(row.id),
            blog_category_id: row.category_id,
            category_name: row.category_name,
            blog_feed_url: row.feed_url,
            status: row.status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }

    /// Decrypt a required scalar id; absent or blank means the param is missing.
    fn required_id(&self, token: Option<&str>) -> Result<i64, DomainError> {
        match token {
            Some(t) if !t.is_empty() => Ok(self.cipher.decrypt(t)?),
            _ => Err(DomainError::RequiredParamMissing),
        }
    }

    fn validate_feed_fields(
        &self,
        category: Option<&Scalar>,
        feed_url: Option<&str>,
        category_label: &str,
    ) -> Result<(i64, String), DomainError> {
        let feed_url = feed_url.map(|u| u.trim().to_string());
        let fields = [
            FieldRules::required(
                category.map(Scalar::as_text),
                Message::new(MessageKey::FieldIsRequired).arg(category_label),
            ),
            FieldRules::required(
                feed_url.clone(),
                Message::new(MessageKey::FieldIsRequired).arg("Blog Feed Url"),
            ),
        ];
        self.validator.validate(&fields).map_err(DomainError::Validation)?;
        let category_id = match category {
            Some(c) => c.to_i64("blogCategoryId")?,
            None => return Err(DomainError::RequiredParamMissing),
        };
        Ok((category_id, feed_url.unwrap_or_default()))
    }

    async fn ensure_url_free(&self, feed_url: &str, exclude_id: Option<i64>) -> Result<(), DomainError> {
        let existing = self
            .repo
            .count_live_with_url(feed_url, &self.settings.status.deleted, exclude_id)
            .await?;
        if existing > 0 {
            debug!(%feed_url, existing, "feed url already in use");
            return Err(DomainError::AlreadyExists(FEED_URL_LABEL));
        }
        Ok(())
    }

    /// Page through live feeds. An empty page is still a success.
    #[instrument(skip(self, req))]
    pub async fn list(&self, req: ListRequest) -> Result<Outcome, DomainError> {
        let query = req.resolve(self.settings.listing, &self.settings.status.deleted)?;
        let page = self.repo.list(&query).await?;
        debug!(total = page.total, returned = page.rows.len(), "listed blog feeds");
        if page.rows.is_empty() {
            return Ok(Outcome::message(Message::new(MessageKey::NoRecordsFound).arg("blog feeds")));
        }
        let items = page.rows.into_iter().map(|r| self.view(r)).collect();
        Ok(Outcome::with_data(
            Message::new(MessageKey::RecordsFound).arg("Blog Feed"),
            Payload::List { items, total: page.total },
        ))
    }

    /// Categories carrying the active status label.
    #[instrument(skip(self))]
    pub async fn active_categories(&self) -> Result<Outcome, DomainError> {
        let rows = self
            .repo
            .categories_by_status(&[self.settings.status.active.clone()])
            .await?;
        if rows.is_empty() {
            return Err(DomainError::NotFound("subcategory"));
        }
        Ok(Outcome::with_data(
            Message::new(MessageKey::RecordsFound).arg("Subcategory"),
            Payload::Categories(rows.into_iter().map(Into::into).collect()),
        ))
    }

    /// Create a feed; status is forced to active and both timestamps set to now.
    ///
    /// # Examples
    /// ```
    /// use service::blog_feed::{BlogFeedService, ServiceSettings, domain::{AddRequest, Scalar}};
    /// use service::blog_feed::repository::mock::MockBlogFeedRepository;
    /// use service::crypto::Sha256IdCipher;
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockBlogFeedRepository::new().with_category(3, "Tech", "active"));
    /// let svc = BlogFeedService::new(repo.clone(), Arc::new(Sha256IdCipher::new("k")), ServiceSettings::default());
    /// let req = AddRequest { blog_category_id: Some(Scalar::Int(3)), blog_feed_url: Some(" http://x.com/feed ".into()) };
    /// tokio_test::block_on(svc.add(req)).unwrap();
    /// assert_eq!(repo.rows()[0].feed_url, "http://x.com/feed");
    /// ```
    #[instrument(skip(self, req))]
    pub async fn add(&self, req: AddRequest) -> Result<Outcome, DomainError> {
        if req.blog_category_id.is_none() || req.blog_feed_url.is_none() {
            return Err(DomainError::RequiredParamMissing);
        }
        let (category_id, feed_url) = self.validate_feed_fields(
            req.blog_category_id.as_ref(),
            req.blog_feed_url.as_deref(),
            "Blog Category selection",
        )?;
        self.ensure_url_free(&feed_url, None).await?;

        let now = self.clock.now();
        let added = self
            .repo
            .add(NewBlogFeed {
                category_id,
                feed_url: feed_url.clone(),
                status: self.settings.status.active.clone(),
                created_at: now,
                updated_at: now,
            })
            .await;
        match added {
            Ok(n) if n > 0 => {
                info!(category_id, %feed_url, "blog_feed_added");
                Ok(Outcome::message(Message::new(MessageKey::DataAdded).arg("Record")))
            }
            Ok(_) => Err(DomainError::OperationFailed(MessageKey::DataAddedError)),
            Err(ServiceError::Conflict(_)) => Err(DomainError::AlreadyExists(FEED_URL_LABEL)),
            Err(e) => Err(e.into()),
        }
    }

    /// Active feed by encrypted id.
    #[instrument(skip(self, req))]
    pub async fn fetch(&self, req: FetchRequest) -> Result<Outcome, DomainError> {
        let id = self.required_id(req.blog_feed_id.as_deref())?;
        match self.repo.fetch(id, &self.settings.status.active).await? {
            Some(row) => Ok(Outcome::with_data(
                Message::new(MessageKey::RecordsFound).arg("Blog Feed"),
                Payload::Record(self.view(row)),
            )),
            None => Err(DomainError::NotFound("blog feed")),
        }
    }

    /// Change category and url; the record's own url does not count as a duplicate.
    #[instrument(skip(self, req))]
    pub async fn edit(&self, req: EditRequest) -> Result<Outcome, DomainError> {
        let id = self.required_id(req.blog_feed_id.as_deref())?;
        let (category_id, feed_url) = self.validate_feed_fields(
            req.blog_category_id.as_ref(),
            req.blog_feed_url.as_deref(),
            "Blog Category Selection",
        )?;
        self.ensure_url_free(&feed_url, Some(id)).await?;

        let edited = self
            .repo
            .edit(BlogFeedEdit { id, category_id, feed_url, updated_at: self.clock.now() })
            .await;
        match edited {
            Ok(n) if n > 0 => {
                info!(id, category_id, "blog_feed_updated");
                Ok(Outcome::message(Message::new(MessageKey::DataUpdated).arg("Record")))
            }
            Ok(_) => Err(DomainError::OperationFailed(MessageKey::DataUpdatedError)),
            Err(ServiceError::Conflict(_)) => Err(DomainError::AlreadyExists(FEED_URL_LABEL)),
            Err(e) => Err(e.into()),
        }
    }

    /// Store the given status as-is. Only the active label gets the "activated"
    /// wording; every other value is reported as "inactivated".
    #[instrument(skip(self, req))]
    pub async fn update_status(&self, req: UpdateStatusRequest) -> Result<Outcome, DomainError> {
        let status = match req.status.as_deref() {
            Some(s) if !s.is_empty() => s.to_string(),
            _ => return Err(DomainError::RequiredParamMissing),
        };
        let id = self.required_id(req.blog_feed_id.as_deref())?;

        let updated = self.repo.update_status(id, &status, self.clock.now()).await?;
        let (success, failure) = if status == self.settings.status.active {
            (MessageKey::DataActivated, MessageKey::DataActivatedError)
        } else {
            (MessageKey::DataInactivated, MessageKey::DataInactivatedError)
        };
        if updated > 0 {
            info!(id, %status, "blog_feed_status_updated");
            Ok(Outcome::message(Message::new(success).arg("Record")))
        } else {
            Err(DomainError::OperationFailed(failure))
        }
    }

    /// Soft-delete every listed feed with one shared timestamp.
    #[instrument(skip(self, req))]
    pub async fn delete(&self, req: DeleteRequest) -> Result<Outcome, DomainError> {
        let tokens = match req.blog_feed_id {
            Some(t) if !t.is_empty() => t,
            _ => return Err(DomainError::RequiredParamMissing),
        };
        let ids = tokens
            .iter()
            .map(|t| self.cipher.decrypt(t))
            .collect::<Result<Vec<_>, _>>()?;

        let deleted = self
            .repo
            .set_status_many(&ids, &self.settings.status.deleted, self.clock.now())
            .await?;
        if deleted > 0 {
            info!(requested = ids.len(), deleted, "blog_feeds_deleted");
            Ok(Outcome::message(Message::new(MessageKey::DataDeleted).arg("Record(s)")))
        } else {
            Err(DomainError::OperationFailed(MessageKey::DataDeletedError))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blog_feed::repository::mock::MockBlogFeedRepository;
    use crate::crypto::Sha256IdCipher;
    use crate::support::FixedClock;
    use chrono::{DateTime, FixedOffset, TimeZone, Utc};
    use std::sync::Mutex;

    fn at() -> DateTime<FixedOffset> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap().into()
    }

    fn cipher() -> Sha256IdCipher { Sha256IdCipher::new("test-secret") }

    fn setup() -> (Arc<MockBlogFeedRepository>, BlogFeedService<MockBlogFeedRepository>) {
        let repo = Arc::new(
            MockBlogFeedRepository::new()
                .with_category(3, "Tech", "active")
                .with_category(4, "Archive", "inactive"),
        );
        let svc = BlogFeedService::new(repo.clone(), Arc::new(cipher()), ServiceSettings::default())
            .with_clock(Arc::new(FixedClock(at())));
        (repo, svc)
    }

    fn add_req(category: Option<Scalar>, url: Option<&str>) -> AddRequest {
        AddRequest { blog_category_id: category, blog_feed_url: url.map(str::to_string) }
    }

    fn required_label(err: DomainError) -> String {
        match err {
            DomainError::Validation(m) => {
                assert_eq!(m.key, MessageKey::FieldIsRequired);
                m.args[0].clone()
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn add_trims_url_and_forces_active() {
        let (repo, svc) = setup();
        let out = svc.add(add_req(Some(Scalar::Int(3)), Some(" http://x.com/feed "))).await.unwrap();
        assert_eq!(out.message, Message::new(MessageKey::DataAdded).arg("Record"));
        assert_eq!(out.data, Payload::Empty);

        let rows = repo.rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].feed_url, "http://x.com/feed");
        assert_eq!(rows[0].status, "active");
        assert_eq!(rows[0].created_at, at());
        assert_eq!(rows[0].updated_at, at());
    }

    #[tokio::test]
    async fn add_missing_keys_is_required_param_missing() {
        let (repo, svc) = setup();
        for req in [add_req(None, Some("u")), add_req(Some(Scalar::Int(3)), None), add_req(None, None)] {
            assert!(matches!(svc.add(req).await, Err(DomainError::RequiredParamMissing)));
        }
        assert_eq!(repo.total_calls(), 0);
    }

    #[tokio::test]
    async fn add_blank_fields_name_the_missing_field() {
        let (_, svc) = setup();
        let err = svc.add(add_req(Some(Scalar::Text("".into())), Some("http://a"))).await.unwrap_err();
        assert_eq!(required_label(err), "Blog Category selection");
        let err = svc.add(add_req(Some(Scalar::Int(3)), Some("   "))).await.unwrap_err();
        assert_eq!(required_label(err), "Blog Feed Url");
        let err = svc.add(add_req(Some(Scalar::Text(" ".into())), Some(""))).await.unwrap_err();
        assert_eq!(required_label(err), "Blog Category selection");
    }

    #[tokio::test]
    async fn add_rejects_live_duplicate_but_not_deleted_one() {
        let (repo, svc) = setup();
        repo.seed(3, "http://dup.com/rss", "inactive", at());
        let err = svc.add(add_req(Some(Scalar::Int(3)), Some("http://dup.com/rss"))).await.unwrap_err();
        assert!(matches!(err, DomainError::AlreadyExists(FEED_URL_LABEL)));
        assert_eq!(repo.calls("add"), 0);
        assert_eq!(repo.rows().len(), 1);

        repo.seed(3, "http://gone.com/rss", "deleted", at());
        svc.add(add_req(Some(Scalar::Int(3)), Some("http://gone.com/rss"))).await.unwrap();
        assert_eq!(repo.rows().len(), 3);
    }

    #[tokio::test]
    async fn add_zero_rows_reports_add_error() {
        let (repo, svc) = setup();
        repo.fail_writes();
        let err = svc.add(add_req(Some(Scalar::Int(3)), Some("http://a"))).await.unwrap_err();
        assert!(matches!(err, DomainError::OperationFailed(MessageKey::DataAddedError)));
    }

    #[tokio::test]
    async fn add_non_numeric_category_is_unexpected() {
        let (_, svc) = setup();
        let err = svc.add(add_req(Some(Scalar::Text("abc".into())), Some("http://a"))).await.unwrap_err();
        assert!(matches!(err, DomainError::Unexpected(ServiceError::Validation(_))));
    }

    #[tokio::test]
    async fn fetch_returns_encrypted_view_of_active_row() {
        let (repo, svc) = setup();
        let id = repo.seed(3, "http://a.com/feed", "active", at());
        let token = cipher().encrypt(id);
        let out = svc.fetch(FetchRequest { blog_feed_id: Some(token.clone()) }).await.unwrap();
        match out.data {
            Payload::Record(v) => {
                assert_eq!(v.blog_feed_id, token);
                assert_eq!(v.category_name.as_deref(), Some("Tech"));
            }
            other => panic!("unexpected payload {other:?}"),
        }

        let hidden = repo.seed(3, "http://b.com/feed", "inactive", at());
        let err = svc.fetch(FetchRequest { blog_feed_id: Some(cipher().encrypt(hidden)) }).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound("blog feed")));
    }

    #[tokio::test]
    async fn fetch_requires_and_decrypts_id() {
        let (repo, svc) = setup();
        assert!(matches!(svc.fetch(FetchRequest { blog_feed_id: Some(String::new()) }).await, Err(DomainError::RequiredParamMissing)));
        let err = svc.fetch(FetchRequest { blog_feed_id: Some("not-a-token".into()) }).await.unwrap_err();
        assert!(matches!(err, DomainError::Unexpected(ServiceError::Cipher(_))));
        assert_eq!(repo.total_calls(), 0);
    }

    #[tokio::test]
    async fn edit_allows_own_url_and_rejects_others() {
        let (repo, svc) = setup();
        let mine = repo.seed(3, "http://mine.com/feed", "active", at());
        repo.seed(3, "http://theirs.com/feed", "active", at());
        let token = cipher().encrypt(mine);

        let out = svc
            .edit(EditRequest { blog_feed_id: Some(token.clone()), blog_category_id: Some(Scalar::Int(4)), blog_feed_url: Some("http://mine.com/feed".into()) })
            .await
            .unwrap();
        assert_eq!(out.message.key, MessageKey::DataUpdated);
        assert_eq!(repo.row(mine).unwrap().category_id, 4);

        let err = svc
            .edit(EditRequest { blog_feed_id: Some(token), blog_category_id: Some(Scalar::Int(3)), blog_feed_url: Some(" http://theirs.com/feed ".into()) })
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::AlreadyExists(_)));
        assert_eq!(repo.row(mine).unwrap().feed_url, "http://mine.com/feed");
    }

    #[tokio::test]
    async fn edit_validates_every_missing_combination() {
        let (repo, svc) = setup();
        let token = cipher().encrypt(repo.seed(3, "http://a", "active", at()));
        let cases = [
            (None, None, "Blog Category Selection"),
            (None, Some("http://a"), "Blog Category Selection"),
            (Some(Scalar::Int(3)), None, "Blog Feed Url"),
            (Some(Scalar::Int(3)), Some(" "), "Blog Feed Url"),
        ];
        for (category, url, label) in cases {
            let req = EditRequest { blog_feed_id: Some(token.clone()), blog_category_id: category, blog_feed_url: url.map(str::to_string) };
            assert_eq!(required_label(svc.edit(req).await.unwrap_err()), label);
        }
        let missing_id = EditRequest { blog_feed_id: None, blog_category_id: Some(Scalar::Int(3)), blog_feed_url: Some("x".into()) };
        assert!(matches!(svc.edit(missing_id).await, Err(DomainError::RequiredParamMissing)));
    }

    #[tokio::test]
    async fn edit_of_missing_row_reports_update_error() {
        let (_, svc) = setup();
        let req = EditRequest { blog_feed_id: Some(cipher().encrypt(999)), blog_category_id: Some(Scalar::Int(3)), blog_feed_url: Some("http://n".into()) };
        assert!(matches!(svc.edit(req).await, Err(DomainError::OperationFailed(MessageKey::DataUpdatedError))));
    }

    #[tokio::test]
    async fn update_status_picks_message_pair_by_target() {
        let (repo, svc) = setup();
        let id = repo.seed(3, "http://a", "inactive", at());
        let token = cipher().encrypt(id);

        let out = svc.update_status(UpdateStatusRequest { blog_feed_id: Some(token.clone()), status: Some("active".into()) }).await.unwrap();
        assert_eq!(out.message.key, MessageKey::DataActivated);

        let out = svc.update_status(UpdateStatusRequest { blog_feed_id: Some(token.clone()), status: Some("inactive".into()) }).await.unwrap();
        assert_eq!(out.message.key, MessageKey::DataInactivated);

        let out = svc.update_status(UpdateStatusRequest { blog_feed_id: Some(token), status: Some("archived".into()) }).await.unwrap();
        assert_eq!(out.message.key, MessageKey::DataInactivated);
        assert_eq!(repo.row(id).unwrap().status, "archived");

        let missing = cipher().encrypt(4242);
        let err = svc.update_status(UpdateStatusRequest { blog_feed_id: Some(missing.clone()), status: Some("active".into()) }).await.unwrap_err();
        assert!(matches!(err, DomainError::OperationFailed(MessageKey::DataActivatedError)));
        let err = svc.update_status(UpdateStatusRequest { blog_feed_id: Some(missing), status: Some("paused".into()) }).await.unwrap_err();
        assert!(matches!(err, DomainError::OperationFailed(MessageKey::DataInactivatedError)));
    }

    #[tokio::test]
    async fn update_status_requires_both_params() {
        let (repo, svc) = setup();
        let token = cipher().encrypt(1);
        assert!(matches!(svc.update_status(UpdateStatusRequest { blog_feed_id: Some(token), status: Some(String::new()) }).await, Err(DomainError::RequiredParamMissing)));
        assert!(matches!(svc.update_status(UpdateStatusRequest { blog_feed_id: None, status: Some("active".into()) }).await, Err(DomainError::RequiredParamMissing)));
        assert_eq!(repo.total_calls(), 0);
    }

    #[tokio::test]
    async fn delete_soft_deletes_every_listed_id() {
        let (repo, svc) = setup();
        let a = repo.seed(3, "http://a", "active", at());
        let b = repo.seed(3, "http://b", "inactive", at());
        let keep = repo.seed(3, "http://c", "active", at());

        let out = svc.delete(DeleteRequest { blog_feed_id: Some(vec![cipher().encrypt(a), cipher().encrypt(b)]) }).await.unwrap();
        assert_eq!(out.message, Message::new(MessageKey::DataDeleted).arg("Record(s)"));
        assert_eq!(repo.row(a).unwrap().status, "deleted");
        assert_eq!(repo.row(b).unwrap().status, "deleted");
        assert_eq!(repo.row(keep).unwrap().status, "active");
        assert_eq!(repo.rows().len(), 3);
    }

    #[tokio::test]
    async fn delete_empty_list_is_required_param_missing() {
        let (repo, svc) = setup();
        assert!(matches!(svc.delete(DeleteRequest { blog_feed_id: Some(vec![]) }).await, Err(DomainError::RequiredParamMissing)));
        assert!(matches!(svc.delete(DeleteRequest { blog_feed_id: None }).await, Err(DomainError::RequiredParamMissing)));
        assert_eq!(repo.total_calls(), 0);
    }

    #[tokio::test]
    async fn delete_unknown_ids_reports_delete_error() {
        let (_, svc) = setup();
        let err = svc.delete(DeleteRequest { blog_feed_id: Some(vec![cipher().encrypt(77)]) }).await.unwrap_err();
        assert!(matches!(err, DomainError::OperationFailed(MessageKey::DataDeletedError)));
    }

    #[tokio::test]
    async fn list_pages_live_rows_and_reports_total() {
        let (repo, svc) = setup();
        for i in 0..12 {
            repo.seed(3, &format!("http://feed{i}.com"), "active", at());
        }
        repo.seed(3, "http://removed.com", "deleted", at());

        let out = svc.list(ListRequest::default()).await.unwrap();
        assert_eq!(out.message, Message::new(MessageKey::RecordsFound).arg("Blog Feed"));
        match out.data {
            Payload::List { items, total } => {
                assert_eq!(total, 12);
                assert_eq!(items.len(), 10);
                assert_eq!(items[0].blog_feed_url, "http://feed11.com");
            }
            other => panic!("unexpected payload {other:?}"),
        }

        let req = ListRequest { page: Some(Scalar::Int(2)), ..Default::default() };
        match svc.list(req).await.unwrap().data {
            Payload::List { items, .. } => assert_eq!(items.len(), 2),
            other => panic!("unexpected payload {other:?}"),
        }
    }

    #[tokio::test]
    async fn list_without_rows_is_success_with_no_records_message() {
        let (_, svc) = setup();
        let out = svc.list(ListRequest { search: Some("nothing".into()), ..Default::default() }).await.unwrap();
        assert_eq!(out.message, Message::new(MessageKey::NoRecordsFound).arg("blog feeds"));
        assert_eq!(out.data, Payload::Empty);
    }

    #[tokio::test]
    async fn active_categories_only_lists_active() {
        let (repo, svc) = setup();
        let out = svc.active_categories().await.unwrap();
        match out.data {
            Payload::Categories(c) => {
                assert_eq!(c.len(), 1);
                assert_eq!(c[0].blog_category_id, 3);
            }
            other => panic!("unexpected payload {other:?}"),
        }
        assert_eq!(repo.calls("categories_by_status"), 1);

        let empty = BlogFeedService::new(Arc::new(MockBlogFeedRepository::new()), Arc::new(cipher()), ServiceSettings::default());
        assert!(matches!(empty.active_categories().await, Err(DomainError::NotFound("subcategory"))));
    }

    #[tokio::test]
    async fn add_store_conflict_maps_to_already_exists() {
        let (repo, svc) = setup();
        repo.conflict_writes();
        let err = svc.add(add_req(Some(Scalar::Int(3)), Some("http://race.com/feed"))).await.unwrap_err();
        assert!(matches!(err, DomainError::AlreadyExists(FEED_URL_LABEL)));
        assert_eq!(repo.calls("add"), 1);
        assert!(repo.rows().is_empty());
    }

    #[tokio::test]
    async fn edit_store_conflict_maps_to_already_exists() {
        let (repo, svc) = setup();
        let id = repo.seed(3, "http://mine.com/feed", "active", at());
        repo.conflict_writes();
        let err = svc
            .edit(EditRequest {
                blog_feed_id: Some(cipher().encrypt(id)),
                blog_category_id: Some(Scalar::Int(3)),
                blog_feed_url: Some("http://race.com/feed".into()),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::AlreadyExists(FEED_URL_LABEL)));
        assert_eq!(repo.calls("edit"), 1);
        assert_eq!(repo.row(id).unwrap().feed_url, "http://mine.com/feed");
    }

    struct RejectAll(Mutex<usize>);

    impl FieldValidator for RejectAll {
        fn validate(&self, fields: &[FieldRules]) -> Result<(), Message> {
            *self.0.lock().unwrap() += 1;
            Err(Message::new(MessageKey::FieldIsRequired).arg(format!("{} fields", fields.len())))
        }
    }

    #[tokio::test]
    async fn injected_validator_decides_before_any_store_call() {
        let (repo, svc) = setup();
        let validator = Arc::new(RejectAll(Mutex::new(0)));
        let svc = svc.with_validator(validator.clone());

        let err = svc.add(add_req(Some(Scalar::Int(3)), Some("http://fine.com/feed"))).await.unwrap_err();
        assert_eq!(required_label(err), "2 fields");
        assert_eq!(*validator.0.lock().unwrap(), 1);
        assert_eq!(repo.total_calls(), 0);
    }
}
