//! Maps operation results onto the `{status, msg, data}` wire envelope.

use std::sync::Arc;

use common::types::{empty_data, Envelope};
use configs::Environment;
use service::blog_feed::domain::Outcome;
use service::blog_feed::errors::DomainError;
use service::errors::ServiceError;
use service::i18n::{Message, MessageCatalog, MessageKey};
use service::support::{EnvironmentErrorTranslator, ErrorTranslator};
use tracing::{debug, error};

/// Renders outcomes and failures with the configured catalog.
pub struct Responder {
    catalog: Arc<dyn MessageCatalog>,
    translator: Arc<dyn ErrorTranslator>,
    environment: Environment,
}

impl Responder {
    pub fn new(catalog: Arc<dyn MessageCatalog>, environment: Environment) -> Self {
        Self { catalog, translator: Arc::new(EnvironmentErrorTranslator), environment }
    }

    pub fn with_translator(mut self, translator: Arc<dyn ErrorTranslator>) -> Self {
        self.translator = translator;
        self
    }

    /// Answer to an `OPTIONS` request.
    pub fn options(&self) -> Envelope {
        Envelope::success(self.catalog.render(&MessageKey::NothingToDoWithOptions.into()), empty_data())
    }

    pub fn render(&self, operation: &'static str, result: Result<Outcome, DomainError>) -> Envelope {
        match result {
            Ok(outcome) => match serde_json::to_value(&outcome.data) {
                Ok(data) => Envelope::success(self.catalog.render(&outcome.message), data),
                Err(e) => self.unexpected(operation, &ServiceError::Serialization(e.to_string())),
            },
            Err(DomainError::Unexpected(err)) => self.unexpected(operation, &err),
            Err(e) => {
                debug!(operation, kind = e.kind(), "request rejected");
                let msg = e.message().unwrap_or_else(|| Message::new(MessageKey::SomethingWentWrong));
                Envelope::error(self.catalog.render(&msg))
            }
        }
    }

    fn unexpected(&self, operation: &'static str, err: &ServiceError) -> Envelope {
        error!(operation, err = %err, "unexpected failure");
        Envelope::error(self.translator.translate(self.environment, err, self.catalog.as_ref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::types::EnvelopeStatus;
    use service::blog_feed::domain::Payload;
    use service::i18n::EnglishCatalog;

    fn responder(env: Environment) -> Responder { Responder::new(Arc::new(EnglishCatalog::new()), env) }

    #[test]
    fn options_is_success_with_empty_data() {
        let env = responder(Environment::Development).options();
        assert_eq!(env.status, EnvelopeStatus::Success);
        assert_eq!(env.msg, "Nothing to do here with options.");
        assert_eq!(env.data, serde_json::json!(""));
    }

    #[test]
    fn success_renders_message_and_payload() {
        let out = Outcome::with_data(
            Message::new(MessageKey::RecordsFound).arg("Blog Feed"),
            Payload::List { items: vec![], total: 0 },
        );
        let env = responder(Environment::Development).render("list", Ok(out));
        assert!(env.is_success());
        assert_eq!(env.msg, "Blog Feed record(s) found.");
        assert_eq!(env.data, serde_json::json!({"items": [], "total": 0}));
    }

    #[test]
    fn expected_failure_uses_its_own_message() {
        let env = responder(Environment::Production).render("add", Err(DomainError::AlreadyExists("Blog Feed URL")));
        assert_eq!(env.status, EnvelopeStatus::Error);
        assert_eq!(env.msg, "Blog Feed URL already exists.");
        assert_eq!(env.data, serde_json::json!(""));
    }

    #[test]
    fn unexpected_failure_is_translated_per_environment() {
        let err = || Err(DomainError::Unexpected(ServiceError::Db("pool timed out".into())));
        let prod = responder(Environment::Production).render("fetch", err());
        assert_eq!(prod.msg, "Something went wrong. Please try again later.");
        let dev = responder(Environment::Development).render("fetch", err());
        assert!(dev.msg.contains("pool timed out"));
        assert_eq!(dev.status, EnvelopeStatus::Error);
    }

    struct Tagged;

    impl ErrorTranslator for Tagged {
        fn translate(&self, env: Environment, err: &ServiceError, _: &dyn MessageCatalog) -> String {
            format!("{:?}: {}", env, err)
        }
    }

    #[test]
    fn injected_translator_renders_unexpected_failures_only() {
        let r = responder(Environment::Production).with_translator(Arc::new(Tagged));
        let env = r.render("edit", Err(DomainError::Unexpected(ServiceError::Db("gone".into()))));
        assert_eq!(env.status, EnvelopeStatus::Error);
        assert_eq!(env.msg, "Production: database error: gone");

        let env = r.render("edit", Err(DomainError::AlreadyExists("Blog Feed URL")));
        assert_eq!(env.msg, "Blog Feed URL already exists.");
    }
}
