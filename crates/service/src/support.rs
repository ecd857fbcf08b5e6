//! Clock and error-translation collaborators.

use chrono::{DateTime, FixedOffset, Utc};
use configs::Environment;

use crate::errors::ServiceError;
use crate::i18n::{Message, MessageCatalog, MessageKey};

/// Source of write timestamps.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<FixedOffset>;
}

#[derive(Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> { Utc::now().into() }
}

/// Always returns the same instant.
#[derive(Clone, Copy)]
pub struct FixedClock(pub DateTime<FixedOffset>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> { self.0 }
}

/// Turns an unexpected failure into the text shown to the caller.
pub trait ErrorTranslator: Send + Sync {
    fn translate(&self, env: Environment, err: &ServiceError, catalog: &dyn MessageCatalog) -> String;
}

/// Production hides detail behind the generic message; development appends it.
#[derive(Default, Clone, Copy)]
pub struct EnvironmentErrorTranslator;

impl ErrorTranslator for EnvironmentErrorTranslator {
    fn translate(&self, env: Environment, err: &ServiceError, catalog: &dyn MessageCatalog) -> String {
        let generic = catalog.render(&Message::new(MessageKey::SomethingWentWrong));
        if env.is_production() {
            generic
        } else {
            format!("{} ({})", generic, err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::EnglishCatalog;

    #[test]
    fn production_hides_detail() {
        let msg = EnvironmentErrorTranslator.translate(
            Environment::Production,
            &ServiceError::Db("connection refused".into()),
            &EnglishCatalog::new(),
        );
        assert!(!msg.contains("connection refused"));
        assert_eq!(msg, EnglishCatalog::new().render(&MessageKey::SomethingWentWrong.into()));
    }

    #[test]
    fn development_includes_detail() {
        let msg = EnvironmentErrorTranslator.translate(
            Environment::Development,
            &ServiceError::Db("connection refused".into()),
            &EnglishCatalog::new(),
        );
        assert!(msg.contains("connection refused"));
    }

    #[test]
    fn fixed_clock_is_stable() {
        let at: DateTime<FixedOffset> = Utc::now().into();
        let c = FixedClock(at);
        assert_eq!(c.now(), c.now());
    }
}
