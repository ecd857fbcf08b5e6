use thiserror::Error;

use crate::errors::ServiceError;
use crate::i18n::{Message, MessageKey};

/// Every way a blog feed operation can end without success.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("required parameter missing")]
    RequiredParamMissing,
    #[error("validation failed: {0:?}")]
    Validation(Message),
    #[error("{0} already exists")]
    AlreadyExists(&'static str),
    #[error("no {0} found")]
    NotFound(&'static str),
    #[error("operation failed: {0:?}")]
    OperationFailed(MessageKey),
    #[error(transparent)]
    Unexpected(#[from] ServiceError),
}

impl DomainError {
    /// Message shown for expected failures; `None` for unexpected ones.
    pub fn message(&self) -> Option<Message> {
        match self {
            DomainError::RequiredParamMissing => Some(Message::new(MessageKey::RequiredParamMissing)),
            DomainError::Validation(m) => Some(m.clone()),
            DomainError::AlreadyExists(field) => Some(Message::new(MessageKey::FieldAlreadyExist).arg(*field)),
            DomainError::NotFound(entity) => Some(Message::new(MessageKey::NoRecordsFound).arg(*entity)),
            DomainError::OperationFailed(key) => Some(Message::new(*key)),
            DomainError::Unexpected(_) => None,
        }
    }

    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            DomainError::RequiredParamMissing => "required_param_missing",
            DomainError::Validation(_) => "validation",
            DomainError::AlreadyExists(_) => "already_exists",
            DomainError::NotFound(_) => "not_found",
            DomainError::OperationFailed(_) => "operation_failed",
            DomainError::Unexpected(_) => "unexpected",
        }
    }
}

impl From<crate::crypto::CipherError> for DomainError {
    fn from(e: crate::crypto::CipherError) -> Self { DomainError::Unexpected(e.into()) }
}
