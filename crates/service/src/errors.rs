use thiserror::Error;

use crate::crypto::CipherError;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("bad request body: {0}")]
    BadRequest(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("database error: {0}")]
    Db(String),
    #[error("identifier error: {0}")]
    Cipher(#[from] CipherError),
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<models::errors::ModelError> for ServiceError {
    fn from(e: models::errors::ModelError) -> Self {
        use models::errors::ModelError;
        match e {
            ModelError::Validation(m) => Self::Validation(m),
            ModelError::Conflict(m) => Self::Conflict(m),
            ModelError::Db(m) => Self::Db(m),
        }
    }
}

impl From<sea_orm::DbErr> for ServiceError {
    fn from(e: sea_orm::DbErr) -> Self {
        models::errors::ModelError::from(e).into()
    }
}
