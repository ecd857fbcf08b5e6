use thiserror::Error;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("invalid bind address {addr}: {reason}")]
    BindAddr { addr: String, reason: String },
    #[error("locale file {path}: {reason}")]
    Locale { path: String, reason: String },
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}
