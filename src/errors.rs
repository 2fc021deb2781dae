use thiserror::Error;
use crate::backends::BackendError;

/// Application-level errors.
#[allow(dead_code)]
#[derive(Error, Debug)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Store error: {0}")]
    Store(String),
}

pub type AppResult<T> = Result<T, AppError>;
