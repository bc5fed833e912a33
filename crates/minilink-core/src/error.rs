use thiserror::Error;

/// Errors surfaced by the persistent stores.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    #[error("storage operation timed out: {0}")]
    Timeout(String),
    #[error("stored data is invalid: {0}")]
    InvalidData(String),
    #[error("storage operation failed: {0}")]
    Operation(String),
}

/// Errors surfaced by the shortener service.
///
/// An unknown code is not an error; resolve operations report it as `None`.
#[derive(Debug, Clone, Error)]
pub enum ShortenerError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("user id or auth token incorrect")]
    Unauthorized,
    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}
