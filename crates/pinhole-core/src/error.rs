use thiserror::Error;

pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors related to the core types of the URL shortener.
#[derive(Debug, Clone, Error)]
pub enum CoreError {
    #[error("invalid short code: {0}")]
    InvalidShortCode(String),
}

/// Errors produced by repository backends.
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("short code already exists: {0}")]
    Conflict(String),
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    #[error("storage operation timed out: {0}")]
    Timeout(String),
    #[error("storage query failed: {0}")]
    Query(String),
    #[error("stored data is invalid: {0}")]
    InvalidData(String),
}

impl StorageError {
    /// Whether the failure is likely to go away on its own (backend down or slow).
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable(_) | Self::Timeout(_))
    }
}

#[derive(Debug, Clone, Error)]
pub enum ShortenerError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

