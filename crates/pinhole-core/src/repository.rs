use crate::error::StorageError;
use crate::shortcode::ShortCode;
use async_trait::async_trait;
use std::sync::Arc;

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// A stored URL record in the repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlRecord {
    /// The long URL the short code redirects to.
    pub long_url: String,
}

impl UrlRecord {
    pub fn new(long_url: impl Into<String>) -> Self {
        Self {
            long_url: long_url.into(),
        }
    }
}

/// A read-only view of a repository.
///
/// This trait provides only the read operations from [`Repository`],
/// allowing the redirect path to depend on lookups alone.
#[async_trait]
pub trait ReadRepository: Send + Sync + 'static {
    /// Retrieves the URL record for a given short code.
    /// Returns `None` if the code does not exist.
    async fn get(&self, code: &ShortCode) -> Result<Option<UrlRecord>>;
}

#[async_trait]
pub trait Repository: ReadRepository {
    /// Inserts a new URL record. Returns `Err(Conflict)` if the code already exists.
    async fn insert(&self, code: &ShortCode, record: UrlRecord) -> Result<()>;

    /// Returns the number of stored mappings.
    async fn count(&self) -> Result<u64>;
}

#[async_trait]
impl<R: ReadRepository + ?Sized> ReadRepository for Arc<R> {
    async fn get(&self, code: &ShortCode) -> Result<Option<UrlRecord>> {
        (**self).get(code).await
    }
}

#[async_trait]
impl<R: Repository + ?Sized> Repository for Arc<R> {
    async fn insert(&self, code: &ShortCode, record: UrlRecord) -> Result<()> {
        (**self).insert(code, record).await
    }

    async fn count(&self) -> Result<u64> {
        (**self).count().await
    }
}
