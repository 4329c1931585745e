use crate::memory::InMemoryRepository;
use async_trait::async_trait;
use pinhole_core::repository::{ReadRepository, Repository, Result, UrlRecord};
use pinhole_core::ShortCode;
use tracing::{debug, trace, warn};

/// A two-tier repository: a process-local memory tier in front of a durable store.
///
/// Writes go to the durable store first and only reach the memory tier once
/// they have been persisted, so a failed write never leaves a mapping that
/// exists in memory alone. Reads check memory first and fall back to the
/// durable store on a miss; durable hits are copied back into memory so
/// later lookups for the same code stay local.
#[derive(Debug, Clone)]
pub struct TieredRepository<R> {
    memory: InMemoryRepository,
    durable: R,
}

impl<R: Repository> TieredRepository<R> {
    /// Creates a tiered repository with an empty memory tier.
    pub fn new(durable: R) -> Self {
        Self {
            memory: InMemoryRepository::new(),
            durable,
        }
    }

    /// Returns a reference to the memory tier.
    pub fn memory(&self) -> &InMemoryRepository {
        &self.memory
    }

    /// Returns a reference to the durable tier.
    pub fn durable(&self) -> &R {
        &self.durable
    }
}

#[async_trait]
impl<R: Repository> ReadRepository for TieredRepository<R> {
    async fn get(&self, code: &ShortCode) -> Result<Option<UrlRecord>> {
        if let Some(record) = self.memory.get(code).await? {
            trace!(code = %code, "memory tier hit");
            return Ok(Some(record));
        }

        trace!(code = %code, "memory tier miss, querying durable store");
        let record = self.durable.get(code).await.inspect_err(|e| {
            warn!(code = %code, error = %e, "durable lookup failed");
        })?;

        if let Some(record) = &record {
            self.memory.upsert(code, record.clone());
            debug!(code = %code, "backfilled memory tier from durable store");
        }

        Ok(record)
    }
}

#[async_trait]
impl<R: Repository> Repository for TieredRepository<R> {
    async fn insert(&self, code: &ShortCode, record: UrlRecord) -> Result<()> {
        self.durable.insert(code, record.clone()).await?;
        self.memory.upsert(code, record);
        Ok(())
    }

    async fn count(&self) -> Result<u64> {
        self.durable.count().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pinhole_core::StorageError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn code(s: &str) -> ShortCode {
        ShortCode::new_unchecked(s)
    }

    /// Durable store double that counts reads and can be switched to fail.
    #[derive(Default)]
    struct FlakyRepository {
        inner: InMemoryRepository,
        reads: AtomicUsize,
        fail_writes: bool,
        fail_reads: bool,
    }

    #[async_trait]
    impl ReadRepository for FlakyRepository {
        async fn get(&self, code: &ShortCode) -> Result<Option<UrlRecord>> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            if self.fail_reads {
                return Err(StorageError::Unavailable("connection refused".into()));
            }
            self.inner.get(code).await
        }
    }

    #[async_trait]
    impl Repository for FlakyRepository {
        async fn insert(&self, code: &ShortCode, record: UrlRecord) -> Result<()> {
            if self.fail_writes {
                return Err(StorageError::Unavailable("connection refused".into()));
            }
            self.inner.insert(code, record).await
        }

        async fn count(&self) -> Result<u64> {
            self.inner.count().await
        }
    }

    #[tokio::test]
    async fn insert_writes_both_tiers() {
        let repo = TieredRepository::new(InMemoryRepository::new());
        let c = code("MQ==");

        repo.insert(&c, UrlRecord::new("https://example.com"))
            .await
            .unwrap();

        assert!(repo.memory().get(&c).await.unwrap().is_some());
        assert!(repo.durable().get(&c).await.unwrap().is_some());
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn failed_durable_write_leaves_memory_untouched() {
        let durable = FlakyRepository {
            fail_writes: true,
            ..Default::default()
        };
        let repo = TieredRepository::new(durable);
        let c = code("MQ==");

        let err = repo
            .insert(&c, UrlRecord::new("https://example.com"))
            .await
            .unwrap_err();

        assert!(matches!(err, StorageError::Unavailable(_)));
        assert!(repo.memory().is_empty());
    }

    #[tokio::test]
    async fn memory_hit_skips_durable_store() {
        let repo = TieredRepository::new(FlakyRepository::default());
        let c = code("MQ==");

        repo.insert(&c, UrlRecord::new("https://example.com"))
            .await
            .unwrap();
        let record = repo.get(&c).await.unwrap().unwrap();

        assert_eq!(record.long_url, "https://example.com");
        assert_eq!(repo.durable().reads.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn durable_hit_backfills_memory() {
        let durable = Arc::new(FlakyRepository::default());
        let c = code("MQ==");
        durable
            .inner
            .insert(&c, UrlRecord::new("https://example.com"))
            .await
            .unwrap();

        let repo = TieredRepository::new(Arc::clone(&durable));

        let first = repo.get(&c).await.unwrap().unwrap();
        let second = repo.get(&c).await.unwrap().unwrap();

        assert_eq!(first.long_url, "https://example.com");
        assert_eq!(second, first);
        assert_eq!(durable.reads.load(Ordering::SeqCst), 1);
        assert_eq!(repo.memory().len(), 1);
    }

    #[tokio::test]
    async fn miss_in_both_tiers_is_none() {
        let repo = TieredRepository::new(InMemoryRepository::new());

        assert!(repo.get(&code("bm9wZQ==")).await.unwrap().is_none());
        assert!(repo.memory().is_empty());
    }

    #[tokio::test]
    async fn durable_read_failure_is_not_reported_as_missing() {
        let durable = FlakyRepository {
            fail_reads: true,
            ..Default::default()
        };
        let repo = TieredRepository::new(durable);

        let err = repo.get(&code("MQ==")).await.unwrap_err();
        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn survives_loss_of_memory_tier() {
        let durable = Arc::new(InMemoryRepository::new());
        let c = code("MQ==");

        let before = TieredRepository::new(Arc::clone(&durable));
        before
            .insert(&c, UrlRecord::new("https://example.com"))
            .await
            .unwrap();
        drop(before);

        let after = TieredRepository::new(Arc::clone(&durable));
        assert!(after.memory().is_empty());

        let record = after.get(&c).await.unwrap().unwrap();
        assert_eq!(record.long_url, "https://example.com");
    }
}
