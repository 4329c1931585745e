use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use pinhole_core::repository::{ReadRepository, Repository, Result, UrlRecord};
use pinhole_core::{ShortCode, StorageError};

/// In-memory implementation of the Repository trait using DashMap.
///
/// DashMap provides better concurrency than RwLock<HashMap> because it
/// uses sharded locks, allowing concurrent reads and writes to different
/// buckets without blocking. Entries live for the lifetime of the process.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    storage: DashMap<String, String>,
}

impl InMemoryRepository {
    /// Creates a new in-memory repository.
    pub fn new() -> Self {
        Self {
            storage: DashMap::new(),
        }
    }

    /// Records a mapping, replacing any previous value for the code.
    ///
    /// Used to backfill the cache tier from the durable store, where the
    /// durable copy is authoritative.
    pub fn upsert(&self, code: &ShortCode, record: UrlRecord) {
        self.storage.insert(code.as_str().to_owned(), record.long_url);
    }

    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }
}

#[async_trait]
impl ReadRepository for InMemoryRepository {
    async fn get(&self, code: &ShortCode) -> Result<Option<UrlRecord>> {
        Ok(self
            .storage
            .get(code.as_str())
            .map(|entry| UrlRecord::new(entry.value().clone())))
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn insert(&self, code: &ShortCode, record: UrlRecord) -> Result<()> {
        match self.storage.entry(code.as_str().to_owned()) {
            Entry::Occupied(_) => Err(StorageError::Conflict(code.to_string())),
            Entry::Vacant(slot) => {
                slot.insert(record.long_url);
                Ok(())
            }
        }
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.storage.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn code(s: &str) -> ShortCode {
        ShortCode::new_unchecked(s)
    }

    #[tokio::test]
    async fn save_and_get() {
        let repo = InMemoryRepository::new();

        repo.insert(&code("MQ=="), UrlRecord::new("https://example.com"))
            .await
            .unwrap();

        let result = repo.get(&code("MQ==")).await.unwrap().unwrap();
        assert_eq!(result.long_url, "https://example.com");
    }

    #[tokio::test]
    async fn get_nonexistent() {
        let repo = InMemoryRepository::new();

        let result = repo.get(&code("nope")).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn insert_conflict() {
        let repo = InMemoryRepository::new();

        repo.insert(&code("MQ=="), UrlRecord::new("https://example.com"))
            .await
            .unwrap();

        let err = repo
            .insert(&code("MQ=="), UrlRecord::new("https://other.com"))
            .await
            .unwrap_err();

        assert!(matches!(err, StorageError::Conflict(_)));
        let kept = repo.get(&code("MQ==")).await.unwrap().unwrap();
        assert_eq!(kept.long_url, "https://example.com");
    }

    #[tokio::test]
    async fn upsert_replaces_existing() {
        let repo = InMemoryRepository::new();

        repo.upsert(&code("MQ=="), UrlRecord::new("https://old.com"));
        repo.upsert(&code("MQ=="), UrlRecord::new("https://new.com"));

        let result = repo.get(&code("MQ==")).await.unwrap().unwrap();
        assert_eq!(result.long_url, "https://new.com");
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn count_tracks_inserts() {
        let repo = InMemoryRepository::new();
        assert_eq!(repo.count().await.unwrap(), 0);
        assert!(repo.is_empty());

        repo.insert(&code("MQ=="), UrlRecord::new("https://a.com"))
            .await
            .unwrap();
        repo.insert(&code("Mg=="), UrlRecord::new("https://b.com"))
            .await
            .unwrap();

        assert_eq!(repo.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn concurrent_access() {
        let repo = Arc::new(InMemoryRepository::new());
        let mut handles = vec![];

        for i in 0..10u64 {
            let repo = Arc::clone(&repo);
            let handle = tokio::spawn(async move {
                let c = ShortCode::new_unchecked(format!("code-{:03}", i));
                repo.insert(&c, UrlRecord::new(format!("https://example{}.com", i)))
                    .await
                    .unwrap();
            });
            handles.push(handle);
        }

        for i in 0..10u64 {
            let repo = Arc::clone(&repo);
            let handle = tokio::spawn(async move {
                let c = ShortCode::new_unchecked(format!("code-{:03}", i));
                let _ = repo.get(&c).await;
            });
            handles.push(handle);
        }

        for handle in handles {
            handle.await.unwrap();
        }

        for i in 0..10u64 {
            let c = ShortCode::new_unchecked(format!("code-{:03}", i));
            let result = repo.get(&c).await.unwrap().unwrap();
            assert_eq!(result.long_url, format!("https://example{}.com", i));
        }
    }
}
