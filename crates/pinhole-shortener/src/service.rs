use async_trait::async_trait;
use pinhole_core::{Repository, ShortCode, Shortener, ShortenerError, StorageError, UrlRecord};
use pinhole_generator::Generator;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Upper bound on codes tried for one shorten call when the store already
/// holds the generated codes.
pub const MAX_CONFLICT_RETRIES: usize = 16;

/// A concrete implementation of the `Shortener` trait.
///
/// This service wraps a `Repository` and a `Generator`. The generator is
/// expected to hand out distinct codes; a code that is nevertheless already
/// stored (e.g. written by an earlier process whose counter started from the
/// same seed) is skipped and the next one is tried.
///
/// No lock is held while the repository is written to: the generator's
/// counter is atomic and the repository handles its own synchronization.
#[derive(Debug)]
pub struct ShortenerService<R, G> {
    repository: Arc<R>,
    generator: Arc<G>,
}

impl<R, G> Clone for ShortenerService<R, G> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            generator: Arc::clone(&self.generator),
        }
    }
}

impl<R: Repository, G: Generator> ShortenerService<R, G> {
    pub fn new(repository: R, generator: G) -> Self {
        Self {
            repository: Arc::new(repository),
            generator: Arc::new(generator),
        }
    }

    /// Returns a reference to the underlying repository.
    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Returns a reference to the code generator.
    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// Any non-empty string is accepted; no URL syntax checks are made.
    fn validate_url(url: &str) -> Result<(), ShortenerError> {
        if url.is_empty() {
            return Err(ShortenerError::InvalidUrl(
                "URL cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl<R: Repository, G: Generator> Shortener for ShortenerService<R, G> {
    async fn shorten(&self, long_url: &str) -> Result<ShortCode, ShortenerError> {
        Self::validate_url(long_url)?;

        for _ in 0..MAX_CONFLICT_RETRIES {
            let code: ShortCode = self.generator.generate().into();

            match self
                .repository
                .insert(&code, UrlRecord::new(long_url))
                .await
            {
                Ok(()) => {
                    info!(code = %code, "shortened url");
                    return Ok(code);
                }
                Err(StorageError::Conflict(_)) => {
                    warn!(code = %code, "generated code already stored, skipping");
                }
                Err(e) => {
                    warn!(code = %code, error = %e, "failed to store mapping");
                    return Err(e.into());
                }
            }
        }

        Err(ShortenerError::Storage(StorageError::Conflict(format!(
            "no free code after {MAX_CONFLICT_RETRIES} attempts"
        ))))
    }

    async fn resolve(&self, code: &ShortCode) -> Result<Option<String>, ShortenerError> {
        let record = self.repository.get(code).await?;
        debug!(code = %code, found = record.is_some(), "resolved short code");
        Ok(record.map(|r| r.long_url))
    }
}
