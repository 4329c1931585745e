use crate::shortcode::ShortCode;
use async_trait::async_trait;

type Result<T> = std::result::Result<T, crate::error::ShortenerError>;

#[async_trait]
pub trait Shortener: Send + Sync + 'static {
    /// Shortens the given long URL and returns the generated short code.
    ///
    /// Shortening the same URL twice yields two distinct codes.
    async fn shorten(&self, long_url: &str) -> Result<ShortCode>;

    /// Retrieves the long URL associated with the given short code.
    async fn resolve(&self, code: &ShortCode) -> Result<Option<String>>;
}
