use crate::error::Result;
use async_trait::async_trait;
use burrow_codec::ShortCode;

/// The two operations an outer request layer needs.
#[async_trait]
pub trait Shortener: Send + Sync + 'static {
    /// Shortens `url` and returns the generated short code.
    async fn shorten(&self, url: &str) -> Result<ShortCode>;

    /// Retrieves the original URL associated with the given short code.
    async fn resolve(&self, code: &str) -> Result<String>;
}
