use async_trait::async_trait;
use shared::error::AppResult;

/// Durable storage for event images. `source` is whatever reference the
/// client sent (a URL or a data URI); the returned string is the stored
/// image's canonical URL.
#[async_trait]
pub trait ImageStore: Send + Sync {
    async fn upload(&self, source: &str) -> AppResult<String>;
}
