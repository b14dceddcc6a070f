use async_trait::async_trait;

use crate::clean::clean_posts;
use crate::error::{Result, SourceError};
use crate::models::{Author, FetchedPosts, RawPost};

/// A place recent posts can be fetched from
#[async_trait]
pub trait PostSource: Send + Sync {
    /// Resolve a handle (without `@`) to its author, `None` if it doesn't exist
    async fn find_author(&self, handle: &str) -> Result<Option<Author>>;

    /// Up to `limit` most recent posts by `author_id`, newest first
    async fn recent_posts(&self, author_id: &str, limit: usize) -> Result<Vec<RawPost>>;

    /// Author plus their cleaned original posts.
    ///
    /// Fails with [`SourceError::NotFound`] for an unknown handle.
    async fn fetch_for_summary(&self, handle: &str, limit: usize) -> Result<FetchedPosts> {
        let author = self
            .find_author(handle)
            .await?
            .ok_or_else(|| SourceError::NotFound(handle.to_string()))?;

        let raw = self.recent_posts(&author.id, limit).await?;
        let posts = clean_posts(&raw);

        tracing::info!(
            handle = %author.username,
            fetched = raw.len(),
            kept = posts.len(),
            "Fetched posts for summary"
        );

        Ok(FetchedPosts { author, posts })
    }
}
