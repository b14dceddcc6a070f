use async_trait::async_trait;

use crate::error::Result;
use crate::models::{SourcePost, SummaryFields, SummaryRecord};

/// Cache of summaries keyed by handle, each owning a set of source posts
///
/// Handles are lowercased by the implementation on every read and write.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Look up the record for a handle
    async fn get(&self, handle: &str) -> Result<Option<SummaryRecord>>;

    /// Create the record if absent, otherwise update it in place.
    /// `updated_at` is always refreshed; `id` and `created_at` survive updates.
    async fn upsert(&self, handle: &str, fields: SummaryFields) -> Result<SummaryRecord>;

    /// Delete every post of a record, then insert `posts`
    async fn replace_posts(&self, summary_id: &str, posts: Vec<SourcePost>) -> Result<()>;

    /// Posts of a record, newest first
    async fn get_posts(&self, summary_id: &str) -> Result<Vec<SourcePost>>;

    /// Remove a record and its posts. Returns whether a record existed.
    async fn delete(&self, handle: &str) -> Result<bool>;

    /// `upsert` followed by `replace_posts`, applied atomically:
    /// either both take effect or neither does.
    async fn save_summary(
        &self,
        handle: &str,
        fields: SummaryFields,
        posts: Vec<SourcePost>,
    ) -> Result<SummaryRecord>;

    /// Check the backend is reachable
    async fn ping(&self) -> Result<()>;

    /// Short backend name for diagnostics
    fn backend(&self) -> &'static str;
}
