use std::sync::Arc;

use chrono::Duration;
use glance_llm::{AuthorContext, DetailedAnalysis, Summarizer};
use glance_persist::{CacheStore, SourcePost, SummaryDetail, SummaryFields, SummaryRecord};
use glance_source::{CleanPost, FetchedPosts, PostSource};

use crate::clock::{Clock, SystemClock};
use crate::error::{GlanceError, Result};
use crate::handle::validate_handle;

/// Posts handed to the summarizer per refresh
pub const SUMMARY_POST_LIMIT: usize = 5;

pub const QUIET_SUMMARY: &str = "This user hasn't posted anything recent to summarize.";
pub const QUIET_TAG: &str = "quiet";

const DEFAULT_FRESHNESS_HOURS: i64 = 24;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SummaryMode {
    #[default]
    Brief,
    Detailed,
}

/// Which integrations a service was built with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Integrations {
    pub posts: bool,
    pub llm: bool,
}

/// Cache-first summaries: serve a fresh record, otherwise fetch, summarize
/// and store a new one.
pub struct SummaryService {
    store: Arc<dyn CacheStore>,
    source: Option<Arc<dyn PostSource>>,
    summarizer: Option<Arc<dyn Summarizer>>,
    clock: Arc<dyn Clock>,
    freshness: Duration,
}

impl SummaryService {
    pub fn builder() -> SummaryServiceBuilder {
        SummaryServiceBuilder::new()
    }

    pub fn store(&self) -> &Arc<dyn CacheStore> {
        &self.store
    }

    pub fn summarizer(&self) -> Option<&Arc<dyn Summarizer>> {
        self.summarizer.as_ref()
    }

    pub fn integrations(&self) -> Integrations {
        Integrations {
            posts: self.source.is_some(),
            llm: self.summarizer.is_some(),
        }
    }

    /// A record is fresh for the whole window, boundary included
    pub fn is_fresh(&self, record: &SummaryRecord) -> bool {
        self.clock.now() - record.updated_at <= self.freshness
    }

    pub async fn get_or_refresh_summary(&self, handle: &str, mode: SummaryMode) -> Result<SummaryRecord> {
        let handle = validate_handle(handle)?;

        match self.store.get(&handle).await {
            Ok(Some(record)) if self.is_fresh(&record) => {
                tracing::debug!(%handle, "Serving cached summary");
                return Ok(record);
            }
            Ok(Some(record)) => {
                tracing::debug!(%handle, updated_at = %record.updated_at, "Cached summary is stale");
            }
            Ok(None) => {
                tracing::debug!(%handle, "No cached summary");
            }
            Err(e) => {
                tracing::warn!(%handle, error = %e, "Cache read failed, treating as miss");
            }
        }

        self.refresh(&handle, mode).await
    }

    async fn refresh(&self, handle: &str, mode: SummaryMode) -> Result<SummaryRecord> {
        let source = self
            .source
            .as_ref()
            .ok_or(GlanceError::UpstreamConfig("X API"))?;
        let summarizer = self
            .summarizer
            .as_ref()
            .ok_or(GlanceError::UpstreamConfig("OpenAI API"))?;

        let fetched = source.fetch_for_summary(handle, SUMMARY_POST_LIMIT).await?;
        let display_name = Some(fetched.author.name.clone()).filter(|name| !name.trim().is_empty());

        let fields = if fetched.posts.is_empty() {
            tracing::info!(%handle, "No recent posts, storing placeholder summary");
            quiet_fields(display_name, mode)
        } else {
            let author = AuthorContext::new(handle, display_name.clone());
            let texts = fetched.texts();
            let summary = match mode {
                SummaryMode::Brief => summarizer.brief(&texts, &author).await?,
                SummaryMode::Detailed => summarizer.detailed(&texts, &author).await?,
            };

            SummaryFields {
                display_name,
                summary_text: summary.text,
                tags: summary.tags,
                detail: summary.detail.map(into_detail),
                raw_model_response: summary.raw,
                source_post_count: fetched.posts.len() as u32,
            }
        };

        let posts = fetched.posts.into_iter().map(into_source_post).collect();
        let record = self.store.save_summary(handle, fields, posts).await?;

        tracing::info!(
            %handle,
            ?mode,
            posts = record.source_post_count,
            "Stored refreshed summary"
        );
        Ok(record)
    }

    /// Cached record and its stored posts, without touching any integration
    pub async fn cached(&self, handle: &str) -> Result<Option<(SummaryRecord, Vec<SourcePost>)>> {
        let handle = validate_handle(handle)?;
        let Some(record) = self.store.get(&handle).await? else {
            return Ok(None);
        };
        let posts = self.store.get_posts(&record.id).await?;
        Ok(Some((record, posts)))
    }

    pub async fn delete_summary(&self, handle: &str) -> Result<bool> {
        let handle = validate_handle(handle)?;
        let deleted = self.store.delete(&handle).await?;
        tracing::info!(%handle, deleted, "Deleted cached summary");
        Ok(deleted)
    }

    /// Live fetch straight from the post source, nothing is cached
    pub async fn recent_posts(&self, handle: &str, limit: usize) -> Result<FetchedPosts> {
        let handle = validate_handle(handle)?;
        let source = self
            .source
            .as_ref()
            .ok_or(GlanceError::UpstreamConfig("X API"))?;
        Ok(source.fetch_for_summary(&handle, limit).await?)
    }
}

fn quiet_fields(display_name: Option<String>, mode: SummaryMode) -> SummaryFields {
    let detail = match mode {
        SummaryMode::Brief => None,
        SummaryMode::Detailed => Some(SummaryDetail {
            topics: vec![QUIET_TAG.to_string()],
            sentiment: "neutral".to_string(),
            engagement: "low".to_string(),
        }),
    };

    SummaryFields {
        display_name,
        summary_text: QUIET_SUMMARY.to_string(),
        tags: vec![QUIET_TAG.to_string()],
        detail,
        raw_model_response: serde_json::Value::Null,
        source_post_count: 0,
    }
}

fn into_detail(analysis: DetailedAnalysis) -> SummaryDetail {
    SummaryDetail {
        topics: analysis.topics,
        sentiment: analysis.sentiment,
        engagement: analysis.engagement,
    }
}

fn into_source_post(post: CleanPost) -> SourcePost {
    SourcePost {
        post_id: post.post_id,
        text: post.text,
        posted_at: post.posted_at,
        like_count: post.like_count,
        repost_count: post.repost_count,
    }
}

/// Builder for [`SummaryService`]; only the store is required
pub struct SummaryServiceBuilder {
    store: Option<Arc<dyn CacheStore>>,
    source: Option<Arc<dyn PostSource>>,
    summarizer: Option<Arc<dyn Summarizer>>,
    clock: Arc<dyn Clock>,
    freshness: Duration,
}

impl SummaryServiceBuilder {
    pub fn new() -> Self {
        Self {
            store: None,
            source: None,
            summarizer: None,
            clock: Arc::new(SystemClock),
            freshness: Duration::hours(DEFAULT_FRESHNESS_HOURS),
        }
    }

    pub fn store(mut self, store: Arc<dyn CacheStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn post_source(mut self, source: Arc<dyn PostSource>) -> Self {
        self.source = Some(source);
        self
    }

    pub fn summarizer(mut self, summarizer: Arc<dyn Summarizer>) -> Self {
        self.summarizer = Some(summarizer);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// How long a stored summary is served before it is refreshed
    pub fn freshness(mut self, window: Duration) -> Self {
        self.freshness = window;
        self
    }

    pub fn build(self) -> Result<SummaryService> {
        let store = self
            .store
            .ok_or(GlanceError::UpstreamConfig("Cache store"))?;

        Ok(SummaryService {
            store,
            source: self.source,
            summarizer: self.summarizer,
            clock: self.clock,
            freshness: self.freshness,
        })
    }
}

impl Default for SummaryServiceBuilder {
    fn default() -> Self {
        Self::new()
    }
}
