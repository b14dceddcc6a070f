//! In-process doubles for the integrations, used by the core and API tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use glance_llm::{
    AuthorContext, ChatOptions, DetailedAnalysis, LlmError, Summarizer, Summary,
};
use glance_persist::{
    CacheStore, InMemoryCacheStore, PersistError, SourcePost, SummaryFields, SummaryRecord,
};
use glance_source::{Author, PostMetrics, PostSource, RawPost, SourceError};
use serde_json::json;

use crate::clock::Clock;

// =============================================================================
// Mock Post Source
// =============================================================================

/// A raw post `age_minutes` old with a few likes and reposts
pub fn raw_post(id: &str, text: &str, age_minutes: i64) -> RawPost {
    RawPost {
        id: id.to_string(),
        text: text.to_string(),
        created_at: Utc::now() - Duration::minutes(age_minutes),
        public_metrics: PostMetrics {
            retweet_count: 2,
            reply_count: 1,
            like_count: 10,
            quote_count: 0,
        },
        referenced_tweets: Vec::new(),
    }
}

#[derive(Clone, Default)]
pub struct MockPostSource {
    accounts: Arc<Mutex<HashMap<String, (Author, Vec<RawPost>)>>>,
    rate_limited: Arc<AtomicBool>,
    lookups: Arc<Mutex<Vec<String>>>,
}

impl MockPostSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an account whose timeline is `texts`, newest first
    pub fn with_account(self, handle: &str, name: &str, texts: &[&str]) -> Self {
        let posts = texts
            .iter()
            .enumerate()
            .map(|(i, text)| raw_post(&format!("{}-{}", handle, i + 1), text, (i as i64 + 1) * 10))
            .collect();
        self.with_raw_posts(handle, name, posts)
    }

    pub fn with_raw_posts(self, handle: &str, name: &str, posts: Vec<RawPost>) -> Self {
        let author = Author {
            id: format!("id-{}", handle.to_lowercase()),
            username: handle.to_string(),
            name: name.to_string(),
        };
        self.accounts
            .lock()
            .unwrap()
            .insert(handle.to_lowercase(), (author, posts));
        self
    }

    /// Replace the timeline of an existing account
    pub fn set_posts(&self, handle: &str, texts: &[&str]) {
        let mut accounts = self.accounts.lock().unwrap();
        if let Some((_, posts)) = accounts.get_mut(&handle.to_lowercase()) {
            *posts = texts
                .iter()
                .enumerate()
                .map(|(i, text)| raw_post(&format!("{}-new-{}", handle, i + 1), text, i as i64))
                .collect();
        }
    }

    pub fn rate_limited(self) -> Self {
        self.rate_limited.store(true, Ordering::SeqCst);
        self
    }

    /// Handles passed to `find_author`, in call order
    pub fn lookups(&self) -> Vec<String> {
        self.lookups.lock().unwrap().clone()
    }

    pub fn lookup_count(&self) -> usize {
        self.lookups.lock().unwrap().len()
    }
}

#[async_trait]
impl PostSource for MockPostSource {
    async fn find_author(&self, handle: &str) -> glance_source::Result<Option<Author>> {
        self.lookups.lock().unwrap().push(handle.to_string());
        if self.rate_limited.load(Ordering::SeqCst) {
            return Err(SourceError::RateLimited);
        }
        let accounts = self.accounts.lock().unwrap();
        Ok(accounts.get(&handle.to_lowercase()).map(|(author, _)| author.clone()))
    }

    async fn recent_posts(&self, author_id: &str, limit: usize) -> glance_source::Result<Vec<RawPost>> {
        let accounts = self.accounts.lock().unwrap();
        Ok(accounts
            .values()
            .find(|(author, _)| author.id == author_id)
            .map(|(_, posts)| posts.iter().take(limit).cloned().collect())
            .unwrap_or_default())
    }
}

// =============================================================================
// Mock Summarizer
// =============================================================================

/// A call captured by [`MockSummarizer`]
#[derive(Debug, Clone, PartialEq)]
pub enum SummarizerCall {
    Brief { posts: Vec<String>, author: String },
    Detailed { posts: Vec<String>, author: String },
    Complete { prompt: String, options: ChatOptions },
}

#[derive(Clone)]
pub struct MockSummarizer {
    summaries: Arc<Mutex<Vec<String>>>,
    tags: Arc<Mutex<Vec<String>>>,
    answer: Arc<Mutex<String>>,
    rate_limited: Arc<AtomicBool>,
    calls: Arc<Mutex<Vec<SummarizerCall>>>,
}

impl MockSummarizer {
    pub fn new() -> Self {
        Self {
            summaries: Arc::new(Mutex::new(Vec::new())),
            tags: Arc::new(Mutex::new(vec![
                "rust".to_string(),
                "systems".to_string(),
                "tooling".to_string(),
            ])),
            answer: Arc::new(Mutex::new("They mostly post about Rust.".to_string())),
            rate_limited: Arc::new(AtomicBool::new(false)),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queue a summary text; once the queue is empty a canned text is used
    pub fn with_summary(self, text: &str) -> Self {
        self.summaries.lock().unwrap().push(text.to_string());
        self
    }

    /// Tags returned by brief summaries
    pub fn with_tags(self, tags: &[&str]) -> Self {
        *self.tags.lock().unwrap() = tags.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn with_answer(self, answer: &str) -> Self {
        *self.answer.lock().unwrap() = answer.to_string();
        self
    }

    pub fn rate_limited(self) -> Self {
        self.set_rate_limited(true);
        self
    }

    /// Switch throttling on or off for every clone of this summarizer
    pub fn set_rate_limited(&self, limited: bool) {
        self.rate_limited.store(limited, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<SummarizerCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn next_summary(&self) -> String {
        let mut summaries = self.summaries.lock().unwrap();
        if summaries.is_empty() {
            "Posts about systems programming.".to_string()
        } else {
            summaries.remove(0)
        }
    }

    fn check_limit(&self) -> glance_llm::Result<()> {
        if self.rate_limited.load(Ordering::SeqCst) {
            return Err(LlmError::RateLimited("429 Too Many Requests".to_string()));
        }
        Ok(())
    }
}

impl Default for MockSummarizer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Summarizer for MockSummarizer {
    async fn brief(&self, posts: &[String], author: &AuthorContext) -> glance_llm::Result<Summary> {
        self.calls.lock().unwrap().push(SummarizerCall::Brief {
            posts: posts.to_vec(),
            author: author.describe(),
        });
        self.check_limit()?;

        let text = self.next_summary();
        Ok(Summary {
            raw: json!({ "content": text }),
            text,
            tags: self.tags.lock().unwrap().clone(),
            detail: None,
        })
    }

    async fn detailed(&self, posts: &[String], author: &AuthorContext) -> glance_llm::Result<Summary> {
        self.calls.lock().unwrap().push(SummarizerCall::Detailed {
            posts: posts.to_vec(),
            author: author.describe(),
        });
        self.check_limit()?;

        let text = self.next_summary();
        let detail = DetailedAnalysis {
            topics: vec!["rust".to_string(), "compilers".to_string()],
            sentiment: "positive".to_string(),
            engagement: "high".to_string(),
        };
        Ok(Summary {
            raw: json!({ "content": text }),
            text,
            tags: detail.topics.clone(),
            detail: Some(detail),
        })
    }

    async fn complete(&self, prompt: &str, options: ChatOptions) -> glance_llm::Result<String> {
        self.calls.lock().unwrap().push(SummarizerCall::Complete {
            prompt: prompt.to_string(),
            options,
        });
        self.check_limit()?;
        Ok(self.answer.lock().unwrap().clone())
    }
}

// =============================================================================
// Manual Clock
// =============================================================================

#[derive(Clone)]
pub struct ManualClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(now)),
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock().unwrap() = now;
    }

    pub fn advance(&self, by: Duration) {
        *self.now.lock().unwrap() += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(Utc::now())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

// =============================================================================
// Failing Store
// =============================================================================

/// In-memory store whose reads or writes can be switched to fail
#[derive(Clone, Default)]
pub struct FailingStore {
    inner: Arc<InMemoryCacheStore>,
    fail_reads: Arc<AtomicBool>,
    fail_writes: Arc<AtomicBool>,
}

impl FailingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check(flag: &AtomicBool) -> glance_persist::Result<()> {
        if flag.load(Ordering::SeqCst) {
            return Err(PersistError::Connection("store unavailable".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl CacheStore for FailingStore {
    async fn get(&self, handle: &str) -> glance_persist::Result<Option<SummaryRecord>> {
        Self::check(&self.fail_reads)?;
        self.inner.get(handle).await
    }

    async fn upsert(&self, handle: &str, fields: SummaryFields) -> glance_persist::Result<SummaryRecord> {
        Self::check(&self.fail_writes)?;
        self.inner.upsert(handle, fields).await
    }

    async fn replace_posts(&self, summary_id: &str, posts: Vec<SourcePost>) -> glance_persist::Result<()> {
        Self::check(&self.fail_writes)?;
        self.inner.replace_posts(summary_id, posts).await
    }

    async fn get_posts(&self, summary_id: &str) -> glance_persist::Result<Vec<SourcePost>> {
        Self::check(&self.fail_reads)?;
        self.inner.get_posts(summary_id).await
    }

    async fn delete(&self, handle: &str) -> glance_persist::Result<bool> {
        Self::check(&self.fail_writes)?;
        self.inner.delete(handle).await
    }

    async fn save_summary(
        &self,
        handle: &str,
        fields: SummaryFields,
        posts: Vec<SourcePost>,
    ) -> glance_persist::Result<SummaryRecord> {
        Self::check(&self.fail_writes)?;
        self.inner.save_summary(handle, fields, posts).await
    }

    async fn ping(&self) -> glance_persist::Result<()> {
        Self::check(&self.fail_reads)
    }

    fn backend(&self) -> &'static str {
        "failing"
    }
}
