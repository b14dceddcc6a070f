use std::sync::Arc;

use glance_llm::{ChatOptions, Summarizer};
use glance_persist::{CacheStore, SourcePost, SummaryRecord};

use crate::error::{GlanceError, Result};
use crate::handle::validate_handle;

const ANSWER_MAX_TOKENS: u32 = 75;
const ANSWER_TEMPERATURE: f32 = 0.7;

/// Answers questions about a handle from the posts stored with its summary.
/// Never fetches new posts and never checks staleness.
pub struct FollowUpAnswerer {
    store: Arc<dyn CacheStore>,
    summarizer: Option<Arc<dyn Summarizer>>,
}

impl FollowUpAnswerer {
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self {
            store,
            summarizer: None,
        }
    }

    pub fn with_summarizer(mut self, summarizer: Arc<dyn Summarizer>) -> Self {
        self.summarizer = Some(summarizer);
        self
    }

    pub async fn answer_question(&self, handle: &str, question: &str) -> Result<String> {
        let handle = validate_handle(handle)?;
        let question = question.trim();
        if question.is_empty() {
            return Err(GlanceError::Validation("Question is required".to_string()));
        }

        let record = match self.store.get(&handle).await {
            Ok(Some(record)) => record,
            Ok(None) => return Err(no_summary()),
            Err(e) => {
                tracing::warn!(%handle, error = %e, "Cache read failed");
                return Err(no_summary());
            }
        };

        let posts = self.store.get_posts(&record.id).await.unwrap_or_else(|e| {
            tracing::warn!(%handle, error = %e, "Post read failed");
            Vec::new()
        });
        if posts.is_empty() {
            return Err(GlanceError::NotFound("No posts found for this user.".to_string()));
        }

        let summarizer = self
            .summarizer
            .as_ref()
            .ok_or(GlanceError::UpstreamConfig("OpenAI API"))?;

        let prompt = answer_prompt(&record, &posts, question);
        let options = ChatOptions::new()
            .max_tokens(ANSWER_MAX_TOKENS)
            .temperature(ANSWER_TEMPERATURE);

        tracing::info!(%handle, posts = posts.len(), "Answering follow-up question");
        Ok(summarizer.complete(&prompt, options).await?)
    }
}

fn no_summary() -> GlanceError {
    GlanceError::NotFound("No summary found for this user. Please generate a summary first.".to_string())
}

/// `N. "text" (L likes, R reposts, posted Mon Jan 05 2026)`, in stored order
pub fn format_posts(posts: &[SourcePost]) -> String {
    posts
        .iter()
        .enumerate()
        .map(|(i, post)| {
            format!(
                "{}. \"{}\" ({} likes, {} reposts, posted {})",
                i + 1,
                post.text,
                post.like_count,
                post.repost_count,
                post.posted_at.format("%a %b %d %Y")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn answer_prompt(record: &SummaryRecord, posts: &[SourcePost], question: &str) -> String {
    let name = record
        .display_name
        .as_deref()
        .filter(|name| !name.trim().is_empty())
        .unwrap_or(&record.handle);

    format!(
        "You are helping someone learn about an X user named {name} (@{handle}) based on their recent posts.\n\n\
         RECENT POSTS:\n{posts}\n\n\
         QUESTION: {question}\n\n\
         Give a brief, conversational answer (1-2 sentences max) grounded in the specific posts above. \
         You may add broader knowledge about this person when it is relevant, but lead with what the posts say \
         and only mention well-established facts.\n\n\
         If the question asks for help writing a message or an invite, write it as if speaking directly to {name}, \
         using 'you' and 'your' rather than 'they' and 'their'.\n\n\
         Keep the tone friendly and casual, like explaining this person to a peer who follows them.",
        name = name,
        handle = record.handle,
        posts = format_posts(posts),
        question = question,
    )
}
