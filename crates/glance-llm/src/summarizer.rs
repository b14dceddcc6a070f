use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::DEFAULT_MODEL;
use crate::error::{LlmError, Result};
use crate::prompts;
use crate::traits::{ChatClient, ChatOptions, ChatRequest};
use crate::types::Message;

const BRIEF_MAX_TOKENS: u32 = 120;
const DETAILED_MAX_TOKENS: u32 = 200;
const SUMMARY_TEMPERATURE: f32 = 0.7;

const FALLBACK_TAG: &str = "general";
const FALLBACK_SENTIMENT: &str = "neutral";
const FALLBACK_ENGAGEMENT: &str = "medium";

/// Who the posts belong to, used to phrase the prompt
#[derive(Debug, Clone, Default)]
pub struct AuthorContext {
    pub handle: Option<String>,
    pub name: Option<String>,
}

impl AuthorContext {
    pub fn new(handle: impl Into<String>, name: Option<String>) -> Self {
        Self {
            handle: Some(handle.into()),
            name,
        }
    }

    /// `@handle (Name)`, `@handle`, or `This user`
    pub fn describe(&self) -> String {
        match (&self.handle, &self.name) {
            (Some(handle), Some(name)) if !name.is_empty() => format!("@{} ({})", handle, name),
            (Some(handle), _) => format!("@{}", handle),
            (None, _) => "This user".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailedAnalysis {
    pub topics: Vec<String>,
    pub sentiment: String,
    pub engagement: String,
}

/// Result of a summarization call
#[derive(Debug, Clone)]
pub struct Summary {
    pub text: String,
    /// Display tags; the topic list in detailed mode
    pub tags: Vec<String>,
    pub detail: Option<DetailedAnalysis>,
    /// Provider payload, kept for auditing
    pub raw: Value,
}

/// The summarization capabilities the rest of Glance depends on
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Short summary with three topic tags
    async fn brief(&self, posts: &[String], author: &AuthorContext) -> Result<Summary>;

    /// Summary plus topics, sentiment and engagement level
    async fn detailed(&self, posts: &[String], author: &AuthorContext) -> Result<Summary>;

    /// Free-form completion of a single prompt, trimmed
    async fn complete(&self, prompt: &str, options: ChatOptions) -> Result<String>;
}

pub struct OpenAISummarizer {
    client: Arc<dyn ChatClient>,
    model: String,
}

impl OpenAISummarizer {
    pub fn new(client: Arc<dyn ChatClient>) -> Self {
        Self {
            client,
            model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn ask(&self, prompt: String, options: ChatOptions) -> Result<(String, Value)> {
        let request = ChatRequest::new(self.model.clone(), vec![Message::human(prompt)])
            .with_options(options);

        let response = self.client.chat(request).await?;

        let content = response
            .content
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .ok_or(LlmError::EmptyResponse)?
            .to_string();

        if let Some(usage) = &response.usage {
            tracing::debug!(
                model = %self.model,
                input_tokens = usage.input_tokens,
                output_tokens = usage.output_tokens,
                "Chat completion finished"
            );
        }

        Ok((content, response.raw))
    }
}

#[async_trait]
impl Summarizer for OpenAISummarizer {
    async fn brief(&self, posts: &[String], author: &AuthorContext) -> Result<Summary> {
        let prompt = prompts::brief_prompt(posts, &author.describe());
        let options = ChatOptions::new()
            .max_tokens(BRIEF_MAX_TOKENS)
            .temperature(SUMMARY_TEMPERATURE);

        let (content, raw) = self.ask(prompt, options).await?;
        let (text, tags) = parse_brief(&content);

        Ok(Summary {
            text,
            tags,
            detail: None,
            raw,
        })
    }

    async fn detailed(&self, posts: &[String], author: &AuthorContext) -> Result<Summary> {
        let prompt = prompts::detailed_prompt(posts, &author.describe());
        let options = ChatOptions::new()
            .max_tokens(DETAILED_MAX_TOKENS)
            .temperature(SUMMARY_TEMPERATURE);

        let (content, raw) = self.ask(prompt, options).await?;
        let (text, detail) = parse_detailed(&content);

        Ok(Summary {
            text,
            tags: detail.topics.clone(),
            detail: Some(detail),
            raw,
        })
    }

    async fn complete(&self, prompt: &str, options: ChatOptions) -> Result<String> {
        let (content, _) = self.ask(prompt.to_string(), options).await?;
        Ok(content)
    }
}

#[derive(Debug, Deserialize)]
struct BriefPayload {
    summary: Option<String>,
    tags: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct DetailedPayload {
    summary: Option<String>,
    topics: Option<Vec<String>>,
    sentiment: Option<String>,
    engagement: Option<String>,
}

/// Remove a surrounding Markdown code fence (```json ... ```), if any.
pub fn strip_code_fences(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json") on the opening line
    let body = rest.split_once('\n').map(|(_, body)| body).unwrap_or("");
    body.trim_end().trim_end_matches("```").trim()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

pub(crate) fn parse_brief(content: &str) -> (String, Vec<String>) {
    match serde_json::from_str::<BriefPayload>(strip_code_fences(content)) {
        Ok(payload) => (
            non_empty(payload.summary).unwrap_or_else(|| content.to_string()),
            payload.tags.unwrap_or_else(|| vec![FALLBACK_TAG.to_string()]),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "Model returned non-JSON summary, using raw text");
            (content.to_string(), vec![FALLBACK_TAG.to_string()])
        }
    }
}

pub(crate) fn parse_detailed(content: &str) -> (String, DetailedAnalysis) {
    let fallback = || DetailedAnalysis {
        topics: vec![FALLBACK_TAG.to_string()],
        sentiment: FALLBACK_SENTIMENT.to_string(),
        engagement: FALLBACK_ENGAGEMENT.to_string(),
    };

    match serde_json::from_str::<DetailedPayload>(strip_code_fences(content)) {
        Ok(payload) => {
            let defaults = fallback();
            (
                non_empty(payload.summary).unwrap_or_else(|| content.to_string()),
                DetailedAnalysis {
                    topics: payload.topics.unwrap_or(defaults.topics),
                    sentiment: non_empty(payload.sentiment).unwrap_or(defaults.sentiment),
                    engagement: non_empty(payload.engagement).unwrap_or(defaults.engagement),
                },
            )
        }
        Err(e) => {
            tracing::warn!(error = %e, "Model returned non-JSON analysis, using raw text");
            (content.to_string(), fallback())
        }
    }
}
