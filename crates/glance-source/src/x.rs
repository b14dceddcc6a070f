// X API v2 client (HTTP direct, bearer token auth)

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SourceError};
use crate::models::{Author, RawPost};
use crate::traits::PostSource;

pub const X_API_BASE: &str = "https://api.twitter.com/2";

/// The timeline endpoint only accepts `max_results` in this range
const MIN_PAGE_SIZE: usize = 5;
const MAX_PAGE_SIZE: usize = 100;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct XConfig {
    pub bearer_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl XConfig {
    pub fn new(bearer_token: impl Into<String>) -> Self {
        Self {
            bearer_token: bearer_token.into(),
            base_url: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }
}

pub struct XClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl XClient {
    pub fn new(bearer_token: impl Into<String>) -> Result<Self> {
        Self::from_config(&XConfig::new(bearer_token))
    }

    pub fn from_config(config: &XConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", config.bearer_token))
                .map_err(|_| SourceError::InvalidToken)?,
        );

        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        let base_url = config
            .base_url
            .as_deref()
            .unwrap_or(X_API_BASE)
            .trim_end_matches('/')
            .to_string();

        Ok(Self { http_client, base_url })
    }

    /// Build `{base}/{segments...}` with each segment percent-encoded
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| SourceError::InvalidUrl(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| SourceError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &[(&str, String)],
    ) -> Result<Option<T>> {
        let response = self.http_client.get(url).query(query).send().await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(SourceError::RateLimited);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(Some(response.json().await?))
    }
}

#[async_trait]
impl PostSource for XClient {
    async fn find_author(&self, handle: &str) -> Result<Option<Author>> {
        let handle = handle.trim().trim_start_matches('@');
        let url = self.endpoint(&["users", "by", "username", handle])?;
        let query = [("user.fields", "id,username,name".to_string())];

        let envelope: Option<DataEnvelope<Author>> = self.get_json(url, &query).await?;

        // Unknown users come back as 200 with an `errors` array and no `data`
        let author = envelope.and_then(|e| e.data);
        if author.is_none() {
            tracing::debug!(handle = %handle, "X user not found");
        }
        Ok(author)
    }

    async fn recent_posts(&self, author_id: &str, limit: usize) -> Result<Vec<RawPost>> {
        let url = self.endpoint(&["users", author_id, "tweets"])?;
        let page_size = limit.clamp(MIN_PAGE_SIZE, MAX_PAGE_SIZE);
        let query = [
            ("max_results", page_size.to_string()),
            ("tweet.fields", "created_at,public_metrics,referenced_tweets".to_string()),
            ("exclude", "retweets,replies".to_string()),
        ];

        let envelope: Option<DataEnvelope<Vec<RawPost>>> = self.get_json(url, &query).await?;

        let mut posts = envelope.and_then(|e| e.data).unwrap_or_default();
        posts.truncate(limit);
        Ok(posts)
    }
}

#[derive(Debug, Deserialize)]
struct DataEnvelope<T> {
    data: Option<T>,
}
