use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Cached summary for one handle (database-agnostic)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRecord {
    pub id: String,
    /// Lowercased handle, unique across records
    pub handle: String,
    pub display_name: Option<String>,
    pub summary_text: String,
    pub tags: Vec<String>,
    pub detail: Option<SummaryDetail>,
    /// Opaque payload from the summarization call
    pub raw_model_response: serde_json::Value,
    pub source_post_count: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Extra fields produced by a detailed summarization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryDetail {
    pub topics: Vec<String>,
    pub sentiment: String,
    pub engagement: String,
}

/// Everything a refresh writes onto a record; id and timestamps are the store's job
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryFields {
    pub display_name: Option<String>,
    pub summary_text: String,
    pub tags: Vec<String>,
    pub detail: Option<SummaryDetail>,
    pub raw_model_response: serde_json::Value,
    pub source_post_count: u32,
}

/// A post a summary was derived from, owned by exactly one record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourcePost {
    pub post_id: String,
    pub text: String,
    pub posted_at: DateTime<Utc>,
    pub like_count: u64,
    pub repost_count: u64,
}

/// Store key for a handle
pub fn normalize_key(handle: &str) -> String {
    handle.trim().to_lowercase()
}

/// Drop repeated post ids (first occurrence wins) and order newest first.
pub(crate) fn prepare_posts(posts: Vec<SourcePost>) -> Vec<SourcePost> {
    let mut seen = HashSet::new();
    let mut unique: Vec<SourcePost> = posts
        .into_iter()
        .filter(|post| seen.insert(post.post_id.clone()))
        .collect();
    unique.sort_by(|a, b| b.posted_at.cmp(&a.posted_at));
    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn post(id: &str, text: &str, age_hours: i64) -> SourcePost {
        SourcePost {
            post_id: id.to_string(),
            text: text.to_string(),
            posted_at: Utc::now() - Duration::hours(age_hours),
            like_count: 0,
            repost_count: 0,
        }
    }

    #[test]
    fn test_normalize_key() {
        assert_eq!(normalize_key("  Alice "), "alice");
        assert_eq!(normalize_key("FOO"), "foo");
    }

    #[test]
    fn test_prepare_posts_dedupes_and_sorts() {
        let posts = vec![
            post("a", "older", 5),
            post("b", "newest", 1),
            post("a", "duplicate of a", 0),
        ];

        let prepared = prepare_posts(posts);
        let ids: Vec<_> = prepared.iter().map(|p| p.post_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert_eq!(prepared[1].text, "older");
    }
}
