use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub id: String,
    pub username: String,
    pub name: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PostMetrics {
    #[serde(default)]
    pub retweet_count: u64,
    #[serde(default)]
    pub reply_count: u64,
    #[serde(default)]
    pub like_count: u64,
    #[serde(default)]
    pub quote_count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferencedPost {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
}

/// A post as returned by the upstream API, before cleaning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPost {
    pub id: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub public_metrics: PostMetrics,
    #[serde(default)]
    pub referenced_tweets: Vec<ReferencedPost>,
}

impl RawPost {
    /// Reposts and replies reference another post with these kinds
    pub fn is_repost_or_reply(&self) -> bool {
        self.referenced_tweets
            .iter()
            .any(|r| r.kind == "retweeted" || r.kind == "replied_to")
    }
}

/// A post that survived cleaning, ready to summarize and store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanPost {
    pub post_id: String,
    pub text: String,
    pub posted_at: DateTime<Utc>,
    pub like_count: u64,
    pub repost_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchedPosts {
    pub author: Author,
    pub posts: Vec<CleanPost>,
}

impl FetchedPosts {
    /// Cleaned texts in the same order as `posts`
    pub fn texts(&self) -> Vec<String> {
        self.posts.iter().map(|p| p.text.clone()).collect()
    }
}
