use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::models::{SourcePost, SummaryDetail, SummaryRecord};

/// MongoDB-specific summary document (uses ObjectId)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoSummary {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub handle: String,
    #[serde(default)]
    pub display_name: Option<String>,
    pub summary_text: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub detail: Option<SummaryDetail>,
    #[serde(default)]
    pub raw_model_response: serde_json::Value,
    pub source_post_count: i64,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

/// MongoDB-specific post document, keyed by (summary_id, post_id)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoPost {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub summary_id: ObjectId,
    pub post_id: String,
    pub text: String,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub posted_at: DateTime<Utc>,
    pub like_count: i64,
    pub repost_count: i64,
}

impl MongoPost {
    pub fn new(summary_id: ObjectId, post: SourcePost) -> Self {
        Self {
            id: ObjectId::new(),
            summary_id,
            post_id: post.post_id,
            text: post.text,
            posted_at: post.posted_at,
            like_count: i64::try_from(post.like_count).unwrap_or(i64::MAX),
            repost_count: i64::try_from(post.repost_count).unwrap_or(i64::MAX),
        }
    }
}

// Conversions between database-agnostic and MongoDB-specific models

impl From<MongoSummary> for SummaryRecord {
    fn from(summary: MongoSummary) -> Self {
        Self {
            id: summary.id.to_hex(),
            handle: summary.handle,
            display_name: summary.display_name,
            summary_text: summary.summary_text,
            tags: summary.tags,
            detail: summary.detail,
            raw_model_response: summary.raw_model_response,
            source_post_count: u32::try_from(summary.source_post_count.max(0)).unwrap_or(u32::MAX),
            created_at: summary.created_at,
            updated_at: summary.updated_at,
        }
    }
}

impl From<MongoPost> for SourcePost {
    fn from(post: MongoPost) -> Self {
        Self {
            post_id: post.post_id,
            text: post.text,
            posted_at: post.posted_at,
            like_count: post.like_count.max(0) as u64,
            repost_count: post.repost_count.max(0) as u64,
        }
    }
}
