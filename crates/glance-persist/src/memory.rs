use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::error::{PersistError, Result};
use crate::models::{normalize_key, prepare_posts, SourcePost, SummaryFields, SummaryRecord};
use crate::store::CacheStore;

struct Entry {
    record: SummaryRecord,
    posts: Vec<SourcePost>,
}

/// Process-local store. A record and its posts live in one entry behind a
/// single lock, so every operation is atomic.
#[derive(Default)]
pub struct InMemoryCacheStore {
    entries: RwLock<HashMap<String, Entry>>,
}

impl InMemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

fn apply_upsert(entries: &mut HashMap<String, Entry>, key: String, fields: SummaryFields) -> SummaryRecord {
    let now = Utc::now();
    let entry = entries.entry(key.clone()).or_insert_with(|| Entry {
        record: SummaryRecord {
            id: uuid::Uuid::new_v4().to_string(),
            handle: key,
            display_name: None,
            summary_text: String::new(),
            tags: Vec::new(),
            detail: None,
            raw_model_response: serde_json::Value::Null,
            source_post_count: 0,
            created_at: now,
            updated_at: now,
        },
        posts: Vec::new(),
    });

    let record = &mut entry.record;
    record.display_name = fields.display_name;
    record.summary_text = fields.summary_text;
    record.tags = fields.tags;
    record.detail = fields.detail;
    record.raw_model_response = fields.raw_model_response;
    record.source_post_count = fields.source_post_count;
    record.updated_at = now;

    record.clone()
}

fn find_by_id<'a>(entries: &'a mut HashMap<String, Entry>, summary_id: &str) -> Option<&'a mut Entry> {
    entries.values_mut().find(|e| e.record.id == summary_id)
}

#[async_trait]
impl CacheStore for InMemoryCacheStore {
    async fn get(&self, handle: &str) -> Result<Option<SummaryRecord>> {
        let entries = self.entries.read().await;
        Ok(entries.get(&normalize_key(handle)).map(|e| e.record.clone()))
    }

    async fn upsert(&self, handle: &str, fields: SummaryFields) -> Result<SummaryRecord> {
        let mut entries = self.entries.write().await;
        Ok(apply_upsert(&mut entries, normalize_key(handle), fields))
    }

    async fn replace_posts(&self, summary_id: &str, posts: Vec<SourcePost>) -> Result<()> {
        let mut entries = self.entries.write().await;
        let entry = find_by_id(&mut entries, summary_id)
            .ok_or_else(|| PersistError::SummaryNotFound(summary_id.to_string()))?;
        entry.posts = prepare_posts(posts);
        Ok(())
    }

    async fn get_posts(&self, summary_id: &str) -> Result<Vec<SourcePost>> {
        let entries = self.entries.read().await;
        Ok(entries
            .values()
            .find(|e| e.record.id == summary_id)
            .map(|e| e.posts.clone())
            .unwrap_or_default())
    }

    async fn delete(&self, handle: &str) -> Result<bool> {
        let mut entries = self.entries.write().await;
        Ok(entries.remove(&normalize_key(handle)).is_some())
    }

    async fn save_summary(
        &self,
        handle: &str,
        fields: SummaryFields,
        posts: Vec<SourcePost>,
    ) -> Result<SummaryRecord> {
        let key = normalize_key(handle);
        let posts = prepare_posts(posts);

        let mut entries = self.entries.write().await;
        let record = apply_upsert(&mut entries, key.clone(), fields);
        if let Some(entry) = entries.get_mut(&key) {
            entry.posts = posts;
        }
        Ok(record)
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
