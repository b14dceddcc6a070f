use chrono::{Duration, Utc};
use glance_persist::{
    CacheStore, InMemoryCacheStore, PersistError, SourcePost, SummaryDetail, SummaryFields,
};
use serde_json::json;

fn fields(text: &str) -> SummaryFields {
    SummaryFields {
        display_name: Some("Alice".to_string()),
        summary_text: text.to_string(),
        tags: vec!["rust".to_string()],
        detail: None,
        raw_model_response: json!({ "content": text }),
        source_post_count: 2,
    }
}

fn post(id: &str, age_hours: i64) -> SourcePost {
    SourcePost {
        post_id: id.to_string(),
        text: format!("post number {}", id),
        posted_at: Utc::now() - Duration::hours(age_hours),
        like_count: 3,
        repost_count: 1,
    }
}

#[tokio::test]
async fn test_get_missing_handle_returns_none() {
    let store = InMemoryCacheStore::new();
    assert!(store.get("nobody").await.unwrap().is_none());
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_handles_are_case_insensitive() {
    let store = InMemoryCacheStore::new();
    store.upsert("Alice", fields("first")).await.unwrap();

    let record = store.get("ALICE").await.unwrap().expect("record");
    assert_eq!(record.handle, "alice");
    assert_eq!(record.summary_text, "first");
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn test_upsert_preserves_identity_and_advances_updated_at() {
    let store = InMemoryCacheStore::new();
    let first = store.upsert("alice", fields("first")).await.unwrap();

    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let second = store.upsert("alice", fields("second")).await.unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(first.created_at, second.created_at);
    assert!(second.updated_at > first.updated_at);
    assert_eq!(second.summary_text, "second");
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn test_handles_are_independent() {
    let store = InMemoryCacheStore::new();
    let alice = store.upsert("alice", fields("about alice")).await.unwrap();
    let bob = store.upsert("bob", fields("about bob")).await.unwrap();
    assert_ne!(alice.id, bob.id);

    store.replace_posts(&alice.id, vec![post("1", 1)]).await.unwrap();
    assert!(store.get_posts(&bob.id).await.unwrap().is_empty());

    assert!(store.delete("alice").await.unwrap());
    assert_eq!(store.get("bob").await.unwrap().unwrap().summary_text, "about bob");
}

#[tokio::test]
async fn test_replace_posts_is_wholesale() {
    let store = InMemoryCacheStore::new();
    let record = store.upsert("alice", fields("text")).await.unwrap();

    store
        .replace_posts(&record.id, vec![post("1", 3), post("2", 2)])
        .await
        .unwrap();
    store.replace_posts(&record.id, vec![post("3", 1)]).await.unwrap();

    let posts = store.get_posts(&record.id).await.unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].post_id, "3");
}

#[tokio::test]
async fn test_replace_posts_dedupes_and_orders_newest_first() {
    let store = InMemoryCacheStore::new();
    let record = store.upsert("alice", fields("text")).await.unwrap();

    store
        .replace_posts(&record.id, vec![post("old", 10), post("new", 1), post("old", 0)])
        .await
        .unwrap();

    let ids: Vec<String> = store
        .get_posts(&record.id)
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.post_id)
        .collect();
    assert_eq!(ids, vec!["new", "old"]);
}

#[tokio::test]
async fn test_replace_posts_unknown_summary() {
    let store = InMemoryCacheStore::new();
    let result = store.replace_posts("missing-id", vec![post("1", 1)]).await;
    assert!(matches!(result, Err(PersistError::SummaryNotFound(id)) if id == "missing-id"));
}

#[tokio::test]
async fn test_delete_cascades_to_posts() {
    let store = InMemoryCacheStore::new();
    let record = store
        .save_summary("alice", fields("text"), vec![post("1", 1), post("2", 2)])
        .await
        .unwrap();
    assert_eq!(store.get_posts(&record.id).await.unwrap().len(), 2);

    assert!(store.delete("Alice").await.unwrap());
    assert!(store.get("alice").await.unwrap().is_none());
    assert!(store.get_posts(&record.id).await.unwrap().is_empty());

    assert!(!store.delete("alice").await.unwrap());
}

#[tokio::test]
async fn test_save_summary_replaces_previous_posts() {
    let store = InMemoryCacheStore::new();
    let first = store
        .save_summary("alice", fields("first"), vec![post("1", 2), post("2", 1)])
        .await
        .unwrap();

    let mut detailed = fields("second");
    detailed.detail = Some(SummaryDetail {
        topics: vec!["ai".to_string()],
        sentiment: "positive".to_string(),
        engagement: "high".to_string(),
    });
    let second = store
        .save_summary("ALICE", detailed, vec![post("9", 0)])
        .await
        .unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(second.detail.as_ref().unwrap().sentiment, "positive");
    let posts = store.get_posts(&second.id).await.unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].post_id, "9");
}

#[tokio::test]
async fn test_ping_and_backend() {
    let store = InMemoryCacheStore::new();
    store.ping().await.unwrap();
    assert_eq!(store.backend(), "memory");
}
