use std::sync::Arc;

use chrono::Duration;
use glance_core::testing::{FailingStore, ManualClock, MockPostSource, MockSummarizer, SummarizerCall};
use glance_core::{GlanceError, SummaryMode, SummaryService, QUIET_SUMMARY};
use glance_persist::{CacheStore, InMemoryCacheStore};

struct Harness {
    service: SummaryService,
    store: Arc<InMemoryCacheStore>,
    source: MockPostSource,
    summarizer: MockSummarizer,
    clock: ManualClock,
}

fn harness(source: MockPostSource, summarizer: MockSummarizer) -> Harness {
    let store = Arc::new(InMemoryCacheStore::new());
    let clock = ManualClock::default();
    let service = SummaryService::builder()
        .store(store.clone())
        .post_source(Arc::new(source.clone()))
        .summarizer(Arc::new(summarizer.clone()))
        .clock(Arc::new(clock.clone()))
        .build()
        .unwrap();

    Harness {
        service,
        store,
        source,
        summarizer,
        clock,
    }
}

fn alice() -> MockPostSource {
    MockPostSource::new().with_account(
        "alice",
        "Alice Smith",
        &[
            "Rewrote the parser in Rust today, 3x faster https://t.co/abc",
            "Borrow checker finally clicked for me",
            "ok",
        ],
    )
}

#[tokio::test]
async fn test_first_request_fetches_summarizes_and_stores() {
    let h = harness(alice(), MockSummarizer::new().with_summary("Alice writes Rust parsers."));

    let record = h
        .service
        .get_or_refresh_summary("alice", SummaryMode::Brief)
        .await
        .unwrap();

    assert_eq!(record.handle, "alice");
    assert_eq!(record.summary_text, "Alice writes Rust parsers.");
    assert_eq!(record.display_name.as_deref(), Some("Alice Smith"));
    // "ok" is too short to keep
    assert_eq!(record.source_post_count, 2);

    let posts = h.store.get_posts(&record.id).await.unwrap();
    assert_eq!(posts.len(), 2);
    assert_eq!(posts[0].text, "Rewrote the parser in Rust today, 3x faster");

    let calls = h.summarizer.calls();
    assert_eq!(
        calls,
        vec![SummarizerCall::Brief {
            posts: vec![
                "Rewrote the parser in Rust today, 3x faster".to_string(),
                "Borrow checker finally clicked for me".to_string(),
            ],
            author: "@alice (Alice Smith)".to_string(),
        }]
    );
}

#[tokio::test]
async fn test_repeat_within_window_makes_no_external_calls() {
    let h = harness(alice(), MockSummarizer::new());

    let first = h.service.get_or_refresh_summary("alice", SummaryMode::Brief).await.unwrap();
    h.clock.set(first.updated_at + Duration::hours(23));
    let second = h.service.get_or_refresh_summary("alice", SummaryMode::Brief).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(h.source.lookup_count(), 1);
    assert_eq!(h.summarizer.call_count(), 1);
}

#[tokio::test]
async fn test_handle_variants_share_one_record() {
    let h = harness(alice(), MockSummarizer::new());

    let a = h.service.get_or_refresh_summary("@Alice", SummaryMode::Brief).await.unwrap();
    h.clock.set(a.updated_at);
    let b = h.service.get_or_refresh_summary("alice", SummaryMode::Brief).await.unwrap();
    let c = h.service.get_or_refresh_summary("ALICE", SummaryMode::Brief).await.unwrap();

    assert_eq!(a.id, b.id);
    assert_eq!(b.id, c.id);
    assert_eq!(h.store.len().await, 1);
    assert_eq!(h.source.lookups(), vec!["alice"]);
}

#[tokio::test]
async fn test_staleness_boundary() {
    let h = harness(alice(), MockSummarizer::new());

    let first = h.service.get_or_refresh_summary("alice", SummaryMode::Brief).await.unwrap();

    h.clock.set(first.updated_at + Duration::hours(23) + Duration::minutes(59));
    h.service.get_or_refresh_summary("alice", SummaryMode::Brief).await.unwrap();
    assert_eq!(h.summarizer.call_count(), 1);

    // Exactly 24h old is still fresh
    h.clock.set(first.updated_at + Duration::hours(24));
    h.service.get_or_refresh_summary("alice", SummaryMode::Brief).await.unwrap();
    assert_eq!(h.summarizer.call_count(), 1);

    h.clock.set(first.updated_at + Duration::hours(24) + Duration::seconds(1));
    let refreshed = h.service.get_or_refresh_summary("alice", SummaryMode::Brief).await.unwrap();
    assert_eq!(h.summarizer.call_count(), 2);
    assert_eq!(refreshed.id, first.id);
    assert_eq!(refreshed.created_at, first.created_at);
    assert!(refreshed.updated_at >= first.updated_at);
}

#[tokio::test]
async fn test_refresh_replaces_posts_wholesale() {
    let h = harness(alice(), MockSummarizer::new());

    let first = h.service.get_or_refresh_summary("alice", SummaryMode::Brief).await.unwrap();
    h.source.set_posts("alice", &["Completely different post about async"]);
    h.clock.set(first.updated_at + Duration::days(2));

    let second = h.service.get_or_refresh_summary("alice", SummaryMode::Brief).await.unwrap();
    let posts = h.store.get_posts(&second.id).await.unwrap();

    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].text, "Completely different post about async");
    assert_eq!(second.source_post_count, 1);
}

#[tokio::test]
async fn test_handles_are_independent() {
    let source = alice().with_account("bob", "Bob", &["Bob talks about databases a lot"]);
    let h = harness(source, MockSummarizer::new());

    let a = h.service.get_or_refresh_summary("alice", SummaryMode::Brief).await.unwrap();
    let b = h.service.get_or_refresh_summary("bob", SummaryMode::Brief).await.unwrap();

    assert_ne!(a.id, b.id);
    assert_eq!(h.store.get_posts(&b.id).await.unwrap().len(), 1);
    assert_eq!(h.store.get_posts(&a.id).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_zero_posts_stores_placeholder_without_summarizer_call() {
    let source = MockPostSource::new().with_account("quiet", "Quiet Person", &["hi", "retweet"]);
    let h = harness(source, MockSummarizer::new());

    let record = h.service.get_or_refresh_summary("quiet", SummaryMode::Brief).await.unwrap();

    assert_eq!(record.summary_text, QUIET_SUMMARY);
    assert_eq!(record.tags, vec!["quiet"]);
    assert_eq!(record.source_post_count, 0);
    assert!(record.detail.is_none());
    assert_eq!(h.summarizer.call_count(), 0);
    assert!(h.store.get("quiet").await.unwrap().is_some());
}

#[tokio::test]
async fn test_zero_posts_detailed_placeholder() {
    let source = MockPostSource::new().with_account("quiet", "Quiet Person", &[]);
    let h = harness(source, MockSummarizer::new());

    let record = h.service.get_or_refresh_summary("quiet", SummaryMode::Detailed).await.unwrap();
    let detail = record.detail.expect("detail");

    assert_eq!(detail.topics, vec!["quiet"]);
    assert_eq!(detail.sentiment, "neutral");
    assert_eq!(detail.engagement, "low");
    assert_eq!(h.summarizer.call_count(), 0);
}

#[tokio::test]
async fn test_detailed_mode_round_trips_through_cache() {
    let h = harness(alice(), MockSummarizer::new());

    let first = h.service.get_or_refresh_summary("alice", SummaryMode::Detailed).await.unwrap();
    h.clock.set(first.updated_at);
    let cached = h.service.get_or_refresh_summary("alice", SummaryMode::Detailed).await.unwrap();

    let detail = cached.detail.expect("detail");
    assert_eq!(detail.sentiment, "positive");
    assert_eq!(cached.tags, detail.topics);
    assert!(matches!(h.summarizer.calls()[0], SummarizerCall::Detailed { .. }));
    assert_eq!(h.summarizer.call_count(), 1);
}

#[tokio::test]
async fn test_unknown_handle_is_not_found() {
    let h = harness(alice(), MockSummarizer::new());

    let err = h
        .service
        .get_or_refresh_summary("ghost", SummaryMode::Brief)
        .await
        .unwrap_err();

    assert!(matches!(err, GlanceError::NotFound(_)));
    assert!(h.store.is_empty().await);
}

#[tokio::test]
async fn test_invalid_handle_is_rejected_before_any_call() {
    let h = harness(alice(), MockSummarizer::new());

    for handle in ["", "@", "not a handle", "way_too_long_handle_name"] {
        let err = h
            .service
            .get_or_refresh_summary(handle, SummaryMode::Brief)
            .await
            .unwrap_err();
        assert!(matches!(err, GlanceError::Validation(_)), "{handle:?}");
    }
    assert_eq!(h.source.lookup_count(), 0);
}

#[tokio::test]
async fn test_rate_limits_are_reported() {
    let h = harness(alice().rate_limited(), MockSummarizer::new());
    let err = h.service.get_or_refresh_summary("alice", SummaryMode::Brief).await.unwrap_err();
    assert!(matches!(err, GlanceError::RateLimited(_)));

    let h = harness(alice(), MockSummarizer::new().rate_limited());
    let err = h.service.get_or_refresh_summary("alice", SummaryMode::Brief).await.unwrap_err();
    assert!(matches!(err, GlanceError::RateLimited(_)));
    assert!(h.store.is_empty().await);
}

#[tokio::test]
async fn test_failed_refresh_keeps_stale_record() {
    let h = harness(alice(), MockSummarizer::new().with_summary("Original summary."));
    let before = h.service.get_or_refresh_summary("alice", SummaryMode::Brief).await.unwrap();
    let posts_before = h.store.get_posts(&before.id).await.unwrap();

    h.clock.advance(Duration::days(2));
    h.source.set_posts("alice", &["A brand new post that should not land"]);
    h.summarizer.set_rate_limited(true);

    let err = h.service.get_or_refresh_summary("alice", SummaryMode::Brief).await.unwrap_err();
    assert!(matches!(err, GlanceError::RateLimited(_)));

    let after = h.store.get("alice").await.unwrap().unwrap();
    assert_eq!(after, before);
    assert_eq!(h.store.get_posts(&after.id).await.unwrap(), posts_before);
}

#[tokio::test]
async fn test_failed_save_keeps_stale_record() {
    let store = FailingStore::new();
    let source = alice();
    let clock = ManualClock::default();
    let service = SummaryService::builder()
        .store(Arc::new(store.clone()))
        .post_source(Arc::new(source.clone()))
        .summarizer(Arc::new(MockSummarizer::new().with_summary("Original summary.")))
        .clock(Arc::new(clock.clone()))
        .build()
        .unwrap();

    let before = service.get_or_refresh_summary("alice", SummaryMode::Brief).await.unwrap();
    let posts_before = store.get_posts(&before.id).await.unwrap();

    clock.advance(Duration::days(2));
    source.set_posts("alice", &["A brand new post that should not land"]);
    store.fail_writes(true);

    let err = service.get_or_refresh_summary("alice", SummaryMode::Brief).await.unwrap_err();
    assert!(matches!(err, GlanceError::Storage(_)));

    store.fail_writes(false);
    let after = store.get("alice").await.unwrap().unwrap();
    assert_eq!(after, before);
    assert_eq!(store.get_posts(&after.id).await.unwrap(), posts_before);
}

#[tokio::test]
async fn test_missing_integrations() {
    let store = Arc::new(InMemoryCacheStore::new());
    let service = SummaryService::builder().store(store.clone()).build().unwrap();

    let err = service.get_or_refresh_summary("alice", SummaryMode::Brief).await.unwrap_err();
    assert!(matches!(err, GlanceError::UpstreamConfig(_)));

    // A fresh cached record is served without either integration
    let populated = harness(alice(), MockSummarizer::new());
    populated.service.get_or_refresh_summary("alice", SummaryMode::Brief).await.unwrap();
    let cache_only = SummaryService::builder()
        .store(populated.store.clone())
        .build()
        .unwrap();
    let record = cache_only.get_or_refresh_summary("alice", SummaryMode::Brief).await.unwrap();
    assert_eq!(record.handle, "alice");
    assert!(!cache_only.integrations().posts);
    assert!(!cache_only.integrations().llm);
}

#[tokio::test]
async fn test_build_requires_store() {
    assert!(matches!(
        SummaryService::builder().build(),
        Err(GlanceError::UpstreamConfig(_))
    ));
}

#[tokio::test]
async fn test_store_read_failure_is_treated_as_miss() {
    let store = FailingStore::new();
    let summarizer = MockSummarizer::new();
    let service = SummaryService::builder()
        .store(Arc::new(store.clone()))
        .post_source(Arc::new(alice()))
        .summarizer(Arc::new(summarizer.clone()))
        .build()
        .unwrap();

    store.fail_reads(true);
    let record = service.get_or_refresh_summary("alice", SummaryMode::Brief).await.unwrap();
    assert_eq!(record.handle, "alice");
    assert_eq!(summarizer.call_count(), 1);
}

#[tokio::test]
async fn test_store_write_failure_is_storage_error() {
    let store = FailingStore::new();
    let service = SummaryService::builder()
        .store(Arc::new(store.clone()))
        .post_source(Arc::new(alice()))
        .summarizer(Arc::new(MockSummarizer::new()))
        .build()
        .unwrap();

    store.fail_writes(true);
    let err = service.get_or_refresh_summary("alice", SummaryMode::Brief).await.unwrap_err();
    assert!(matches!(err, GlanceError::Storage(_)));
}

#[tokio::test]
async fn test_cached_view_and_delete() {
    let h = harness(alice(), MockSummarizer::new());
    assert!(h.service.cached("alice").await.unwrap().is_none());

    h.service.get_or_refresh_summary("alice", SummaryMode::Brief).await.unwrap();
    let (record, posts) = h.service.cached("@ALICE").await.unwrap().expect("cached");
    assert_eq!(record.handle, "alice");
    assert_eq!(posts.len(), 2);

    assert!(h.service.delete_summary("alice").await.unwrap());
    assert!(!h.service.delete_summary("alice").await.unwrap());
    assert!(h.service.cached("alice").await.unwrap().is_none());
}

#[tokio::test]
async fn test_recent_posts_bypasses_cache() {
    let h = harness(alice(), MockSummarizer::new());

    let fetched = h.service.recent_posts("@alice", 10).await.unwrap();
    assert_eq!(fetched.author.name, "Alice Smith");
    assert_eq!(fetched.posts.len(), 2);
    assert!(h.store.is_empty().await);
    assert_eq!(h.summarizer.call_count(), 0);
}

#[tokio::test]
async fn test_alice_end_to_end() {
    let source = MockPostSource::new().with_account(
        "alice",
        "Alice",
        &[
            "First post with enough text",
            "Second post with enough text",
            "Third post with enough text",
        ],
    );
    let summarizer = MockSummarizer::new().with_summary("S").with_tags(&["a", "b", "c"]);
    let h = harness(source, summarizer);

    let record = h.service.get_or_refresh_summary("alice", SummaryMode::Brief).await.unwrap();
    assert_eq!(record.summary_text, "S");
    assert_eq!(record.tags, vec!["a", "b", "c"]);
    assert_eq!(record.source_post_count, 3);

    h.clock.set(record.updated_at + Duration::seconds(1));
    let again = h.service.get_or_refresh_summary("alice", SummaryMode::Brief).await.unwrap();
    assert_eq!(again, record);
    assert_eq!(h.source.lookup_count(), 1);
    assert_eq!(h.summarizer.call_count(), 1);
}
