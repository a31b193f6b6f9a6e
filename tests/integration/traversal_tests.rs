//! Frontier traversal against a mocked item API

use crate::{comment, item_path, mount_item, story, test_config};
use hn_sieve::config::Config;
use hn_sieve::crawler::{Coordinator, HttpClient, ItemCache, TraversalOptions};
use hn_sieve::{FetchError, SieveError};
use serde_json::json;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn coordinator(config: &Config) -> Coordinator {
    let http = HttpClient::new(&config.http, 4).expect("Failed to build client");
    let cache = Arc::new(ItemCache::new(http, &config.api.item_endpoint));
    Coordinator::new(cache, TraversalOptions::from_config(&config.crawler))
}

fn collected_ids(report: &hn_sieve::TraversalReport) -> HashSet<u64> {
    report.collected.iter().map(|item| item.id).collect()
}

#[tokio::test]
async fn test_traversal_with_replies() {
    let server = MockServer::start().await;
    mount_item(&server, 100, story(100, "Ask HN: Who is hiring?", &[101, 102]), 1).await;
    mount_item(&server, 101, comment(101, "Acme | Part-time", &[]), 1).await;
    mount_item(&server, 102, comment(102, "BigCo | Full-time", &[103]), 1).await;
    mount_item(&server, 103, comment(103, "We also hire contractors", &[]), 1).await;

    let mut config = test_config(&server);
    config.crawler.include_replies = true;

    let report = coordinator(&config).run(100).await.expect("Traversal failed");

    assert_eq!(collected_ids(&report), HashSet::from([101, 102, 103]));
    assert_eq!(report.root.id, 100);
    assert_eq!(report.visited, 4);
    assert_eq!(report.waves, 2);
    assert_eq!(report.failed, 0);
    assert!(!report.cancelled);
}

#[tokio::test]
async fn test_top_level_only() {
    let server = MockServer::start().await;
    mount_item(&server, 100, story(100, "Ask HN: Who is hiring?", &[101, 102]), 1).await;
    mount_item(&server, 101, comment(101, "Acme", &[]), 1).await;
    mount_item(&server, 102, comment(102, "BigCo", &[103]), 1).await;
    mount_item(&server, 103, comment(103, "Reply", &[]), 0).await;

    let config = test_config(&server);
    let report = coordinator(&config).run(100).await.expect("Traversal failed");

    assert_eq!(collected_ids(&report), HashSet::from([101, 102]));
    assert_eq!(report.waves, 1);
    assert_eq!(report.visited, 3);
}

#[tokio::test]
async fn test_shared_child_fetched_once() {
    let server = MockServer::start().await;
    mount_item(&server, 100, story(100, "Ask HN: Who is hiring?", &[101, 102, 101]), 1).await;
    mount_item(&server, 101, comment(101, "First", &[103]), 1).await;
    mount_item(&server, 102, comment(102, "Second", &[103]), 1).await;
    mount_item(&server, 103, comment(103, "Shared", &[100]), 1).await;

    let mut config = test_config(&server);
    config.crawler.include_replies = true;

    let report = coordinator(&config).run(100).await.expect("Traversal failed");

    assert_eq!(report.collected.len(), 3);
    assert_eq!(collected_ids(&report), HashSet::from([101, 102, 103]));
    assert_eq!(report.visited, 4);
}

#[tokio::test]
async fn test_deleted_item_children_explored() {
    let server = MockServer::start().await;
    mount_item(&server, 100, story(100, "Ask HN: Who is hiring?", &[101, 102]), 1).await;
    mount_item(&server, 101, comment(101, "Live posting", &[]), 1).await;
    mount_item(&server, 102, json!({"id": 102, "deleted": true, "kids": [103]}), 1).await;
    mount_item(&server, 103, comment(103, "Orphaned reply", &[]), 1).await;

    let mut config = test_config(&server);
    config.crawler.include_replies = true;

    let report = coordinator(&config).run(100).await.expect("Traversal failed");

    assert_eq!(collected_ids(&report), HashSet::from([101, 103]));
    assert_eq!(report.removed, 1);
}

#[tokio::test]
async fn test_deleted_item_children_skipped_when_disabled() {
    let server = MockServer::start().await;
    mount_item(&server, 100, story(100, "Ask HN: Who is hiring?", &[102]), 1).await;
    mount_item(&server, 102, json!({"id": 102, "dead": true, "text": "spam", "kids": [103]}), 1).await;
    mount_item(&server, 103, comment(103, "Reply", &[]), 0).await;

    let mut config = test_config(&server);
    config.crawler.include_replies = true;
    config.crawler.explore_deleted_children = false;

    let report = coordinator(&config).run(100).await.expect("Traversal failed");

    assert!(report.collected.is_empty());
    assert_eq!(report.removed, 1);
}

#[tokio::test]
async fn test_empty_items_not_collected() {
    let server = MockServer::start().await;
    mount_item(&server, 100, story(100, "Ask HN: Who is hiring?", &[101, 102]), 1).await;
    mount_item(&server, 101, json!({"id": 101, "type": "comment", "by": "x", "time": 1}), 1).await;
    mount_item(&server, 102, comment(102, "   ", &[]), 1).await;

    let config = test_config(&server);
    let report = coordinator(&config).run(100).await.expect("Traversal failed");

    assert!(report.collected.is_empty());
    assert_eq!(report.failed, 0);
}

#[tokio::test]
async fn test_failed_item_skipped() {
    let server = MockServer::start().await;
    mount_item(&server, 100, story(100, "Ask HN: Who is hiring?", &[101, 102, 104]), 1).await;
    mount_item(&server, 101, comment(101, "Fine", &[]), 1).await;

    // Transient error on every attempt
    Mock::given(method("GET"))
        .and(path(item_path(102)))
        .respond_with(ResponseTemplate::new(500))
        .expect(4)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(item_path(104)))
        .respond_with(ResponseTemplate::new(200).set_body_string("null"))
        .expect(1)
        .mount(&server)
        .await;

    let config = test_config(&server);
    let report = coordinator(&config).run(100).await.expect("Traversal failed");

    assert_eq!(collected_ids(&report), HashSet::from([101]));
    assert_eq!(report.failed, 2);
    assert_eq!(report.skipped(), 2);
}

#[tokio::test]
async fn test_root_not_found_is_fatal() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(item_path(100)))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let config = test_config(&server);
    let err = coordinator(&config).run(100).await.unwrap_err();

    assert!(matches!(
        err,
        SieveError::RootFetchFailed {
            id: 100,
            source: FetchError::NotFound { id: 100 }
        }
    ));
}

#[tokio::test]
async fn test_root_network_failure_is_fatal() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(item_path(100)))
        .respond_with(ResponseTemplate::new(502))
        .expect(4)
        .mount(&server)
        .await;

    let config = test_config(&server);
    let err = coordinator(&config).run(100).await.unwrap_err();

    match err {
        SieveError::RootFetchFailed {
            source: FetchError::Http(http),
            ..
        } => assert!(http.is_network()),
        other => panic!("Expected root fetch failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_cancellation_returns_partial_results() {
    let server = MockServer::start().await;
    mount_item(&server, 100, story(100, "Ask HN: Who is hiring?", &[101, 102, 103]), 1).await;
    mount_item(&server, 101, comment(101, "Fast posting", &[]), 1).await;
    for id in [102, 103] {
        Mock::given(method("GET"))
            .and(path(item_path(id)))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(comment(id, "Slow posting", &[]))
                    .set_delay(Duration::from_secs(4)),
            )
            .mount(&server)
            .await;
    }

    let config = test_config(&server);
    let cancel = CancellationToken::new();
    let coordinator = coordinator(&config).with_cancellation(cancel.clone());

    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(300)).await;
        trigger.cancel();
    });

    let start = Instant::now();
    let report = coordinator.run(100).await.expect("Traversal failed");

    assert!(report.cancelled);
    assert_eq!(collected_ids(&report), HashSet::from([101]));
    assert!(start.elapsed() < Duration::from_secs(3));
}

#[tokio::test]
async fn test_cancelled_before_start() {
    let server = MockServer::start().await;
    mount_item(&server, 100, story(100, "Ask HN: Who is hiring?", &[101]), 0).await;
    mount_item(&server, 101, comment(101, "Never fetched", &[]), 0).await;

    let config = test_config(&server);
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = coordinator(&config)
        .with_cancellation(cancel)
        .run(100)
        .await
        .unwrap_err();

    assert!(matches!(err, SieveError::Cancelled));
}

#[tokio::test]
async fn test_cancellation_interrupts_root_fetch() {
    let server = MockServer::start().await;

    // Root keeps failing, so a full retry cycle would take seconds
    Mock::given(method("GET"))
        .and(path(item_path(100)))
        .respond_with(ResponseTemplate::new(503).insert_header("Retry-After", "2"))
        .mount(&server)
        .await;

    let mut config = test_config(&server);
    config.http.max_backoff_ms = 2_000;
    let cancel = CancellationToken::new();
    let coordinator = coordinator(&config).with_cancellation(cancel.clone());

    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(200)).await;
        trigger.cancel();
    });

    let start = Instant::now();
    let err = coordinator.run(100).await.unwrap_err();

    assert!(matches!(err, SieveError::Cancelled));
    assert!(start.elapsed() < Duration::from_secs(1));
}

#[tokio::test]
async fn test_runs_are_isolated() {
    let server = MockServer::start().await;
    mount_item(&server, 100, story(100, "Ask HN: Who is hiring?", &[101]), 1).await;
    mount_item(&server, 101, comment(101, "Posting", &[]), 1).await;

    let config = test_config(&server);
    let coordinator = coordinator(&config);

    let first = coordinator.run(100).await.expect("First run failed");
    let second = coordinator.run(100).await.expect("Second run failed");

    // Fresh frontier per run; the shared cache answers the second one
    assert_eq!(first.collected.len(), 1);
    assert_eq!(second.collected.len(), 1);
    assert_eq!(coordinator.cache().network_calls(), 2);
}
