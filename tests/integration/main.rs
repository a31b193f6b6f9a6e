//! Integration tests for HN-Sieve
//!
//! These tests use wiremock to stand in for the item and search APIs and
//! exercise the HTTP layer, the item cache, traversal and the full sieve
//! end-to-end.

mod discovery_tests;
mod traversal_tests;

use hn_sieve::config::Config;
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Base timestamp for fixture items; item `id` is posted at `BASE_TIME + id`
pub const BASE_TIME: i64 = 1_772_000_000;

/// Creates a test configuration pointed at the mock server
///
/// Backoff is shortened to a millisecond so retry tests stay fast.
pub fn test_config(server: &MockServer) -> Config {
    let mut config = Config::default();
    config.http.backoff_base_ms = 1;
    config.http.max_backoff_ms = 5;
    config.http.timeout_secs = 5;
    config.api.item_endpoint = format!("{}/v0/item", server.uri());
    config.api.search_endpoint = format!("{}/search", server.uri());
    config.crawler.workers = 4;
    config
}

pub fn item_path(id: u64) -> String {
    format!("/v0/item/{}.json", id)
}

pub fn story(id: u64, title: &str, kids: &[u64]) -> Value {
    json!({
        "id": id,
        "type": "story",
        "by": "whoishiring",
        "time": BASE_TIME + id as i64,
        "title": title,
        "kids": kids,
    })
}

pub fn comment(id: u64, text: &str, kids: &[u64]) -> Value {
    json!({
        "id": id,
        "type": "comment",
        "by": format!("user{}", id),
        "time": BASE_TIME + id as i64,
        "text": text,
        "kids": kids,
    })
}

/// Mounts `body` as the payload of item `id`, expecting exactly `calls` requests
pub async fn mount_item(server: &MockServer, id: u64, body: Value, calls: u64) {
    Mock::given(method("GET"))
        .and(path(item_path(id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(calls)
        .mount(server)
        .await;
}
