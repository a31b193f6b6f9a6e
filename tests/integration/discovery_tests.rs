//! Root thread discovery against a mocked search API

use crate::test_config;
use hn_sieve::crawler::{find_thread, HttpClient};
use hn_sieve::SieveError;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> HttpClient {
    HttpClient::new(&test_config(server).http, 1).expect("Failed to build client")
}

#[tokio::test]
async fn test_finds_month_thread() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("query", "Ask HN: Who is hiring? (March 2026)"))
        .and(query_param("tags", "story,author_whoishiring"))
        .and(query_param("hitsPerPage", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "hits": [
                {"title": "Ask HN: Who wants to be hired? (March 2026)", "objectID": "900"},
                {"title": "Ask HN: Freelancer? Seeking freelancer? (March 2026)", "objectID": "901"},
                {"title": "Ask HN: Who is hiring? (March 2026)", "objectID": "902"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = test_config(&server);
    let thread = find_thread(&client(&server), &config.api.search_endpoint, Some("March 2026"))
        .await
        .expect("Discovery failed");

    assert_eq!(thread.id, 902);
    assert_eq!(thread.title, "Ask HN: Who is hiring? (March 2026)");
}

#[tokio::test]
async fn test_thread_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "hits": [{"title": "Ask HN: Who wants to be hired? (July 2026)", "objectID": "1"}]
        })))
        .mount(&server)
        .await;

    let config = test_config(&server);
    let err = find_thread(&client(&server), &config.api.search_endpoint, None)
        .await
        .unwrap_err();

    match err {
        SieveError::ThreadNotFound { query } => assert_eq!(query, "Ask HN: Who is hiring?"),
        other => panic!("Expected ThreadNotFound, got {:?}", other),
    }
}

#[tokio::test]
async fn test_search_failure_surfaces_http_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(400))
        .expect(1)
        .mount(&server)
        .await;

    let config = test_config(&server);
    let err = find_thread(&client(&server), &config.api.search_endpoint, None)
        .await
        .unwrap_err();

    assert!(matches!(err, SieveError::Http(_)));
}
