//! Exercises the reqwest-backed transport against a local mock endpoint.

use course_search_core::{
    fallback_results, FailureKind, HttpTransport, KeywordCatalog, ResultKind, SearchClient,
    SearchClientConfig, SearchStatus,
};
use mockito::{Matcher, Server, ServerGuard};
use serde_json::json;
use std::time::Duration;

fn config_for(server: &ServerGuard) -> SearchClientConfig {
    SearchClientConfig::default()
        .with_endpoint(server.url(), "/api/search")
        .with_retry_delay(Duration::from_millis(10))
}

#[tokio::test]
async fn sends_json_headers_and_encoded_query() {
    let mut server = Server::new_async().await;
    let body = json!({
        "results": [
            {"id": "rust-async", "title": "Async Rust", "type": "course", "snippet": "Futures & tokio"},
            {"id": "why-rust", "title": "Why Rust?", "type": "blog", "snippet": "Safety", "thumbnail": "https://cdn.example.com/why.png"}
        ],
        "totalResults": 2
    });
    let mock = server
        .mock("GET", "/api/search")
        .match_query(Matcher::UrlEncoded("q".into(), "rust & async".into()))
        .match_header("accept", "application/json")
        .match_header("content-type", "application/json")
        .match_header("cache-control", Matcher::Regex("no-cache".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .expect(1)
        .create_async()
        .await;

    let client = SearchClient::http(config_for(&server), KeywordCatalog::empty()).unwrap();
    let outcome = client.search_detailed("  rust & async ").await;

    mock.assert_async().await;
    assert_eq!(outcome.status, SearchStatus::Completed);
    assert_eq!(outcome.total_results, Some(2));
    assert_eq!(outcome.results[0].kind, ResultKind::Course);
    assert_eq!(outcome.results[1].route(), "/blog/why-rust");
}

#[tokio::test]
async fn not_found_is_a_single_request() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/search")
        .match_query(Matcher::Any)
        .with_status(404)
        .expect(1)
        .create_async()
        .await;

    let client = SearchClient::http(config_for(&server), KeywordCatalog::empty()).unwrap();
    let outcome = client.search_detailed("missing").await;

    mock.assert_async().await;
    assert!(outcome.results.is_empty());
    assert_eq!(outcome.failure(), Some(FailureKind::ClientError(404)));
}

#[tokio::test]
async fn html_error_page_ends_in_fallback() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/search")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "text/html")
        .with_body("<html><body>Internal error</body></html>")
        .expect(3)
        .create_async()
        .await;

    let client = SearchClient::http(config_for(&server), KeywordCatalog::empty()).unwrap();
    let outcome = client.search_detailed("rust").await;

    mock.assert_async().await;
    assert_eq!(outcome.results, fallback_results());
    assert!(outcome.is_error());
}

#[tokio::test]
async fn bare_array_response_is_accepted() {
    let mut server = Server::new_async().await;
    let body = json!([
        {"id": "1", "title": "Rust", "type": "course", "snippet": "intro"},
        {"id": "2", "title": "Tokio", "type": "blog", "snippet": "runtime"}
    ]);
    let _mock = server
        .mock("GET", "/api/search")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(body.to_string())
        .create_async()
        .await;

    let client = SearchClient::http(config_for(&server), KeywordCatalog::empty()).unwrap();
    let results = client.search("rust").await;

    assert_eq!(results.len(), 2);
    assert_eq!(results[1].title, "Tokio");
}

#[tokio::test]
async fn unreachable_endpoint_resolves_to_empty() {
    let config = SearchClientConfig::default()
        .with_endpoint("http://127.0.0.1:9", "/api/search")
        .with_retry_delay(Duration::from_millis(1))
        .with_max_retries(1);
    let client = SearchClient::http(config, KeywordCatalog::empty()).unwrap();

    let outcome = client.search_detailed("rust").await;
    assert!(outcome.results.is_empty());
    assert_eq!(outcome.attempts, 2);
    assert!(outcome.is_error());
}

#[tokio::test]
async fn preconfigured_reqwest_client_is_used() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/search")
        .match_query(Matcher::UrlEncoded("q".into(), "rust".into()))
        .match_header("user-agent", "course-search-tests")
        .match_header("accept", "application/json")
        .with_status(200)
        .with_body(r#"{"results":[{"id":"1","title":"Rust","type":"course","snippet":"intro"}]}"#)
        .expect(1)
        .create_async()
        .await;

    let http = reqwest::Client::builder()
        .user_agent("course-search-tests")
        .build()
        .unwrap();
    let client = SearchClient::new(
        HttpTransport::with_client(http),
        config_for(&server),
        KeywordCatalog::empty(),
    )
    .unwrap();
    let outcome = client.search_detailed("rust").await;

    mock.assert_async().await;
    assert_eq!(outcome.status, SearchStatus::Completed);
    assert_eq!(outcome.results.len(), 1);
}

#[tokio::test]
async fn loosely_shaped_items_reach_the_caller() {
    let mut server = Server::new_async().await;
    let body = json!({
        "results": [
            {"id": "1", "title": "Rust", "type": "course", "snippet": "intro"},
            {"id": "2", "title": "No snippet", "type": "blog"},
            {"id": "3", "title": "Release notes", "type": "article", "snippet": "v2"}
        ]
    });
    let _mock = server
        .mock("GET", "/api/search")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(body.to_string())
        .create_async()
        .await;

    let client = SearchClient::http(config_for(&server), KeywordCatalog::empty()).unwrap();
    let outcome = client.search_detailed("rust").await;

    assert_eq!(outcome.status, SearchStatus::Completed);
    assert_eq!(outcome.results.len(), 3);
    assert_eq!(outcome.results[2].kind, ResultKind::Other("article".to_string()));
    assert_eq!(outcome.results[2].route(), "/search?q=3");
}
