//! Tests for the fetch module

use super::*;
use crate::error::Error;
use crate::http::HttpClient;
use crate::pagination::build_request_key;
use crate::types::{JsonValue, LinkRelation, PaginatedResponse};
use pretty_assertions::assert_eq;
use serde_json::json;
use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn key(limit: u32, start: u64) -> Url {
    let target = Url::parse("https://h/ws/rest/v1/patient?q=john").unwrap();
    Url::parse(&build_request_key(&target, limit, start)).unwrap()
}

// ============================================================================
// Range Source
// ============================================================================

#[test]
fn test_range_first_page() {
    let source = RangeSource::new(1337);
    let page = source.page_for(&key(50, 0));

    assert_eq!(page.total_count, 1337);
    assert_eq!(page.results.len(), 50);
    assert_eq!(page.results.first(), Some(&0));
    assert_eq!(page.results.last(), Some(&49));
    assert!(page.has_next());
}

#[test]
fn test_range_last_page() {
    let source = RangeSource::new(1337);
    let page = source.page_for(&key(50, 1300));

    assert_eq!(page.results.len(), 37);
    assert_eq!(page.results.first(), Some(&1300));
    assert!(!page.has_next());
}

#[test]
fn test_range_next_link_advances_start_index() {
    let source = RangeSource::new(120);
    let page = source.page_for(&key(50, 50));

    let next = Url::parse(page.link(LinkRelation::Next).unwrap()).unwrap();
    let start: Vec<String> = next
        .query_pairs()
        .filter(|(n, _)| n == "startIndex")
        .map(|(_, v)| v.into_owned())
        .collect();
    assert_eq!(start, vec!["100".to_string()]);
    assert_eq!(next.query_pairs().find(|(n, _)| n == "q").unwrap().1, "john");
}

#[test]
fn test_range_defaults_without_params() {
    let source = RangeSource::new(75);
    let page = source.page_for(&Url::parse("https://h/items").unwrap());

    assert_eq!(page.results.len(), 50);
    assert_eq!(page.results.first(), Some(&0));
}

#[test]
fn test_range_past_the_end() {
    let source = RangeSource::new(10);
    let page = source.page_for(&key(5, 40));

    assert!(page.results.is_empty());
    assert_eq!(page.total_count, 10);
    assert!(!page.has_next());
}

#[tokio::test]
async fn test_range_counts_requests_across_clones() {
    let source = RangeSource::new(10);
    let clone = source.clone();

    source.fetch(&key(5, 0).to_string()).await.unwrap();
    clone.fetch(&key(5, 5).to_string()).await.unwrap();

    assert_eq!(source.requests(), 2);
    assert_eq!(clone.total(), 10);
}

#[tokio::test]
async fn test_range_rejects_relative_key() {
    let source = RangeSource::new(10);
    let err = source.fetch("/items?limit=5").await.unwrap_err();

    assert!(matches!(err, Error::InvalidUrl(_)));
    assert_eq!(source.requests(), 0);
}

// ============================================================================
// Closure Fetcher
// ============================================================================

#[tokio::test]
async fn test_fetch_fn_receives_key() {
    let fetcher = fetch_fn(|key: String| async move {
        Ok::<_, Error>(PaginatedResponse::new(vec![key], 1))
    });

    let page = PageFetcher::<String>::fetch(&fetcher, "https://h/a?limit=1")
        .await
        .unwrap();
    assert_eq!(page.results, vec!["https://h/a?limit=1".to_string()]);
}

#[tokio::test]
async fn test_fetch_fn_propagates_error() {
    let fetcher = fetch_fn(|_key: String| async move {
        Err::<PaginatedResponse<u32>, _>(Error::http_status(503, "unavailable"))
    });

    let err = PageFetcher::<u32>::fetch(&fetcher, "https://h/a")
        .await
        .unwrap_err();
    assert!(err.is_remote());
}

// ============================================================================
// HTTP Fetcher
// ============================================================================

#[tokio::test]
async fn test_http_fetcher_decodes_page() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ws/rest/v1/patient"))
        .and(query_param("limit", "2"))
        .and(query_param("startIndex", "0"))
        .and(query_param("totalCount", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{"uuid": "a"}, {"uuid": "b"}],
            "links": [{"rel": "next", "uri": "https://h/next"}],
            "totalCount": 7
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let target = Url::parse(&format!("{}/ws/rest/v1/patient", mock_server.uri())).unwrap();
    let fetcher = HttpPageFetcher::new(HttpClient::new().unwrap());

    let page: PaginatedResponse<JsonValue> = fetcher
        .fetch(&build_request_key(&target, 2, 0))
        .await
        .unwrap();

    assert_eq!(page.total_count, 7);
    assert_eq!(page.results.len(), 2);
    assert_eq!(page.link(LinkRelation::Next), Some("https://h/next"));
}

#[tokio::test]
async fn test_http_fetcher_missing_links_defaults_empty() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/items"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [1, 2, 3],
            "totalCount": 3
        })))
        .mount(&mock_server)
        .await;

    let fetcher = HttpPageFetcher::new(HttpClient::new().unwrap());
    let page: PaginatedResponse<u32> = fetcher
        .fetch(&format!("{}/items", mock_server.uri()))
        .await
        .unwrap();

    assert!(page.links.is_empty());
    assert_eq!(page.results, vec![1, 2, 3]);
}

#[tokio::test]
async fn test_http_fetcher_status_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/items"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&mock_server)
        .await;

    let fetcher = HttpPageFetcher::new(HttpClient::new().unwrap());
    let err = PageFetcher::<u32>::fetch(&fetcher, &format!("{}/items", mock_server.uri()))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::HttpStatus { status: 500, .. }));
}
