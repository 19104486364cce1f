mod common;

use chrono::{Duration, Utc};
use common::{TestApp, link};
use serde_json::json;

#[tokio::test]
async fn test_stats_for_fresh_link() {
    let app = TestApp::new();
    app.links.seed(link("stat01", "https://example.com", None, None));
    let server = app.server();

    let response = server.get("/stat01/stats").await;

    response.assert_status_ok();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["original_url"], "https://example.com");
    assert_eq!(json["clicks"], 0);
    assert!(json["last_used"].is_null());
    assert!(json["created_at"].is_string());
}

#[tokio::test]
async fn test_stats_after_redirect() {
    let app = TestApp::new();
    app.links.seed(link("stat02", "https://example.com", None, None));
    let server = app.server();

    server.get("/stat02").await;
    let json = server.get("/stat02/stats").await.json::<serde_json::Value>();

    assert_eq!(json["clicks"], 1);
    assert!(json["last_used"].is_string());
}

#[tokio::test]
async fn test_stats_not_found() {
    let app = TestApp::new();
    let server = app.server();

    server.get("/absent/stats").await.assert_status_not_found();
}

#[tokio::test]
async fn test_search_finds_normalized_url() {
    let app = TestApp::new();
    app.links.seed(link("find01", "https://example.com/docs", None, None));
    let server = app.server();

    let response = server
        .get("/search")
        .add_query_param("original_url", "http://Example.com/docs/")
        .await;

    response.assert_status_ok();
    response.assert_json(&json!([{ "short_code": "find01" }]));
}

#[tokio::test]
async fn test_search_ignores_expired_links() {
    let app = TestApp::new();
    app.links.seed(link(
        "find02",
        "https://example.com",
        None,
        Some(Utc::now() - Duration::hours(2)),
    ));
    let server = app.server();

    server
        .get("/search")
        .add_query_param("original_url", "https://example.com")
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn test_search_rejects_malformed_url() {
    let app = TestApp::new();
    let server = app.server();

    server
        .get("/search")
        .add_query_param("original_url", "::not-a-url::")
        .await
        .assert_status_bad_request();
}
