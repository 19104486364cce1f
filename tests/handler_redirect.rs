mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::{FailingCache, TestApp, link};
use std::sync::Arc;

#[tokio::test]
async fn test_redirect_success() {
    let app = TestApp::new();
    app.links.seed(link("abc123", "https://example.com/target", None, None));
    let server = app.server();

    let response = server.get("/abc123").await;

    response.assert_status(StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.header("location"), "https://example.com/target");
}

#[tokio::test]
async fn test_redirect_counts_clicks() {
    let app = TestApp::new();
    app.links.seed(link("count1", "https://example.com", None, None));
    let server = app.server();

    for _ in 0..3 {
        server
            .get("/count1")
            .await
            .assert_status(StatusCode::TEMPORARY_REDIRECT);
    }

    let stats = server.get("/count1/stats").await;
    stats.assert_status_ok();
    assert_eq!(stats.json::<serde_json::Value>()["clicks"], 3);
}

#[tokio::test]
async fn test_redirect_not_found() {
    let app = TestApp::new();
    let server = app.server();

    let response = server.get("/nope42").await;

    response.assert_status_not_found();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "not_found");
}

#[tokio::test]
async fn test_redirect_expired_link() {
    let app = TestApp::new();
    app.links.seed(link(
        "late01",
        "https://example.com",
        None,
        Some(Utc::now() - Duration::minutes(1)),
    ));
    let server = app.server();

    server.get("/late01").await.assert_status_not_found();
}

#[tokio::test]
async fn test_redirect_survives_cache_outage() {
    let app = TestApp::with_cache(Arc::new(FailingCache));
    app.links.seed(link("resil1", "https://example.com", None, None));
    let server = app.server();

    let response = server.get("/resil1").await;

    response.assert_status(StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.header("location"), "https://example.com");
}
