//! HTTP request/response tracing middleware.

use axum::http::Request;
use tower_http::LatencyUnit;
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::{DefaultOnFailure, DefaultOnResponse, TraceLayer};
use tracing::{Level, Span};

type MakeSpanFn = fn(&Request<axum::body::Body>) -> Span;

/// Creates the request tracing layer.
///
/// Every request gets an `INFO` span carrying method and path (query strings
/// are left out so searched URLs do not end up in logs). Responses are logged
/// at `INFO` with latency in milliseconds; 5xx responses are additionally
/// logged at `ERROR`.
///
/// ```text
/// INFO http{method=GET path=/abc123}: finished processing request latency=3 ms status=307
/// ```
pub fn layer() -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>, MakeSpanFn> {
    TraceLayer::new_for_http()
        .make_span_with(request_span as MakeSpanFn)
        .on_response(
            DefaultOnResponse::new()
                .level(Level::INFO)
                .latency_unit(LatencyUnit::Millis),
        )
        .on_failure(DefaultOnFailure::new().level(Level::ERROR))
}

fn request_span(request: &Request<axum::body::Body>) -> Span {
    tracing::info_span!(
        "http",
        method = %request.method(),
        path = %request.uri().path(),
    )
}
