//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: database reachable (cache may be degraded)
/// - **503 Service Unavailable**: database unreachable
///
/// The cache is never required for correct answers, so a failing cache only
/// downgrades `status` to `degraded`.
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "checks": {
///     "database": { "status": "ok", "message": "Connected" },
///     "cache": { "status": "ok", "message": "redis reachable" }
///   }
/// }
/// ```
pub async fn health_handler(
    State(state): State<AppState>,
) -> (StatusCode, Json<HealthResponse>) {
    let service = &state.link_service;
    let (store_ok, cache_ok) = tokio::join!(service.store_healthy(), service.cache_healthy());

    let database = if store_ok {
        CheckStatus::ok("Connected")
    } else {
        CheckStatus::error("Database unreachable")
    };

    let backend = service.cache_backend();
    let cache = if cache_ok {
        CheckStatus::ok(format!("{backend} reachable"))
    } else {
        CheckStatus::error(format!("{backend} unreachable"))
    };

    let (status, code) = match (database.is_ok(), cache.is_ok()) {
        (true, true) => ("healthy", StatusCode::OK),
        (true, false) => ("degraded", StatusCode::OK),
        (false, _) => ("unhealthy", StatusCode::SERVICE_UNAVAILABLE),
    };

    let response = HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks { database, cache },
    };

    (code, Json(response))
}
