//! Handler for link usage statistics.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::dto::stats::StatsResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Returns click count and last use of a link.
///
/// # Endpoint
///
/// `GET /{code}/stats`
///
/// # Response
///
/// ```json
/// {
///   "original_url": "https://example.com",
///   "created_at": "2026-01-01T00:00:00Z",
///   "clicks": 42,
///   "last_used": "2026-01-02T10:00:00Z"
/// }
/// ```
///
/// # Errors
///
/// Returns 404 Not Found if the short code doesn't exist or has expired.
pub async fn stats_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<StatsResponse>, AppError> {
    let stats = state.link_service.stats(&code).await?;

    Ok(Json(stats.into()))
}
