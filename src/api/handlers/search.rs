//! Handler for reverse lookup by original URL.

use axum::{
    Json,
    extract::{Query, State},
};
use serde_json::json;
use validator::Validate;

use crate::api::dto::search::{SearchQuery, SearchResult};
use crate::error::AppError;
use crate::state::AppState;

/// Finds the short code of a live link pointing at `original_url`.
///
/// # Endpoint
///
/// `GET /search?original_url=https://example.com`
///
/// The query URL is normalized exactly like on creation, so
/// `http://Example.com/` finds a link created for `https://example.com`.
///
/// # Errors
///
/// - 400 Bad Request if `original_url` is missing or malformed
/// - 404 Not Found if no live link matches
pub async fn search_handler(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<SearchResult>>, AppError> {
    query.validate()?;

    let link = state
        .link_service
        .search_by_original_url(&query.original_url)
        .await?
        .ok_or_else(|| {
            AppError::not_found(
                "No link found for this URL",
                json!({ "original_url": query.original_url }),
            )
        })?;

    Ok(Json(vec![SearchResult {
        short_code: link.short_code,
    }]))
}
