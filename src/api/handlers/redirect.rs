//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    response::Redirect,
};

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// # Request Flow
///
/// 1. Check cache for the URL
/// 2. On miss, load from the database and populate the cache
/// 3. Record the click
/// 4. Return 307 Temporary Redirect
///
/// Cache failures fall back to the database transparently.
///
/// # Errors
///
/// Returns 404 Not Found if the short code doesn't exist or has expired.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Redirect, AppError> {
    let original_url = state.link_service.resolve(&code).await?;

    Ok(Redirect::temporary(&original_url))
}
