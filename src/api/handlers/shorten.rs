//! Handler for link shortening endpoint.

use axum::{Extension, Json, extract::State, http::StatusCode};
use validator::Validate;

use crate::api::dto::link::LinkResponse;
use crate::api::dto::shorten::ShortenRequest;
use crate::domain::entities::Identity;
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short link owned by the authenticated caller.
///
/// # Endpoint
///
/// `POST /api/shorten`
///
/// # Request Body
///
/// ```json
/// {
///   "original_url": "https://example.com",
///   "custom_alias": "my-link",              // optional
///   "expires_at": "2030-01-01T00:00:00Z"    // optional
/// }
/// ```
///
/// # Errors
///
/// - 400 Bad Request if the URL or alias is invalid
/// - 409 Conflict if the alias is taken by a live link
pub async fn shorten_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(payload): Json<ShortenRequest>,
) -> Result<(StatusCode, Json<LinkResponse>), AppError> {
    payload.validate()?;

    let link = state
        .link_service
        .create(
            &payload.original_url,
            payload.custom_alias.as_deref(),
            payload.expires_at,
            Some(identity),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(link.into())))
}
