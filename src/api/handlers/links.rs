//! Handlers for owner-scoped link mutations.

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use validator::Validate;

use crate::api::dto::link::{DeleteResponse, LinkResponse};
use crate::api::dto::update_link::UpdateLinkRequest;
use crate::domain::entities::Identity;
use crate::error::AppError;
use crate::state::AppState;

/// Updates the destination and/or expiry of a link.
///
/// # Endpoint
///
/// `PUT /api/links/{code}`
///
/// ```json
/// {
///   "original_url": "https://new-destination.com",
///   "expires_at": "2030-12-31T23:59:59Z"  // null to clear
/// }
/// ```
///
/// The cached mapping is refreshed before the response is sent, so the next
/// redirect uses the new destination.
///
/// # Errors
///
/// - 403 Forbidden if the caller does not own the link
/// - 404 Not Found if the link doesn't exist
pub async fn update_link_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(payload): Json<UpdateLinkRequest>,
) -> Result<Json<LinkResponse>, AppError> {
    payload.validate()?;

    let link = state
        .link_service
        .update(
            &code,
            identity,
            payload.original_url.as_deref(),
            payload.expires_at,
        )
        .await?;

    Ok(Json(link.into()))
}

/// Permanently deletes a link and evicts it from the cache.
///
/// # Endpoint
///
/// `DELETE /api/links/{code}`
///
/// # Errors
///
/// - 403 Forbidden if the caller does not own the link
/// - 404 Not Found if the link doesn't exist
pub async fn delete_link_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<DeleteResponse>, AppError> {
    let deleted = state.link_service.delete(&code, identity).await?;

    Ok(Json(DeleteResponse { deleted }))
}
