//! API route configuration.
//!
//! All API endpoints require Bearer token authentication via
//! [`crate::api::middleware::auth`].

use crate::api::handlers::{delete_link_handler, shorten_handler, update_link_handler};
use crate::state::AppState;
use axum::{
    Router,
    routing::{post, put},
};

/// All API routes, protected by Bearer token authentication.
///
/// # Endpoints
///
/// - `POST   /shorten`        - Create a short link
/// - `PUT    /links/{code}`   - Update destination or expiry
/// - `DELETE /links/{code}`   - Delete a link
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/shorten", post(shorten_handler))
        .route(
            "/links/{code}",
            put(update_link_handler).delete(delete_link_handler),
        )
}
