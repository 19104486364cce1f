//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /{code}`            - Short link redirect (public)
//! - `GET  /{code}/stats`      - Usage statistics (public)
//! - `GET  /search`            - Reverse lookup by original URL (public)
//! - `GET  /health`            - Health check: database and cache (public)
//! - `/api/*`                  - Link mutations (Bearer token required)
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Authentication** - Bearer token on `/api`
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::{health_handler, redirect_handler, search_handler, stats_handler};
use crate::api::middleware::{auth, tracing};
use crate::state::AppState;
use axum::routing::get;
use axum::{Router, middleware};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(router(state))
}

/// Routes and middleware without path normalization.
pub fn router(state: AppState) -> Router {
    let api_router = api::routes::protected_routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer));

    Router::new()
        .route("/health", get(health_handler))
        .route("/search", get(search_handler))
        .route("/{code}", get(redirect_handler))
        .route("/{code}/stats", get(stats_handler))
        .nest("/api", api_router)
        .with_state(state)
        .layer(tracing::layer())
}
