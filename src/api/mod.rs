//! HTTP layer translating requests into [`crate::application::services::LinkService`] calls.
//!
//! # Modules
//!
//! - [`dto`] - Request/response bodies
//! - [`handlers`] - HTTP request handlers
//! - [`middleware`] - Authentication and tracing middleware
//! - [`routes`] - Protected route configuration

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
