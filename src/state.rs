//! Shared handler state.

use std::sync::Arc;

use crate::application::services::{Authenticator, LinkService};

/// Handles injected into every Axum handler.
///
/// Cloned per request; all fields are reference-counted.
#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService>,
    pub authenticator: Arc<dyn Authenticator>,
}

impl AppState {
    pub fn new(link_service: Arc<LinkService>, authenticator: Arc<dyn Authenticator>) -> Self {
        Self {
            link_service,
            authenticator,
        }
    }
}
