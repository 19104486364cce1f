//! DTO for the link shortening endpoint.

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;
use validator::Validate;

/// Shape of a custom alias. Reserved words are rejected by the service.
static CUSTOM_ALIAS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{1,32}$").expect("valid alias regex"));

/// Request body for `POST /api/shorten`.
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenRequest {
    /// The URL to shorten (must be valid HTTP/HTTPS).
    #[validate(url(message = "Invalid URL format"))]
    pub original_url: String,

    /// Optional custom short code.
    #[validate(regex(
        path = *CUSTOM_ALIAS_REGEX,
        message = "Alias must be 1-32 letters, digits, '-' or '_'"
    ))]
    pub custom_alias: Option<String>,

    /// Optional expiry. Server default applies when absent.
    pub expires_at: Option<DateTime<Utc>>,
}
