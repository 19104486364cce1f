//! DTO for the link update endpoint.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use validator::Validate;

/// Request body for `PUT /api/links/{code}`.
///
/// All fields are optional; only provided fields are changed.
///
/// # `expires_at` semantics
///
/// - **Absent** → leave existing value unchanged
/// - **`null`** → clear expiry (link never expires)
/// - **Timestamp** → set new expiry
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateLinkRequest {
    /// New destination URL for this link.
    #[validate(url(message = "Invalid URL format"))]
    pub original_url: Option<String>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    pub expires_at: Option<Option<DateTime<Utc>>>,
}
