//! DTOs for reverse lookup by original URL.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Query string of `GET /search`.
#[derive(Debug, Deserialize, Validate)]
pub struct SearchQuery {
    #[validate(length(min = 1, message = "original_url must not be empty"))]
    pub original_url: String,
}

/// One match of a reverse lookup.
#[derive(Debug, Serialize)]
pub struct SearchResult {
    pub short_code: String,
}
