//! Link representation returned by mutation endpoints.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::entities::Link;

/// Full link record.
#[derive(Debug, Serialize)]
pub struct LinkResponse {
    pub short_code: String,
    pub original_url: String,
    pub owner_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub clicks: i64,
    pub last_used: Option<DateTime<Utc>>,
}

impl From<Link> for LinkResponse {
    fn from(link: Link) -> Self {
        Self {
            short_code: link.short_code,
            original_url: link.original_url,
            owner_id: link.owner_id,
            created_at: link.created_at,
            expires_at: link.expires_at,
            clicks: link.clicks,
            last_used: link.last_used,
        }
    }
}

/// Body of a successful `DELETE /api/links/{code}`.
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub deleted: bool,
}
