//! DTO for link usage statistics.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::entities::LinkStats;

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub original_url: String,
    pub created_at: DateTime<Utc>,
    pub clicks: i64,
    pub last_used: Option<DateTime<Utc>>,
}

impl From<LinkStats> for StatsResponse {
    fn from(stats: LinkStats) -> Self {
        Self {
            original_url: stats.original_url,
            created_at: stats.created_at,
            clicks: stats.clicks,
            last_used: stats.last_used,
        }
    }
}
