//! Link entity representing a shortened URL mapping.

use chrono::{DateTime, Utc};

/// A short code mapped to a normalized original URL.
///
/// `clicks` and `last_used` are only ever advanced by the storage layer's
/// atomic usage increment; nothing in the service writes them directly.
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub short_code: String,
    pub original_url: String,
    pub owner_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub clicks: i64,
    pub last_used: Option<DateTime<Utc>>,
}

impl Link {
    /// Builds a freshly inserted link with zeroed usage counters.
    pub fn from_new(new_link: NewLink, created_at: DateTime<Utc>) -> Self {
        Self {
            short_code: new_link.short_code,
            original_url: new_link.original_url,
            owner_id: new_link.owner_id,
            created_at,
            expires_at: new_link.expires_at,
            clicks: 0,
            last_used: None,
        }
    }

    /// Returns true if the link's expiry lies at or before `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|e| e <= now)
    }

    /// Returns true if the link has passed its expiry time.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Seconds until expiry, or `None` for links that never expire.
    ///
    /// Already-expired links report zero.
    pub fn remaining_ttl_seconds(&self, now: DateTime<Utc>) -> Option<u64> {
        self.expires_at
            .map(|e| (e - now).num_seconds().max(0) as u64)
    }

    /// Read-only usage projection.
    pub fn stats(&self) -> LinkStats {
        LinkStats {
            original_url: self.original_url.clone(),
            created_at: self.created_at,
            clicks: self.clicks,
            last_used: self.last_used,
        }
    }
}

/// Input data for creating a new link.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLink {
    pub short_code: String,
    pub original_url: String,
    pub owner_id: Option<i64>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Partial update for an existing link.
///
/// `None` fields are left unchanged.
/// `expires_at: Some(None)` clears the expiry; `Some(Some(t))` sets it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinkPatch {
    pub original_url: Option<String>,
    pub expires_at: Option<Option<DateTime<Utc>>>,
}

impl LinkPatch {
    pub fn is_empty(&self) -> bool {
        self.original_url.is_none() && self.expires_at.is_none()
    }
}

/// Usage statistics for a single link.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkStats {
    pub original_url: String,
    pub created_at: DateTime<Utc>,
    pub clicks: i64,
    pub last_used: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample(expires_at: Option<DateTime<Utc>>) -> Link {
        Link::from_new(
            NewLink {
                short_code: "abc123".to_string(),
                original_url: "https://example.com".to_string(),
                owner_id: Some(1),
                expires_at,
            },
            Utc::now(),
        )
    }

    #[test]
    fn test_from_new_starts_with_zero_clicks() {
        let link = sample(None);

        assert_eq!(link.short_code, "abc123");
        assert_eq!(link.clicks, 0);
        assert!(link.last_used.is_none());
        assert!(!link.is_expired());
    }

    #[test]
    fn test_link_is_expired() {
        let link = sample(Some(Utc::now() - Duration::seconds(1)));
        assert!(link.is_expired());
    }

    #[test]
    fn test_link_in_future_is_not_expired() {
        let link = sample(Some(Utc::now() + Duration::days(1)));
        assert!(!link.is_expired());
    }

    #[test]
    fn test_remaining_ttl() {
        let now = Utc::now();
        let link = sample(Some(now + Duration::seconds(90)));

        assert_eq!(link.remaining_ttl_seconds(now), Some(90));
        assert_eq!(sample(None).remaining_ttl_seconds(now), None);
        assert_eq!(
            sample(Some(now - Duration::seconds(5))).remaining_ttl_seconds(now),
            Some(0)
        );
    }

    #[test]
    fn test_stats_projection() {
        let mut link = sample(None);
        link.clicks = 3;

        let stats = link.stats();
        assert_eq!(stats.original_url, "https://example.com");
        assert_eq!(stats.clicks, 3);
        assert_eq!(stats.created_at, link.created_at);
    }

    #[test]
    fn test_empty_patch() {
        assert!(LinkPatch::default().is_empty());
        assert!(
            !LinkPatch {
                expires_at: Some(None),
                ..Default::default()
            }
            .is_empty()
        );
    }
}
