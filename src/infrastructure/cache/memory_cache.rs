//! In-process cache backed by `moka`.

use super::service::{CacheResult, CacheService};
use async_trait::async_trait;
use moka::future::Cache;
use std::time::{Duration, Instant};
use tracing::debug;

#[derive(Clone)]
struct Entry {
    url: String,
    deadline: Instant,
}

/// Bounded, TTL-aware cache local to this process.
///
/// Used when Redis is not configured. The global time-to-live equals the
/// default TTL; shorter per-entry TTLs are enforced on read.
pub struct MemoryCache {
    entries: Cache<String, Entry>,
    default_ttl: Duration,
}

impl MemoryCache {
    pub fn new(max_capacity: u64, default_ttl_seconds: u64) -> Self {
        let default_ttl = Duration::from_secs(default_ttl_seconds.max(1));
        let entries = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(default_ttl)
            .build();

        Self {
            entries,
            default_ttl,
        }
    }
}

#[async_trait]
impl CacheService for MemoryCache {
    async fn get_url(&self, short_code: &str) -> CacheResult<Option<String>> {
        match self.entries.get(short_code).await {
            Some(entry) if entry.deadline > Instant::now() => {
                debug!("Cache HIT: {}", short_code);
                Ok(Some(entry.url))
            }
            Some(_) => {
                self.entries.invalidate(short_code).await;
                debug!("Cache EXPIRED: {}", short_code);
                Ok(None)
            }
            None => {
                debug!("Cache MISS: {}", short_code);
                Ok(None)
            }
        }
    }

    async fn set_url(
        &self,
        short_code: &str,
        original_url: &str,
        ttl_seconds: Option<u64>,
    ) -> CacheResult<()> {
        let ttl = ttl_seconds
            .map(Duration::from_secs)
            .unwrap_or(self.default_ttl)
            .min(self.default_ttl);

        let entry = Entry {
            url: original_url.to_string(),
            deadline: Instant::now() + ttl,
        };
        self.entries.insert(short_code.to_string(), entry).await;

        Ok(())
    }

    async fn invalidate(&self, short_code: &str) -> CacheResult<()> {
        self.entries.invalidate(short_code).await;
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_then_get() {
        let cache = MemoryCache::new(100, 60);
        cache
            .set_url("abc123", "https://example.com", None)
            .await
            .unwrap();

        assert_eq!(
            cache.get_url("abc123").await.unwrap().as_deref(),
            Some("https://example.com")
        );
    }

    #[tokio::test]
    async fn test_invalidate_removes_entry() {
        let cache = MemoryCache::new(100, 60);
        cache
            .set_url("abc123", "https://example.com", None)
            .await
            .unwrap();
        cache.invalidate("abc123").await.unwrap();

        assert_eq!(cache.get_url("abc123").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_zero_ttl_entry_is_never_served() {
        let cache = MemoryCache::new(100, 60);
        cache
            .set_url("gone", "https://example.com", Some(0))
            .await
            .unwrap();

        assert_eq!(cache.get_url("gone").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_overwrite_replaces_url() {
        let cache = MemoryCache::new(100, 60);
        cache.set_url("abc", "https://old.com", None).await.unwrap();
        cache.set_url("abc", "https://new.com", None).await.unwrap();

        assert_eq!(
            cache.get_url("abc").await.unwrap().as_deref(),
            Some("https://new.com")
        );
    }
}
