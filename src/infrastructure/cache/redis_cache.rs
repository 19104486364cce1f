//! Redis-backed cache implementation.

use super::service::{CacheError, CacheResult, CacheService};
use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use std::str::FromStr;
use tracing::{debug, info};

/// Hash field holding the original URL in [`CacheLayout::Hash`].
const URL_FIELD: &str = "url";

/// How a mapping is laid out in Redis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheLayout {
    /// `link:{code}` is a string holding the URL (`SET ... EX`).
    #[default]
    String,
    /// `link:{code}` is a hash with field `url` (`HSET` + `EXPIRE`).
    Hash,
}

impl FromStr for CacheLayout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "string" => Ok(Self::String),
            "hash" => Ok(Self::Hash),
            other => Err(format!("unknown cache layout '{}'", other)),
        }
    }
}

/// Redis cache implementation for fast URL lookups.
///
/// Uses `ConnectionManager` for automatic reconnection and connection reuse.
/// Errors are returned to the caller, which treats them as misses.
pub struct RedisCache {
    client: ConnectionManager,
    default_ttl: u64,
    layout: CacheLayout,
    key_prefix: String,
}

impl RedisCache {
    /// Connects to Redis, validates the connection with a PING, and configures the default TTL.
    ///
    /// # Arguments
    ///
    /// - `redis_url` - Redis connection string (e.g., `"redis://localhost:6379"`)
    /// - `default_ttl_seconds` - TTL applied when [`CacheService::set_url`] gets `None`
    /// - `layout` - string or hash storage of each mapping
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::ConnectionError`] if the URL is invalid, the connection cannot
    /// be established, or the PING health check fails.
    pub async fn connect(
        redis_url: &str,
        default_ttl_seconds: u64,
        layout: CacheLayout,
    ) -> CacheResult<Self> {
        info!("Connecting to Redis ({:?} layout)", layout);

        let client = Client::open(redis_url).map_err(|e| {
            CacheError::ConnectionError(format!("Failed to create Redis client: {}", e))
        })?;

        let manager = ConnectionManager::new(client).await.map_err(|e| {
            CacheError::ConnectionError(format!("Failed to connect to Redis: {}", e))
        })?;

        let mut test_conn = manager.clone();
        test_conn
            .ping::<()>()
            .await
            .map_err(|e| CacheError::ConnectionError(format!("Redis PING failed: {}", e)))?;

        info!("Connected to Redis");

        Ok(Self {
            client: manager,
            default_ttl: default_ttl_seconds,
            layout,
            key_prefix: "link:".to_string(),
        })
    }

    /// Constructs the full Redis key with namespace prefix.
    fn build_key(&self, short_code: &str) -> String {
        format!("{}{}", self.key_prefix, short_code)
    }
}

fn op_error(action: &str, e: redis::RedisError) -> CacheError {
    CacheError::OperationError(format!("{} failed: {}", action, e))
}

#[async_trait]
impl CacheService for RedisCache {
    async fn get_url(&self, short_code: &str) -> CacheResult<Option<String>> {
        let key = self.build_key(short_code);
        let mut conn = self.client.clone();

        let url = match self.layout {
            CacheLayout::String => conn
                .get::<_, Option<String>>(&key)
                .await
                .map_err(|e| op_error("GET", e))?,
            CacheLayout::Hash => conn
                .hget::<_, _, Option<String>>(&key, URL_FIELD)
                .await
                .map_err(|e| op_error("HGET", e))?,
        };

        match &url {
            Some(url) => debug!("Cache HIT: {} -> {}", short_code, url),
            None => debug!("Cache MISS: {}", short_code),
        }

        Ok(url)
    }

    async fn set_url(
        &self,
        short_code: &str,
        original_url: &str,
        ttl_seconds: Option<u64>,
    ) -> CacheResult<()> {
        let key = self.build_key(short_code);
        let mut conn = self.client.clone();
        let ttl = ttl_seconds.unwrap_or(self.default_ttl).max(1);

        match self.layout {
            CacheLayout::String => conn
                .set_ex::<_, _, ()>(&key, original_url, ttl)
                .await
                .map_err(|e| op_error("SET", e))?,
            CacheLayout::Hash => redis::pipe()
                .atomic()
                .hset(&key, URL_FIELD, original_url)
                .ignore()
                .expire(&key, ttl as i64)
                .ignore()
                .query_async::<()>(&mut conn)
                .await
                .map_err(|e| op_error("HSET", e))?,
        }

        debug!("Cache SET: {} -> {} (TTL: {}s)", short_code, original_url, ttl);
        Ok(())
    }

    async fn invalidate(&self, short_code: &str) -> CacheResult<()> {
        let key = self.build_key(short_code);
        let mut conn = self.client.clone();

        let deleted = conn
            .del::<_, i32>(&key)
            .await
            .map_err(|e| op_error("DEL", e))?;

        if deleted > 0 {
            debug!("Cache INVALIDATE: {}", short_code);
        }

        Ok(())
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.client.clone();
        conn.ping::<()>().await.is_ok()
    }

    fn backend_name(&self) -> &'static str {
        "redis"
    }
}
