#![allow(dead_code)]

use async_trait::async_trait;
use axum_test::TestServer;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use shortlink_service::application::services::{
    LinkPolicy, LinkService, TokenAuthenticator, hash_token,
};
use shortlink_service::domain::entities::{Link, LinkPatch, NewLink};
use shortlink_service::domain::repositories::{LinkRepository, TokenRepository};
use shortlink_service::error::AppError;
use shortlink_service::infrastructure::cache::{
    CacheError, CacheResult, CacheService, MemoryCache,
};
use shortlink_service::infrastructure::persistence::{
    MemoryLinkRepository, MemoryTokenRepository,
};
use shortlink_service::routes;
use shortlink_service::state::AppState;

pub const SECRET: &str = "test-signing-secret";
pub const OWNER: i64 = 1;
pub const OTHER_OWNER: i64 = 2;

/// Fully wired service over in-memory storage.
pub struct TestApp {
    pub state: AppState,
    pub service: Arc<LinkService>,
    pub links: Arc<MemoryLinkRepository>,
    pub tokens: Arc<MemoryTokenRepository>,
    pub cache: Arc<dyn CacheService>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_cache(Arc::new(MemoryCache::new(1_000, 3600)))
    }

    pub fn with_cache(cache: Arc<dyn CacheService>) -> Self {
        Self::with_cache_and_policy(cache, test_policy())
    }

    pub fn with_cache_and_policy(cache: Arc<dyn CacheService>, policy: LinkPolicy) -> Self {
        let links = Arc::new(MemoryLinkRepository::new());
        let tokens = Arc::new(MemoryTokenRepository::new());

        let service = Arc::new(LinkService::new(links.clone(), cache.clone(), policy));
        let authenticator = Arc::new(TokenAuthenticator::new(
            tokens.clone(),
            SECRET.to_string(),
        ));

        Self {
            state: AppState::new(service.clone(), authenticator),
            service,
            links,
            tokens,
            cache,
        }
    }

    /// Issues an API token for `owner_id` and returns its raw value.
    pub async fn issue_token(&self, owner_id: i64) -> String {
        let raw = format!("token-for-{owner_id}");
        self.tokens
            .create_token(owner_id, &format!("owner-{owner_id}"), &hash_token(SECRET, &raw))
            .await
            .unwrap();
        raw
    }

    pub fn server(&self) -> TestServer {
        TestServer::new(routes::router(self.state.clone())).unwrap()
    }
}

pub fn test_policy() -> LinkPolicy {
    LinkPolicy {
        cache_timeout: Duration::from_millis(50),
        ..LinkPolicy::default()
    }
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

pub fn link(
    code: &str,
    url: &str,
    owner_id: Option<i64>,
    expires_at: Option<DateTime<Utc>>,
) -> Link {
    Link {
        short_code: code.to_string(),
        original_url: url.to_string(),
        owner_id,
        created_at: Utc::now(),
        expires_at,
        clicks: 0,
        last_used: None,
    }
}

/// Cache whose every operation fails.
pub struct FailingCache;

#[async_trait]
impl CacheService for FailingCache {
    async fn get_url(&self, _short_code: &str) -> CacheResult<Option<String>> {
        Err(CacheError::ConnectionError("connection refused".into()))
    }

    async fn set_url(&self, _: &str, _: &str, _: Option<u64>) -> CacheResult<()> {
        Err(CacheError::ConnectionError("connection refused".into()))
    }

    async fn invalidate(&self, _short_code: &str) -> CacheResult<()> {
        Err(CacheError::ConnectionError("connection refused".into()))
    }

    async fn health_check(&self) -> bool {
        false
    }

    fn backend_name(&self) -> &'static str {
        "failing"
    }
}

/// Cache that never answers within any reasonable deadline.
pub struct StalledCache;

#[async_trait]
impl CacheService for StalledCache {
    async fn get_url(&self, _short_code: &str) -> CacheResult<Option<String>> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(None)
    }

    async fn set_url(&self, _: &str, _: &str, _: Option<u64>) -> CacheResult<()> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(())
    }

    async fn invalidate(&self, _short_code: &str) -> CacheResult<()> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(())
    }

    async fn health_check(&self) -> bool {
        tokio::time::sleep(Duration::from_secs(30)).await;
        true
    }

    fn backend_name(&self) -> &'static str {
        "stalled"
    }
}

/// In-process cache whose writes and evictions can be switched to fail.
pub struct WriteFailingCache {
    inner: MemoryCache,
    fail_writes: AtomicBool,
}

impl WriteFailingCache {
    pub fn new() -> Self {
        Self {
            inner: MemoryCache::new(1_000, 3600),
            fail_writes: AtomicBool::new(false),
        }
    }

    pub fn fail_writes(&self) {
        self.fail_writes.store(true, Ordering::SeqCst);
    }

    fn check_writable(&self) -> CacheResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(CacheError::OperationError("READONLY replica".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl CacheService for WriteFailingCache {
    async fn get_url(&self, short_code: &str) -> CacheResult<Option<String>> {
        self.inner.get_url(short_code).await
    }

    async fn set_url(&self, short_code: &str, url: &str, ttl: Option<u64>) -> CacheResult<()> {
        self.check_writable()?;
        self.inner.set_url(short_code, url, ttl).await
    }

    async fn invalidate(&self, short_code: &str) -> CacheResult<()> {
        self.check_writable()?;
        self.inner.invalidate(short_code).await
    }

    async fn health_check(&self) -> bool {
        true
    }

    fn backend_name(&self) -> &'static str {
        "write-failing"
    }
}

/// Repository whose owner renews a link right after it has been read.
///
/// `find_by_code` hands out the snapshot taken before the renewal, so callers
/// see an expired link that is live again by the time they act on it.
pub struct RenewedAfterReadRepository {
    pub inner: Arc<MemoryLinkRepository>,
    renew_by: chrono::Duration,
}

impl RenewedAfterReadRepository {
    pub fn new(inner: Arc<MemoryLinkRepository>) -> Self {
        Self {
            inner,
            renew_by: chrono::Duration::days(7),
        }
    }
}

#[async_trait]
impl LinkRepository for RenewedAfterReadRepository {
    async fn insert(&self, new_link: NewLink) -> Result<Link, AppError> {
        self.inner.insert(new_link).await
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError> {
        let snapshot = self.inner.find_by_code(code).await?;
        if snapshot.as_ref().is_some_and(|link| link.is_expired()) {
            let renewal = LinkPatch {
                original_url: None,
                expires_at: Some(Some(Utc::now() + self.renew_by)),
            };
            self.inner.update(code, renewal).await?;
        }
        Ok(snapshot)
    }

    async fn find_by_url(&self, url: &str, now: DateTime<Utc>) -> Result<Option<Link>, AppError> {
        self.inner.find_by_url(url, now).await
    }

    async fn update(&self, code: &str, patch: LinkPatch) -> Result<Option<Link>, AppError> {
        self.inner.update(code, patch).await
    }

    async fn delete(&self, code: &str) -> Result<bool, AppError> {
        self.inner.delete(code).await
    }

    async fn increment_usage(&self, code: &str, when: DateTime<Utc>) -> Result<bool, AppError> {
        self.inner.increment_usage(code, when).await
    }

    async fn delete_if_expired(&self, code: &str, now: DateTime<Utc>) -> Result<bool, AppError> {
        self.inner.delete_if_expired(code, now).await
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, AppError> {
        self.inner.delete_expired(now).await
    }

    async fn count(&self) -> Result<i64, AppError> {
        self.inner.count().await
    }
}

pub async fn insert_link(pool: &PgPool, code: &str, url: &str, owner_id: Option<i64>) {
    sqlx::query("INSERT INTO links (short_code, original_url, owner_id) VALUES ($1, $2, $3)")
        .bind(code)
        .bind(url)
        .bind(owner_id)
        .execute(pool)
        .await
        .unwrap();
}

pub async fn insert_expired_link(pool: &PgPool, code: &str, url: &str) {
    sqlx::query(
        "INSERT INTO links (short_code, original_url, expires_at) VALUES ($1, $2, NOW() - INTERVAL '1 hour')",
    )
    .bind(code)
    .bind(url)
    .execute(pool)
    .await
    .unwrap();
}
