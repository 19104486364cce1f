//! Cache-backed link orchestration.
//!
//! The repository is authoritative for every decision. The cache is consulted
//! only to skip the repository read on `resolve`, and every cache call goes
//! through a timeout boundary that downgrades any failure to a miss.

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use metrics::counter;
use serde_json::json;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use super::stats_accumulator::StatsAccumulator;
use crate::domain::entities::{Identity, Link, LinkPatch, LinkStats, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::infrastructure::cache::{CacheError, CacheResult, CacheService};
use crate::utils::code_generator::{
    CodeGenerator, RandomCodeGenerator, is_reserved, validate_custom_code,
};
use crate::utils::url_normalizer::normalize_url;

/// Tunables for [`LinkService`].
#[derive(Debug, Clone)]
pub struct LinkPolicy {
    /// Expiry applied when `create` gets none. `None` means links never expire by default.
    pub default_link_ttl: Option<ChronoDuration>,
    /// Upper bound for cache entry lifetime.
    pub cache_ttl_seconds: u64,
    /// Deadline for every individual cache call.
    pub cache_timeout: Duration,
    /// Generated-code attempts before `create` gives up.
    pub max_code_attempts: usize,
}

impl Default for LinkPolicy {
    fn default() -> Self {
        Self {
            default_link_ttl: Some(ChronoDuration::days(30)),
            cache_ttl_seconds: 3600,
            cache_timeout: Duration::from_millis(250),
            max_code_attempts: 10,
        }
    }
}

/// Creates, resolves, mutates and searches short links.
///
/// # Consistency
///
/// - `resolve` may serve a cached URL until its entry expires; entry TTLs are
///   capped by the link's remaining lifetime, so an expired link is never served.
/// - `update` and `delete` refresh or drop the cache entry before returning.
/// - Usage accounting runs on every successful resolution, hit or miss.
pub struct LinkService {
    repository: Arc<dyn LinkRepository>,
    cache: Arc<dyn CacheService>,
    generator: Arc<dyn CodeGenerator>,
    stats: StatsAccumulator,
    policy: LinkPolicy,
}

impl LinkService {
    pub fn new(
        repository: Arc<dyn LinkRepository>,
        cache: Arc<dyn CacheService>,
        policy: LinkPolicy,
    ) -> Self {
        Self {
            stats: StatsAccumulator::new(repository.clone()),
            repository,
            cache,
            generator: Arc::new(RandomCodeGenerator),
            policy,
        }
    }

    /// Replaces the random code generator.
    pub fn with_code_generator(mut self, generator: Arc<dyn CodeGenerator>) -> Self {
        self.generator = generator;
        self
    }

    /// Creates a link and writes it through to the cache.
    ///
    /// `expires_at` defaults to now plus [`LinkPolicy::default_link_ttl`]. A past
    /// `expires_at` is accepted and yields a link that never resolves.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] for a malformed URL or alias
    /// - [`AppError::DuplicateCode`] if `custom_alias` belongs to a live link
    /// - [`AppError::Internal`] when generated codes keep colliding
    pub async fn create(
        &self,
        original_url: &str,
        custom_alias: Option<&str>,
        expires_at: Option<DateTime<Utc>>,
        owner: Option<Identity>,
    ) -> Result<Link, AppError> {
        let now = Utc::now();
        let original_url = normalize(original_url)?;
        let expires_at = expires_at.or_else(|| self.policy.default_link_ttl.map(|ttl| now + ttl));
        let owner_id = owner.map(|identity| identity.owner_id);

        let link = match custom_alias {
            Some(alias) => {
                validate_custom_code(alias)?;
                self.reclaim_if_expired(alias, now).await?;
                self.repository
                    .insert(NewLink {
                        short_code: alias.to_string(),
                        original_url,
                        owner_id,
                        expires_at,
                    })
                    .await?
            }
            None => {
                self.insert_generated(original_url, owner_id, expires_at)
                    .await?
            }
        };

        info!(code = %link.short_code, owner_id = ?link.owner_id, "Created short link");
        counter!("links_created_total").increment(1);

        self.cache_link(&link, now).await;

        Ok(link)
    }

    /// Resolves a code to its original URL and records one usage.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] if the code is absent or expired
    /// - [`AppError::Internal`] on storage failure or exhausted usage retries
    pub async fn resolve(&self, code: &str) -> Result<String, AppError> {
        let now = Utc::now();

        if let Some(url) = self.cached_url(code).await {
            if self.stats.record(code, now).await? {
                counter!("link_resolutions_total", "source" => "cache").increment(1);
                return Ok(url);
            }

            // Removed from storage behind the cache's back.
            self.evict(code).await;
            return Err(link_not_found(code));
        }

        let link = self
            .repository
            .find_by_code(code)
            .await?
            .ok_or_else(|| link_not_found(code))?;

        if link.is_expired_at(now) {
            self.purge_expired(code, now).await;
            return Err(link_not_found(code));
        }

        self.cache_link(&link, now).await;

        if !self.stats.record(code, now).await? {
            self.evict(code).await;
            return Err(link_not_found(code));
        }

        counter!("link_resolutions_total", "source" => "store").increment(1);
        Ok(link.original_url)
    }

    /// Changes the target URL and/or expiry of a link owned by `identity`.
    ///
    /// `expires_at` follows [`LinkPatch`] semantics: `None` leaves it unchanged,
    /// `Some(None)` clears it.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] if the code is absent
    /// - [`AppError::Forbidden`] if `identity` does not own the link
    /// - [`AppError::Validation`] for a malformed URL
    pub async fn update(
        &self,
        code: &str,
        identity: Identity,
        original_url: Option<&str>,
        expires_at: Option<Option<DateTime<Utc>>>,
    ) -> Result<Link, AppError> {
        let current = self.find_owned(code, identity).await?;

        let patch = LinkPatch {
            original_url: original_url.map(normalize).transpose()?,
            expires_at,
        };

        if patch.is_empty() {
            return Ok(current);
        }

        let link = self
            .repository
            .update(code, patch)
            .await?
            .ok_or_else(|| link_not_found(code))?;

        info!(code, owner_id = identity.owner_id, "Updated short link");

        self.refresh_cached(&link).await;

        Ok(link)
    }

    /// Deletes a link owned by `identity`.
    ///
    /// The repository delete is authoritative; a failed cache eviction is logged
    /// and does not undo it.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] if the code is absent
    /// - [`AppError::Forbidden`] if `identity` does not own the link
    pub async fn delete(&self, code: &str, identity: Identity) -> Result<bool, AppError> {
        self.find_owned(code, identity).await?;

        let deleted = self.repository.delete(code).await?;
        if !deleted {
            return Err(link_not_found(code));
        }

        info!(code, owner_id = identity.owner_id, "Deleted short link");

        self.evict(code).await;

        Ok(true)
    }

    /// Finds the oldest live link for a URL, normalized the same way as `create`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for a malformed URL.
    pub async fn search_by_original_url(&self, url: &str) -> Result<Option<Link>, AppError> {
        let url = normalize(url)?;
        self.repository.find_by_url(&url, Utc::now()).await
    }

    /// Usage projection straight from the repository.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the code is absent or expired.
    pub async fn stats(&self, code: &str) -> Result<LinkStats, AppError> {
        self.repository
            .find_by_code(code)
            .await?
            .filter(|link| !link.is_expired())
            .map(|link| link.stats())
            .ok_or_else(|| link_not_found(code))
    }

    /// Storage probe used by the health endpoint.
    pub async fn store_healthy(&self) -> bool {
        self.repository.count().await.is_ok()
    }

    /// Cache probe used by the health endpoint.
    pub async fn cache_healthy(&self) -> bool {
        tokio::time::timeout(self.policy.cache_timeout, self.cache.health_check())
            .await
            .unwrap_or(false)
    }

    pub fn cache_backend(&self) -> &'static str {
        self.cache.backend_name()
    }

    async fn find_owned(&self, code: &str, identity: Identity) -> Result<Link, AppError> {
        let link = self
            .repository
            .find_by_code(code)
            .await?
            .ok_or_else(|| link_not_found(code))?;

        if !identity.owns(link.owner_id) {
            warn!(code, owner_id = identity.owner_id, "Rejected mutation by non-owner");
            return Err(AppError::forbidden(
                "You do not own this link",
                json!({ "code": code }),
            ));
        }

        Ok(link)
    }

    /// Frees a custom alias held by an expired link.
    async fn reclaim_if_expired(&self, alias: &str, now: DateTime<Utc>) -> Result<(), AppError> {
        let Some(existing) = self.repository.find_by_code(alias).await? else {
            return Ok(());
        };

        if !existing.is_expired_at(now) {
            return Err(AppError::duplicate_code(
                "Short code already exists",
                json!({ "code": alias }),
            ));
        }

        if !self.repository.delete_if_expired(alias, now).await? {
            // Renewed or replaced since it was read.
            return Err(AppError::duplicate_code(
                "Short code already exists",
                json!({ "code": alias }),
            ));
        }

        info!(code = alias, "Reclaimed alias of expired link");
        self.evict(alias).await;

        Ok(())
    }

    async fn insert_generated(
        &self,
        original_url: String,
        owner_id: Option<i64>,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<Link, AppError> {
        let attempts = self.policy.max_code_attempts.max(1);

        for attempt in 1..=attempts {
            let code = self.generator.generate();

            if is_reserved(&code) || self.repository.find_by_code(&code).await?.is_some() {
                debug!(code = %code, attempt, "Generated code collided");
                continue;
            }

            let new_link = NewLink {
                short_code: code,
                original_url: original_url.clone(),
                owner_id,
                expires_at,
            };

            match self.repository.insert(new_link).await {
                Ok(link) => return Ok(link),
                Err(AppError::DuplicateCode { .. }) => {
                    debug!(attempt, "Generated code taken concurrently");
                }
                Err(e) => return Err(e),
            }
        }

        error!(attempts, "Exhausted short code generation attempts");
        Err(AppError::internal(
            "Failed to generate unique code",
            json!({ "reason": "Too many collisions", "attempts": attempts }),
        ))
    }

    /// Lazy deletion of an expired link found during resolution.
    async fn purge_expired(&self, code: &str, now: DateTime<Utc>) {
        match self.repository.delete_if_expired(code, now).await {
            Ok(true) => debug!(code, "Purged expired link"),
            Ok(false) => debug!(code, "Expired link was renewed or removed concurrently"),
            Err(e) => warn!(code, error = %e, "Failed to delete expired link"),
        }
        self.evict(code).await;
    }

    /// Writes an update through to the cache, falling back to eviction.
    async fn refresh_cached(&self, link: &Link) {
        let now = Utc::now();
        if !link.is_expired_at(now) && self.cache_link(link, now).await {
            return;
        }
        if !self.evict(&link.short_code).await {
            error!(
                code = %link.short_code,
                "Cache entry could not be refreshed or evicted after update"
            );
        }
    }

    async fn cached_url(&self, code: &str) -> Option<String> {
        match self.guarded(self.cache.get_url(code)).await {
            Ok(Some(url)) => {
                counter!("cache_lookups_total", "result" => "hit").increment(1);
                Some(url)
            }
            Ok(None) => {
                counter!("cache_lookups_total", "result" => "miss").increment(1);
                None
            }
            Err(e) => {
                warn!(code, error = %e, "Cache read failed, falling back to store");
                counter!("cache_lookups_total", "result" => "error").increment(1);
                None
            }
        }
    }

    /// Caches a live link for at most its remaining lifetime.
    ///
    /// Returns true if the entry was written.
    async fn cache_link(&self, link: &Link, now: DateTime<Utc>) -> bool {
        let ttl = match link.remaining_ttl_seconds(now) {
            Some(0) => return false,
            Some(remaining) => remaining.min(self.policy.cache_ttl_seconds),
            None => self.policy.cache_ttl_seconds,
        };

        let result = self
            .guarded(
                self.cache
                    .set_url(&link.short_code, &link.original_url, Some(ttl)),
            )
            .await;

        match result {
            Ok(()) => true,
            Err(e) => {
                warn!(code = %link.short_code, error = %e, "Cache write failed");
                counter!("cache_errors_total", "op" => "set").increment(1);
                false
            }
        }
    }

    /// Returns true if the entry is known to be gone.
    async fn evict(&self, code: &str) -> bool {
        match self.guarded(self.cache.invalidate(code)).await {
            Ok(()) => true,
            Err(e) => {
                warn!(code, error = %e, "Cache invalidation failed");
                counter!("cache_errors_total", "op" => "invalidate").increment(1);
                false
            }
        }
    }

    async fn guarded<T>(&self, op: impl Future<Output = CacheResult<T>>) -> CacheResult<T> {
        match tokio::time::timeout(self.policy.cache_timeout, op).await {
            Ok(result) => result,
            Err(_) => Err(CacheError::Timeout(millis_saturating(self.policy.cache_timeout))),
        }
    }
}

fn normalize(url: &str) -> Result<String, AppError> {
    normalize_url(url).map_err(|e| {
        AppError::bad_request("Invalid URL format", json!({ "reason": e.to_string() }))
    })
}

fn millis_saturating(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

fn link_not_found(code: &str) -> AppError {
    AppError::not_found("Short link not found", json!({ "code": code }))
}
