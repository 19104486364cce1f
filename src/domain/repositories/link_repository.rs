//! Repository trait for short link data access.

use crate::domain::entities::{Link, LinkPatch, NewLink};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Repository interface for persistent link records.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::MemoryLinkRepository`] - In-process implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Inserts a new link with zeroed usage counters.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::DuplicateCode`] if `short_code` is already present.
    /// Returns [`AppError::Internal`] on storage errors.
    async fn insert(&self, new_link: NewLink) -> Result<Link, AppError>;

    /// Finds a link by its short code, expired or not.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError>;

    /// Finds the oldest link for a normalized original URL that is still alive at `now`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn find_by_url(&self, url: &str, now: DateTime<Utc>) -> Result<Option<Link>, AppError>;

    /// Applies a partial update.
    ///
    /// Returns `Ok(None)` if no link matches `code`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn update(&self, code: &str, patch: LinkPatch) -> Result<Option<Link>, AppError>;

    /// Removes a link.
    ///
    /// Returns `Ok(true)` if a record was removed, `Ok(false)` if none existed.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn delete(&self, code: &str) -> Result<bool, AppError>;

    /// Atomically increments `clicks` and sets `last_used = when`.
    ///
    /// Implemented as a single storage-side update so concurrent resolutions of
    /// the same code never lose increments. The update only applies to a link
    /// still alive at `when`; returns `Ok(false)` if the link is gone or expired.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn increment_usage(&self, code: &str, when: DateTime<Utc>) -> Result<bool, AppError>;

    /// Removes a link only if it is expired at `now`.
    ///
    /// The expiry check and the removal are one storage-side step, so a link
    /// renewed concurrently is never deleted. Returns `Ok(true)` if removed.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn delete_if_expired(&self, code: &str, now: DateTime<Utc>) -> Result<bool, AppError>;

    /// Removes every link whose expiry lies at or before `now`.
    ///
    /// Returns the number of removed records.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, AppError>;

    /// Counts all stored links, expired ones included.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn count(&self) -> Result<i64, AppError>;
}
