//! Caching layer for fast short-code lookups.
//!
//! Provides a [`CacheService`] trait with three implementations:
//! - [`RedisCache`] - Shared Redis-backed cache (string or hash layout)
//! - [`MemoryCache`] - In-process cache used when Redis is not configured
//! - [`NullCache`] - No-op implementation for disabled caching
//!
//! The cache is never authoritative. Implementations report failures as
//! [`CacheError`]; the link service downgrades every failure to a miss.

mod memory_cache;
mod null_cache;
mod redis_cache;
mod service;

pub use memory_cache::MemoryCache;
pub use null_cache::NullCache;
pub use redis_cache::{CacheLayout, RedisCache};
pub use service::{CacheError, CacheResult, CacheService};

#[cfg(test)]
pub use service::MockCacheService;
