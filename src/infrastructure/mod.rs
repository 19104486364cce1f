//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer, providing
//! concrete implementations for data persistence and caching.
//!
//! # Modules
//!
//! - [`cache`] - Cache backends: Redis, `moka` in-process and no-op
//! - [`persistence`] - PostgreSQL and `dashmap` in-memory repositories

pub mod cache;
pub mod persistence;
