//! Domain layer containing business entities and persistence contracts.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//!
//! # Design Principles
//!
//! - Domain layer has no dependencies on infrastructure or presentation layers
//! - Repository traits define contracts implemented by infrastructure layer
//! - Orchestration (caching, expiry, ownership) lives in
//!   [`crate::application::services`]

pub mod entities;
pub mod repositories;
