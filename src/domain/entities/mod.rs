//! Core domain entities representing the business data model.
//!
//! Entities are plain data structures; orchestration lives in
//! [`crate::application::services`].
//!
//! # Entity Types
//!
//! - [`Link`] - A short code mapped to an original URL, with usage counters
//! - [`LinkStats`] - Read-only usage projection of a link
//! - [`Identity`] - The authenticated caller behind a mutation
//!
//! # Design Pattern
//!
//! Creation and partial updates use separate structs:
//! - `NewLink` - For inserting new records
//! - `LinkPatch` - For owner-initiated partial updates

pub mod identity;
pub mod link;

pub use identity::Identity;
pub use link::{Link, LinkPatch, LinkStats, NewLink};
