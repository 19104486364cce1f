//! Repository trait definitions for the domain layer.
//!
//! These traits are the persistence boundary: no caching or business rules
//! live behind them. Implementations are in `crate::infrastructure::persistence`.
//!
//! # Available Repositories
//!
//! - [`LinkRepository`] - Link CRUD and atomic usage accounting
//! - [`TokenRepository`] - API token lookup and management
//!
//! # Testing
//!
//! Mock implementations are generated via `mockall` for unit tests; the
//! in-memory implementations back the integration tests in `tests/`.

pub mod link_repository;
pub mod token_repository;

pub use link_repository::LinkRepository;
pub use token_repository::{ApiToken, TokenRepository};

#[cfg(test)]
pub use link_repository::MockLinkRepository;
#[cfg(test)]
pub use token_repository::MockTokenRepository;
