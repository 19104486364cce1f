//! Business logic services for the application layer.

pub mod auth_service;
pub mod link_service;
pub mod stats_accumulator;

pub use auth_service::{Authenticator, TokenAuthenticator, hash_token};
#[cfg(test)]
pub use auth_service::MockAuthenticator;
pub use link_service::{LinkPolicy, LinkService};
pub use stats_accumulator::StatsAccumulator;
