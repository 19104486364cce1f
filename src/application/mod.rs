//! Application layer services implementing business logic.
//!
//! Services consume repository and cache traits through `Arc<dyn _>` handles
//! injected at construction and expose a transport-agnostic API to the HTTP
//! handlers and the admin CLI.
//!
//! # Available Services
//!
//! - [`services::LinkService`] - Create, resolve, update, delete, search and stats
//! - [`services::StatsAccumulator`] - Click counting with bounded retries
//! - [`services::TokenAuthenticator`] - API token authentication

pub mod services;
