//! Bearer token authentication.

use async_trait::async_trait;
use hmac::{Hmac, Mac};
use serde_json::json;
use sha2::Sha256;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::domain::entities::Identity;
use crate::domain::repositories::TokenRepository;
use crate::error::AppError;

type HmacSha256 = Hmac<Sha256>;

/// Hashes a raw token with HMAC-SHA256 keyed by `secret`.
///
/// Returns a 64-character lowercase hex-encoded MAC. The admin CLI stores this
/// value when issuing tokens and [`TokenAuthenticator`] recomputes it per request.
pub fn hash_token(secret: &str, token: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(token.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Turns caller credentials into a stable [`Identity`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] for unknown or revoked credentials.
    /// Returns [`AppError::Internal`] on storage errors.
    async fn authenticate(&self, credentials: &str) -> Result<Identity, AppError>;
}

/// Authenticator for opaque API tokens.
///
/// Tokens are hashed with HMAC-SHA256 (keyed by `signing_secret`) before lookup.
/// An attacker with read-only access to the database cannot verify or forge
/// tokens without the server-side secret.
pub struct TokenAuthenticator {
    repository: Arc<dyn TokenRepository>,
    signing_secret: String,
}

impl TokenAuthenticator {
    /// `signing_secret` must match the value used when the tokens were issued.
    pub fn new(repository: Arc<dyn TokenRepository>, signing_secret: String) -> Self {
        Self {
            repository,
            signing_secret,
        }
    }
}

#[async_trait]
impl Authenticator for TokenAuthenticator {
    async fn authenticate(&self, credentials: &str) -> Result<Identity, AppError> {
        let token_hash = hash_token(&self.signing_secret, credentials);

        let Some(owner_id) = self.repository.find_owner(&token_hash).await? else {
            debug!("Rejected unknown or revoked token");
            return Err(AppError::unauthorized(
                "Unauthorized",
                json!({ "reason": "Invalid or revoked token" }),
            ));
        };

        if let Err(e) = self.repository.update_last_used(&token_hash).await {
            warn!(owner_id, error = %e, "Failed to update token last_used_at");
        }

        Ok(Identity::new(owner_id))
    }
}
