//! In-process implementation of token repository.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use serde_json::json;
use std::sync::atomic::{AtomicI64, Ordering};

use crate::domain::repositories::{ApiToken, TokenRepository};
use crate::error::AppError;

/// Token storage keyed by token ID.
#[derive(Default)]
pub struct MemoryTokenRepository {
    tokens: DashMap<i64, ApiToken>,
    next_id: AtomicI64,
}

impl MemoryTokenRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn find_by<P>(&self, predicate: P) -> Option<ApiToken>
    where
        P: Fn(&ApiToken) -> bool,
    {
        self.tokens
            .iter()
            .find(|t| predicate(t.value()))
            .map(|t| t.value().clone())
    }
}

#[async_trait]
impl TokenRepository for MemoryTokenRepository {
    async fn find_owner(&self, token_hash: &str) -> Result<Option<i64>, AppError> {
        Ok(self
            .find_by(|t| t.token_hash == token_hash && t.revoked_at.is_none())
            .map(|t| t.owner_id))
    }

    async fn update_last_used(&self, token_hash: &str) -> Result<(), AppError> {
        for mut token in self.tokens.iter_mut() {
            if token.token_hash == token_hash && token.revoked_at.is_none() {
                token.last_used_at = Some(Utc::now());
            }
        }
        Ok(())
    }

    async fn create_token(
        &self,
        owner_id: i64,
        name: &str,
        token_hash: &str,
    ) -> Result<ApiToken, AppError> {
        if self
            .find_by(|t| t.name == name || t.token_hash == token_hash)
            .is_some()
        {
            return Err(AppError::duplicate_code(
                "Token already exists",
                json!({ "name": name }),
            ));
        }

        let token = ApiToken {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            owner_id,
            name: name.to_string(),
            token_hash: token_hash.to_string(),
            created_at: Utc::now(),
            last_used_at: None,
            revoked_at: None,
        };
        self.tokens.insert(token.id, token.clone());

        Ok(token)
    }

    async fn list_tokens(&self) -> Result<Vec<ApiToken>, AppError> {
        let mut tokens: Vec<ApiToken> = self.tokens.iter().map(|t| t.value().clone()).collect();
        tokens.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(tokens)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<ApiToken>, AppError> {
        Ok(self.tokens.get(&id).map(|t| t.value().clone()))
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<ApiToken>, AppError> {
        Ok(self.find_by(|t| t.name == name))
    }

    async fn revoke_token(&self, id: i64) -> Result<(), AppError> {
        if let Some(mut token) = self.tokens.get_mut(&id)
            && token.revoked_at.is_none()
        {
            token.revoked_at = Some(Utc::now());
        }
        Ok(())
    }
}
