//! In-process implementation of link repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use serde_json::json;

use crate::domain::entities::{Link, LinkPatch, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

/// Link storage held in a sharded concurrent map.
///
/// Each mutation runs under the shard lock of its key, so usage increments
/// for the same code are applied one at a time while unrelated codes proceed
/// in parallel.
#[derive(Default)]
pub struct MemoryLinkRepository {
    links: DashMap<String, Link>,
}

impl MemoryLinkRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a fully-formed record, bypassing insert-time defaults.
    ///
    /// Useful for seeding links with arbitrary timestamps or counters.
    pub fn seed(&self, link: Link) {
        self.links.insert(link.short_code.clone(), link);
    }
}

#[async_trait]
impl LinkRepository for MemoryLinkRepository {
    async fn insert(&self, new_link: NewLink) -> Result<Link, AppError> {
        match self.links.entry(new_link.short_code.clone()) {
            Entry::Occupied(_) => Err(AppError::duplicate_code(
                "Short code already exists",
                json!({ "code": new_link.short_code }),
            )),
            Entry::Vacant(slot) => {
                let link = Link::from_new(new_link, Utc::now());
                slot.insert(link.clone());
                Ok(link)
            }
        }
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError> {
        Ok(self.links.get(code).map(|l| l.value().clone()))
    }

    async fn find_by_url(&self, url: &str, now: DateTime<Utc>) -> Result<Option<Link>, AppError> {
        Ok(self
            .links
            .iter()
            .filter(|l| l.original_url == url && !l.is_expired_at(now))
            .min_by_key(|l| l.created_at)
            .map(|l| l.value().clone()))
    }

    async fn update(&self, code: &str, patch: LinkPatch) -> Result<Option<Link>, AppError> {
        let Some(mut link) = self.links.get_mut(code) else {
            return Ok(None);
        };

        if let Some(url) = patch.original_url {
            link.original_url = url;
        }
        if let Some(expires_at) = patch.expires_at {
            link.expires_at = expires_at;
        }

        Ok(Some(link.clone()))
    }

    async fn delete(&self, code: &str) -> Result<bool, AppError> {
        Ok(self.links.remove(code).is_some())
    }

    async fn increment_usage(&self, code: &str, when: DateTime<Utc>) -> Result<bool, AppError> {
        match self.links.get_mut(code) {
            Some(mut link) if !link.is_expired_at(when) => {
                link.clicks += 1;
                link.last_used = Some(when);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete_if_expired(&self, code: &str, now: DateTime<Utc>) -> Result<bool, AppError> {
        Ok(self
            .links
            .remove_if(code, |_, link| link.is_expired_at(now))
            .is_some())
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, AppError> {
        let before = self.links.len();
        self.links.retain(|_, link| !link.is_expired_at(now));
        Ok((before - self.links.len()) as u64)
    }

    async fn count(&self) -> Result<i64, AppError> {
        Ok(self.links.len() as i64)
    }
}
