//! PostgreSQL implementation of link repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{Link, LinkPatch, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::db_error::is_unique_violation_on_code;

const LINK_COLUMNS: &str =
    "short_code, original_url, owner_id, created_at, expires_at, clicks, last_used";

#[derive(sqlx::FromRow)]
struct LinkRow {
    short_code: String,
    original_url: String,
    owner_id: Option<i64>,
    created_at: DateTime<Utc>,
    expires_at: Option<DateTime<Utc>>,
    clicks: i64,
    last_used: Option<DateTime<Utc>>,
}

impl From<LinkRow> for Link {
    fn from(r: LinkRow) -> Self {
        Link {
            short_code: r.short_code,
            original_url: r.original_url,
            owner_id: r.owner_id,
            created_at: r.created_at,
            expires_at: r.expires_at,
            clicks: r.clicks,
            last_used: r.last_used,
        }
    }
}

/// PostgreSQL repository for link storage and usage accounting.
///
/// All statements are parameterized. Usage accounting is a single
/// `UPDATE ... SET clicks = clicks + 1`, so concurrent increments on the same
/// row serialize on the row lock and none are lost.
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
}

impl PgLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn insert(&self, new_link: NewLink) -> Result<Link, AppError> {
        let sql = format!(
            r#"
            INSERT INTO links (short_code, original_url, owner_id, expires_at)
            VALUES ($1, $2, $3, $4)
            RETURNING {LINK_COLUMNS}
            "#
        );

        let row = sqlx::query_as::<_, LinkRow>(&sql)
            .bind(&new_link.short_code)
            .bind(&new_link.original_url)
            .bind(new_link.owner_id)
            .bind(new_link.expires_at)
            .fetch_one(self.pool.as_ref())
            .await
            .map_err(|e| {
                if is_unique_violation_on_code(&e) {
                    AppError::duplicate_code(
                        "Short code already exists",
                        json!({ "code": new_link.short_code }),
                    )
                } else {
                    AppError::from(e)
                }
            })?;

        Ok(row.into())
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError> {
        let sql = format!("SELECT {LINK_COLUMNS} FROM links WHERE short_code = $1");

        let row = sqlx::query_as::<_, LinkRow>(&sql)
            .bind(code)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(Link::from))
    }

    async fn find_by_url(&self, url: &str, now: DateTime<Utc>) -> Result<Option<Link>, AppError> {
        let sql = format!(
            r#"
            SELECT {LINK_COLUMNS}
            FROM links
            WHERE original_url = $1
              AND (expires_at IS NULL OR expires_at > $2)
            ORDER BY created_at ASC
            LIMIT 1
            "#
        );

        let row = sqlx::query_as::<_, LinkRow>(&sql)
            .bind(url)
            .bind(now)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(Link::from))
    }

    async fn update(&self, code: &str, patch: LinkPatch) -> Result<Option<Link>, AppError> {
        let sql = format!(
            r#"
            UPDATE links
            SET original_url = COALESCE($2, original_url),
                expires_at   = CASE WHEN $3 THEN $4 ELSE expires_at END
            WHERE short_code = $1
            RETURNING {LINK_COLUMNS}
            "#
        );

        let (set_expiry, expires_at) = match patch.expires_at {
            Some(value) => (true, value),
            None => (false, None),
        };

        let row = sqlx::query_as::<_, LinkRow>(&sql)
            .bind(code)
            .bind(patch.original_url)
            .bind(set_expiry)
            .bind(expires_at)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(Link::from))
    }

    async fn delete(&self, code: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM links WHERE short_code = $1")
            .bind(code)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn increment_usage(&self, code: &str, when: DateTime<Utc>) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE links
            SET clicks = clicks + 1,
                last_used = $2
            WHERE short_code = $1
              AND (expires_at IS NULL OR expires_at > $2)
            "#,
        )
        .bind(code)
        .bind(when)
        .execute(self.pool.as_ref())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_if_expired(&self, code: &str, now: DateTime<Utc>) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            DELETE FROM links
            WHERE short_code = $1
              AND expires_at IS NOT NULL
              AND expires_at <= $2
            "#,
        )
        .bind(code)
        .bind(now)
        .execute(self.pool.as_ref())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, AppError> {
        let result =
            sqlx::query("DELETE FROM links WHERE expires_at IS NOT NULL AND expires_at <= $1")
                .bind(now)
                .execute(self.pool.as_ref())
                .await?;

        Ok(result.rows_affected())
    }

    async fn count(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM links")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }
}
