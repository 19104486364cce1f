mod common;

use sqlx::PgPool;
use std::sync::Arc;

use shortlink_service::domain::repositories::TokenRepository;
use shortlink_service::error::AppError;
use shortlink_service::infrastructure::persistence::PgTokenRepository;

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_create_token(pool: PgPool) {
    let repo = PgTokenRepository::new(Arc::new(pool));

    let token = repo.create_token(42, "CI", "hash-ci").await.unwrap();

    assert_eq!(token.owner_id, 42);
    assert_eq!(token.name, "CI");
    assert_eq!(token.token_hash, "hash-ci");
    assert!(token.last_used_at.is_none());
    assert!(token.revoked_at.is_none());
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_create_token_duplicate_name(pool: PgPool) {
    let repo = PgTokenRepository::new(Arc::new(pool));
    repo.create_token(1, "shared", "hash-a").await.unwrap();

    let result = repo.create_token(2, "shared", "hash-b").await;

    assert!(matches!(result, Err(AppError::DuplicateCode { .. })));
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_find_owner_valid(pool: PgPool) {
    let repo = PgTokenRepository::new(Arc::new(pool));
    repo.create_token(42, "valid", "hash-valid").await.unwrap();

    assert_eq!(repo.find_owner("hash-valid").await.unwrap(), Some(42));
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_find_owner_unknown(pool: PgPool) {
    let repo = PgTokenRepository::new(Arc::new(pool));

    assert_eq!(repo.find_owner("nope").await.unwrap(), None);
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_find_owner_revoked(pool: PgPool) {
    let repo = PgTokenRepository::new(Arc::new(pool));
    let token = repo.create_token(42, "revoked", "hash-revoked").await.unwrap();
    repo.revoke_token(token.id).await.unwrap();

    assert_eq!(repo.find_owner("hash-revoked").await.unwrap(), None);
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_update_last_used(pool: PgPool) {
    let repo = PgTokenRepository::new(Arc::new(pool));
    let token = repo.create_token(1, "used", "hash-used").await.unwrap();

    repo.update_last_used("hash-used").await.unwrap();

    let token = repo.find_by_id(token.id).await.unwrap().unwrap();
    assert!(token.last_used_at.is_some());
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_list_tokens(pool: PgPool) {
    let repo = PgTokenRepository::new(Arc::new(pool));
    repo.create_token(1, "first", "hash-1").await.unwrap();
    repo.create_token(2, "second", "hash-2").await.unwrap();

    let tokens = repo.list_tokens().await.unwrap();

    assert_eq!(tokens.len(), 2);
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_find_by_id_and_name(pool: PgPool) {
    let repo = PgTokenRepository::new(Arc::new(pool));
    let created = repo.create_token(3, "lookup", "hash-lookup").await.unwrap();

    let by_id = repo.find_by_id(created.id).await.unwrap().unwrap();
    let by_name = repo.find_by_name("lookup").await.unwrap().unwrap();

    assert_eq!(by_id.id, by_name.id);
    assert!(repo.find_by_id(created.id + 1000).await.unwrap().is_none());
    assert!(repo.find_by_name("missing").await.unwrap().is_none());
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_revoke_already_revoked_keeps_timestamp(pool: PgPool) {
    let repo = PgTokenRepository::new(Arc::new(pool));
    let token = repo.create_token(1, "twice", "hash-twice").await.unwrap();

    repo.revoke_token(token.id).await.unwrap();
    let first = repo.find_by_id(token.id).await.unwrap().unwrap().revoked_at;
    repo.revoke_token(token.id).await.unwrap();
    let second = repo.find_by_id(token.id).await.unwrap().unwrap().revoked_at;

    assert!(first.is_some());
    assert_eq!(first, second);
}
