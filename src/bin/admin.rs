//! Administration CLI for the shortlink service.
//!
//! Manages API tokens and performs maintenance without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Issue a token for owner 42
//! cargo run --bin admin -- token create --owner 42 --name "CI"
//!
//! # List and revoke tokens
//! cargo run --bin admin -- token list
//! cargo run --bin admin -- token revoke CI
//!
//! # Link statistics and cleanup
//! cargo run --bin admin -- stats
//! cargo run --bin admin -- purge-expired
//!
//! # Database diagnostics
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (required)
//! - `TOKEN_SIGNING_SECRET` (required for `token create`); must match the server's value

use shortlink_service::application::services::hash_token;
use shortlink_service::domain::repositories::{LinkRepository, TokenRepository};
use shortlink_service::infrastructure::persistence::{PgLinkRepository, PgTokenRepository};

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input};
use rand::Rng;
use rand::distr::Alphanumeric;
use sqlx::PgPool;
use std::sync::Arc;

/// Length of generated API tokens (~286 bits of entropy).
const TOKEN_LEN: usize = 48;

#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about = "Shortlink service administration", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage API tokens
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },

    /// Show link and token counts
    Stats,

    /// Delete every expired link
    PurgeExpired {
        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum TokenAction {
    /// Issue a new API token
    Create {
        /// Owner the token authenticates as
        #[arg(short, long)]
        owner: i64,

        /// Token name (e.g., "Production API", "Mobile App")
        #[arg(short, long)]
        name: Option<String>,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// List all tokens
    List,

    /// Revoke a token
    Revoke {
        /// Token name or ID
        name_or_id: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let pool = PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::Token { action } => handle_token_action(action, &pool).await?,
        Commands::Stats => handle_stats(&pool).await?,
        Commands::PurgeExpired { yes } => purge_expired(&pool, yes).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

async fn handle_token_action(action: TokenAction, pool: &PgPool) -> Result<()> {
    let repo = PgTokenRepository::new(Arc::new(pool.clone()));

    match action {
        TokenAction::Create { owner, name, yes } => create_token(&repo, owner, name, yes).await,
        TokenAction::List => list_tokens(&repo).await,
        TokenAction::Revoke { name_or_id, yes } => revoke_token(&repo, &name_or_id, yes).await,
    }
}

/// Issues a token. Only its HMAC hash is stored; the raw value is shown once.
async fn create_token(
    repo: &PgTokenRepository,
    owner_id: i64,
    name: Option<String>,
    skip_confirm: bool,
) -> Result<()> {
    let secret = std::env::var("TOKEN_SIGNING_SECRET")
        .context("TOKEN_SIGNING_SECRET must be set to issue tokens")?;
    if secret.is_empty() {
        anyhow::bail!("TOKEN_SIGNING_SECRET must not be empty");
    }

    println!("{}", "🔑 Create API Token".bright_blue().bold());
    println!();

    let token_name = match name {
        Some(n) => n,
        None => Input::new()
            .with_prompt("Token name")
            .with_initial_text(format!("owner-{owner_id}"))
            .interact_text()?,
    };

    let token_value = generate_token();

    println!("{}", "Token details:".bright_white().bold());
    println!("  Name:  {}", token_name.cyan());
    println!("  Owner: {}", owner_id.to_string().cyan());
    println!();

    if !skip_confirm
        && !Confirm::new()
            .with_prompt("Create this token?")
            .default(true)
            .interact()?
    {
        println!("{}", "Cancelled".red());
        return Ok(());
    }

    repo.create_token(owner_id, &token_name, &hash_token(&secret, &token_value))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create token: {}", e))?;

    println!();
    println!("{}", "✅ Token created".green().bold());
    println!("  Token: {}", token_value.bright_yellow().bold());
    println!(
        "{}",
        "Save this token now, it cannot be shown again.".red().bold()
    );
    println!();
    println!(
        "  curl -X POST -H \"Authorization: Bearer {}\" -H \"Content-Type: application/json\" \\",
        token_value
    );
    println!("       -d '{{\"original_url\":\"https://example.com\"}}' http://localhost:3000/api/shorten");
    println!();

    Ok(())
}

async fn list_tokens(repo: &PgTokenRepository) -> Result<()> {
    println!("{}", "📋 API Tokens".bright_blue().bold());
    println!();

    let tokens = repo
        .list_tokens()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list tokens: {}", e))?;

    if tokens.is_empty() {
        println!("{}", "  No tokens found".yellow());
        println!(
            "  Create one with: {} admin -- token create --owner <id>",
            "cargo run --bin".bright_cyan()
        );
        return Ok(());
    }

    println!(
        "  {:<5} {:<8} {:<28} {:<18} {:<18} {:<8}",
        "ID".bright_white().bold(),
        "Owner".bright_white().bold(),
        "Name".bright_white().bold(),
        "Created".bright_white().bold(),
        "Last used".bright_white().bold(),
        "Status".bright_white().bold()
    );
    println!("  {}", "-".repeat(90).bright_black());

    for token in &tokens {
        let status = if token.revoked_at.is_some() {
            "REVOKED".red()
        } else {
            "ACTIVE".green()
        };
        let last_used = token
            .last_used_at
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "never".to_string());

        println!(
            "  {:<5} {:<8} {:<28} {:<18} {:<18} {}",
            token.id.to_string().bright_black(),
            token.owner_id,
            token.name.cyan(),
            token.created_at.format("%Y-%m-%d %H:%M").to_string(),
            last_used.bright_black(),
            status
        );
    }

    println!();
    println!("  Total: {}", tokens.len().to_string().bright_white().bold());

    Ok(())
}

/// Revokes a token looked up by numeric ID or exact name.
async fn revoke_token(repo: &PgTokenRepository, name_or_id: &str, skip_confirm: bool) -> Result<()> {
    let token = match name_or_id.parse::<i64>() {
        Ok(id) => repo.find_by_id(id).await,
        Err(_) => repo.find_by_name(name_or_id).await,
    }
    .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
    .context("Token not found")?;

    if token.revoked_at.is_some() {
        println!("{}", "This token is already revoked".yellow());
        return Ok(());
    }

    println!("  Token: {} (owner {})", token.name.cyan(), token.owner_id);

    if !skip_confirm
        && !Confirm::new()
            .with_prompt("Revoke this token?")
            .default(false)
            .interact()?
    {
        println!("{}", "Cancelled".red());
        return Ok(());
    }

    repo.revoke_token(token.id)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to revoke token: {}", e))?;

    println!("{}", "✅ Token revoked".green().bold());

    Ok(())
}

async fn handle_stats(pool: &PgPool) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let (links, expired, clicks): (i64, i64, i64) = sqlx::query_as(
        r#"
        SELECT COUNT(*),
               COUNT(*) FILTER (WHERE expires_at IS NOT NULL AND expires_at <= NOW()),
               COALESCE(SUM(clicks), 0)::BIGINT
        FROM links
        "#,
    )
    .fetch_one(pool)
    .await?;

    let tokens: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM api_tokens WHERE revoked_at IS NULL")
            .fetch_one(pool)
            .await?;

    println!("  Links:         {}", links.to_string().bright_green().bold());
    println!("  Expired:       {}", expired.to_string().yellow());
    println!("  Clicks:        {}", clicks.to_string().bright_green().bold());
    println!("  Active tokens: {}", tokens.to_string().bright_green().bold());
    println!();

    Ok(())
}

/// Bulk counterpart of the lazy deletion done during resolution.
///
/// Cache entries need no eviction: their TTL never outlives the link.
async fn purge_expired(pool: &PgPool, skip_confirm: bool) -> Result<()> {
    let repo = PgLinkRepository::new(Arc::new(pool.clone()));

    if !skip_confirm
        && !Confirm::new()
            .with_prompt("Delete all expired links?")
            .default(false)
            .interact()?
    {
        println!("{}", "Cancelled".red());
        return Ok(());
    }

    let removed = repo
        .delete_expired(Utc::now())
        .await
        .map_err(|e| anyhow::anyhow!("Failed to purge expired links: {}", e))?;

    println!(
        "{} {}",
        "🧹 Removed expired links:".green(),
        removed.to_string().bright_white().bold()
    );

    Ok(())
}

async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "Checking database connection...".bright_blue());
            sqlx::query("SELECT 1").fetch_one(pool).await?;
            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;
            let migrations: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
                .fetch_one(pool)
                .await
                .unwrap_or(0);

            println!("{}", "Database Information".bright_blue().bold());
            println!("  PostgreSQL: {}", version.bright_white());
            println!("  Applied migrations: {}", migrations);
        }
    }

    Ok(())
}

fn generate_token() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LEN)
        .map(char::from)
        .collect()
}
