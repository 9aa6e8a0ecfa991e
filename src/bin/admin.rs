//! CLI administration tool for contacts-api.
//!
//! Provides commands for managing user accounts, viewing statistics,
//! and performing database operations without requiring HTTP API access.
//!
//! # Usage
//!
//! ```bash
//! # Create a pre-verified user
//! cargo run --bin admin -- user create --email admin@example.com --verified
//!
//! # List all users
//! cargo run --bin admin -- user list
//!
//! # Mark an address as verified / deactivate an account
//! cargo run --bin admin -- user verify someone@example.com
//! cargo run --bin admin -- user deactivate someone@example.com
//!
//! # View statistics
//! cargo run --bin admin -- stats
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (or `DB_HOST` / `DB_USER` / ...): PostgreSQL connection
//! - `REDIS_URL` (or `REDIS_HOST` / ...): cached users are dropped after
//!   `verify` and `deactivate`

use contacts_api::application::services::AccountService;
use contacts_api::config::{Config, mask_connection_string};
use contacts_api::domain::entities::normalize_email;
use contacts_api::infrastructure::cache::{CacheService, NullCache, RedisCache};
use contacts_api::infrastructure::persistence::{PgContactRepository, PgUserRepository};
use contacts_api::security::PasswordHasher;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input, Password};
use sqlx::PgPool;
use std::sync::Arc;

type Accounts = AccountService<PgUserRepository, PgContactRepository>;

/// CLI tool for managing contacts-api.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Manage user accounts
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Show statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// User management subcommands.
#[derive(Subcommand)]
enum UserAction {
    /// List all users
    List,

    /// Create a user
    Create {
        /// E-mail address (prompted if omitted)
        #[arg(short, long)]
        email: Option<String>,

        /// Password (prompted if omitted, generated if left empty)
        #[arg(short, long)]
        password: Option<String>,

        /// Mark the e-mail as already verified
        #[arg(long)]
        verified: bool,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Mark a user's e-mail as verified
    Verify {
        /// User e-mail
        email: String,
    },

    /// Deactivate a user and revoke their refresh token
    Deactivate {
        /// User e-mail
        email: String,
    },
}

/// Database operation subcommands.
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

    let database_url = Config::load_database_url()?;

    let pool = PgPool::connect(&database_url)
        .await
        .with_context(|| {
            format!(
                "Failed to connect to database at {}",
                mask_connection_string(&database_url)
            )
        })?;

    match cli.command {
        Commands::User { action } => handle_user_action(action, &pool).await?,
        Commands::Stats => handle_stats(&pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool, &database_url).await?,
    }

    Ok(())
}

/// Dispatches user management commands.
async fn handle_user_action(action: UserAction, pool: &PgPool) -> Result<()> {
    let pool = Arc::new(pool.clone());
    let accounts = AccountService::new(
        Arc::new(PgUserRepository::new(pool.clone())),
        Arc::new(PgContactRepository::new(pool)),
        connect_cache().await,
        PasswordHasher::new(),
    );

    match action {
        UserAction::List => list_users(&accounts).await,
        UserAction::Create {
            email,
            password,
            verified,
            yes,
        } => create_user(&accounts, email, password, verified, yes).await,
        UserAction::Verify { email } => verify_user(&accounts, &email).await,
        UserAction::Deactivate { email } => deactivate_user(&accounts, &email).await,
    }
}

/// Connects to Redis when configured so account changes reach the server's
/// user cache. Falls back to [`NullCache`].
async fn connect_cache() -> Arc<dyn CacheService> {
    let Some(redis_url) = Config::load_redis_url() else {
        return Arc::new(NullCache::new());
    };

    match RedisCache::connect(&redis_url, Config::load_cache_ttl()).await {
        Ok(cache) => Arc::new(cache),
        Err(e) => {
            println!(
                "{} {} (cached users expire on their own)",
                "Redis unavailable:".yellow(),
                e
            );
            Arc::new(NullCache::new())
        }
    }
}

/// Lists all users with status indicators.
///
/// # Output Format
///
/// ```text
/// Users
///
///   ID  Email                               Created            Contacts Status
///   ------------------------------------------------------------------------------------
///   1   admin@example.com                   2026-01-15 10:30   12       VERIFIED
///   2   new@example.com                     2026-01-16 14:20   0        UNVERIFIED
/// ```
async fn list_users(accounts: &Accounts) -> Result<()> {
    println!("{}", "Users".bright_blue().bold());
    println!();

    let summaries = accounts
        .list()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list users: {}", e))?;

    if summaries.is_empty() {
        println!("{}", "  No users found".yellow());
        println!();
        println!(
            "  Create one with: {} admin user create",
            "cargo run --bin".bright_cyan()
        );
        return Ok(());
    }

    println!(
        "  {:<4} {:<36} {:<18} {:<8} {:<10}",
        "ID".bright_white().bold(),
        "Email".bright_white().bold(),
        "Created".bright_white().bold(),
        "Contacts".bright_white().bold(),
        "Status".bright_white().bold()
    );
    println!("  {}", "-".repeat(84).bright_black());

    for summary in &summaries {
        let user = &summary.user;
        let status = if !user.is_active {
            "INACTIVE".red()
        } else if user.is_verified {
            "VERIFIED".green()
        } else {
            "UNVERIFIED".yellow()
        };

        println!(
            "  {:<4} {:<36} {:<18} {:<8} {}",
            user.id.to_string().bright_black(),
            user.email.cyan(),
            user.created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black(),
            summary.contacts,
            status
        );
    }

    println!();
    println!(
        "  Total: {}",
        summaries.len().to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

/// Creates a user with interactive prompts.
///
/// # Flow
///
/// 1. Prompt for e-mail (or use provided)
/// 2. Prompt for password; an empty answer generates one
/// 3. Confirm creation (unless `--yes` flag)
/// 4. Hash password with Argon2id and store the user
async fn create_user(
    accounts: &Accounts,
    email: Option<String>,
    password: Option<String>,
    verified: bool,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "Create User".bright_blue().bold());
    println!();

    let email = match email {
        Some(e) => e,
        None => Input::new().with_prompt("Email").interact_text()?,
    };
    let email = normalize_email(&email);

    let (password, generated) = match password {
        Some(p) => (p, false),
        None => {
            let entered: String = Password::new()
                .with_prompt("Password (leave empty to generate)")
                .allow_empty_password(true)
                .interact()?;
            if entered.is_empty() {
                (generate_password(), true)
            } else {
                (entered, false)
            }
        }
    };

    if password.len() < 6 {
        anyhow::bail!("Password must be at least 6 characters");
    }

    println!();
    println!("{}", "User details:".bright_white().bold());
    println!("  Email:    {}", email.cyan());
    println!("  Verified: {}", verified.to_string().cyan());
    if generated {
        println!("  Password: {}", password.bright_yellow().bold());
        println!();
        println!(
            "{}",
            "IMPORTANT: Save this password now! It is stored only as a hash."
                .red()
                .bold()
        );
    }
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Create this user?")
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "Cancelled".red());
            return Ok(());
        }
    }

    let user = accounts
        .create(&email, &password, verified)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create user: {}", e))?;

    println!(
        "{} (id {})",
        "User created successfully!".green().bold(),
        user.id
    );
    println!();

    Ok(())
}

/// Marks a user's e-mail as verified.
async fn verify_user(accounts: &Accounts, email: &str) -> Result<()> {
    let user = accounts
        .verify(email)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to verify user: {}", e))?;

    println!(
        "{} {}",
        "Verified:".green().bold(),
        user.email.cyan()
    );

    Ok(())
}

/// Deactivates a user after confirmation.
///
/// Deactivated users can no longer log in or use their access tokens.
async fn deactivate_user(accounts: &Accounts, email: &str) -> Result<()> {
    println!("{}", "Deactivate User".bright_blue().bold());
    println!();

    let user = accounts
        .find(email)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
        .context("User not found")?;

    if !user.is_active {
        println!("{}", "This user is already inactive".yellow());
        return Ok(());
    }

    println!("  User: {}", user.email.cyan());
    println!("  ID:   {}", user.id.to_string().bright_black());
    println!();

    let confirmed = Confirm::new()
        .with_prompt("Deactivate this user?")
        .default(false)
        .interact()?;

    if !confirmed {
        println!("{}", "Cancelled".red());
        return Ok(());
    }

    accounts
        .set_active(&user.email, false)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to deactivate user: {}", e))?;

    println!();
    println!("{}", "User deactivated.".green().bold());
    println!();

    Ok(())
}

/// Displays user and contact counts.
async fn handle_stats(pool: &PgPool) -> Result<()> {
    println!("{}", "Statistics".bright_blue().bold());
    println!();

    let users_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;

    let verified_count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE is_verified")
            .fetch_one(pool)
            .await?;

    let contacts_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM contacts")
        .fetch_one(pool)
        .await?;

    println!(
        "  Users:          {}",
        users_count.to_string().bright_green().bold()
    );
    println!(
        "  Verified users: {}",
        verified_count.to_string().bright_green().bold()
    );
    println!(
        "  Contacts:       {}",
        contacts_count.to_string().bright_green().bold()
    );
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool, database_url: &str) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            let migrations: i64 =
                sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations WHERE success")
                    .fetch_one(pool)
                    .await
                    .unwrap_or(0);

            println!("  URL:        {}", mask_connection_string(database_url));
            println!("  PostgreSQL: {}", version.bright_white());
            println!("  Migrations: {}", migrations.to_string().bright_white());
            println!();
        }
    }

    Ok(())
}

/// Generates a random password.
///
/// # Format
///
/// - Length: 20 characters
/// - Character set: A-Z, a-z, 0-9
fn generate_password() -> String {
    use rand::Rng;
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    const PASSWORD_LEN: usize = 20;

    let mut rng = rand::rng();

    (0..PASSWORD_LEN)
        .map(|_| {
            let idx = rng.random_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}
