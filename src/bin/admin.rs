//! CLI administration tool for redirector.
//!
//! Manages redirect records directly in the database without going through
//! the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # List redirects, optionally filtered by key substring
//! cargo run --bin admin -- redirect list --name promo
//!
//! # Add a redirect
//! cargo run --bin admin -- redirect add --key promo/spring --destination https://example.com/spring
//!
//! # Remove a redirect by id
//! cargo run --bin admin -- redirect remove 42
//!
//! # View statistics
//! cargo run --bin admin -- stats
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Cache
//!
//! The tool writes to the database only. A running server keeps serving a
//! cached destination for a removed or changed key until it restarts; use the
//! `/admin` HTTP endpoints when the change must take effect immediately.
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (or the `DB_*` parts): PostgreSQL connection string

use redirector::config::Config;
use redirector::domain::entities::NewRedirect;
use redirector::domain::repositories::RedirectRepository;
use redirector::infrastructure::persistence::PgRedirectRepository;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input};
use sqlx::PgPool;
use std::sync::Arc;

/// Upper bound on rows printed by `redirect list`.
const LIST_LIMIT: i64 = 1000;

/// CLI tool for managing redirector.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage redirects
    Redirect {
        #[command(subcommand)]
        action: RedirectAction,
    },

    /// Show statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum RedirectAction {
    /// List redirects
    List {
        /// Only show keys containing this text (case-insensitive)
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Add a redirect
    Add {
        /// Redirect key (e.g., "promo/spring")
        #[arg(short, long)]
        key: Option<String>,

        /// Destination URL
        #[arg(short, long)]
        destination: Option<String>,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Remove a redirect
    Remove {
        /// Redirect id
        id: i64,
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

    let database_url = Config::load_database_url()?;

    let pool = PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::Redirect { action } => handle_redirect_action(action, &pool).await?,
        Commands::Stats => handle_stats(&pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

async fn handle_redirect_action(action: RedirectAction, pool: &PgPool) -> Result<()> {
    let repo = Arc::new(PgRedirectRepository::new(Arc::new(pool.clone())));

    match action {
        RedirectAction::List { name } => list_redirects(repo, name).await?,
        RedirectAction::Add {
            key,
            destination,
            yes,
        } => add_redirect(repo, key, destination, yes).await?,
        RedirectAction::Remove { id } => remove_redirect(repo, id).await?,
    }

    Ok(())
}

/// Lists redirects in id order.
///
/// ```text
/// Redirects
///
///   ID   Key                            Destination
///   ───────────────────────────────────────────────────────────────────────────
///   1    promo/spring                   https://example.com/spring
/// ```
async fn list_redirects(repo: Arc<PgRedirectRepository>, name: Option<String>) -> Result<()> {
    println!("{}", "Redirects".bright_blue().bold());
    println!();

    let name = name.filter(|n| !n.is_empty());

    let redirects = repo
        .list(name.clone(), 0, LIST_LIMIT)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list redirects: {}", e))?;

    if redirects.is_empty() {
        println!("{}", "  No redirects found".yellow());
        return Ok(());
    }

    println!(
        "  {:<4} {:<30} {}",
        "ID".bright_white().bold(),
        "Key".bright_white().bold(),
        "Destination".bright_white().bold()
    );
    println!("  {}", "─".repeat(75).bright_black());

    for redirect in &redirects {
        println!(
            "  {:<4} {:<30} {}",
            redirect.id.to_string().bright_black(),
            redirect.key.cyan(),
            redirect.active_destination
        );
        if let Some(previous) = &redirect.previous_destination {
            println!("  {:<4} {:<30} {}", "", "", format!("was {}", previous).bright_black());
        }
    }

    let total = repo
        .count(name)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to count redirects: {}", e))?;

    println!();
    println!("  Total: {}", total.to_string().bright_white().bold());
    if total > LIST_LIMIT {
        println!(
            "  {}",
            format!("Showing the first {}", LIST_LIMIT).yellow()
        );
    }
    println!();

    Ok(())
}

async fn add_redirect(
    repo: Arc<PgRedirectRepository>,
    key: Option<String>,
    destination: Option<String>,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "Add Redirect".bright_blue().bold());
    println!();

    let key = match key {
        Some(k) => k,
        None => Input::new().with_prompt("Key").interact_text()?,
    };

    let destination = match destination {
        Some(d) => d,
        None => Input::new()
            .with_prompt("Destination")
            .with_initial_text("https://")
            .interact_text()?,
    };

    if key.is_empty() {
        anyhow::bail!("Key must not be empty");
    }

    println!();
    println!("  Key:         {}", key.cyan());
    println!("  Destination: {}", destination.bright_white());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Create this redirect?")
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "Cancelled".red());
            return Ok(());
        }
    }

    let redirect = repo
        .create(NewRedirect {
            key,
            active_destination: destination,
        })
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create redirect: {}", e))?;

    println!();
    println!(
        "{} (id {})",
        "Redirect created".green().bold(),
        redirect.id.to_string().bright_white()
    );
    println!();

    Ok(())
}

/// Removes a redirect after confirmation (default: No).
async fn remove_redirect(repo: Arc<PgRedirectRepository>, id: i64) -> Result<()> {
    println!("{}", "Remove Redirect".bright_blue().bold());
    println!();

    let redirect = repo
        .find_by_id(id)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
        .context("Redirect not found")?;

    println!("  Key:         {}", redirect.key.cyan());
    println!("  Destination: {}", redirect.active_destination.bright_white());
    println!("  ID:          {}", redirect.id.to_string().bright_black());
    println!();

    let confirmed = Confirm::new()
        .with_prompt("Remove this redirect?")
        .default(false)
        .interact()?;

    if !confirmed {
        println!("{}", "Cancelled".red());
        return Ok(());
    }

    repo.delete(id)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to remove redirect: {}", e))?
        .context("Redirect was removed concurrently")?;

    println!();
    println!("{}", "Redirect removed".green().bold());
    println!(
        "{}",
        "Running servers may serve the cached destination until restart".yellow()
    );
    println!();

    Ok(())
}

async fn handle_stats(pool: &PgPool) -> Result<()> {
    println!("{}", "Statistics".bright_blue().bold());
    println!();

    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM redirects")
        .fetch_one(pool)
        .await?;

    let changed: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM redirects WHERE previous_destination IS NOT NULL")
            .fetch_one(pool)
            .await?;

    println!("  Redirects:        {}", total.to_string().bright_green().bold());
    println!(
        "  With history:     {}",
        changed.to_string().bright_green().bold()
    );
    println!();

    Ok(())
}

async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
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

            println!("  PostgreSQL: {}", version.bright_white());
            println!();
        }
    }

    Ok(())
}
