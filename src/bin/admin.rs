//! CLI administration tool for api-tutorials.
//!
//! Provides commands for seeding the book catalogue, viewing statistics,
//! generating secrets and performing database checks without going through
//! the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Add a book interactively
//! cargo run --bin admin -- book add
//!
//! # List books
//! cargo run --bin admin -- book list --limit 20
//!
//! # View statistics
//! cargo run --bin admin -- stats
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//!
//! # Generate a JWT secret
//! cargo run --bin admin -- secret generate
//!
//! # Hash a password for a seed account
//! cargo run --bin admin -- password hash
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (optional): SQLite connection string
//!   (default: `sqlite://api_tutorials.db?mode=rwc`)

use api_tutorials::application::services::auth_service::{check_password_strength, hash_password};
use api_tutorials::config::Config;
use api_tutorials::domain::entities::{BookFilter, NewBook};
use api_tutorials::domain::repositories::BookRepository;
use api_tutorials::infrastructure::persistence::SqliteBookRepository;

use anyhow::{Context, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input, Password};
use rand::RngCore;
use sqlx::SqlitePool;
use std::sync::Arc;

/// CLI tool for managing api-tutorials.
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
    /// Manage the book catalogue
    Book {
        #[command(subcommand)]
        action: BookAction,
    },

    /// Show statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },

    /// Secret generation
    Secret {
        #[command(subcommand)]
        action: SecretAction,
    },

    /// Password utilities
    Password {
        #[command(subcommand)]
        action: PasswordAction,
    },
}

#[derive(Subcommand)]
enum BookAction {
    /// Add a book
    Add {
        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// List books
    List {
        #[arg(short, long, default_value_t = 50)]
        limit: i64,

        /// Filter by author (substring)
        #[arg(short, long)]
        author: Option<String>,
    },
}

#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

#[derive(Subcommand)]
enum SecretAction {
    /// Generate a random base64 secret suitable for JWT_SECRET
    Generate {
        /// Number of random bytes
        #[arg(short, long, default_value_t = 48)]
        bytes: usize,

        /// Print only the secret
        #[arg(long)]
        raw: bool,
    },
}

#[derive(Subcommand)]
enum PasswordAction {
    /// Hash a password into an argon2 PHC string
    Hash,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Secret { action } => handle_secret_action(action),
        Commands::Password { action } => handle_password_action(action),
        Commands::Book { action } => {
            let pool = connect().await?;
            handle_book_action(action, &pool).await
        }
        Commands::Stats => handle_stats(&connect().await?).await,
        Commands::Db { action } => handle_db_action(action, &connect().await?).await,
    }
}

async fn connect() -> Result<SqlitePool> {
    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| Config::default().database_url);

    let pool = SqlitePool::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;

    Ok(pool)
}

/// Dispatches book catalogue commands.
async fn handle_book_action(action: BookAction, pool: &SqlitePool) -> Result<()> {
    let repo = SqliteBookRepository::new(Arc::new(pool.clone()));

    match action {
        BookAction::Add { yes } => add_book(&repo, yes).await,
        BookAction::List { limit, author } => list_books(&repo, limit, author).await,
    }
}

/// Adds a book with interactive prompts.
///
/// ISBNs must be 13 digits; an ISBN already in the catalogue is rejected by
/// the unique index.
async fn add_book(repo: &SqliteBookRepository, skip_confirm: bool) -> Result<()> {
    println!("{}", "📚 Add Book".bright_blue().bold());
    println!();

    let title: String = Input::new().with_prompt("Title").interact_text()?;
    let author: String = Input::new().with_prompt("Author").interact_text()?;
    let year: i64 = Input::new()
        .with_prompt("Year")
        .validate_with(|y: &i64| {
            if (1000..=2100).contains(y) {
                Ok(())
            } else {
                Err("year must be between 1000 and 2100")
            }
        })
        .interact_text()?;
    let isbn: String = Input::new()
        .with_prompt("ISBN (13 digits, empty to skip)")
        .allow_empty(true)
        .validate_with(|s: &String| {
            if s.is_empty() || (s.len() == 13 && s.chars().all(|c| c.is_ascii_digit())) {
                Ok(())
            } else {
                Err("ISBN must be exactly 13 digits")
            }
        })
        .interact_text()?;
    let publisher: String = Input::new()
        .with_prompt("Publisher (empty to skip)")
        .allow_empty(true)
        .interact_text()?;

    let new_book = NewBook {
        title,
        author,
        year,
        isbn: Some(isbn).filter(|s| !s.is_empty()),
        publisher: Some(publisher).filter(|s| !s.is_empty()),
        description: None,
    };

    println!();
    println!("{}", "Book details:".bright_white().bold());
    println!("  Title:  {}", new_book.title.cyan());
    println!("  Author: {}", new_book.author.cyan());
    println!("  Year:   {}", new_book.year.to_string().cyan());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Add this book?")
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let book = repo
        .create(new_book)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to add book: {}", e))?;

    println!();
    println!(
        "{} {}",
        "✅ Book added with id".green().bold(),
        book.id.to_string().bright_yellow().bold()
    );
    println!();

    Ok(())
}

/// Lists books in insertion order.
///
/// # Output Format
///
/// ```text
/// 📋 Books
///
///   ID  Title                          Author               Year
///   ───────────────────────────────────────────────────────────────
///   1   The Rust Programming Language  Steve Klabnik        2018
/// ```
async fn list_books(
    repo: &SqliteBookRepository,
    limit: i64,
    author: Option<String>,
) -> Result<()> {
    println!("{}", "📋 Books".bright_blue().bold());
    println!();

    let books = repo
        .list(BookFilter {
            limit,
            author,
            ..BookFilter::default()
        })
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list books: {}", e))?;

    if books.is_empty() {
        println!("{}", "  No books found".yellow());
        println!();
        println!(
            "  Add one with: {} admin book add",
            "cargo run --bin".bright_cyan()
        );
        return Ok(());
    }

    println!(
        "  {:<3} {:<30} {:<20} {:<6}",
        "ID".bright_white().bold(),
        "Title".bright_white().bold(),
        "Author".bright_white().bold(),
        "Year".bright_white().bold()
    );
    println!("  {}", "─".repeat(63).bright_black());

    for book in &books {
        println!(
            "  {:<3} {:<30} {:<20} {}",
            book.id.to_string().bright_black(),
            book.title.cyan(),
            book.author,
            book.year.to_string().bright_black()
        );
    }

    println!();
    println!("  Total: {}", books.len().to_string().bright_white().bold());
    println!();

    Ok(())
}

/// Displays book, product and order counts.
async fn handle_stats(pool: &SqlitePool) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let books_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
        .fetch_one(pool)
        .await?;

    let products_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
        .fetch_one(pool)
        .await?;

    let orders_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
        .fetch_one(pool)
        .await?;

    println!(
        "  Books:    {}",
        books_count.to_string().bright_green().bold()
    );
    println!(
        "  Products: {}",
        products_count.to_string().bright_green().bold()
    );
    println!(
        "  Orders:   {}",
        orders_count.to_string().bright_green().bold()
    );
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &SqlitePool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT sqlite_version()")
                .fetch_one(pool)
                .await?;

            let migrations: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
                .fetch_one(pool)
                .await?;

            println!("  SQLite:     {}", version.bright_white());
            println!("  Migrations: {}", migrations.to_string().bright_white());
            println!();
        }
    }

    Ok(())
}

fn handle_secret_action(action: SecretAction) -> Result<()> {
    match action {
        SecretAction::Generate { bytes, raw } => {
            anyhow::ensure!(bytes >= 32, "secret must be at least 32 bytes");

            let secret = generate_secret(bytes);

            if raw {
                println!("{secret}");
                return Ok(());
            }

            println!("{}", "🔑 Generated secret".bright_blue().bold());
            println!();
            println!("  {}={}", "JWT_SECRET".bright_cyan(), secret.bright_yellow());
            println!();
        }
    }

    Ok(())
}

fn handle_password_action(action: PasswordAction) -> Result<()> {
    match action {
        PasswordAction::Hash => {
            let password = Password::new()
                .with_prompt("Password")
                .with_confirmation("Repeat password", "Passwords do not match")
                .interact()?;

            if let Err(reason) = check_password_strength(&password) {
                println!("{} {}", "⚠️  Weak password:".yellow(), reason);
            }

            let phc = hash_password(&password)
                .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?;

            println!();
            println!("  {}", phc.bright_yellow());
            println!();
        }
    }

    Ok(())
}

/// Base64 encoding of `len` random bytes.
fn generate_secret(len: usize) -> String {
    let mut buf = vec![0u8; len];
    rand::rng().fill_bytes(&mut buf);
    STANDARD.encode(buf)
}
