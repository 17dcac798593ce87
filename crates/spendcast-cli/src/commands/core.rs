//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `open_db` - Shared utility to open the database
//! - `cmd_init` - Initialize the database
//! - Argument parsing helpers shared by several commands

use std::io::{self, BufRead, Write};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use spendcast_core::db::Database;
use spendcast_core::models::{TransactionQuery, TransactionType};

/// Open database with encryption by default, or unencrypted if --no-encrypt
pub fn open_db(db_path: &Path, no_encrypt: bool) -> Result<Database> {
    let path_str = db_path
        .to_str()
        .context("Database path must be valid UTF-8")?;
    tracing::debug!(path = %path_str, encrypted = !no_encrypt, "Opening database");
    if no_encrypt {
        Database::new_unencrypted(path_str).context("Failed to open database (unencrypted)")
    } else {
        Database::new(path_str).context("Failed to open database")
    }
}

pub fn cmd_init(db_path: &Path, no_encrypt: bool) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    open_db(db_path, no_encrypt)?;

    if no_encrypt {
        println!("   ⚠️  Encryption: DISABLED (--no-encrypt)");
    } else {
        println!("   🔒 Encryption: ENABLED");
    }

    println!("✅ Database initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Create a user: spendcast user add --username alice --password <password>");
    println!("  2. Record spending: spendcast add --user alice --type expense --category Groceries --amount 250");
    println!("  3. Start web UI: spendcast serve");

    Ok(())
}

/// Parse a YYYY-MM-DD argument
pub fn parse_date_arg(value: &str, flag: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid {} date format (use YYYY-MM-DD)", flag))
}

pub fn parse_kind(value: &str) -> Result<TransactionType> {
    value.parse().map_err(|e: String| anyhow::anyhow!(e))
}

/// Build a history/export query from raw flags
pub fn build_query(
    kind: Option<&str>,
    category: Option<String>,
    from: Option<&str>,
    to: Option<&str>,
    limit: Option<i64>,
) -> Result<TransactionQuery> {
    Ok(TransactionQuery {
        transaction_type: kind.map(parse_kind).transpose()?,
        category: category.filter(|c| !c.trim().is_empty()),
        from: from.map(|d| parse_date_arg(d, "--from")).transpose()?,
        to: to.map(|d| parse_date_arg(d, "--to")).transpose()?,
        limit,
        offset: None,
    })
}

/// Ask a yes/no question on stdin (default no)
pub fn prompt_confirm(question: &str) -> Result<bool> {
    print!("{} [y/N] ", question);
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("Failed to read answer")?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}
