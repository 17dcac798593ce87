//! User command implementations

use anyhow::{Context, Result};
use spendcast_core::db::Database;

pub fn cmd_user_add(db: &Database, username: &str, password: &str) -> Result<()> {
    db.create_user(username, password)?;
    println!("✅ Created user '{}'", username.trim());
    println!();
    println!("   Load sample data with: spendcast demo --user {}", username.trim());
    Ok(())
}

pub fn cmd_user_verify(db: &Database, username: &str, password: &str) -> Result<()> {
    if db.verify_user(username, password)? {
        println!("✅ Credentials are valid for '{}'", username);
        Ok(())
    } else {
        anyhow::bail!("Invalid username or password.")
    }
}

pub fn cmd_user_list(db: &Database) -> Result<()> {
    let users = db.list_users().context("Failed to list users")?;

    if users.is_empty() {
        println!("No users yet. Create one with:");
        println!("  spendcast user add --username alice --password <password>");
        return Ok(());
    }

    println!();
    println!("👤 Users");
    println!("   ─────────────────────────────────────────");
    for user in users {
        println!(
            "   {:20} │ joined {}",
            user.username,
            user.created_at.format("%Y-%m-%d")
        );
    }

    Ok(())
}
