//! Demo data command implementation

use anyhow::Result;
use chrono::Local;
use spendcast_core::db::Database;
use spendcast_core::demo::add_demo_transactions;

pub fn cmd_demo(db: &Database, user: &str, days: u32, seed: u64) -> Result<()> {
    println!("🎲 Generating {} days of demo transactions for '{}'...", days, user);
    let inserted = add_demo_transactions(db, user, days, seed, Local::now().date_naive())?;
    println!("✅ Added {} transactions", inserted);
    println!();
    println!("   Try: spendcast forecast --user {} --days 30", user);
    Ok(())
}
