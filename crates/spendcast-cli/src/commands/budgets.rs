//! Budget command implementations

use anyhow::Result;
use spendcast_core::config::AppConfig;
use spendcast_core::db::Database;
use spendcast_core::models::NewBudget;

use super::truncate;

pub fn cmd_budget_set(
    db: &Database,
    config: &AppConfig,
    user: &str,
    category: &str,
    amount: f64,
) -> Result<()> {
    db.save_budget(&NewBudget::new(user, category, amount))?;
    println!(
        "✅ Budget for {} set to {}",
        category.trim(),
        config.display.money(amount)
    );

    if let Some(status) = db.budget_status(user, category.trim())? {
        if status.is_exceeded() {
            println!(
                "   ⚠️  Already {} over: {} spent so far",
                config.display.money(-status.remaining()),
                config.display.money(status.spent)
            );
        }
    }
    Ok(())
}

pub fn cmd_budget_list(db: &Database, config: &AppConfig, user: &str) -> Result<()> {
    let statuses = db.all_budget_statuses(user)?;

    if statuses.is_empty() {
        println!("No budgets set. Add one with:");
        println!("  spendcast budget set --user {} --category Groceries --amount 5000", user);
        return Ok(());
    }

    println!();
    println!("💰 Budgets");
    println!("   ─────────────────────────────────────────────────────────────");
    println!(
        "   {:18} │ {:>12} │ {:>12} │ {:>6}",
        "Category", "Budget", "Spent", "Used"
    );
    println!("   ───────────────────┼──────────────┼──────────────┼───────");

    for status in &statuses {
        let marker = if status.is_exceeded() { " ⚠️" } else { "" };
        println!(
            "   {:18} │ {:>12} │ {:>12} │ {:>5.0}%{}",
            truncate(&status.category, 18),
            config.display.money(status.budget),
            config.display.money(status.spent),
            status.used_pct(),
            marker
        );
    }

    Ok(())
}
