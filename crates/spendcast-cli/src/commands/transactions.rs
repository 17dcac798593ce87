//! Transaction command implementations (add, history, reset)

use anyhow::Result;
use chrono::Local;
use spendcast_core::config::AppConfig;
use spendcast_core::db::Database;
use spendcast_core::models::{BudgetWarning, NewTransaction, TransactionQuery, TransactionType};

use super::{parse_date_arg, parse_kind, prompt_confirm, truncate};

/// Assemble a transaction from `add` flags (date defaults to today)
pub fn build_transaction(
    user: &str,
    kind: &str,
    category: &str,
    amount: f64,
    date: Option<&str>,
    description: Option<String>,
) -> Result<NewTransaction> {
    let date = match date {
        Some(d) => parse_date_arg(d, "--date")?,
        None => Local::now().date_naive(),
    };
    let mut tx = NewTransaction::new(user, date, parse_kind(kind)?, category, amount);
    tx.description = description;
    Ok(tx)
}

pub fn cmd_add(db: &Database, config: &AppConfig, tx: &NewTransaction, force: bool) -> Result<()> {
    add_transaction(db, config, tx, force, |warning| {
        println!("⚠️  {}", warning.message());
        prompt_confirm("   Record it anyway?")
    })
    .map(|_| ())
}

/// Save a transaction, asking `confirm` first when an expense would break its budget
///
/// Returns the new id, or `None` when the user declined.
pub fn add_transaction<F>(
    db: &Database,
    config: &AppConfig,
    tx: &NewTransaction,
    force: bool,
    confirm: F,
) -> Result<Option<i64>>
where
    F: FnOnce(&BudgetWarning) -> Result<bool>,
{
    tx.validate()?;

    if tx.transaction_type == TransactionType::Expense && !force {
        if let Some(warning) = db.check_budget(&tx.username, tx.category.trim(), tx.amount)? {
            if !confirm(&warning)? {
                println!("   Not recorded.");
                return Ok(None);
            }
        }
    }

    let id = db.save_transaction(tx)?;
    println!(
        "✅ Recorded {} of {} in {} on {}",
        tx.transaction_type,
        config.display.money(tx.amount),
        tx.category.trim(),
        tx.date
    );
    Ok(Some(id))
}

pub fn cmd_history(
    db: &Database,
    config: &AppConfig,
    user: &str,
    query: &TransactionQuery,
) -> Result<()> {
    let transactions = db.list_transactions(user, query)?;

    if transactions.is_empty() {
        println!("No transactions found. Add some with:");
        println!("  spendcast add --user {} --type expense --category Groceries --amount 250", user);
        return Ok(());
    }

    println!();
    println!("📝 Transaction History");
    println!("   ─────────────────────────────────────────────────────────────");

    for tx in transactions {
        let amount_str = match tx.transaction_type {
            TransactionType::Expense => {
                format!("\x1b[31m-{}\x1b[0m", config.display.money(tx.amount)) // Red for expenses
            }
            TransactionType::Income => {
                format!("\x1b[32m+{}\x1b[0m", config.display.money(tx.amount)) // Green for income
            }
        };

        println!(
            "   {} │ {:>14} │ {:18} │ {}",
            tx.date,
            amount_str,
            truncate(&tx.category, 18),
            truncate(tx.description.as_deref().unwrap_or(""), 30)
        );
    }

    Ok(())
}

/// Delete every transaction for the user after re-checking their password
pub fn cmd_reset(db: &Database, user: &str, password: &str) -> Result<()> {
    if !db.verify_user(user, password)? {
        anyhow::bail!("Incorrect password. Transactions were not deleted.");
    }

    let deleted = db.delete_all_transactions(user)?;
    println!("🗑️  Deleted {} transactions for '{}'", deleted, user);
    Ok(())
}
