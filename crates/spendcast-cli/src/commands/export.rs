//! CSV export command implementation

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use spendcast_core::db::Database;
use spendcast_core::models::TransactionQuery;

pub fn cmd_export(
    db: &Database,
    user: &str,
    query: &TransactionQuery,
    output: Option<&Path>,
) -> Result<()> {
    let csv = db
        .export_transactions_csv(user, query)
        .context("Failed to export transactions")?;

    match output {
        Some(path) => {
            fs::write(path, &csv).with_context(|| format!("Failed to write {}", path.display()))?;
            // Header line does not count
            let rows = csv.lines().count().saturating_sub(1);
            eprintln!("✅ Exported {} transactions to {}", rows, path.display());
        }
        None => print!("{}", csv),
    }

    Ok(())
}
