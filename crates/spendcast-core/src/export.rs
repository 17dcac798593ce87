//! CSV export of a user's transaction history
//!
//! Columns: `date,type,category,amount,description`, oldest first, with
//! amounts formatted to two decimals.

use std::io::Write;

use crate::db::Database;
use crate::error::{Error, Result};
use crate::models::{Transaction, TransactionQuery};

pub const CSV_HEADER: [&str; 5] = ["date", "type", "category", "amount", "description"];

/// Write transactions as CSV (header included) to any writer
pub fn write_transactions_csv<W: Write>(writer: W, transactions: &[Transaction]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(CSV_HEADER)?;

    for tx in transactions {
        wtr.write_record([
            tx.date.format("%Y-%m-%d").to_string(),
            tx.transaction_type.as_str().to_string(),
            tx.category.clone(),
            format!("{:.2}", tx.amount),
            tx.description.clone().unwrap_or_default(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Render transactions as a CSV string
pub fn transactions_to_csv(transactions: &[Transaction]) -> Result<String> {
    let mut buf = Vec::new();
    write_transactions_csv(&mut buf, transactions)?;
    String::from_utf8(buf).map_err(|e| Error::InvalidInput(format!("CSV output is not UTF-8: {}", e)))
}

impl Database {
    /// Export a user's transactions matching `query` as CSV, oldest first
    pub fn export_transactions_csv(&self, username: &str, query: &TransactionQuery) -> Result<String> {
        let mut transactions = self.list_transactions(username, query)?;
        transactions.reverse();
        tracing::debug!(user = %username, rows = transactions.len(), "Exporting transactions");
        transactions_to_csv(&transactions)
    }
}
