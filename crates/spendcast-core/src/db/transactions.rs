//! Ledger writer and readers

use rusqlite::{params, Row};
use tracing::{debug, warn};

use super::{parse_date, Database, DATE_FORMAT};
use crate::error::Result;
use crate::models::{Ledger, NewTransaction, Transaction, TransactionQuery, TransactionType};

const SELECT_COLUMNS: &str = "id, username, date, type, category, amount, description";

/// A row as stored, before the date and type text are parsed
struct StoredRow {
    id: i64,
    username: String,
    date: String,
    kind: String,
    category: String,
    amount: f64,
    description: Option<String>,
}

impl StoredRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            username: row.get(1)?,
            date: row.get(2)?,
            kind: row.get(3)?,
            category: row.get(4)?,
            amount: row.get(5)?,
            description: row.get(6)?,
        })
    }

    /// None when the date or type text cannot be parsed
    fn into_transaction(self) -> Option<Transaction> {
        let date = parse_date(&self.date)?;
        let transaction_type = self.kind.parse::<TransactionType>().ok()?;
        Some(Transaction {
            id: self.id,
            username: self.username,
            date,
            transaction_type,
            category: self.category,
            amount: self.amount,
            description: self.description,
        })
    }
}

/// Parse stored rows, returning the transactions and how many were unreadable
fn parse_rows(rows: Vec<StoredRow>, username: &str) -> (Vec<Transaction>, usize) {
    let mut skipped = 0;
    let transactions = rows
        .into_iter()
        .filter_map(|raw| {
            let id = raw.id;
            let date = raw.date.clone();
            let parsed = raw.into_transaction();
            if parsed.is_none() {
                warn!(user = %username, id, date = %date, "Skipping transaction with unreadable date or type");
                skipped += 1;
            }
            parsed
        })
        .collect();
    (transactions, skipped)
}

impl Database {
    /// Validate and insert a transaction, returning its id
    pub fn save_transaction(&self, tx: &NewTransaction) -> Result<i64> {
        tx.validate()?;

        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO transactions (username, date, type, category, amount, description)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
            params![
                tx.username.trim(),
                tx.date.format(DATE_FORMAT).to_string(),
                tx.transaction_type.as_str(),
                tx.category.trim(),
                tx.amount,
                tx.description.as_deref().map(str::trim).filter(|d| !d.is_empty()),
            ],
        )?;

        let id = conn.last_insert_rowid();
        debug!(user = %tx.username, id, "Transaction saved");
        Ok(id)
    }

    /// Load a user's whole ledger, ascending by date
    ///
    /// Rows whose date cannot be parsed are left out and counted in
    /// `Ledger::malformed_dates`.
    pub fn load_transactions(&self, username: &str) -> Result<Ledger> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM transactions WHERE username = ? ORDER BY date, id",
            SELECT_COLUMNS
        ))?;

        let rows = stmt
            .query_map(params![username], StoredRow::from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let (transactions, skipped) = parse_rows(rows, username);
        let mut ledger = Ledger::new(username, transactions);
        ledger.malformed_dates = skipped;
        Ok(ledger)
    }

    /// Filtered history, newest first
    pub fn list_transactions(
        &self,
        username: &str,
        query: &TransactionQuery,
    ) -> Result<Vec<Transaction>> {
        let conn = self.conn()?;

        let mut conditions = vec!["username = ?".to_string()];
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = vec![Box::new(username.to_string())];

        if let Some(kind) = query.transaction_type {
            conditions.push("type = ?".to_string());
            params_vec.push(Box::new(kind.as_str()));
        }
        if let Some(ref category) = query.category {
            conditions.push("category = ?".to_string());
            params_vec.push(Box::new(category.clone()));
        }
        if let Some(from) = query.from {
            conditions.push("date >= ?".to_string());
            params_vec.push(Box::new(from.format(DATE_FORMAT).to_string()));
        }
        if let Some(to) = query.to {
            conditions.push("date <= ?".to_string());
            params_vec.push(Box::new(to.format(DATE_FORMAT).to_string()));
        }

        // SQLite needs a LIMIT before OFFSET; -1 means unbounded
        let limit = query.limit.unwrap_or(-1);
        let offset = query.offset.unwrap_or(0).max(0);
        params_vec.push(Box::new(limit));
        params_vec.push(Box::new(offset));

        let sql = format!(
            "SELECT {} FROM transactions WHERE {} ORDER BY date DESC, id DESC LIMIT ? OFFSET ?",
            SELECT_COLUMNS,
            conditions.join(" AND ")
        );

        let mut stmt = conn.prepare(&sql)?;
        let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();
        let rows = stmt
            .query_map(params_refs.as_slice(), StoredRow::from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(parse_rows(rows, username).0)
    }

    /// Distinct categories the user has recorded, alphabetical
    pub fn list_categories(&self, username: &str) -> Result<Vec<String>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT DISTINCT category FROM transactions WHERE username = ? ORDER BY category",
        )?;
        let categories = stmt
            .query_map(params![username], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;
        Ok(categories)
    }

    /// Delete every transaction the user owns, returning how many were removed
    pub fn delete_all_transactions(&self, username: &str) -> Result<usize> {
        let conn = self.conn()?;
        let deleted = conn.execute(
            "DELETE FROM transactions WHERE username = ?",
            params![username],
        )?;
        warn!(user = %username, deleted, "Deleted all transactions");
        Ok(deleted)
    }
}
