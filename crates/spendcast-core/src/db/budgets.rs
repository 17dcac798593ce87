//! Per-category budgets

use rusqlite::{params, OptionalExtension};
use tracing::debug;

use super::{Database, DbConn};
use crate::error::Result;
use crate::models::{Budget, BudgetStatus, BudgetWarning, NewBudget};

/// All-time expense total for one category
fn category_spent(conn: &DbConn, username: &str, category: &str) -> Result<f64> {
    let spent: f64 = conn.query_row(
        r#"
        SELECT COALESCE(SUM(amount), 0) FROM transactions
        WHERE username = ? AND category = ? AND type = 'expense'
        "#,
        params![username, category],
        |row| row.get(0),
    )?;
    Ok(spent)
}

impl Database {
    /// Set a category budget, replacing any existing one
    pub fn save_budget(&self, budget: &NewBudget) -> Result<i64> {
        budget.validate()?;
        let username = budget.username.trim();
        let category = budget.category.trim();

        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        tx.execute(
            "DELETE FROM budgets WHERE username = ? AND category = ?",
            params![username, category],
        )?;
        tx.execute(
            "INSERT INTO budgets (username, category, budget_amount) VALUES (?, ?, ?)",
            params![username, category, budget.budget_amount],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;

        debug!(user = %username, category = %category, "Budget saved");
        Ok(id)
    }

    /// List the user's budgets by category
    pub fn load_budgets(&self, username: &str) -> Result<Vec<Budget>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, username, category, budget_amount FROM budgets
            WHERE username = ?
            ORDER BY category
            "#,
        )?;

        let budgets = stmt
            .query_map(params![username], |row| {
                Ok(Budget {
                    id: row.get(0)?,
                    username: row.get(1)?,
                    category: row.get(2)?,
                    budget_amount: row.get(3)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(budgets)
    }

    /// Spent-to-date against the category's budget, if one is set
    pub fn budget_status(&self, username: &str, category: &str) -> Result<Option<BudgetStatus>> {
        let conn = self.conn()?;
        let budget: Option<f64> = conn
            .query_row(
                "SELECT budget_amount FROM budgets WHERE username = ? AND category = ? ORDER BY id DESC LIMIT 1",
                params![username, category],
                |row| row.get(0),
            )
            .optional()?;

        let Some(budget) = budget else {
            return Ok(None);
        };

        Ok(Some(BudgetStatus {
            category: category.to_string(),
            budget,
            spent: category_spent(&conn, username, category)?,
        }))
    }

    /// Status for every budgeted category
    pub fn all_budget_statuses(&self, username: &str) -> Result<Vec<BudgetStatus>> {
        let budgets = self.load_budgets(username)?;
        let conn = self.conn()?;
        budgets
            .into_iter()
            .map(|b| {
                Ok(BudgetStatus {
                    spent: category_spent(&conn, username, &b.category)?,
                    category: b.category,
                    budget: b.budget_amount,
                })
            })
            .collect()
    }

    /// Warn before an expense of `amount` pushes the category over budget
    ///
    /// Fires when `spent + amount > budget > 0`.
    pub fn check_budget(
        &self,
        username: &str,
        category: &str,
        amount: f64,
    ) -> Result<Option<BudgetWarning>> {
        let warning = self
            .budget_status(username, category)?
            .filter(|s| s.budget > 0.0 && s.spent + amount > s.budget)
            .map(|s| BudgetWarning {
                category: s.category,
                budget: s.budget,
                spent: s.spent,
                amount,
            });
        Ok(warning)
    }
}
