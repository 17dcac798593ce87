//! Dashboard and period reports

use chrono::{Duration, NaiveDate};
use rusqlite::params;

use super::{parse_date, Database, DbConn, DATE_FORMAT};
use crate::error::Result;
use crate::models::{BudgetAlert, CategoryTotal, DailyFlow, DashboardStats, PeriodTotals};

/// Fold `(period, type, total)` rows into `(period, income, expense)`
///
/// Rows must arrive ordered by period.
fn fold_periods(rows: Vec<(String, String, f64)>) -> Vec<(String, f64, f64)> {
    let mut periods: Vec<(String, f64, f64)> = Vec::new();
    for (period, kind, total) in rows {
        if periods.last().map(|p| p.0 != period).unwrap_or(true) {
            periods.push((period, 0.0, 0.0));
        }
        if let Some(last) = periods.last_mut() {
            match kind.as_str() {
                "income" => last.1 += total,
                "expense" => last.2 += total,
                _ => {}
            }
        }
    }
    periods
}

/// Run a `(period, type, total)` query
///
/// Dates SQLite cannot read give a NULL period; those rows are dropped.
fn period_rows(conn: &DbConn, sql: &str, username: &str) -> Result<Vec<(String, String, f64)>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![username], |row| {
            Ok((
                row.get::<_, Option<String>>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, f64>(2)?,
            ))
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows
        .into_iter()
        .filter_map(|(period, kind, total)| period.map(|p| (p, kind, total)))
        .collect())
}

impl Database {
    /// Totals, category breakdown, daily flow and overspent budgets
    pub fn dashboard_stats(&self, username: &str) -> Result<DashboardStats> {
        let conn = self.conn()?;

        let (total_income, total_expense, transaction_count): (f64, f64, i64) = conn.query_row(
            r#"
            SELECT
                COALESCE(SUM(CASE WHEN type = 'income' THEN amount ELSE 0 END), 0),
                COALESCE(SUM(CASE WHEN type = 'expense' THEN amount ELSE 0 END), 0),
                COUNT(*)
            FROM transactions
            WHERE username = ?
            "#,
            params![username],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )?;

        let mut category_stmt = conn.prepare(
            r#"
            SELECT category, SUM(amount) as total
            FROM transactions
            WHERE username = ? AND type = 'expense'
            GROUP BY category
            ORDER BY total DESC, category
            "#,
        )?;
        let expense_by_category = category_stmt
            .query_map(params![username], |row| {
                Ok(CategoryTotal {
                    category: row.get(0)?,
                    amount: row.get(1)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut daily_stmt = conn.prepare(
            r#"
            SELECT
                date,
                COALESCE(SUM(CASE WHEN type = 'income' THEN amount ELSE 0 END), 0),
                COALESCE(SUM(CASE WHEN type = 'expense' THEN amount ELSE 0 END), 0)
            FROM transactions
            WHERE username = ?
            GROUP BY date
            ORDER BY date
            "#,
        )?;
        let daily: Vec<DailyFlow> = daily_stmt
            .query_map(params![username], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, f64>(1)?,
                    row.get::<_, f64>(2)?,
                ))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?
            .into_iter()
            .filter_map(|(date, income, expense)| {
                parse_date(&date).map(|date| DailyFlow {
                    date,
                    income,
                    expense,
                })
            })
            .collect();
        // Release the pooled connection before budget lookups take their own
        drop(category_stmt);
        drop(daily_stmt);
        drop(conn);

        let budget_alerts = self
            .all_budget_statuses(username)?
            .into_iter()
            .filter(|s| s.is_exceeded())
            .map(|s| BudgetAlert {
                category: s.category,
                spent: s.spent,
                budget: s.budget,
            })
            .collect();

        Ok(DashboardStats {
            total_income,
            total_expense,
            net_balance: total_income - total_expense,
            transaction_count,
            expense_by_category,
            daily,
            budget_alerts,
        })
    }

    /// Income and expense per week, weeks starting on Sunday
    pub fn weekly_report(&self, username: &str) -> Result<Vec<PeriodTotals>> {
        let conn = self.conn()?;
        let rows = period_rows(
            &conn,
            r#"
            SELECT date(date, '-' || strftime('%w', date) || ' days') as week_start,
                   type, SUM(amount)
            FROM transactions
            WHERE username = ?
            GROUP BY week_start, type
            ORDER BY week_start
            "#,
            username,
        )?;

        let weeks = fold_periods(rows)
            .into_iter()
            .filter_map(|(week_start, income, expense)| {
                let start = parse_date(&week_start)?;
                let end = start + Duration::days(6);
                Some(PeriodTotals {
                    label: format!(
                        "{} to {}",
                        start.format(DATE_FORMAT),
                        end.format(DATE_FORMAT)
                    ),
                    start,
                    income,
                    expense,
                })
            })
            .collect();
        Ok(weeks)
    }

    /// Income and expense per calendar month (`YYYY-MM`)
    pub fn monthly_report(&self, username: &str) -> Result<Vec<PeriodTotals>> {
        let conn = self.conn()?;
        let rows = period_rows(
            &conn,
            r#"
            SELECT strftime('%Y-%m', date) as month, type, SUM(amount)
            FROM transactions
            WHERE username = ?
            GROUP BY month, type
            ORDER BY month
            "#,
            username,
        )?;

        let months = fold_periods(rows)
            .into_iter()
            .filter_map(|(month, income, expense)| {
                let start = NaiveDate::parse_from_str(&format!("{}-01", month), DATE_FORMAT).ok()?;
                Some(PeriodTotals {
                    label: month,
                    start,
                    income,
                    expense,
                })
            })
            .collect();
        Ok(months)
    }
}
