//! Demo data generator
//!
//! Fills a user's ledger with a believable few months of salary, rent,
//! utilities, groceries and daily spending so the forecaster and insights
//! have something to work with. Everything goes through the ledger writer.

use std::ops::RangeInclusive;

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::db::Database;
use crate::error::{Error, Result};
use crate::models::{NewTransaction, TransactionType};

pub const DEFAULT_DEMO_DAYS: u32 = 90;

/// Range of days the front ends accept
pub const DEMO_DAYS_RANGE: RangeInclusive<u32> = 20..=180;

pub const DEFAULT_DEMO_SEED: u64 = 42;

const DESCRIPTIONS: &[&str] = &[
    "Lunch", "Bus fare", "Movie", "Groceries", "Shopping", "Doctor", "Gift", "Dining", "Refund",
    "Bonus",
];

const OCCASIONAL_EXPENSES: &[&str] = &["Shopping", "Dining Out", "Healthcare"];
const OCCASIONAL_INCOME: &[&str] = &["Gift", "Refund", "Bonus"];

fn pick<'a>(rng: &mut StdRng, items: &[&'a str]) -> &'a str {
    items.choose(rng).copied().unwrap_or_default()
}

/// Amount rounded to two decimals
fn amount(rng: &mut StdRng, low: f64, high: f64) -> f64 {
    (rng.gen_range(low..=high) * 100.0).round() / 100.0
}

/// Generate the transactions for one day
fn day_transactions(rng: &mut StdRng, username: &str, date: NaiveDate) -> Vec<NewTransaction> {
    use TransactionType::{Expense, Income};

    let mut out = Vec::new();
    let mut push = |kind, category: &str, amount: f64, description: &str| {
        out.push(
            NewTransaction::new(username, date, kind, category, amount).with_description(description),
        );
    };

    match date.day() {
        1 => {
            let salary = amount(rng, 20_000.0, 21_000.0);
            push(Income, "Salary", salary, "Monthly Salary");
        }
        2 => {
            let rent = amount(rng, 2_800.0, 3_200.0);
            push(Expense, "Rent", rent, "Monthly Rent");
        }
        5 => {
            let bill = amount(rng, 500.0, 600.0);
            push(Expense, "Utilities", bill, "Electricity & Water");
        }
        _ => {}
    }

    if date.weekday() == Weekday::Mon {
        let groceries = amount(rng, 1_100.0, 1_200.0);
        push(Expense, "Groceries", groceries, "Weekly Groceries");
    }

    let mut daily = amount(rng, 500.0, 550.0);
    if rng.gen_bool(0.05) {
        daily += amount(rng, 50.0, 200.0);
    }
    let description = pick(rng, DESCRIPTIONS);
    push(Expense, "Daily Expenses", daily, description);

    if rng.gen_bool(0.18) {
        let category = pick(rng, OCCASIONAL_EXPENSES);
        let value = amount(rng, 300.0, 700.0);
        let description = pick(rng, DESCRIPTIONS);
        push(Expense, category, value, description);
    }

    if rng.gen_bool(0.05) {
        let category = pick(rng, OCCASIONAL_INCOME);
        let value = amount(rng, 800.0, 1_200.0);
        let description = pick(rng, DESCRIPTIONS);
        push(Income, category, value, description);
    }

    out
}

/// Insert `days` days of demo data ending on `today`; returns the number of rows written
pub fn add_demo_transactions(
    db: &Database,
    username: &str,
    days: u32,
    seed: u64,
    today: NaiveDate,
) -> Result<usize> {
    if days == 0 {
        return Err(Error::InvalidInput(
            "Number of demo days must be at least 1.".to_string(),
        ));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let start = today - Duration::days(i64::from(days) - 1);

    let mut inserted = 0;
    for date in start.iter_days().take(days as usize) {
        for tx in day_transactions(&mut rng, username, date) {
            db.save_transaction(&tx)?;
            inserted += 1;
        }
    }

    tracing::info!(user = %username, days, inserted, "Added demo transactions");
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forecast::unique_expense_days;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()
    }

    #[test]
    fn test_demo_covers_requested_window() {
        let db = Database::in_memory().unwrap();
        let inserted = add_demo_transactions(&db, "alice", 90, 7, today()).unwrap();

        let ledger = db.load_transactions("alice").unwrap();
        assert_eq!(ledger.len(), inserted);
        assert_eq!(ledger.transactions[0].date, NaiveDate::from_ymd_opt(2024, 4, 2).unwrap());
        assert_eq!(ledger.transactions.last().unwrap().date, today());
        // One "Daily Expenses" row per day
        assert_eq!(unique_expense_days(&ledger), 90);
        assert!(ledger.transactions.iter().all(|t| t.amount > 0.0));
    }

    #[test]
    fn test_demo_calendar_rules() {
        let db = Database::in_memory().unwrap();
        add_demo_transactions(&db, "alice", 61, 1, today()).unwrap();
        let ledger = db.load_transactions("alice").unwrap();

        let salaries: Vec<_> = ledger
            .transactions
            .iter()
            .filter(|t| t.category == "Salary")
            .collect();
        // May 1 and June 1 fall inside the window
        assert_eq!(salaries.len(), 2);
        assert!(salaries.iter().all(|t| t.date.day() == 1));
        assert!(salaries
            .iter()
            .all(|t| (20_000.0..=21_000.0).contains(&t.amount)));

        for tx in &ledger.transactions {
            match tx.category.as_str() {
                "Rent" => assert_eq!(tx.date.day(), 2),
                "Utilities" => assert_eq!(tx.date.day(), 5),
                "Groceries" => assert_eq!(tx.date.weekday(), Weekday::Mon),
                "Daily Expenses" => assert!((500.0..=750.0).contains(&tx.amount)),
                _ => {}
            }
        }
    }

    #[test]
    fn test_demo_is_seeded() {
        let a = Database::in_memory().unwrap();
        let b = Database::in_memory().unwrap();
        add_demo_transactions(&a, "alice", 30, 99, today()).unwrap();
        add_demo_transactions(&b, "alice", 30, 99, today()).unwrap();

        let strip = |db: &Database| -> Vec<(NaiveDate, String, f64)> {
            db.load_transactions("alice")
                .unwrap()
                .transactions
                .into_iter()
                .map(|t| (t.date, t.category, t.amount))
                .collect()
        };
        assert_eq!(strip(&a), strip(&b));
    }

    #[test]
    fn test_zero_days_rejected() {
        let db = Database::in_memory().unwrap();
        let err = add_demo_transactions(&db, "alice", 0, 1, today()).unwrap_err();
        assert!(err.is_user_facing());
    }
}
