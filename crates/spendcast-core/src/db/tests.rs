//! Database tests

use super::*;
use crate::models::*;

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::params;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn expense(user: &str, date: NaiveDate, category: &str, amount: f64) -> NewTransaction {
        NewTransaction::new(user, date, TransactionType::Expense, category, amount)
    }

    fn income(user: &str, date: NaiveDate, category: &str, amount: f64) -> NewTransaction {
        NewTransaction::new(user, date, TransactionType::Income, category, amount)
    }

    #[test]
    fn test_in_memory_db() {
        let db = Database::in_memory().unwrap();
        assert!(db.list_users().unwrap().is_empty());
        let ledger = db.load_transactions("nobody").unwrap();
        assert!(ledger.is_empty());
        assert_eq!(ledger.malformed_dates, 0);
    }

    #[test]
    fn test_schema_tables_exist() {
        let db = Database::in_memory().unwrap();
        let conn = db.conn().unwrap();
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN ('users', 'transactions', 'budgets')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 3);
    }

    #[test]
    fn test_create_and_verify_user() {
        let db = Database::in_memory().unwrap();
        db.create_user("alice", "secret123").unwrap();

        assert!(db.verify_user("alice", "secret123").unwrap());
        assert!(!db.verify_user("alice", "wrong-password").unwrap());
        assert!(!db.verify_user("bob", "secret123").unwrap());

        let users = db.list_users().unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].username, "alice");
        assert!(db.get_user("alice").unwrap().is_some());
    }

    #[test]
    fn test_password_is_not_stored_in_plain_text() {
        let db = Database::in_memory().unwrap();
        db.create_user("alice", "secret123").unwrap();
        let conn = db.conn().unwrap();
        let stored: String = conn
            .query_row(
                "SELECT password_hash FROM users WHERE username = 'alice'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert!(stored.starts_with("$argon2id$"));
        assert!(!stored.contains("secret123"));
    }

    #[test]
    fn test_create_user_validation() {
        let db = Database::in_memory().unwrap();
        let err = db.create_user("al", "secret123").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Username must be at least 3 chars and password at least 6 chars."
        );
        assert!(db.create_user("alice", "12345").is_err());
        // Whitespace does not count toward the username length
        assert!(db.create_user("  ab  ", "secret123").is_err());

        db.create_user("alice", "secret123").unwrap();
        let err = db.create_user("alice", "another1").unwrap_err();
        assert_eq!(err.to_string(), "Username already exists.");
    }

    #[test]
    fn test_malformed_hash_verifies_false() {
        let db = Database::in_memory().unwrap();
        let conn = db.conn().unwrap();
        conn.execute(
            "INSERT INTO users (username, password_hash) VALUES ('mallory', 'not-a-hash')",
            [],
        )
        .unwrap();
        drop(conn);
        assert!(!db.verify_user("mallory", "anything").unwrap());
    }

    #[test]
    fn test_save_transaction_validation() {
        let db = Database::in_memory().unwrap();
        let bad = expense("alice", day(2024, 3, 1), "Groceries", 0.0);
        let err = db.save_transaction(&bad).unwrap_err();
        assert_eq!(err.to_string(), "All fields required and amount > 0.");

        let bad = expense("alice", day(2024, 3, 1), "  ", 10.0);
        assert!(db.save_transaction(&bad).is_err());

        let bad = expense("", day(2024, 3, 1), "Groceries", 10.0);
        assert!(db.save_transaction(&bad).is_err());

        assert!(db.load_transactions("alice").unwrap().is_empty());
    }

    #[test]
    fn test_load_transactions_sorted_and_scoped() {
        let db = Database::in_memory().unwrap();
        db.save_transaction(&expense("alice", day(2024, 3, 5), "Groceries", 40.0))
            .unwrap();
        db.save_transaction(
            &income("alice", day(2024, 3, 1), "Salary", 1000.0).with_description("March"),
        )
        .unwrap();
        db.save_transaction(&expense("alice", day(2024, 3, 3), "Rent", 500.0))
            .unwrap();
        db.save_transaction(&expense("bob", day(2024, 3, 2), "Rent", 700.0))
            .unwrap();

        let ledger = db.load_transactions("alice").unwrap();
        assert_eq!(ledger.len(), 3);
        let dates: Vec<NaiveDate> = ledger.transactions.iter().map(|t| t.date).collect();
        assert_eq!(dates, vec![day(2024, 3, 1), day(2024, 3, 3), day(2024, 3, 5)]);
        assert_eq!(ledger.transactions[0].description.as_deref(), Some("March"));
        assert_eq!(ledger.total(TransactionType::Expense), 540.0);
    }

    #[test]
    fn test_malformed_dates_are_counted() {
        let db = Database::in_memory().unwrap();
        db.save_transaction(&expense("alice", day(2024, 3, 5), "Groceries", 40.0))
            .unwrap();
        let conn = db.conn().unwrap();
        conn.execute(
            "INSERT INTO transactions (username, date, type, category, amount) VALUES (?, ?, 'expense', 'Groceries', 10.0)",
            params!["alice", "05/03/2024"],
        )
        .unwrap();
        drop(conn);

        let ledger = db.load_transactions("alice").unwrap();
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.malformed_dates, 1);
    }

    #[test]
    fn test_list_transactions_filters_and_paging() {
        let db = Database::in_memory().unwrap();
        for d in 1..=6 {
            db.save_transaction(&expense("alice", day(2024, 4, d), "Groceries", d as f64 * 10.0))
                .unwrap();
        }
        db.save_transaction(&income("alice", day(2024, 4, 3), "Salary", 900.0))
            .unwrap();

        let all = db
            .list_transactions("alice", &TransactionQuery::default())
            .unwrap();
        assert_eq!(all.len(), 7);
        assert_eq!(all[0].date, day(2024, 4, 6));
        // Same date: newest id first
        let same_day: Vec<i64> = all
            .iter()
            .filter(|t| t.date == day(2024, 4, 3))
            .map(|t| t.id)
            .collect();
        assert!(same_day[0] > same_day[1]);

        let query = TransactionQuery {
            transaction_type: Some(TransactionType::Expense),
            from: Some(day(2024, 4, 2)),
            to: Some(day(2024, 4, 5)),
            ..Default::default()
        };
        let filtered = db.list_transactions("alice", &query).unwrap();
        assert_eq!(filtered.len(), 4);
        assert!(filtered.iter().all(|t| t.transaction_type == TransactionType::Expense));

        let paged = db
            .list_transactions(
                "alice",
                &TransactionQuery {
                    limit: Some(2),
                    offset: Some(1),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(paged.len(), 2);
        assert_eq!(paged[0].date, day(2024, 4, 5));

        let salary = db
            .list_transactions(
                "alice",
                &TransactionQuery {
                    category: Some("Salary".into()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(salary.len(), 1);
        assert_eq!(db.list_categories("alice").unwrap(), vec!["Groceries", "Salary"]);
    }

    #[test]
    fn test_delete_all_transactions_only_touches_user() {
        let db = Database::in_memory().unwrap();
        db.save_transaction(&expense("alice", day(2024, 3, 1), "Rent", 10.0))
            .unwrap();
        db.save_transaction(&expense("alice", day(2024, 3, 2), "Rent", 10.0))
            .unwrap();
        db.save_transaction(&expense("bob", day(2024, 3, 2), "Rent", 10.0))
            .unwrap();

        assert_eq!(db.delete_all_transactions("alice").unwrap(), 2);
        assert!(db.load_transactions("alice").unwrap().is_empty());
        assert_eq!(db.load_transactions("bob").unwrap().len(), 1);
    }

    #[test]
    fn test_save_budget_replaces_existing() {
        let db = Database::in_memory().unwrap();
        db.save_budget(&NewBudget::new("alice", "Groceries", 100.0))
            .unwrap();
        db.save_budget(&NewBudget::new("alice", "Groceries", 250.0))
            .unwrap();
        db.save_budget(&NewBudget::new("alice", "Rent", 1000.0))
            .unwrap();

        let budgets = db.load_budgets("alice").unwrap();
        assert_eq!(budgets.len(), 2);
        assert_eq!(budgets[0].category, "Groceries");
        assert_eq!(budgets[0].budget_amount, 250.0);

        let err = db
            .save_budget(&NewBudget::new("alice", "Rent", -5.0))
            .unwrap_err();
        assert_eq!(err.to_string(), "All fields required and budget > 0.");
    }

    #[test]
    fn test_check_budget_warning() {
        let db = Database::in_memory().unwrap();
        assert!(db.check_budget("alice", "Groceries", 50.0).unwrap().is_none());

        db.save_budget(&NewBudget::new("alice", "Groceries", 100.0))
            .unwrap();
        db.save_transaction(&expense("alice", day(2024, 3, 1), "Groceries", 70.0))
            .unwrap();
        // Income in the same category never counts as spending
        db.save_transaction(&income("alice", day(2024, 3, 1), "Groceries", 500.0))
            .unwrap();

        assert!(db.check_budget("alice", "Groceries", 30.0).unwrap().is_none());

        let warning = db.check_budget("alice", "Groceries", 30.01).unwrap().unwrap();
        assert_eq!(warning.spent, 70.0);
        assert_eq!(
            warning.message(),
            "You are exceeding the budget for Groceries! Budget: ₹100.00, Spent: ₹70.00, This Transaction: ₹30.01"
        );

        let status = db.budget_status("alice", "Groceries").unwrap().unwrap();
        assert_eq!(status.remaining(), 30.0);
        assert!(!status.is_exceeded());
    }

    #[test]
    fn test_dashboard_stats() {
        let db = Database::in_memory().unwrap();
        db.save_transaction(&income("alice", day(2024, 3, 1), "Salary", 1000.0))
            .unwrap();
        db.save_transaction(&expense("alice", day(2024, 3, 1), "Rent", 400.0))
            .unwrap();
        db.save_transaction(&expense("alice", day(2024, 3, 2), "Groceries", 150.0))
            .unwrap();
        db.save_transaction(&expense("alice", day(2024, 3, 3), "Groceries", 100.0))
            .unwrap();
        db.save_budget(&NewBudget::new("alice", "Groceries", 200.0))
            .unwrap();
        db.save_budget(&NewBudget::new("alice", "Rent", 500.0))
            .unwrap();

        let stats = db.dashboard_stats("alice").unwrap();
        assert_eq!(stats.total_income, 1000.0);
        assert_eq!(stats.total_expense, 650.0);
        assert_eq!(stats.net_balance, 350.0);
        assert_eq!(stats.transaction_count, 4);
        assert_eq!(stats.expense_by_category[0].category, "Rent");
        assert_eq!(stats.expense_by_category[1].amount, 250.0);
        assert_eq!(stats.daily.len(), 3);
        assert_eq!(stats.daily[0].net(), 600.0);

        assert_eq!(stats.budget_alerts.len(), 1);
        assert_eq!(
            stats.budget_alerts[0].message(),
            "Budget exceeded for Groceries: Spent ₹250.00 against ₹200.00"
        );
    }

    #[test]
    fn test_weekly_report_starts_on_sunday() {
        let db = Database::in_memory().unwrap();
        // 2024-03-03 is a Sunday
        db.save_transaction(&expense("alice", day(2024, 3, 3), "Rent", 100.0))
            .unwrap();
        db.save_transaction(&income("alice", day(2024, 3, 9), "Salary", 900.0))
            .unwrap();
        db.save_transaction(&expense("alice", day(2024, 3, 10), "Rent", 50.0))
            .unwrap();

        let weeks = db.weekly_report("alice").unwrap();
        assert_eq!(weeks.len(), 2);
        assert_eq!(weeks[0].label, "2024-03-03 to 2024-03-09");
        assert_eq!(weeks[0].income, 900.0);
        assert_eq!(weeks[0].expense, 100.0);
        assert_eq!(weeks[1].start, day(2024, 3, 10));
        assert_eq!(weeks[1].net(), -50.0);
    }

    #[test]
    fn test_monthly_report() {
        let db = Database::in_memory().unwrap();
        db.save_transaction(&income("alice", day(2024, 1, 15), "Salary", 900.0))
            .unwrap();
        db.save_transaction(&expense("alice", day(2024, 1, 20), "Rent", 300.0))
            .unwrap();
        db.save_transaction(&expense("alice", day(2024, 2, 2), "Rent", 300.0))
            .unwrap();

        let months = db.monthly_report("alice").unwrap();
        assert_eq!(months.len(), 2);
        assert_eq!(months[0].label, "2024-01");
        assert_eq!(months[0].net(), 600.0);
        assert_eq!(months[1].label, "2024-02");
        assert_eq!(months[1].start, day(2024, 2, 1));
        assert_eq!(months[1].income, 0.0);
    }

    #[test]
    fn test_encrypted_database_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("enc.db");
        let path = path.to_str().unwrap();

        let db = Database::new_with_key(path, Some("passphrase")).unwrap();
        db.create_user("alice", "secret123").unwrap();
        drop(db);

        let reopened = Database::new_with_key(path, Some("passphrase")).unwrap();
        assert!(reopened.verify_user("alice", "secret123").unwrap());
        assert!(Database::new_with_key(path, Some("wrong")).is_err());
    }
}
