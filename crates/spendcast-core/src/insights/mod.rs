//! Ledger Insights - rule-based analysis of a user's transactions
//!
//! Everything here is a pure function of a [`Ledger`]; nothing is stored.
//!
//! ## Sections
//!
//! - **Spending Trends** - monthly expense totals and the top categories' series
//! - **Savings** - monthly savings, savings rate and burn rate
//! - **Anomalies** - expenses above `mean + 2σ` for their category
//! - **Recommendations** - categories running 30% above their usual amount
//! - **Habits** - average monthly spend and top categories
//! - **Saving Potential / Insurance** - simple pointers from all-time totals
//!
//! ## Usage
//!
//! ```rust,ignore
//! use spendcast_core::insights::analyze;
//!
//! let ledger = db.load_transactions("alice")?;
//! let report = analyze(&ledger);
//! for rec in &report.recommendations {
//!     println!("{}", rec.message());
//! }
//! ```

pub mod anomalies;
pub mod habits;
pub mod trends;
pub mod types;

use crate::models::{Ledger, TransactionType};

pub use anomalies::{find_anomalies, recommendations};
pub use habits::{insurance_suggestion, spending_habits};
pub use trends::{savings_summary, spending_trends};
pub use types::{
    Anomaly, CategorySeries, InsightReport, InsightType, InsuranceSuggestion, MonthlySavings,
    MonthlyTotal, Recommendation, SavingPotential, SavingsSummary, SpendingHabits, SpendingTrends,
};

/// Run every insight section over the ledger
pub fn analyze(ledger: &Ledger) -> InsightReport {
    let total_income = ledger.total(TransactionType::Income);
    let total_expense = ledger.total(TransactionType::Expense);
    let net_balance = total_income - total_expense;

    let report = InsightReport {
        total_income,
        total_expense,
        net_balance,
        trends: spending_trends(ledger),
        savings: savings_summary(ledger),
        anomalies: find_anomalies(ledger),
        recommendations: recommendations(ledger),
        habits: spending_habits(ledger),
        saving_potential: SavingPotential::from_net(net_balance),
        insurance: insurance_suggestion(total_income, total_expense),
    };

    tracing::debug!(
        user = %ledger.username,
        anomalies = report.anomalies.len(),
        recommendations = report.recommendations.len(),
        "Insights generated"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Transaction;
    use chrono::{Duration, NaiveDate};

    #[test]
    fn test_analyze_aggregates_sections() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let mut txs = vec![Transaction {
            id: 1,
            username: "alice".into(),
            date: start,
            transaction_type: TransactionType::Income,
            category: "Salary".into(),
            amount: 60_000.0,
            description: None,
        }];
        for i in 0..20 {
            txs.push(Transaction {
                id: 10 + i,
                username: "alice".into(),
                date: start + Duration::days(i),
                transaction_type: TransactionType::Expense,
                category: "Groceries".into(),
                amount: 500.0,
                description: None,
            });
        }

        let report = analyze(&Ledger::new("alice", txs));
        assert_eq!(report.total_expense, 10_000.0);
        assert_eq!(report.net_balance, 50_000.0);
        assert_eq!(report.insurance, InsuranceSuggestion::TermLife);
        assert!(matches!(report.saving_potential, SavingPotential::Surplus { .. }));
        assert!(report.anomalies.is_empty());
        assert_eq!(report.habits.top_categories[0].category, "Groceries");
        assert_eq!(InsightType::Anomalies.to_string(), "anomalies");
    }

    #[test]
    fn test_empty_ledger_report() {
        let report = analyze(&Ledger::default());
        assert_eq!(report.saving_potential, SavingPotential::Balanced);
        assert_eq!(report.insurance, InsuranceSuggestion::RevisitLater);
        assert!(report.recommendations.is_empty());
    }
}
