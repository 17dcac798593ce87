//! Spending habits, saving potential and the insurance pointer

use super::trends::{monthly_totals, top_expense_categories, TOP_CATEGORY_COUNT};
use super::types::{InsuranceSuggestion, SpendingHabits};
use crate::models::Ledger;

pub fn spending_habits(ledger: &Ledger) -> SpendingHabits {
    let monthly = monthly_totals(ledger.expenses());
    let avg_monthly_spend = if monthly.is_empty() {
        0.0
    } else {
        monthly.values().sum::<f64>() / monthly.len() as f64
    };

    SpendingHabits {
        avg_monthly_spend,
        top_categories: top_expense_categories(ledger, TOP_CATEGORY_COUNT),
    }
}

/// Rule of thumb over all-time totals
pub fn insurance_suggestion(total_income: f64, total_expense: f64) -> InsuranceSuggestion {
    let net = total_income - total_expense;
    if total_income > 50_000.0 && net > 10_000.0 {
        InsuranceSuggestion::TermLife
    } else if total_income > 0.0 && total_expense > total_income * 0.8 {
        InsuranceSuggestion::EmergencyFundFirst
    } else {
        InsuranceSuggestion::RevisitLater
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insights::types::SavingPotential;
    use crate::models::{Transaction, TransactionType};
    use chrono::NaiveDate;

    #[test]
    fn test_average_monthly_spend() {
        let txs = [("2024-01-05", 300.0), ("2024-01-20", 100.0), ("2024-03-02", 200.0)]
            .iter()
            .enumerate()
            .map(|(i, (date, amount))| Transaction {
                id: i as i64,
                username: "alice".into(),
                date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
                transaction_type: TransactionType::Expense,
                category: format!("Cat{}", i),
                amount: *amount,
                description: None,
            })
            .collect();
        let habits = spending_habits(&Ledger::new("alice", txs));
        // Months without expenses are not averaged in
        assert_eq!(habits.avg_monthly_spend, 300.0);
        assert_eq!(habits.top_categories.len(), 3);
        assert_eq!(habits.top_categories[0].category, "Cat0");
    }

    #[test]
    fn test_insurance_rules() {
        assert_eq!(insurance_suggestion(60_000.0, 20_000.0), InsuranceSuggestion::TermLife);
        assert_eq!(
            insurance_suggestion(60_000.0, 55_000.0),
            InsuranceSuggestion::EmergencyFundFirst
        );
        assert_eq!(
            insurance_suggestion(20_000.0, 5_000.0),
            InsuranceSuggestion::RevisitLater
        );
        assert_eq!(insurance_suggestion(0.0, 500.0), InsuranceSuggestion::RevisitLater);
    }

    #[test]
    fn test_saving_potential() {
        assert_eq!(
            SavingPotential::from_net(120.0),
            SavingPotential::Surplus { amount: 120.0 }
        );
        assert_eq!(
            SavingPotential::from_net(-80.0),
            SavingPotential::Deficit { amount: 80.0 }
        );
        assert_eq!(SavingPotential::from_net(0.0), SavingPotential::Balanced);
        assert!(SavingPotential::from_net(-80.0).message().contains("₹80.00"));
    }
}
