//! Monthly spending trends and savings rates

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;

use super::types::{CategorySeries, MonthlySavings, MonthlyTotal, SavingsSummary, SpendingTrends};
use crate::models::{CategoryTotal, Ledger, Transaction, TransactionType};

/// Number of categories broken out in trends and habits
pub const TOP_CATEGORY_COUNT: usize = 3;

pub(crate) fn month_key(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

/// Sum amounts per `YYYY-MM`, ascending
pub(crate) fn monthly_totals<'a>(
    transactions: impl IntoIterator<Item = &'a Transaction>,
) -> BTreeMap<String, f64> {
    let mut totals = BTreeMap::new();
    for tx in transactions {
        *totals.entry(month_key(tx.date)).or_insert(0.0) += tx.amount;
    }
    totals
}

/// Expense categories by all-time total, largest first (ties by name)
pub(crate) fn top_expense_categories(ledger: &Ledger, count: usize) -> Vec<CategoryTotal> {
    let mut totals: HashMap<&str, f64> = HashMap::new();
    for tx in ledger.expenses() {
        *totals.entry(tx.category.as_str()).or_insert(0.0) += tx.amount;
    }

    let mut ranked: Vec<CategoryTotal> = totals
        .into_iter()
        .map(|(category, amount)| CategoryTotal {
            category: category.to_string(),
            amount,
        })
        .collect();
    ranked.sort_by(|a, b| {
        b.amount
            .total_cmp(&a.amount)
            .then_with(|| a.category.cmp(&b.category))
    });
    ranked.truncate(count);
    ranked
}

fn to_series(totals: BTreeMap<String, f64>) -> Vec<MonthlyTotal> {
    totals
        .into_iter()
        .map(|(month, amount)| MonthlyTotal { month, amount })
        .collect()
}

pub fn spending_trends(ledger: &Ledger) -> SpendingTrends {
    let monthly = to_series(monthly_totals(ledger.expenses()));
    let top_categories = top_expense_categories(ledger, TOP_CATEGORY_COUNT)
        .into_iter()
        .map(|top| CategorySeries {
            months: to_series(monthly_totals(
                ledger.expenses().filter(|t| t.category == top.category),
            )),
            category: top.category,
        })
        .collect();

    SpendingTrends {
        monthly,
        top_categories,
    }
}

fn mean(values: impl ExactSizeIterator<Item = f64>) -> f64 {
    let n = values.len();
    if n == 0 {
        return 0.0;
    }
    values.sum::<f64>() / n as f64
}

/// Per-month savings, savings rate and burn rate, plus their averages
pub fn savings_summary(ledger: &Ledger) -> SavingsSummary {
    let income = monthly_totals(ledger.of_type(TransactionType::Income));
    let expense = monthly_totals(ledger.expenses());

    let mut months: Vec<&String> = income.keys().chain(expense.keys()).collect();
    months.sort();
    months.dedup();

    let months: Vec<MonthlySavings> = months
        .into_iter()
        .map(|month| {
            let income = income.get(month).copied().unwrap_or(0.0);
            let expense = expense.get(month).copied().unwrap_or(0.0);
            let savings = income - expense;
            MonthlySavings {
                month: month.clone(),
                income,
                expense,
                savings,
                savings_rate: if income > 0.0 { savings / income } else { 0.0 },
            }
        })
        .collect();

    SavingsSummary {
        avg_savings: mean(months.iter().map(|m| m.savings)),
        avg_savings_rate: mean(months.iter().map(|m| m.savings_rate)),
        avg_burn_rate: mean(months.iter().map(|m| m.expense)),
        months,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx(id: i64, date: &str, kind: TransactionType, category: &str, amount: f64) -> Transaction {
        Transaction {
            id,
            username: "alice".into(),
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            transaction_type: kind,
            category: category.into(),
            amount,
            description: None,
        }
    }

    fn sample() -> Ledger {
        use TransactionType::*;
        Ledger::new(
            "alice",
            vec![
                tx(1, "2024-01-01", Income, "Salary", 1000.0),
                tx(2, "2024-01-03", Expense, "Rent", 400.0),
                tx(3, "2024-01-10", Expense, "Groceries", 100.0),
                tx(4, "2024-02-01", Income, "Salary", 1000.0),
                tx(5, "2024-02-03", Expense, "Rent", 400.0),
                tx(6, "2024-02-12", Expense, "Dining Out", 80.0),
                tx(7, "2024-02-20", Expense, "Groceries", 150.0),
                tx(8, "2024-03-05", Expense, "Shopping", 20.0),
            ],
        )
    }

    #[test]
    fn test_monthly_trends() {
        let trends = spending_trends(&sample());
        let months: Vec<&str> = trends.monthly.iter().map(|m| m.month.as_str()).collect();
        assert_eq!(months, vec!["2024-01", "2024-02", "2024-03"]);
        assert_eq!(trends.monthly[1].amount, 630.0);

        let top: Vec<&str> = trends
            .top_categories
            .iter()
            .map(|c| c.category.as_str())
            .collect();
        assert_eq!(top, vec!["Rent", "Groceries", "Dining Out"]);
        assert_eq!(trends.top_categories[1].months.len(), 2);
    }

    #[test]
    fn test_savings_rate_zero_without_income() {
        let summary = savings_summary(&sample());
        assert_eq!(summary.months.len(), 3);
        assert_eq!(summary.months[0].savings, 500.0);
        assert_eq!(summary.months[0].savings_rate, 0.5);

        let march = &summary.months[2];
        assert_eq!(march.income, 0.0);
        assert_eq!(march.savings, -20.0);
        assert_eq!(march.savings_rate, 0.0);

        assert!((summary.avg_burn_rate - (500.0 + 630.0 + 20.0) / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_ledger() {
        let ledger = Ledger::default();
        assert_eq!(spending_trends(&ledger), SpendingTrends::default());
        let summary = savings_summary(&ledger);
        assert!(summary.months.is_empty());
        assert_eq!(summary.avg_savings, 0.0);
    }
}
