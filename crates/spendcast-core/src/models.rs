//! Domain models for Spendcast

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Suggested expense categories (categories are free text; these seed pickers)
pub const EXPENSE_CATEGORIES: &[&str] = &[
    "Groceries",
    "Rent",
    "Utilities",
    "Transportation",
    "Dining Out",
    "Entertainment",
    "Shopping",
    "Healthcare",
    "Education",
    "Other",
    "Coffee",
    "Snacks",
    "Internet",
    "Mobile Recharge",
    "Fuel",
    "Parking",
    "Laundry",
    "Subscriptions",
    "Pet Care",
    "Gifts",
    "Travel",
    "Gym",
    "Personal Care",
    "Insurance",
    "Home Supplies",
    "Kids",
    "Charity",
];

/// Suggested income categories
pub const INCOME_CATEGORIES: &[&str] = &[
    "Salary",
    "Freelance",
    "Investment",
    "Gift",
    "Other",
    "Interest",
    "Dividends",
    "Rental Income",
    "Bonus",
    "Allowance",
    "Refund",
    "Lottery",
    "Side Hustle",
    "Scholarship",
    "Pension",
    "Grants",
    "Sale",
    "Cashback",
    "Commission",
    "Tips",
];

/// Minimum username length (after trimming)
pub const MIN_USERNAME_LEN: usize = 3;

/// Minimum password length
pub const MIN_PASSWORD_LEN: usize = 6;

/// Whether money came in or went out
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    /// Suggested categories for this type
    pub fn suggested_categories(&self) -> &'static [&'static str] {
        match self {
            Self::Income => INCOME_CATEGORIES,
            Self::Expense => EXPENSE_CATEGORIES,
        }
    }
}

impl std::str::FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            _ => Err(format!("Unknown transaction type: {}", s)),
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A ledger entry owned by one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub username: String,
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub category: String,
    /// Always positive; the type carries the direction
    pub amount: f64,
    pub description: Option<String>,
}

/// A transaction before insertion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTransaction {
    pub username: String,
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub category: String,
    pub amount: f64,
    pub description: Option<String>,
}

impl NewTransaction {
    pub fn new(
        username: impl Into<String>,
        date: NaiveDate,
        transaction_type: TransactionType,
        category: impl Into<String>,
        amount: f64,
    ) -> Self {
        Self {
            username: username.into(),
            date,
            transaction_type,
            category: category.into(),
            amount,
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Reject entries the ledger writer must never store
    pub fn validate(&self) -> Result<()> {
        if self.username.trim().is_empty()
            || self.category.trim().is_empty()
            || !self.amount.is_finite()
            || self.amount <= 0.0
        {
            return Err(Error::InvalidInput(
                "All fields required and amount > 0.".to_string(),
            ));
        }
        Ok(())
    }
}

/// A per-category spending limit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub id: i64,
    pub username: String,
    pub category: String,
    pub budget_amount: f64,
}

/// A budget before insertion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBudget {
    pub username: String,
    pub category: String,
    pub budget_amount: f64,
}

impl NewBudget {
    pub fn new(username: impl Into<String>, category: impl Into<String>, budget_amount: f64) -> Self {
        Self {
            username: username.into(),
            category: category.into(),
            budget_amount,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.username.trim().is_empty()
            || self.category.trim().is_empty()
            || !self.budget_amount.is_finite()
            || self.budget_amount <= 0.0
        {
            return Err(Error::InvalidInput(
                "All fields required and budget > 0.".to_string(),
            ));
        }
        Ok(())
    }
}

/// A registered user (the password hash never leaves the db layer)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub created_at: DateTime<Utc>,
}

/// All transactions for one user, ascending by date
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Ledger {
    pub username: String,
    pub transactions: Vec<Transaction>,
    /// Stored rows whose date text could not be parsed (they are not in `transactions`)
    pub malformed_dates: usize,
}

impl Ledger {
    pub fn new(username: impl Into<String>, mut transactions: Vec<Transaction>) -> Self {
        transactions.sort_by(|a, b| a.date.cmp(&b.date).then(a.id.cmp(&b.id)));
        Self {
            username: username.into(),
            transactions,
            malformed_dates: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    /// Transactions of the given type, in ledger order
    pub fn of_type(&self, kind: TransactionType) -> impl Iterator<Item = &Transaction> {
        self.transactions
            .iter()
            .filter(move |t| t.transaction_type == kind)
    }

    pub fn expenses(&self) -> impl Iterator<Item = &Transaction> {
        self.of_type(TransactionType::Expense)
    }

    /// Sum of all amounts of the given type
    pub fn total(&self, kind: TransactionType) -> f64 {
        self.of_type(kind).map(|t| t.amount).sum()
    }
}

/// Filters for history listing and export
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransactionQuery {
    pub transaction_type: Option<TransactionType>,
    pub category: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Spending total for one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: String,
    pub amount: f64,
}

/// Income and expense totals for a single day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyFlow {
    pub date: NaiveDate,
    pub income: f64,
    pub expense: f64,
}

impl DailyFlow {
    pub fn net(&self) -> f64 {
        self.income - self.expense
    }
}

/// Spending to date against one category's budget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetStatus {
    pub category: String,
    pub budget: f64,
    /// All-time expense total for the category
    pub spent: f64,
}

impl BudgetStatus {
    pub fn remaining(&self) -> f64 {
        self.budget - self.spent
    }

    pub fn is_exceeded(&self) -> bool {
        self.budget > 0.0 && self.spent > self.budget
    }

    /// Share of the budget used, as a percentage
    pub fn used_pct(&self) -> f64 {
        if self.budget > 0.0 {
            self.spent / self.budget * 100.0
        } else {
            0.0
        }
    }
}

/// A budget that has already been overspent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetAlert {
    pub category: String,
    pub spent: f64,
    pub budget: f64,
}

impl BudgetAlert {
    pub fn message(&self) -> String {
        format!(
            "Budget exceeded for {}: Spent ₹{:.2} against ₹{:.2}",
            self.category, self.spent, self.budget
        )
    }
}

/// Warning raised before a new expense would push a category over budget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetWarning {
    pub category: String,
    pub budget: f64,
    pub spent: f64,
    pub amount: f64,
}

impl BudgetWarning {
    pub fn message(&self) -> String {
        format!(
            "You are exceeding the budget for {}! Budget: ₹{:.2}, Spent: ₹{:.2}, This Transaction: ₹{:.2}",
            self.category, self.budget, self.spent, self.amount
        )
    }
}

/// Dashboard statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_income: f64,
    pub total_expense: f64,
    pub net_balance: f64,
    pub transaction_count: i64,
    /// Expense totals per category, largest first
    pub expense_by_category: Vec<CategoryTotal>,
    /// Per-day income and expense, ascending by date
    pub daily: Vec<DailyFlow>,
    pub budget_alerts: Vec<BudgetAlert>,
}

/// Income/expense totals for one reporting period (week or month)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodTotals {
    /// Display label ("2024-03" or "2024-03-03 to 2024-03-09")
    pub label: String,
    pub start: NaiveDate,
    pub income: f64,
    pub expense: f64,
}

impl PeriodTotals {
    pub fn net(&self) -> f64 {
        self.income - self.expense
    }
}
