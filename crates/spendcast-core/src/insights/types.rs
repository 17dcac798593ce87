//! Core types for ledger insights

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::CategoryTotal;

/// The sections an insight report is made of
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightType {
    SpendingTrends,
    Savings,
    Anomalies,
    Recommendations,
    Habits,
    SavingPotential,
    Insurance,
}

impl InsightType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsightType::SpendingTrends => "spending_trends",
            InsightType::Savings => "savings",
            InsightType::Anomalies => "anomalies",
            InsightType::Recommendations => "recommendations",
            InsightType::Habits => "habits",
            InsightType::SavingPotential => "saving_potential",
            InsightType::Insurance => "insurance",
        }
    }
}

impl fmt::Display for InsightType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A total for one `YYYY-MM` month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTotal {
    pub month: String,
    pub amount: f64,
}

/// Monthly expense series for one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySeries {
    pub category: String,
    pub months: Vec<MonthlyTotal>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpendingTrends {
    /// Expense total per month, ascending
    pub monthly: Vec<MonthlyTotal>,
    /// Monthly series for the three largest expense categories, largest first
    pub top_categories: Vec<CategorySeries>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySavings {
    pub month: String,
    pub income: f64,
    /// Burn rate: what went out this month
    pub expense: f64,
    pub savings: f64,
    /// `savings / income`, or 0 for a month without income
    pub savings_rate: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SavingsSummary {
    pub months: Vec<MonthlySavings>,
    pub avg_savings: f64,
    pub avg_savings_rate: f64,
    pub avg_burn_rate: f64,
}

/// An expense well above its category's usual amount
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anomaly {
    pub transaction_id: i64,
    pub date: NaiveDate,
    pub category: String,
    pub amount: f64,
    pub description: Option<String>,
    /// `mean + 2 * std` for the category
    pub threshold: f64,
}

/// A category whose recent per-transaction spend is running high
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub category: String,
    pub recent_mean: f64,
    pub overall_mean: f64,
}

impl Recommendation {
    pub fn overspend(&self) -> f64 {
        self.recent_mean - self.overall_mean
    }

    pub fn message(&self) -> String {
        format!(
            "You are spending ₹{:.0} more than usual per transaction on {}. Consider reducing this category.",
            self.overspend(),
            self.category
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpendingHabits {
    /// Mean of the per-month expense totals (months with expenses only)
    pub avg_monthly_spend: f64,
    /// Three largest expense categories by all-time total
    pub top_categories: Vec<CategoryTotal>,
}

/// Whether the ledger runs a surplus or a deficit overall
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SavingPotential {
    Surplus { amount: f64 },
    Deficit { amount: f64 },
    Balanced,
}

impl SavingPotential {
    pub fn from_net(net_balance: f64) -> Self {
        if net_balance > 0.0 {
            SavingPotential::Surplus {
                amount: net_balance,
            }
        } else if net_balance < 0.0 {
            SavingPotential::Deficit {
                amount: -net_balance,
            }
        } else {
            SavingPotential::Balanced
        }
    }

    pub fn message(&self) -> String {
        match self {
            SavingPotential::Surplus { amount } => format!(
                "Great! You have a positive net balance of ₹{:.2}. Consider allocating surplus to savings or investments.",
                amount
            ),
            SavingPotential::Deficit { amount } => format!(
                "Your expenses exceed income by ₹{:.2}. Identify areas to cut back by reviewing top expense categories.",
                amount
            ),
            SavingPotential::Balanced => {
                "Your income and expenses are balanced. Aim for a positive balance.".to_string()
            }
        }
    }
}

/// A simplified life-insurance pointer (not financial advice)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsuranceSuggestion {
    TermLife,
    EmergencyFundFirst,
    RevisitLater,
}

impl InsuranceSuggestion {
    pub fn message(&self) -> &'static str {
        match self {
            InsuranceSuggestion::TermLife => {
                "Based on your healthy income and savings, consider term life insurance for financial security."
            }
            InsuranceSuggestion::EmergencyFundFirst => {
                "High expenses suggest building an emergency fund before considering basic life coverage."
            }
            InsuranceSuggestion::RevisitLater => {
                "Maintain a steady financial path and revisit insurance options later."
            }
        }
    }
}

/// Everything the insights page shows
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightReport {
    pub total_income: f64,
    pub total_expense: f64,
    pub net_balance: f64,
    pub trends: SpendingTrends,
    pub savings: SavingsSummary,
    pub anomalies: Vec<Anomaly>,
    pub recommendations: Vec<Recommendation>,
    pub habits: SpendingHabits,
    pub saving_potential: SavingPotential,
    pub insurance: InsuranceSuggestion,
}
