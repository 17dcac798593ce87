//! Year-end tax summary
//!
//! A simplified summary, not tax advice: totals for one calendar year, a
//! flag when income crosses the basic exemption limit, and a per-category
//! breakdown marking potentially deductible expenses.

use std::collections::BTreeMap;

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::config::TaxConfig;
use crate::error::{Error, Result};
use crate::models::{Ledger, TransactionType};

/// One `(type, category)` row of the breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxCategoryRow {
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub category: String,
    pub amount: f64,
    pub deductible: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxReport {
    pub year: i32,
    /// Every year with transactions, newest first
    pub available_years: Vec<i32>,
    pub total_income: f64,
    pub total_expense: f64,
    pub net_savings: f64,
    pub exemption_threshold: f64,
    pub exceeds_exemption: bool,
    /// Sorted by type (income before expense) then category
    pub categories: Vec<TaxCategoryRow>,
}

impl TaxReport {
    pub fn guidance(&self) -> String {
        if self.exceeds_exemption {
            format!(
                "Your total income exceeds ₹{:.0}. You may be required to pay income tax. Please check the latest tax slabs and consult a tax advisor.",
                self.exemption_threshold
            )
        } else {
            format!(
                "Your total income is below the basic exemption limit (₹{:.0}). No income tax is likely owed.",
                self.exemption_threshold
            )
        }
    }

    pub fn deductible_total(&self) -> f64 {
        self.categories
            .iter()
            .filter(|r| r.deductible && r.transaction_type == TransactionType::Expense)
            .map(|r| r.amount)
            .sum()
    }

    /// Breakdown as CSV: `type,category,amount,deductible`
    pub fn to_csv(&self) -> Result<String> {
        let mut wtr = csv::Writer::from_writer(Vec::new());
        wtr.write_record(["type", "category", "amount", "deductible"])?;
        for row in &self.categories {
            wtr.write_record([
                row.transaction_type.as_str().to_string(),
                row.category.clone(),
                format!("{:.2}", row.amount),
                if row.deductible { "yes" } else { "" }.to_string(),
            ])?;
        }
        let bytes = wtr
            .into_inner()
            .map_err(|e| Error::InvalidInput(format!("Failed to finish CSV: {}", e)))?;
        String::from_utf8(bytes)
            .map_err(|e| Error::InvalidInput(format!("CSV output is not UTF-8: {}", e)))
    }
}

/// Years present in the ledger, newest first
pub fn available_years(ledger: &Ledger) -> Vec<i32> {
    let mut years: Vec<i32> = ledger.transactions.iter().map(|t| t.date.year()).collect();
    years.sort_unstable_by(|a, b| b.cmp(a));
    years.dedup();
    years
}

/// Summarise one year; `None` picks the most recent year with data
pub fn tax_report(ledger: &Ledger, year: Option<i32>, config: &TaxConfig) -> Result<TaxReport> {
    let available_years = available_years(ledger);
    let year = match year.or_else(|| available_years.first().copied()) {
        Some(year) => year,
        None => {
            return Err(Error::NotFound(
                "No data available to generate a tax report.".to_string(),
            ))
        }
    };

    let mut breakdown: BTreeMap<(TransactionType, &str), f64> = BTreeMap::new();
    let mut total_income = 0.0;
    let mut total_expense = 0.0;
    for tx in ledger.transactions.iter().filter(|t| t.date.year() == year) {
        match tx.transaction_type {
            TransactionType::Income => total_income += tx.amount,
            TransactionType::Expense => total_expense += tx.amount,
        }
        *breakdown
            .entry((tx.transaction_type, tx.category.as_str()))
            .or_insert(0.0) += tx.amount;
    }

    let categories = breakdown
        .into_iter()
        .map(|((transaction_type, category), amount)| TaxCategoryRow {
            transaction_type,
            category: category.to_string(),
            amount,
            deductible: transaction_type == TransactionType::Expense
                && config.is_deductible(category),
        })
        .collect();

    Ok(TaxReport {
        year,
        available_years,
        total_income,
        total_expense,
        net_savings: total_income - total_expense,
        exemption_threshold: config.exemption_threshold,
        exceeds_exemption: total_income > config.exemption_threshold,
        categories,
    })
}
