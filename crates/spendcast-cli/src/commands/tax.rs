//! Tax summary command implementation

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use spendcast_core::config::AppConfig;
use spendcast_core::db::Database;
use spendcast_core::tax;

use super::truncate;

pub fn cmd_tax(
    db: &Database,
    config: &AppConfig,
    user: &str,
    year: Option<i32>,
    output: Option<&Path>,
) -> Result<()> {
    let ledger = db.load_transactions(user)?;
    let report = tax::tax_report(&ledger, year, &config.tax)?;
    let money = |v: f64| config.display.money(v);

    println!();
    println!("🧾 Tax Summary {}", report.year);
    println!("   ─────────────────────────────────────────");
    println!("   Total income:   {:>14}", money(report.total_income));
    println!("   Total expense:  {:>14}", money(report.total_expense));
    println!("   Net savings:    {:>14}", money(report.net_savings));
    println!();
    println!("   {}", report.guidance());

    if !report.categories.is_empty() {
        println!();
        for row in &report.categories {
            println!(
                "   {:8} │ {:18} │ {:>12}{}",
                row.transaction_type.as_str(),
                truncate(&row.category, 18),
                money(row.amount),
                if row.deductible { "  (deductible)" } else { "" }
            );
        }
        println!();
        println!(
            "   Potentially deductible expenses: {}",
            money(report.deductible_total())
        );
    }

    if report.available_years.len() > 1 {
        let years: Vec<String> = report.available_years.iter().map(|y| y.to_string()).collect();
        println!("   Other years: {}", years.join(", "));
    }

    if let Some(path) = output {
        fs::write(path, report.to_csv()?)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!();
        println!("   📄 Breakdown written to {}", path.display());
    }

    Ok(())
}
