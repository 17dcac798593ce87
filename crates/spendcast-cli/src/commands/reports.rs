//! Dashboard and period report command implementations

use anyhow::Result;
use spendcast_core::config::AppConfig;
use spendcast_core::db::Database;
use spendcast_core::models::PeriodTotals;

use super::truncate;
use crate::cli::ReportPeriod;

/// Width of the longest bar in the category breakdown
const BAR_WIDTH: usize = 24;

pub fn cmd_dashboard(db: &Database, config: &AppConfig, user: &str) -> Result<()> {
    let stats = db.dashboard_stats(user)?;
    let money = |v: f64| config.display.money(v);

    println!();
    println!("📊 Spendcast Dashboard: {}", user);
    println!("   ─────────────────────────────────────────");

    if stats.transaction_count == 0 {
        println!("   No transactions yet.");
        println!();
        println!("   Try: spendcast demo --user {}", user);
        return Ok(());
    }

    println!("   Total income:   {:>14}", money(stats.total_income));
    println!("   Total expense:  {:>14}", money(stats.total_expense));
    println!("   Net balance:    {:>14}", money(stats.net_balance));
    println!("   Transactions:   {:>14}", stats.transaction_count);

    if !stats.expense_by_category.is_empty() {
        println!();
        println!("   Spending by category");
        let max = stats
            .expense_by_category
            .iter()
            .map(|c| c.amount)
            .fold(0.0_f64, f64::max);
        for cat in &stats.expense_by_category {
            let width = if max > 0.0 {
                ((cat.amount / max) * BAR_WIDTH as f64).round() as usize
            } else {
                0
            };
            println!(
                "   {:18} │ {:>12} │ {}",
                truncate(&cat.category, 18),
                money(cat.amount),
                "█".repeat(width)
            );
        }
    }

    if !stats.budget_alerts.is_empty() {
        println!();
        for alert in &stats.budget_alerts {
            println!("   ⚠️  {}", alert.message());
        }
    }

    Ok(())
}

pub fn cmd_report(db: &Database, config: &AppConfig, user: &str, period: ReportPeriod) -> Result<()> {
    let (title, rows) = match period {
        ReportPeriod::Weekly => ("📅 Weekly Report", db.weekly_report(user)?),
        ReportPeriod::Monthly => ("📅 Monthly Report", db.monthly_report(user)?),
    };

    println!();
    println!("{}", title);
    println!("   ─────────────────────────────────────────────────────────────────────");

    if rows.is_empty() {
        println!("   No transactions to report.");
        return Ok(());
    }

    print_period_rows(config, &rows);
    Ok(())
}

fn print_period_rows(config: &AppConfig, rows: &[PeriodTotals]) {
    let money = |v: f64| config.display.money(v);
    println!(
        "   {:26} │ {:>12} │ {:>12} │ {:>12}",
        "Period", "Income", "Expense", "Net"
    );
    println!("   ───────────────────────────┼──────────────┼──────────────┼─────────────");
    for row in rows {
        println!(
            "   {:26} │ {:>12} │ {:>12} │ {:>12}",
            row.label,
            money(row.income),
            money(row.expense),
            money(row.net())
        );
    }
}
