//! Insights command implementation

use anyhow::{Context, Result};
use spendcast_core::config::AppConfig;
use spendcast_core::db::Database;
use spendcast_core::insights::{self, InsightReport};

use super::truncate;

pub fn cmd_insights(db: &Database, config: &AppConfig, user: &str, json: bool) -> Result<()> {
    let ledger = db.load_transactions(user)?;
    let report = insights::analyze(&ledger);

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialize insights")?
        );
        return Ok(());
    }

    if ledger.is_empty() {
        println!("No transactions yet, so there is nothing to analyze.");
        return Ok(());
    }

    print_insights(config, &report);
    Ok(())
}

fn print_insights(config: &AppConfig, report: &InsightReport) {
    let money = |v: f64| config.display.money(v);

    println!();
    println!("💡 Spending Insights");
    println!("   ─────────────────────────────────────────");

    println!();
    println!("   📅 Monthly spending");
    for month in &report.trends.monthly {
        println!("   {} │ {:>12}", month.month, money(month.amount));
    }

    println!();
    println!("   💵 Savings");
    println!("   Average monthly savings: {}", money(report.savings.avg_savings));
    println!(
        "   Average savings rate:    {:.1}%",
        report.savings.avg_savings_rate * 100.0
    );
    println!("   Average burn rate:       {}", money(report.savings.avg_burn_rate));

    println!();
    println!("   🛒 Habits");
    println!(
        "   Average monthly spend: {}",
        money(report.habits.avg_monthly_spend)
    );
    for (rank, cat) in report.habits.top_categories.iter().enumerate() {
        println!("   {}. {:18} {:>12}", rank + 1, truncate(&cat.category, 18), money(cat.amount));
    }

    println!();
    if report.anomalies.is_empty() {
        println!("   ✅ No unusual expenses found.");
    } else {
        println!("   🚨 Unusual expenses");
        for anomaly in &report.anomalies {
            println!(
                "   {} │ {:18} │ {:>12} │ usual max {}",
                anomaly.date,
                truncate(&anomaly.category, 18),
                money(anomaly.amount),
                money(anomaly.threshold)
            );
        }
    }

    if !report.recommendations.is_empty() {
        println!();
        println!("   📌 Recommendations");
        for rec in &report.recommendations {
            println!("   • {}", rec.message());
        }
    }

    println!();
    println!("   {}", report.saving_potential.message());
    println!("   {}", report.insurance.message());
}
