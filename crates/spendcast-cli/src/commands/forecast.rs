//! Forecast command implementations

use anyhow::{Context, Result};
use spendcast_core::config::AppConfig;
use spendcast_core::db::Database;
use spendcast_core::forecast::{
    self, ComparisonOutcome, ForecastReport, ModelComparison, ModelFamily,
    MIN_UNIQUE_EXPENSE_DAYS,
};

/// Parse a comma-separated list of model families; empty means "use config"
pub fn parse_model_list(list: &str, config: &AppConfig) -> Result<Vec<ModelFamily>> {
    let families = list
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<ModelFamily>())
        .collect::<spendcast_core::Result<Vec<_>>>()?;

    if families.is_empty() {
        Ok(config.forecast.compare_models.clone())
    } else {
        Ok(families)
    }
}

pub fn cmd_forecast(
    db: &Database,
    config: &AppConfig,
    user: &str,
    model: Option<&str>,
    days: Option<u32>,
    json: bool,
) -> Result<()> {
    let family = model.map(str::parse::<ModelFamily>).transpose()?;
    let request = config.forecast.request(family, days)?;

    let ledger = db.load_transactions(user)?;
    let unique_days = forecast::unique_expense_days(&ledger);
    if unique_days < MIN_UNIQUE_EXPENSE_DAYS {
        tracing::debug!(user = %user, unique_days, "Skipping forecast: too little history");
        println!(
            "Need at least {} days with expenses to forecast (found {}).",
            MIN_UNIQUE_EXPENSE_DAYS, unique_days
        );
        println!("  Load sample data with: spendcast demo --user {}", user);
        return Ok(());
    }

    if !json {
        println!("🔮 Training {} on {} expense days...", request.model(), unique_days);
    }
    let report = forecast::run_forecast(&ledger, &request, &config.forecast.model)?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialize forecast")?
        );
    } else {
        print_report(config, &report);
    }
    Ok(())
}

pub fn cmd_forecast_compare(
    db: &Database,
    config: &AppConfig,
    user: &str,
    models: &str,
    days: Option<u32>,
    json: bool,
) -> Result<()> {
    let families = parse_model_list(models, config)?;
    let request = config.forecast.request(None, days)?;

    let ledger = db.load_transactions(user)?;
    let comparison = forecast::compare_models(
        &ledger,
        &families,
        request.horizon_days(),
        request.advance_calendar(),
        &config.forecast.model,
    );

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&comparison).context("Failed to serialize comparison")?
        );
    } else {
        print_comparison(config, &comparison);
    }
    Ok(())
}

fn print_report(config: &AppConfig, report: &ForecastReport) {
    let money = |v: f64| config.display.money(v);

    println!();
    println!("📈 {}-day forecast ({})", report.points.len(), report.model);
    println!("   ─────────────────────────────────────────");
    println!(
        "   Accuracy: {:.1}%   MAE: {}   (trained on {} rows)",
        report.metrics.accuracy_pct(),
        money(report.metrics.mae),
        report.series_rows
    );
    if report.metrics.is_unreliable() {
        println!("   ⚠️  R² is negative; treat this forecast as a rough guess.");
    }
    println!();

    for point in &report.points {
        println!("   {} │ {:>12}", point.date, money(point.predicted_expense));
    }

    println!("   ───────────┼─────────────");
    println!("   Total      │ {:>12}", money(report.total_predicted()));
}

fn print_comparison(config: &AppConfig, comparison: &ModelComparison) {
    let money = |v: f64| config.display.money(v);

    println!();
    println!("⚖️  Model comparison ({} days)", comparison.horizon_days);
    println!("   ─────────────────────────────────────────────────────────");
    println!(
        "   {:14} │ {:>9} │ {:>12} │ {:>14}",
        "Model", "Accuracy", "MAE", "Total"
    );
    println!("   ───────────────┼───────────┼──────────────┼───────────────");

    for (family, outcome) in &comparison.results {
        match outcome {
            ComparisonOutcome::Ok { report } => println!(
                "   {:14} │ {:>8.1}% │ {:>12} │ {:>14}",
                family.as_str(),
                report.metrics.accuracy_pct(),
                money(report.metrics.mae),
                money(report.total_predicted())
            ),
            ComparisonOutcome::Failed { message } => {
                println!("   {:14} │ ❌ {}", family.as_str(), message)
            }
        }
    }

    if let Some((best, _)) = comparison.best() {
        println!();
        println!("   🏆 Best fit: {}", best);
    }
}
