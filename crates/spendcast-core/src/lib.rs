//! Spendcast Core Library
//!
//! Shared functionality for the Spendcast personal finance tracker:
//! - Encrypted SQLite storage for users, transactions and budgets
//! - Dashboard, weekly and monthly reports
//! - Daily expense forecasting (feature builder, in-crate regressors, recursive forecaster)
//! - Rule-based insights: trends, savings, anomalies, recommendations
//! - Year-end tax summary and CSV exports
//! - Demo data and TOML configuration

pub mod config;
pub mod db;
pub mod demo;
pub mod error;
pub mod export;
pub mod forecast;
pub mod insights;
pub mod models;
pub mod tax;

pub use config::{load_config, AppConfig, DisplayConfig, ForecastConfig, TaxConfig};
pub use db::Database;
pub use error::{Error, Result};
pub use forecast::{
    compare_models, run_forecast, ComparisonOutcome, ForecastPoint, ForecastReport,
    ForecastRequest, ModelComparison, ModelFamily, ModelSettings,
};
pub use insights::{analyze, InsightReport};
pub use tax::{tax_report, TaxReport};
