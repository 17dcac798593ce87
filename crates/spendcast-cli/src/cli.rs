//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Spendcast - Track spending and forecast what comes next
#[derive(Parser)]
#[command(name = "spendcast")]
#[command(about = "Personal finance tracker with expense forecasting", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "spendcast.db", global = true)]
    pub db: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable database encryption (not recommended for production)
    ///
    /// By default, the database is encrypted using SQLCipher.
    /// Set SPENDCAST_DB_KEY environment variable with your passphrase.
    /// Use --no-encrypt only for development or testing.
    #[arg(long, global = true)]
    pub no_encrypt: bool,

    /// Config file (defaults to the data-dir override, then built-in defaults)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Manage users (add, verify, list)
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Record an income or expense
    Add {
        /// Username
        #[arg(short, long)]
        user: String,

        /// income or expense
        #[arg(short = 't', long = "type")]
        kind: String,

        /// Category (free text, e.g. Groceries)
        #[arg(short, long)]
        category: String,

        /// Amount (must be positive)
        #[arg(short, long)]
        amount: f64,

        /// Date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,

        /// Optional description
        #[arg(short, long)]
        description: Option<String>,

        /// Record the expense even if it exceeds the category budget
        #[arg(long)]
        force: bool,
    },

    /// Show transaction history
    History {
        #[arg(short, long)]
        user: String,

        /// Filter by type: income or expense
        #[arg(short = 't', long = "type")]
        kind: Option<String>,

        /// Filter by category
        #[arg(short, long)]
        category: Option<String>,

        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// End date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,

        /// Maximum number of rows
        #[arg(short, long, default_value = "20")]
        limit: i64,
    },

    /// Manage category budgets (set, list)
    Budget {
        #[command(subcommand)]
        action: BudgetAction,
    },

    /// Show dashboard summary
    Dashboard {
        #[arg(short, long)]
        user: String,
    },

    /// Forecast daily expenses
    Forecast {
        #[arg(short, long)]
        user: String,

        /// Model family: RandomForest, SVM or XGBoost (defaults to config)
        #[arg(short, long)]
        model: Option<String>,

        /// Days to forecast, 1-90 (defaults to config)
        #[arg(short, long)]
        days: Option<u32>,

        /// Compare model families side by side (comma-separated, e.g. "RandomForest,SVM")
        ///
        /// Pass the flag with no value to compare the families from config.
        #[arg(long, num_args = 0..=1, default_missing_value = "")]
        compare: Option<String>,

        /// Output JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show spending insights
    Insights {
        #[arg(short, long)]
        user: String,

        /// Output JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Show weekly or monthly income/expense reports
    Report {
        #[arg(short, long)]
        user: String,

        /// Report period
        #[arg(value_enum, default_value = "monthly")]
        period: ReportPeriod,
    },

    /// Show the year-end tax summary
    Tax {
        #[arg(short, long)]
        user: String,

        /// Tax year (defaults to the latest year with data)
        #[arg(short, long)]
        year: Option<i32>,

        /// Also write the category breakdown as CSV
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Export transactions as CSV
    Export {
        #[arg(short, long)]
        user: String,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Filter by type: income or expense
        #[arg(short = 't', long = "type")]
        kind: Option<String>,

        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// End date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
    },

    /// Add demo transactions for a user
    Demo {
        #[arg(short, long)]
        user: String,

        /// Number of days of history to generate (20-180)
        #[arg(short, long, default_value = "90", value_parser = clap::value_parser!(u32).range(20..=180))]
        days: u32,

        /// Random seed
        #[arg(long, default_value = "42")]
        seed: u64,
    },

    /// Delete all of a user's transactions (requires the password)
    Reset {
        #[arg(short, long)]
        user: String,

        /// Account password, to confirm
        #[arg(short, long)]
        password: String,
    },

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, env = "SPENDCAST_PORT", default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, env = "SPENDCAST_HOST", default_value = "127.0.0.1")]
        host: String,

        /// Disable authentication (for local development only)
        ///
        /// WARNING: Do not use this flag when exposing the server to a network.
        /// Requests run as --dev-user instead of checking HTTP Basic credentials.
        #[arg(long)]
        no_auth: bool,

        /// User that unauthenticated requests act as with --no-auth
        #[arg(long, default_value = "demo")]
        dev_user: String,
    },
}

#[derive(Subcommand)]
pub enum UserAction {
    /// Create a user
    Add {
        #[arg(short, long)]
        username: String,

        #[arg(short, long)]
        password: String,
    },

    /// Check a username/password pair
    Verify {
        #[arg(short, long)]
        username: String,

        #[arg(short, long)]
        password: String,
    },

    /// List users
    List,
}

#[derive(Subcommand)]
pub enum BudgetAction {
    /// Set (or replace) the budget for a category
    Set {
        #[arg(short, long)]
        user: String,

        #[arg(short, long)]
        category: String,

        #[arg(short, long)]
        amount: f64,
    },

    /// List budgets with spending to date
    List {
        #[arg(short, long)]
        user: String,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportPeriod {
    Weekly,
    Monthly,
}
