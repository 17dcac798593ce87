//! Spendcast CLI - Personal finance tracker with expense forecasting
//!
//! Usage:
//!   spendcast init                              Initialize database
//!   spendcast user add -u alice -p secret123    Create a user
//!   spendcast demo --user alice                 Load demo transactions
//!   spendcast forecast --user alice --days 30   Forecast daily expenses
//!   spendcast serve --port 3000                 Start web server

mod cli;
mod commands;


use anyhow::{Context, Result};
use clap::Parser;
use spendcast_core::config::load_config;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let config = load_config(cli.config.as_deref()).context("Failed to load config")?;
    tracing::debug!(
        db = %cli.db.display(),
        model = %config.forecast.default_model,
        horizon = config.forecast.default_horizon,
        "Config loaded"
    );

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db, cli.no_encrypt),
        Commands::User { action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            match action {
                UserAction::Add { username, password } => {
                    commands::cmd_user_add(&db, &username, &password)
                }
                UserAction::Verify { username, password } => {
                    commands::cmd_user_verify(&db, &username, &password)
                }
                UserAction::List => commands::cmd_user_list(&db),
            }
        }
        Commands::Add {
            user,
            kind,
            category,
            amount,
            date,
            description,
            force,
        } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            let tx = commands::build_transaction(
                &user,
                &kind,
                &category,
                amount,
                date.as_deref(),
                description,
            )?;
            commands::cmd_add(&db, &config, &tx, force)
        }
        Commands::History {
            user,
            kind,
            category,
            from,
            to,
            limit,
        } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            let query = commands::build_query(
                kind.as_deref(),
                category,
                from.as_deref(),
                to.as_deref(),
                Some(limit),
            )?;
            commands::cmd_history(&db, &config, &user, &query)
        }
        Commands::Budget { action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            match action {
                BudgetAction::Set {
                    user,
                    category,
                    amount,
                } => commands::cmd_budget_set(&db, &config, &user, &category, amount),
                BudgetAction::List { user } => commands::cmd_budget_list(&db, &config, &user),
            }
        }
        Commands::Dashboard { user } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_dashboard(&db, &config, &user)
        }
        Commands::Forecast {
            user,
            model,
            days,
            compare,
            json,
        } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            match compare {
                Some(models) => {
                    commands::cmd_forecast_compare(&db, &config, &user, &models, days, json)
                }
                None => commands::cmd_forecast(&db, &config, &user, model.as_deref(), days, json),
            }
        }
        Commands::Insights { user, json } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_insights(&db, &config, &user, json)
        }
        Commands::Report { user, period } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_report(&db, &config, &user, period)
        }
        Commands::Tax { user, year, output } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_tax(&db, &config, &user, year, output.as_deref())
        }
        Commands::Export {
            user,
            output,
            kind,
            from,
            to,
        } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            let query =
                commands::build_query(kind.as_deref(), None, from.as_deref(), to.as_deref(), None)?;
            commands::cmd_export(&db, &user, &query, output.as_deref())
        }
        Commands::Demo { user, days, seed } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_demo(&db, &user, days, seed)
        }
        Commands::Reset { user, password } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_reset(&db, &user, &password)
        }
        Commands::Serve {
            port,
            host,
            no_auth,
            dev_user,
        } => {
            commands::cmd_serve(
                &cli.db,
                config,
                &host,
                port,
                no_auth,
                &dev_user,
                cli.no_encrypt,
            )
            .await
        }
    }
}
