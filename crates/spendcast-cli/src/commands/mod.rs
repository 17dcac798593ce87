//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Init and shared utilities (open_db, argument parsing, prompts)
//! - `users` - User management commands (add, verify, list)
//! - `transactions` - Add, history and reset
//! - `budgets` - Budget commands (set, list)
//! - `reports` - Dashboard and weekly/monthly reports
//! - `forecast` - Expense forecasting and model comparison
//! - `insights` - Spending insights
//! - `tax` - Year-end tax summary
//! - `export` - CSV export
//! - `demo` - Demo data
//! - `serve` - Web server command

pub mod budgets;
pub mod core;
pub mod demo;
pub mod export;
pub mod forecast;
pub mod insights;
pub mod reports;
pub mod serve;
pub mod tax;
pub mod transactions;
pub mod users;

// Re-export command functions for main.rs
pub use budgets::*;
pub use core::*;
pub use demo::*;
pub use export::*;
pub use forecast::*;
pub use insights::*;
pub use reports::*;
pub use serve::*;
pub use tax::*;
pub use transactions::*;
pub use users::*;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
