//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for a specific API area.

pub mod budgets;
pub mod categories;
pub mod dashboard;
pub mod demo;
pub mod forecast;
pub mod insights;
pub mod reports;
pub mod tax;
pub mod transactions;
pub mod users;

// Re-export all handlers for use in router
pub use budgets::*;
pub use categories::*;
pub use dashboard::*;
pub use demo::*;
pub use forecast::*;
pub use insights::*;
pub use reports::*;
pub use tax::*;
pub use transactions::*;
pub use users::*;

use axum::http::header;
use axum::response::{IntoResponse, Response};
use chrono::NaiveDate;

use crate::AppError;

/// Parse an optional YYYY-MM-DD query parameter
pub(crate) fn parse_date_param(value: Option<&str>, name: &str) -> Result<Option<NaiveDate>, AppError> {
    value
        .filter(|v| !v.trim().is_empty())
        .map(|v| {
            NaiveDate::parse_from_str(v.trim(), "%Y-%m-%d").map_err(|_| {
                AppError::bad_request(&format!("Invalid {} date (use YYYY-MM-DD)", name))
            })
        })
        .transpose()
}

/// A CSV attachment response
pub(crate) fn csv_response(filename: &str, body: String) -> Response {
    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        body,
    )
        .into_response()
}
