//! Tax report handlers

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::Response,
    Extension, Json,
};
use serde::Deserialize;

use super::csv_response;
use crate::{AppError, AppState, AuthUser};
use spendcast_core::tax::{self, TaxReport};

#[derive(Debug, Default, Deserialize)]
pub struct TaxParams {
    /// Defaults to the latest year with data
    pub year: Option<i32>,
}

fn build_report(state: &AppState, username: &str, year: Option<i32>) -> Result<TaxReport, AppError> {
    let ledger = state.db.load_transactions(username)?;
    Ok(tax::tax_report(&ledger, year, &state.app_config.tax)?)
}

/// GET /api/tax - Year-end tax summary
pub async fn get_tax_report(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Query(params): Query<TaxParams>,
) -> Result<Json<TaxReport>, AppError> {
    Ok(Json(build_report(&state, &auth.username, params.year)?))
}

/// GET /api/tax/export - Tax category breakdown as CSV
pub async fn export_tax_report(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Query(params): Query<TaxParams>,
) -> Result<Response, AppError> {
    let report = build_report(&state, &auth.username, params.year)?;
    let filename = format!("tax_report_{}.csv", report.year);
    Ok(csv_response(&filename, report.to_csv()?))
}
