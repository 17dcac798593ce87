//! Period report handlers

use std::sync::Arc;

use axum::{extract::State, Extension, Json};

use crate::{AppError, AppState, AuthUser};
use spendcast_core::models::PeriodTotals;

/// GET /api/reports/weekly - Income and expense per Sunday-start week
pub async fn weekly_report(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Vec<PeriodTotals>>, AppError> {
    Ok(Json(state.db.weekly_report(&auth.username)?))
}

/// GET /api/reports/monthly - Income and expense per month
pub async fn monthly_report(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Vec<PeriodTotals>>, AppError> {
    Ok(Json(state.db.monthly_report(&auth.username)?))
}
