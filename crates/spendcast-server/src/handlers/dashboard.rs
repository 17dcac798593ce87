//! Dashboard handler

use std::sync::Arc;

use axum::{extract::State, Extension, Json};
use spendcast_core::models::DashboardStats;

use crate::{AppError, AppState, AuthUser};

/// GET /api/dashboard - Totals, category breakdown, daily flow and budget alerts
pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<DashboardStats>, AppError> {
    Ok(Json(state.db.dashboard_stats(&auth.username)?))
}
