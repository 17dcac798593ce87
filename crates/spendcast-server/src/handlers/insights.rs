//! Insights handler

use std::sync::Arc;

use axum::{extract::State, Extension, Json};

use crate::{AppError, AppState, AuthUser};
use spendcast_core::insights::{self, InsightReport};

/// GET /api/insights - Trends, savings, anomalies and recommendations
pub async fn get_insights(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<InsightReport>, AppError> {
    let ledger = state.db.load_transactions(&auth.username)?;
    Ok(Json(insights::analyze(&ledger)))
}
