//! Forecast handlers
//!
//! Training is CPU-bound, so both handlers move the ledger load, fit and
//! forecast onto the blocking pool.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::Deserialize;

use crate::{AppError, AppState, AuthUser};
use spendcast_core::forecast::{self, ForecastReport, ModelComparison, ModelFamily};

#[derive(Debug, Default, Deserialize)]
pub struct ForecastParams {
    /// RandomForest, SVM or XGBoost (defaults to config)
    pub model: Option<String>,
    /// 1-90 days (defaults to config)
    pub days: Option<u32>,
}

/// GET /api/forecast - Train one model and forecast daily expenses
pub async fn get_forecast(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Query(params): Query<ForecastParams>,
) -> Result<Json<ForecastReport>, AppError> {
    let family = params
        .model
        .as_deref()
        .filter(|m| !m.trim().is_empty())
        .map(str::parse::<ModelFamily>)
        .transpose()?;
    let request = state.app_config.forecast.request(family, params.days)?;

    let report = tokio::task::spawn_blocking(move || {
        let ledger = state.db.load_transactions(&auth.username)?;
        forecast::run_forecast(&ledger, &request, &state.app_config.forecast.model)
    })
    .await??;

    Ok(Json(report))
}

#[derive(Debug, Default, Deserialize)]
pub struct CompareParams {
    /// Comma-separated model families (defaults to config)
    pub models: Option<String>,
    pub days: Option<u32>,
}

/// GET /api/forecast/compare - Run several model families side by side
pub async fn compare_forecasts(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Query(params): Query<CompareParams>,
) -> Result<Json<ModelComparison>, AppError> {
    let mut families = params
        .models
        .as_deref()
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::parse::<ModelFamily>)
        .collect::<spendcast_core::Result<Vec<_>>>()?;
    if families.is_empty() {
        families = state.app_config.forecast.compare_models.clone();
    }
    let request = state.app_config.forecast.request(None, params.days)?;

    let comparison = tokio::task::spawn_blocking(move || {
        let ledger = state.db.load_transactions(&auth.username)?;
        Ok::<_, spendcast_core::Error>(forecast::compare_models(
            &ledger,
            &families,
            request.horizon_days(),
            request.advance_calendar(),
            &state.app_config.forecast.model,
        ))
    })
    .await??;

    Ok(Json(comparison))
}
