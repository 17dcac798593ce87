//! Demo data handler

use std::sync::Arc;

use axum::{extract::State, Extension, Json};
use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::{AppError, AppState, AuthUser};
use spendcast_core::demo::{
    add_demo_transactions, DEFAULT_DEMO_DAYS, DEFAULT_DEMO_SEED, DEMO_DAYS_RANGE,
};

#[derive(Debug, Default, Deserialize)]
pub struct DemoRequest {
    pub days: Option<u32>,
    pub seed: Option<u64>,
}

#[derive(Serialize)]
pub struct DemoResponse {
    pub inserted: usize,
}

/// POST /api/demo - Fill the user's ledger with generated transactions
pub async fn add_demo_data(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<DemoRequest>,
) -> Result<Json<DemoResponse>, AppError> {
    let days = body.days.unwrap_or(DEFAULT_DEMO_DAYS);
    if !DEMO_DAYS_RANGE.contains(&days) {
        return Err(AppError::bad_request(&format!(
            "Demo days must be between {} and {}.",
            DEMO_DAYS_RANGE.start(),
            DEMO_DAYS_RANGE.end()
        )));
    }
    let seed = body.seed.unwrap_or(DEFAULT_DEMO_SEED);

    let inserted = tokio::task::spawn_blocking(move || {
        add_demo_transactions(
            &state.db,
            &auth.username,
            days,
            seed,
            Local::now().date_naive(),
        )
    })
    .await??;

    Ok(Json(DemoResponse { inserted }))
}
