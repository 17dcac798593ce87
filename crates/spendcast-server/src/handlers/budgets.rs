//! Budget handlers

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use crate::{AppError, AppState, AuthUser};
use spendcast_core::models::{BudgetStatus, BudgetWarning, NewBudget};

/// GET /api/budgets - Budgets with spending to date
pub async fn list_budgets(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Vec<BudgetStatus>>, AppError> {
    Ok(Json(state.db.all_budget_statuses(&auth.username)?))
}

#[derive(Debug, Deserialize)]
pub struct SetBudgetRequest {
    pub category: String,
    pub amount: f64,
}

#[derive(Serialize)]
pub struct SetBudgetResponse {
    pub id: i64,
}

/// PUT /api/budgets - Set or replace a category budget
pub async fn set_budget(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<SetBudgetRequest>,
) -> Result<Json<SetBudgetResponse>, AppError> {
    let id = state
        .db
        .save_budget(&NewBudget::new(auth.username, body.category, body.amount))?;
    Ok(Json(SetBudgetResponse { id }))
}

#[derive(Debug, Deserialize)]
pub struct CheckBudgetParams {
    pub category: String,
    pub amount: f64,
}

#[derive(Serialize)]
pub struct CheckBudgetResponse {
    pub warning: Option<BudgetWarning>,
    pub message: Option<String>,
}

/// GET /api/budgets/check - Would this expense exceed the category budget?
pub async fn check_budget(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Query(params): Query<CheckBudgetParams>,
) -> Result<Json<CheckBudgetResponse>, AppError> {
    if !params.amount.is_finite() || params.amount <= 0.0 {
        return Err(AppError::bad_request("Amount must be greater than 0."));
    }

    let warning = state
        .db
        .check_budget(&auth.username, params.category.trim(), params.amount)?;
    let message = warning.as_ref().map(|w| w.message());
    Ok(Json(CheckBudgetResponse { warning, message }))
}
