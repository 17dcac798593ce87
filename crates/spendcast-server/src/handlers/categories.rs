//! Category suggestions

use std::sync::Arc;

use axum::{extract::State, Extension, Json};
use serde::Serialize;

use crate::{AppError, AppState, AuthUser};
use spendcast_core::models::{EXPENSE_CATEGORIES, INCOME_CATEGORIES};

#[derive(Serialize)]
pub struct CategoriesResponse {
    pub expense: &'static [&'static str],
    pub income: &'static [&'static str],
    /// Categories this user has already used
    pub used: Vec<String>,
}

/// GET /api/categories - Suggested and previously used categories
pub async fn list_categories(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<CategoriesResponse>, AppError> {
    Ok(Json(CategoriesResponse {
        expense: EXPENSE_CATEGORIES,
        income: INCOME_CATEGORIES,
        used: state.db.list_categories(&auth.username)?,
    }))
}
