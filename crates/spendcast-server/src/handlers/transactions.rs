//! Transaction handlers

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::Response,
    Extension, Json,
};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{csv_response, parse_date_param};
use crate::{AppError, AppState, AuthUser, MAX_PAGE_LIMIT};
use spendcast_core::models::{
    NewTransaction, Transaction, TransactionQuery, TransactionType,
};

/// Query parameters for listing and exporting transactions
#[derive(Debug, Default, Deserialize)]
pub struct TransactionParams {
    #[serde(rename = "type")]
    pub transaction_type: Option<TransactionType>,
    pub category: Option<String>,
    /// Start date (YYYY-MM-DD)
    pub from: Option<String>,
    /// End date (YYYY-MM-DD)
    pub to: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl TransactionParams {
    fn into_query(self, limit: Option<i64>, offset: Option<i64>) -> Result<TransactionQuery, AppError> {
        Ok(TransactionQuery {
            transaction_type: self.transaction_type,
            category: self.category.filter(|c| !c.trim().is_empty()),
            from: parse_date_param(self.from.as_deref(), "from")?,
            to: parse_date_param(self.to.as_deref(), "to")?,
            limit,
            offset,
        })
    }
}

fn default_limit() -> i64 {
    50
}

#[derive(Serialize)]
pub struct TransactionResponse {
    pub transactions: Vec<Transaction>,
    pub limit: i64,
    pub offset: i64,
}

/// GET /api/transactions - List transactions, newest first
pub async fn list_transactions(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Query(params): Query<TransactionParams>,
) -> Result<Json<TransactionResponse>, AppError> {
    // Input validation: clamp pagination parameters
    let limit = params.limit.unwrap_or_else(default_limit).clamp(1, MAX_PAGE_LIMIT);
    let offset = params.offset.unwrap_or(0).max(0);

    let query = params.into_query(Some(limit), Some(offset))?;
    let transactions = state.db.list_transactions(&auth.username, &query)?;

    Ok(Json(TransactionResponse {
        transactions,
        limit,
        offset,
    }))
}

#[derive(Debug, Deserialize)]
pub struct AddTransactionRequest {
    /// Defaults to today
    pub date: Option<NaiveDate>,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub category: String,
    pub amount: f64,
    pub description: Option<String>,
}

#[derive(Serialize)]
pub struct AddTransactionResponse {
    pub id: i64,
    /// Set when this expense pushed its category over budget
    pub budget_warning: Option<String>,
}

/// POST /api/transactions - Record an income or expense
///
/// The budget check runs before the insert so the warning describes the
/// spend that was already there. Clients wanting to ask first use
/// `GET /api/budgets/check`.
pub async fn add_transaction(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<AddTransactionRequest>,
) -> Result<Json<AddTransactionResponse>, AppError> {
    let mut tx = NewTransaction::new(
        auth.username.as_str(),
        body.date.unwrap_or_else(|| Local::now().date_naive()),
        body.transaction_type,
        body.category,
        body.amount,
    );
    tx.description = body.description;
    tx.validate()?;

    let warning = match tx.transaction_type {
        TransactionType::Expense => {
            state
                .db
                .check_budget(&auth.username, tx.category.trim(), tx.amount)?
        }
        TransactionType::Income => None,
    };

    let id = state.db.save_transaction(&tx)?;

    Ok(Json(AddTransactionResponse {
        id,
        budget_warning: warning.map(|w| w.message()),
    }))
}

#[derive(Debug, Deserialize)]
pub struct ResetRequest {
    pub password: String,
}

#[derive(Serialize)]
pub struct ResetResponse {
    pub deleted: usize,
}

/// DELETE /api/transactions - Delete all of the user's transactions
///
/// Requires the account password in the body, even when already authenticated.
pub async fn reset_transactions(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<ResetRequest>,
) -> Result<Json<ResetResponse>, AppError> {
    let db = state.db.clone();
    let user = auth.username.clone();
    let verified =
        tokio::task::spawn_blocking(move || db.verify_user(&user, &body.password)).await??;
    if !verified {
        warn!(user = %auth.username, "Reset rejected: wrong password");
        return Err(AppError::unauthorized(
            "Incorrect password. Transactions were not deleted.",
        ));
    }

    let deleted = state.db.delete_all_transactions(&auth.username)?;
    Ok(Json(ResetResponse { deleted }))
}

/// GET /api/transactions/export - CSV of the filtered history, oldest first
pub async fn export_transactions(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Query(params): Query<TransactionParams>,
) -> Result<Response, AppError> {
    let query = params.into_query(None, None)?;
    let csv = state.db.export_transactions_csv(&auth.username, &query)?;
    Ok(csv_response("transactions.csv", csv))
}
