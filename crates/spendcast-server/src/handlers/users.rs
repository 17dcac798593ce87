//! Signup and current-user handlers

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::{Deserialize, Serialize};

use crate::{AppError, AppState, AuthUser};

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub password: String,
}

/// Response for the /api/me endpoint
#[derive(Serialize)]
pub struct MeResponse {
    pub user: String,
    /// How the user was authenticated
    pub auth_method: String,
}

/// POST /api/users - Create an account (no credentials needed)
pub async fn signup(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SignupRequest>,
) -> Result<(StatusCode, Json<MeResponse>), AppError> {
    let db = state.db.clone();
    let username = body.username.trim().to_string();
    let user = username.clone();
    tokio::task::spawn_blocking(move || db.create_user(&user, &body.password)).await??;

    Ok((
        StatusCode::CREATED,
        Json(MeResponse {
            user: username,
            auth_method: "basic".to_string(),
        }),
    ))
}

/// GET /api/me - The currently authenticated user
pub async fn get_me(Extension(auth): Extension<AuthUser>) -> Json<MeResponse> {
    Json(MeResponse {
        user: auth.username,
        auth_method: auth.method.to_string(),
    })
}
