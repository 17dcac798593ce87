//! Spendcast Web Server
//!
//! Axum-based REST API for the Spendcast personal finance tracker.
//!
//! Security features:
//! - HTTP Basic authentication against the users table (secure by default,
//!   use --no-auth for local dev)
//! - Restrictive CORS policy
//! - Input validation (pagination limits, horizon and demo ranges)
//! - Sanitized error responses

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use tower_http::{cors::CorsLayer, set_header::SetResponseHeaderLayer, trace::TraceLayer};
use tracing::{error, info, warn};

use spendcast_core::config::AppConfig;
use spendcast_core::db::Database;

mod handlers;

/// Maximum pagination limit
pub const MAX_PAGE_LIMIT: i64 = 1000;

/// Realm advertised in `WWW-Authenticate`
const AUTH_REALM: &str = "Basic realm=\"spendcast\"";

/// Server configuration
#[derive(Clone)]
pub struct ServerConfig {
    /// Whether authentication is required (secure by default)
    pub require_auth: bool,
    /// Allowed CORS origins (empty = same-origin only in production)
    pub allowed_origins: Vec<String>,
    /// User that every request acts as when `require_auth` is off
    pub dev_user: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            require_auth: true,
            allowed_origins: vec![],
            dev_user: "demo".to_string(),
        }
    }
}

/// Shared application state
pub struct AppState {
    pub db: Database,
    /// Forecast, tax and display settings
    pub app_config: AppConfig,
    pub config: ServerConfig,
}

/// The user a request was authenticated as
///
/// Inserted into request extensions by the auth middleware; handlers take it
/// with `Extension<AuthUser>`.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub username: String,
    /// "basic" or "none" (auth disabled)
    pub method: &'static str,
}

/// Decode `Authorization: Basic <base64(user:pass)>`
pub(crate) fn basic_credentials(headers: &HeaderMap) -> Option<(String, String)> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let encoded = value.strip_prefix("Basic ")?;
    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (user, pass) = decoded.split_once(':')?;
    Some((user.to_string(), pass.to_string()))
}

/// Authentication middleware - checks HTTP Basic credentials against the users table
///
/// Password verification runs Argon2, so it goes to the blocking pool.
async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    if !state.config.require_auth {
        request.extensions_mut().insert(AuthUser {
            username: state.config.dev_user.clone(),
            method: "none",
        });
        return next.run(request).await;
    }

    let path = request.uri().path().to_string();

    if let Some((username, password)) = basic_credentials(request.headers()) {
        let db = state.db.clone();
        let user = username.clone();
        let verified =
            tokio::task::spawn_blocking(move || db.verify_user(&user, &password)).await;

        match verified {
            Ok(Ok(true)) => {
                tracing::debug!(user = %username, path = %path, "Authenticated via HTTP Basic");
                request.extensions_mut().insert(AuthUser {
                    username,
                    method: "basic",
                });
                return next.run(request).await;
            }
            Ok(Ok(false)) => {
                warn!(user = %username, path = %path, "Rejected credentials");
            }
            Ok(Err(e)) => {
                error!(error = %e, "Failed to verify credentials");
                return AppError::internal("An internal error occurred").into_response();
            }
            Err(e) => {
                error!(error = %e, "Credential check task failed");
                return AppError::internal("An internal error occurred").into_response();
            }
        }
    } else {
        warn!(path = %path, "Unauthorized request - no credentials");
    }

    (
        StatusCode::UNAUTHORIZED,
        [(header::WWW_AUTHENTICATE, AUTH_REALM)],
        Json(serde_json::json!({
            "error": "Invalid username or password."
        })),
    )
        .into_response()
}

/// Create the application router
pub fn create_router(db: Database, app_config: AppConfig, config: ServerConfig) -> Router {
    let state = Arc::new(AppState {
        db,
        app_config,
        config: config.clone(),
    });

    let protected_routes = Router::new()
        .route("/me", get(handlers::get_me))
        .route("/dashboard", get(handlers::get_dashboard))
        .route(
            "/transactions",
            get(handlers::list_transactions)
                .post(handlers::add_transaction)
                .delete(handlers::reset_transactions),
        )
        .route("/transactions/export", get(handlers::export_transactions))
        .route(
            "/budgets",
            get(handlers::list_budgets).put(handlers::set_budget),
        )
        .route("/budgets/check", get(handlers::check_budget))
        .route("/forecast", get(handlers::get_forecast))
        .route("/forecast/compare", get(handlers::compare_forecasts))
        .route("/insights", get(handlers::get_insights))
        .route("/reports/weekly", get(handlers::weekly_report))
        .route("/reports/monthly", get(handlers::monthly_report))
        .route("/tax", get(handlers::get_tax_report))
        .route("/tax/export", get(handlers::export_tax_report))
        .route("/demo", post(handlers::add_demo_data))
        .route("/categories", get(handlers::list_categories))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Signup stays reachable without credentials
    let public_routes = Router::new().route("/users", post(handlers::signup));

    let api_routes = public_routes.merge(protected_routes);

    // CORS configuration
    let cors = if config.allowed_origins.is_empty() {
        // Restrictive default: only allow same-origin
        CorsLayer::new()
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
    } else {
        // Allow specified origins
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
    };

    Router::new()
        .nest("/api", api_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Security headers
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_XSS_PROTECTION,
            HeaderValue::from_static("1; mode=block"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::CONTENT_SECURITY_POLICY,
            HeaderValue::from_static("default-src 'none'; frame-ancestors 'none'"),
        ))
}

/// Start the server with default security settings
pub async fn serve(db: Database, app_config: AppConfig, host: &str, port: u16) -> anyhow::Result<()> {
    serve_with_config(db, app_config, host, port, ServerConfig::default()).await
}

/// Start the server with custom configuration
pub async fn serve_with_config(
    db: Database,
    app_config: AppConfig,
    host: &str,
    port: u16,
    config: ServerConfig,
) -> anyhow::Result<()> {
    if !config.require_auth {
        warn!(
            dev_user = %config.dev_user,
            "⚠️  Authentication disabled - do not expose to network!"
        );
    }

    let app = create_router(db, app_config, config);
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
pub struct AppError {
    status: StatusCode,
    message: String,
    internal: Option<anyhow::Error>,
}

impl AppError {
    pub fn bad_request(msg: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn unauthorized(msg: &str) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn internal(msg: &str) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.to_string(),
            internal: None,
        }
    }

    /// Status for a user-facing core error, `None` for internal ones
    fn status_for(err: &spendcast_core::Error) -> Option<StatusCode> {
        use spendcast_core::Error;
        match err {
            Error::InvalidInput(_) => Some(StatusCode::BAD_REQUEST),
            Error::InsufficientData(_) | Error::Fitting(_) => Some(StatusCode::UNPROCESSABLE_ENTITY),
            Error::NotFound(_) => Some(StatusCode::NOT_FOUND),
            Error::Auth(_) => Some(StatusCode::UNAUTHORIZED),
            _ => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            error!(error = %err, "Internal error");
        }

        let body = Json(serde_json::json!({
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        let err = err.into();

        // Expected failures from the core library carry their own message
        if let Some(status) = err
            .downcast_ref::<spendcast_core::Error>()
            .and_then(AppError::status_for)
        {
            return Self {
                status,
                message: err.to_string(),
                internal: None,
            };
        }

        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            // Return generic message to client
            message: "An internal error occurred".to_string(),
            // Keep full error for logging
            internal: Some(err),
        }
    }
}

#[cfg(test)]
mod tests;
