//! Server API tests

use super::*;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use base64::Engine;
use chrono::NaiveDate;
use http_body_util::BodyExt;
use spendcast_core::demo::add_demo_transactions;
use spendcast_core::models::{
    NewTransaction, TransactionType, EXPENSE_CATEGORIES, INCOME_CATEGORIES,
};
use tower::ServiceExt;

const DEV_USER: &str = "demo";

fn test_db() -> Database {
    let db = Database::in_memory().unwrap();
    db.create_user(DEV_USER, "demo-password").unwrap();
    db
}

fn app_with(db: Database, require_auth: bool) -> Router {
    let config = ServerConfig {
        require_auth,
        allowed_origins: vec![],
        dev_user: DEV_USER.to_string(),
    };
    create_router(db, AppConfig::default(), config)
}

fn setup_test_app() -> Router {
    app_with(test_db(), false)
}

/// App whose dev user has 60 days of seeded demo history ending 2024-06-30
fn setup_demo_app() -> Router {
    let db = test_db();
    let today = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();
    add_demo_transactions(&db, DEV_USER, 60, 42, today).unwrap();
    app_with(db, false)
}

async fn get_body_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body();
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn get_body_text(response: axum::response::Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

fn basic_auth(username: &str, password: &str) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(format!("{}:{}", username, password));
    format!("Basic {}", encoded)
}

// ========== Auth Tests ==========

#[tokio::test]
async fn test_auth_required() {
    let app = app_with(test_db(), true);

    let response = app.oneshot(get("/api/me")).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().contains_key("www-authenticate"));
}

#[tokio::test]
async fn test_auth_with_basic_header() {
    let app = app_with(test_db(), true);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/me")
                .header("authorization", basic_auth(DEV_USER, "demo-password"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["user"], DEV_USER);
    assert_eq!(json["auth_method"], "basic");
}

#[tokio::test]
async fn test_auth_wrong_password() {
    let app = app_with(test_db(), true);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/dashboard")
                .header("authorization", basic_auth(DEV_USER, "not-the-password"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = get_body_json(response).await;
    assert_eq!(json["error"], "Invalid username or password.");
}

#[test]
fn test_basic_credentials_parsing() {
    let mut headers = HeaderMap::new();
    assert!(basic_credentials(&headers).is_none());

    headers.insert("authorization", basic_auth("alice", "pa:ss").parse().unwrap());
    assert_eq!(
        basic_credentials(&headers),
        Some(("alice".to_string(), "pa:ss".to_string()))
    );

    headers.insert("authorization", "Bearer abc".parse().unwrap());
    assert!(basic_credentials(&headers).is_none());

    headers.insert("authorization", "Basic !!!not-base64".parse().unwrap());
    assert!(basic_credentials(&headers).is_none());
}

#[tokio::test]
async fn test_auth_disabled_uses_dev_user() {
    let app = setup_test_app();

    let response = app.oneshot(get("/api/me")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["user"], DEV_USER);
    assert_eq!(json["auth_method"], "none");
}

#[tokio::test]
async fn test_security_headers() {
    let app = setup_test_app();

    let response = app.oneshot(get("/api/me")).await.unwrap();

    let headers = response.headers();
    assert_eq!(headers["x-content-type-options"], "nosniff");
    assert_eq!(headers["x-frame-options"], "DENY");
}

// ========== User API Tests ==========

#[tokio::test]
async fn test_signup_is_public() {
    let app = app_with(test_db(), true);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/users",
            serde_json::json!({ "username": "alice", "password": "secret123" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    // The new account can authenticate right away
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/me")
                .header("authorization", basic_auth("alice", "secret123"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_signup_rejects_short_password() {
    let app = setup_test_app();

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/users",
            serde_json::json!({ "username": "alice", "password": "abc" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_signup_duplicate_username() {
    let app = setup_test_app();

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/users",
            serde_json::json!({ "username": DEV_USER, "password": "another-pass" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = get_body_json(response).await;
    assert_eq!(json["error"], "Username already exists.");
}

// ========== Transaction API Tests ==========

#[tokio::test]
async fn test_add_and_list_transactions() {
    let app = setup_test_app();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/transactions",
            serde_json::json!({
                "date": "2024-06-01",
                "type": "expense",
                "category": "Food",
                "amount": 120.5,
                "description": "Lunch"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert!(json["id"].as_i64().unwrap() > 0);
    assert!(json["budget_warning"].is_null());

    let response = app.oneshot(get("/api/transactions")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    let txs = json["transactions"].as_array().unwrap();
    assert_eq!(txs.len(), 1);
    assert_eq!(txs[0]["category"], "Food");
    assert_eq!(txs[0]["type"], "expense");
    assert_eq!(json["limit"], 50);
}

#[tokio::test]
async fn test_add_transaction_rejects_zero_amount() {
    let app = setup_test_app();

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/transactions",
            serde_json::json!({ "type": "expense", "category": "Food", "amount": 0.0 }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = get_body_json(response).await;
    assert_eq!(json["error"], "All fields required and amount > 0.");
}

#[tokio::test]
async fn test_list_transactions_filters_and_clamps() {
    let db = test_db();
    for (day, kind, category) in [
        (1, TransactionType::Income, "Salary"),
        (2, TransactionType::Expense, "Rent"),
        (3, TransactionType::Expense, "Food"),
    ] {
        db.save_transaction(&NewTransaction::new(
            DEV_USER,
            NaiveDate::from_ymd_opt(2024, 6, day).unwrap(),
            kind,
            category,
            100.0,
        ))
        .unwrap();
    }
    let app = app_with(db, false);

    let response = app
        .clone()
        .oneshot(get("/api/transactions?type=expense&from=2024-06-03&limit=99999"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["limit"], MAX_PAGE_LIMIT);
    let txs = json["transactions"].as_array().unwrap();
    assert_eq!(txs.len(), 1);
    assert_eq!(txs[0]["category"], "Food");

    let response = app
        .oneshot(get("/api/transactions?from=June"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_add_transaction_reports_budget_warning() {
    let app = setup_test_app();

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/api/budgets",
            serde_json::json!({ "category": "Food", "amount": 500.0 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    for (amount, expect_warning) in [(450.0, false), (60.0, true)] {
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/transactions",
                serde_json::json!({ "type": "expense", "category": "Food", "amount": amount }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = get_body_json(response).await;
        assert_eq!(json["budget_warning"].is_string(), expect_warning);
    }

    // Over-budget expenses are still recorded
    let response = app.oneshot(get("/api/transactions")).await.unwrap();
    let json = get_body_json(response).await;
    assert_eq!(json["transactions"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_reset_requires_password() {
    let app = setup_demo_app();

    let response = app
        .clone()
        .oneshot(json_request(
            "DELETE",
            "/api/transactions",
            serde_json::json!({ "password": "wrong" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(json_request(
            "DELETE",
            "/api/transactions",
            serde_json::json!({ "password": "demo-password" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert!(json["deleted"].as_u64().unwrap() > 0);

    let response = app.oneshot(get("/api/transactions")).await.unwrap();
    let json = get_body_json(response).await;
    assert!(json["transactions"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_export_transactions_csv() {
    let app = setup_demo_app();

    let response = app
        .oneshot(get("/api/transactions/export?type=income"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()["content-type"].to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/csv"));
    let body = get_body_text(response).await;
    let mut lines = body.lines();
    assert!(lines.next().unwrap().contains("category"));
    assert!(lines.all(|l| l.contains("income")));
}

// ========== Budget API Tests ==========

#[tokio::test]
async fn test_budgets_list_and_check() {
    let app = setup_test_app();

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/api/budgets",
            serde_json::json!({ "category": "Shopping", "amount": 1000.0 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.clone().oneshot(get("/api/budgets")).await.unwrap();
    let json = get_body_json(response).await;
    let budgets = json.as_array().unwrap();
    assert_eq!(budgets.len(), 1);
    assert_eq!(budgets[0]["category"], "Shopping");
    assert_eq!(budgets[0]["spent"], 0.0);

    let response = app
        .clone()
        .oneshot(get("/api/budgets/check?category=Shopping&amount=400"))
        .await
        .unwrap();
    let json = get_body_json(response).await;
    assert!(json["warning"].is_null());

    let response = app
        .clone()
        .oneshot(get("/api/budgets/check?category=Shopping&amount=1200"))
        .await
        .unwrap();
    let json = get_body_json(response).await;
    assert_eq!(json["warning"]["budget"], 1000.0);
    assert!(json["message"].as_str().unwrap().contains("Shopping"));

    let response = app
        .oneshot(get("/api/budgets/check?category=Shopping&amount=-5"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_set_budget_rejects_negative_amount() {
    let app = setup_test_app();

    let response = app
        .oneshot(json_request(
            "PUT",
            "/api/budgets",
            serde_json::json!({ "category": "Food", "amount": -1.0 }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ========== Dashboard and Report Tests ==========

#[tokio::test]
async fn test_get_dashboard() {
    let app = setup_demo_app();

    let response = app.oneshot(get("/api/dashboard")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert!(json["total_expense"].as_f64().unwrap() > 0.0);
    assert!(json["total_income"].as_f64().unwrap() > 0.0);
    assert!(!json["expense_by_category"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_dashboard_empty_ledger() {
    let app = setup_test_app();

    let response = app.oneshot(get("/api/dashboard")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["transaction_count"], 0);
}

#[tokio::test]
async fn test_reports_weekly_and_monthly() {
    let app = setup_demo_app();

    let response = app
        .clone()
        .oneshot(get("/api/reports/monthly"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    // 60 days ending June 30 covers May and June
    assert_eq!(json.as_array().unwrap().len(), 2);

    let response = app.oneshot(get("/api/reports/weekly")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert!(json.as_array().unwrap().len() >= 8);
}

#[tokio::test]
async fn test_list_categories() {
    let app = setup_demo_app();

    let response = app.oneshot(get("/api/categories")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    let expense = json["expense"].as_array().unwrap();
    assert_eq!(expense.len(), EXPENSE_CATEGORIES.len());
    assert!(expense.contains(&serde_json::json!("Groceries")));
    assert_eq!(json["income"].as_array().unwrap().len(), INCOME_CATEGORIES.len());
    assert!(json["used"].as_array().unwrap().contains(&serde_json::json!("Salary")));
}

// ========== Forecast API Tests ==========

#[tokio::test]
async fn test_forecast_on_demo_data() {
    let app = setup_demo_app();

    let response = app
        .oneshot(get("/api/forecast?model=RandomForest&days=7"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["model"], "RandomForest");
    let points = json["points"].as_array().unwrap();
    assert_eq!(points.len(), 7);
    assert_eq!(points[0]["date"], "2024-07-01");
    assert!(json["metrics"]["r2"].is_number());
}

#[tokio::test]
async fn test_forecast_insufficient_data() {
    let app = setup_test_app();

    let response = app.oneshot(get("/api/forecast")).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_forecast_invalid_model() {
    let app = setup_demo_app();

    let response = app
        .oneshot(get("/api/forecast?model=LinearRegression"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = get_body_json(response).await;
    assert_eq!(json["error"], "Invalid model type specified.");
}

#[tokio::test]
async fn test_forecast_horizon_out_of_range() {
    let app = setup_demo_app();

    let response = app
        .clone()
        .oneshot(get("/api/forecast?days=91"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app.oneshot(get("/api/forecast?days=0")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_compare_forecasts() {
    let app = setup_demo_app();

    let response = app
        .oneshot(get("/api/forecast/compare?models=RandomForest,SVM&days=5"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["horizon_days"], 5);
    let results = json["results"].as_array().unwrap();
    assert_eq!(results.len(), 2);
    for entry in results {
        assert_eq!(entry[1]["status"], "ok");
    }
}

#[tokio::test]
async fn test_compare_forecasts_reports_failures_per_model() {
    let app = setup_test_app();

    let response = app
        .oneshot(get("/api/forecast/compare?models=XGBoost"))
        .await
        .unwrap();

    // An empty ledger fails each model without failing the request
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["results"][0][1]["status"], "failed");
}

// ========== Insights and Tax Tests ==========

#[tokio::test]
async fn test_get_insights() {
    let app = setup_demo_app();

    let response = app.oneshot(get("/api/insights")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert!(json["total_expense"].as_f64().unwrap() > 0.0);
    assert!(json.get("recommendations").is_some());
}

#[tokio::test]
async fn test_tax_report() {
    let app = setup_demo_app();

    let response = app.clone().oneshot(get("/api/tax")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["year"], 2024);
    assert!(!json["categories"].as_array().unwrap().is_empty());

    let response = app.oneshot(get("/api/tax/export?year=2024")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let disposition = response.headers()["content-disposition"]
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.contains("tax_report_2024.csv"));
    let body = get_body_text(response).await;
    assert!(body.starts_with("type,category,amount,deductible"));
}

#[tokio::test]
async fn test_tax_report_without_data() {
    let app = setup_test_app();

    let response = app.oneshot(get("/api/tax")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ========== Demo API Tests ==========

#[tokio::test]
async fn test_add_demo_data() {
    let app = setup_test_app();

    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/demo", serde_json::json!({ "days": 30 })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    // At least one daily expense per day
    assert!(json["inserted"].as_u64().unwrap() >= 30);

    let response = app
        .oneshot(json_request("POST", "/api/demo", serde_json::json!({ "days": 5 })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_route() {
    let app = setup_test_app();

    let response = app.oneshot(get("/api/nope")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
