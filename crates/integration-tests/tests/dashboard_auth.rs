//! Integration tests for the dashboard session lifecycle.
//!
//! These tests require:
//! - A running `PostgreSQL` database (task db:start)
//! - The dashboard server running (cargo run -p buzzvar-dashboard)
//! - A valid BaaS access token in `DASHBOARD_TEST_TOKEN`
//!
//! Run with: cargo test -p buzzvar-integration-tests -- --ignored

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

/// Base URL for the dashboard API (configurable via environment).
fn dashboard_base_url() -> String {
    std::env::var("DASHBOARD_BASE_URL").unwrap_or_else(|_| "http://localhost:3002".to_string())
}

/// Access token accepted by the BaaS auth service for a test account.
fn test_token() -> String {
    std::env::var("DASHBOARD_TEST_TOKEN").expect("DASHBOARD_TEST_TOKEN must be set")
}

/// Cookie-holding client; the session rides on the `bv_dashboard_session`
/// cookie after login.
fn client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

#[tokio::test]
#[ignore = "Requires running dashboard server and database"]
async fn test_health_endpoints() {
    let client = client();
    let base_url = dashboard_base_url();

    let resp = client
        .get(format!("{base_url}/health"))
        .send()
        .await
        .expect("Failed to reach liveness endpoint");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .get(format!("{base_url}/health/ready"))
        .send()
        .await
        .expect("Failed to reach readiness endpoint");
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running dashboard server and database"]
async fn test_login_establishes_session() {
    let client = client();
    let base_url = dashboard_base_url();

    let resp = client
        .post(format!("{base_url}/auth/login"))
        .json(&json!({ "access_token": test_token() }))
        .send()
        .await
        .expect("Failed to log in");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("Failed to parse login body");
    assert_eq!(body["success"], json!(true));
    assert!(body["data"]["role"].is_string());

    // The session cookie must now carry authenticated requests.
    let resp = client
        .get(format!("{base_url}/owner/venues"))
        .send()
        .await
        .expect("Failed to list venues");
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running dashboard server and database"]
async fn test_login_rejects_garbage_token() {
    let client = client();
    let base_url = dashboard_base_url();

    let resp = client
        .post(format!("{base_url}/auth/login"))
        .json(&json!({ "access_token": "not-a-real-token" }))
        .send()
        .await
        .expect("Failed to send login");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running dashboard server and database"]
async fn test_logout_clears_session() {
    let client = client();
    let base_url = dashboard_base_url();

    let resp = client
        .post(format!("{base_url}/auth/login"))
        .json(&json!({ "access_token": test_token() }))
        .send()
        .await
        .expect("Failed to log in");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .post(format!("{base_url}/auth/logout"))
        .send()
        .await
        .expect("Failed to log out");
    assert_eq!(resp.status(), StatusCode::OK);

    // API paths answer 401 once the principal is gone.
    let resp = client
        .get(format!("{base_url}/owner/venues"))
        .send()
        .await
        .expect("Failed to call owner area");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running dashboard server and database"]
async fn test_unauthenticated_api_request_gets_401() {
    let client = client();
    let base_url = dashboard_base_url();

    let resp = client
        .get(format!("{base_url}/super-admin/users"))
        .send()
        .await
        .expect("Failed to call super-admin area");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
