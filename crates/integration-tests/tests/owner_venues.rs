//! Integration tests for owner-area venue and promotion flows.
//!
//! These tests require:
//! - A running `PostgreSQL` database (task db:start)
//! - The dashboard server running (cargo run -p buzzvar-dashboard)
//! - A club-owner BaaS access token in `DASHBOARD_TEST_TOKEN`
//!
//! Run with: cargo test -p buzzvar-integration-tests -- --ignored

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use uuid::Uuid;

fn dashboard_base_url() -> String {
    std::env::var("DASHBOARD_BASE_URL").unwrap_or_else(|_| "http://localhost:3002".to_string())
}

fn test_token() -> String {
    std::env::var("DASHBOARD_TEST_TOKEN").expect("DASHBOARD_TEST_TOKEN must be set")
}

/// Log in and return a client holding the session cookie.
async fn authenticated_client() -> Client {
    let client = Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client");
    let resp = client
        .post(format!("{}/auth/login", dashboard_base_url()))
        .json(&json!({ "access_token": test_token() }))
        .send()
        .await
        .expect("Failed to log in");
    assert_eq!(resp.status(), StatusCode::OK);
    client
}

/// Test helper: create a venue owned by the caller and return it.
async fn create_test_venue(client: &Client) -> Value {
    let base_url = dashboard_base_url();
    let resp = client
        .post(format!("{base_url}/owner/venues"))
        .json(&json!({
            "name": format!("Integration Venue {}", Uuid::new_v4()),
            "description": "Created by the integration suite",
            "city": "Berlin",
        }))
        .send()
        .await
        .expect("Failed to create venue");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse venue body");
    body["data"].clone()
}

#[tokio::test]
#[ignore = "Requires running dashboard server and database"]
async fn test_venue_create_and_fetch() {
    let client = authenticated_client().await;
    let base_url = dashboard_base_url();

    let venue = create_test_venue(&client).await;
    let id = venue["id"].as_str().expect("venue id");

    let resp = client
        .get(format!("{base_url}/owner/venues/{id}"))
        .send()
        .await
        .expect("Failed to fetch venue");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("Failed to parse fetch body");
    assert_eq!(body["data"]["id"], venue["id"]);

    // The new venue appears in the owner's listing.
    let resp = client
        .get(format!("{base_url}/owner/venues"))
        .send()
        .await
        .expect("Failed to list venues");
    let body: Value = resp.json().await.expect("Failed to parse list body");
    let listed = body["data"]
        .as_array()
        .expect("venue list")
        .iter()
        .any(|v| v["id"] == venue["id"]);
    assert!(listed);
}

#[tokio::test]
#[ignore = "Requires running dashboard server and database"]
async fn test_foreign_venue_is_indistinguishable_from_missing() {
    let client = authenticated_client().await;
    let base_url = dashboard_base_url();

    // A random id is either absent or someone else's; both must read the
    // same from here.
    let resp = client
        .get(format!("{base_url}/owner/venues/{}", Uuid::new_v4()))
        .send()
        .await
        .expect("Failed to fetch venue");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: Value = resp.json().await.expect("Failed to parse error body");
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"], json!("Venue not found or access denied"));
}

#[tokio::test]
#[ignore = "Requires running dashboard server and database"]
async fn test_venue_dashboard_payload_shape() {
    let client = authenticated_client().await;
    let base_url = dashboard_base_url();

    let venue = create_test_venue(&client).await;
    let id = venue["id"].as_str().expect("venue id");

    let resp = client
        .get(format!("{base_url}/owner/venues/{id}/dashboard"))
        .send()
        .await
        .expect("Failed to fetch dashboard");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("Failed to parse dashboard body");
    assert_eq!(body["data"]["venue"]["id"], venue["id"]);
    assert!(body["data"]["engagement"]["current"].is_object());
    assert!(body["data"]["top_reviews"].is_array());
}

#[tokio::test]
#[ignore = "Requires running dashboard server and database"]
async fn test_promotion_window_validation() {
    let client = authenticated_client().await;
    let base_url = dashboard_base_url();

    let venue = create_test_venue(&client).await;
    let id = venue["id"].as_str().expect("venue id");

    // Window ends before it starts.
    let resp = client
        .post(format!("{base_url}/owner/venues/{id}/promotions"))
        .json(&json!({
            "title": "Backwards happy hour",
            "starts_at": "2026-09-02T20:00:00Z",
            "ends_at": "2026-09-01T20:00:00Z",
        }))
        .send()
        .await
        .expect("Failed to create promotion");
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
#[ignore = "Requires running dashboard server and database"]
async fn test_promotion_lifecycle() {
    let client = authenticated_client().await;
    let base_url = dashboard_base_url();

    let venue = create_test_venue(&client).await;
    let id = venue["id"].as_str().expect("venue id");

    let resp = client
        .post(format!("{base_url}/owner/venues/{id}/promotions"))
        .json(&json!({
            "title": "Two for one",
            "starts_at": "2026-09-01T20:00:00Z",
            "ends_at": "2026-09-01T23:00:00Z",
        }))
        .send()
        .await
        .expect("Failed to create promotion");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse promotion body");
    let promotion_id = body["data"]["id"].as_str().expect("promotion id");

    let resp = client
        .patch(format!(
            "{base_url}/owner/venues/{id}/promotions/{promotion_id}"
        ))
        .json(&json!({ "title": "Three for one" }))
        .send()
        .await
        .expect("Failed to update promotion");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .delete(format!(
            "{base_url}/owner/venues/{id}/promotions/{promotion_id}"
        ))
        .send()
        .await
        .expect("Failed to delete promotion");
    assert_eq!(resp.status(), StatusCode::OK);
}
