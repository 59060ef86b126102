//! Estimate endpoint integration tests.

mod common;

use common::{line_item, TestHarness};
use serde_json::json;

// ============================================================================
// Manual usage
// ============================================================================

#[tokio::test]
async fn metrics_without_credits() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .post("/v1/estimate")
        .json(&json!({ "usage": { "metrics": 15000 } }))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    let metrics = line_item(&body, "metrics");
    assert_eq!(metrics["billable_quantity"], 5000.0);
    assert_eq!(metrics["billed_units"], 5.0);
    assert_eq!(metrics["cost"], 32.5);
    assert_eq!(metrics["cost_display"], "$32.50");
    assert_eq!(body["total"], 32.5);
    assert_eq!(body["total_display"], "$32.50");
    assert_eq!(body["within_free_tier"], false);
}

#[tokio::test]
async fn host_hours_credit_metrics() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .post("/v1/estimate")
        .json(&json!({ "usage": { "metrics": 15000, "k8sHostHours": 3650 } }))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();

    let metrics = line_item(&body, "metrics");
    assert_eq!(metrics["bonus_included"], 3000.0);
    assert_eq!(metrics["billed_units"], 2.0);
    assert_eq!(metrics["cost"], 13.0);

    let hosts = line_item(&body, "k8sHostHours");
    assert_eq!(hosts["billed_units"], 1418.0);
    assert_eq!(hosts["cost_display"], "$21.270");

    let credits = body["credits"].as_array().unwrap();
    assert_eq!(credits.len(), 1);
    assert_eq!(credits[0]["target"], "metrics");
    assert_eq!(credits[0]["total_included"], 13000.0);
}

#[tokio::test]
async fn below_allowance_is_free_but_listed() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .post("/v1/estimate")
        .json(&json!({ "usage": { "logs": 40 } }))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["line_items"].as_array().unwrap().len(), 14);
    assert_eq!(line_item(&body, "logs")["cost"], 0.0);
    assert_eq!(line_item(&body, "logs")["cost_display"], "$0.00");
    assert_eq!(body["total"], 0.0);
    assert_eq!(body["within_free_tier"], true);
}

#[tokio::test]
async fn empty_request_prices_nothing() {
    let harness = TestHarness::new();

    let response = harness.server.post("/v1/estimate").json(&json!({})).await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["total"], 0.0);
    assert_eq!(body["credits"][0]["bonus"], 0.0);
}

#[tokio::test]
async fn negative_usage_is_clamped() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .post("/v1/estimate")
        .json(&json!({ "usage": { "enterpriseUsers": -4 } }))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["usage"]["enterpriseUsers"], 0.0);
    assert_eq!(line_item(&body, "enterpriseUsers")["cost"], 0.0);
}

#[tokio::test]
async fn unknown_dimension_is_rejected() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .post("/v1/estimate")
        .json(&json!({ "usage": { "bandwidth": 10 } }))
        .await;

    response.assert_status_bad_request();
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"]["code"], "bad_request");
}

#[tokio::test]
async fn malformed_body_is_client_error() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .post("/v1/estimate")
        .json(&json!({ "usage": { "logs": "lots" } }))
        .await;

    assert!(response.status_code().is_client_error());
}

// ============================================================================
// Projected usage
// ============================================================================

#[tokio::test]
async fn shape_overrides_projected_dimensions() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .post("/v1/estimate")
        .json(&json!({
            "usage": { "metrics": 1, "users": 5 },
            "shape": {
                "host_count": 5,
                "avg_daily_logs_per_host_gb": 0.2
            }
        }))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();

    assert_eq!(body["usage"]["metrics"], 7500.0);
    assert_eq!(body["usage"]["logs"], 30.0);
    assert_eq!(body["usage"]["k8sHostHours"], 3650.0);
    assert_eq!(body["usage"]["k8sContainerHours"], 29200.0);
    assert_eq!(body["usage"]["users"], 5.0);
    assert_eq!(body["projected"]["host_hours"], 3650.0);

    // 7500 series, 13000 allowance with host credits
    assert_eq!(line_item(&body, "metrics")["cost"], 0.0);
    // 2 seats over the free 3
    assert_eq!(line_item(&body, "users")["cost"], 16.0);
}

#[tokio::test]
async fn projected_absent_without_shape() {
    let harness = TestHarness::new();

    let body: serde_json::Value = harness
        .server
        .post("/v1/estimate")
        .json(&json!({ "usage": { "logs": 60 } }))
        .await
        .json();

    assert!(body.get("projected").is_none());
    assert!(body["generated_at"].is_string());
}

// ============================================================================
// Sample estimate
// ============================================================================

#[tokio::test]
async fn sample_estimate_uses_starting_usage() {
    let harness = TestHarness::new();

    let response = harness.server.get("/v1/estimate/sample").await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["usage"]["metrics"], 15000.0);
    assert_eq!(line_item(&body, "metrics")["cost"], 13.0);
    assert_eq!(line_item(&body, "logs")["cost"], 5.0);
    assert_eq!(line_item(&body, "users")["cost"], 16.0);
    assert_eq!(body["within_free_tier"], false);
}
