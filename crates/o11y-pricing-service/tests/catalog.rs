//! Catalog endpoint integration tests.

mod common;

use common::TestHarness;

#[tokio::test]
async fn catalog_lists_dimensions_in_order() {
    let harness = TestHarness::new();

    let response = harness.server.get("/v1/catalog").await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    let dimensions = body["dimensions"].as_array().unwrap();
    assert_eq!(dimensions.len(), 14);
    assert_eq!(dimensions[0]["id"], "metrics");
    assert_eq!(dimensions[13]["id"], "k6");
}

#[tokio::test]
async fn catalog_formats_prices() {
    let harness = TestHarness::new();

    let body: serde_json::Value = harness.server.get("/v1/catalog").await.json();
    let dimensions = body["dimensions"].as_array().unwrap();

    let metrics = &dimensions[0];
    assert_eq!(metrics["price_display"], "$6.50 / 1,000 Active Series");
    assert_eq!(metrics["cost_decimals"], 2);

    let hosts = dimensions
        .iter()
        .find(|d| d["id"] == "k8sHostHours")
        .unwrap();
    assert_eq!(hosts["price_display"], "$0.015 / Hour");

    let users = dimensions
        .iter()
        .find(|d| d["id"] == "users")
        .unwrap();
    assert_eq!(users["price_display"], "$8.00 / User");

    let logs = dimensions.iter().find(|d| d["id"] == "logs").unwrap();
    assert_eq!(logs["price_display"], "$0.50 / GB");
    assert_eq!(hosts["metering"], "hourly");
    assert_eq!(hosts["cost_decimals"], 3);
}

#[tokio::test]
async fn catalog_includes_credit_rules() {
    let harness = TestHarness::new();

    let body: serde_json::Value = harness.server.get("/v1/catalog").await.json();
    let rules = body["credit_rules"].as_array().unwrap();

    assert_eq!(rules.len(), 1);
    assert_eq!(rules[0]["source"], "k8sHostHours");
    assert_eq!(rules[0]["target"], "metrics");
    assert_eq!(rules[0]["source_units"], 730.0);
    assert_eq!(rules[0]["bonus_units"], 600.0);
}

#[tokio::test]
async fn get_single_dimension() {
    let harness = TestHarness::new();

    let response = harness.server.get("/v1/catalog/logs").await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["name"], "Logs");
    assert_eq!(body["included_quantity"], 50.0);
}

#[tokio::test]
async fn get_unknown_dimension_is_not_found() {
    let harness = TestHarness::new();

    let response = harness.server.get("/v1/catalog/bandwidth").await;

    response.assert_status_not_found();
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"]["code"], "not_found");
}
