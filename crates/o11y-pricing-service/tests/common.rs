//! Common test utilities for o11y-pricing integration tests.

#![allow(dead_code)] // Some utilities are used by different test files

use axum::Router;
use axum_test::TestServer;

use o11y_pricing_core::PricingConfig;
use o11y_pricing_service::{create_router, AppState, ServiceConfig};

/// Test harness containing everything needed for integration tests.
pub struct TestHarness {
    /// The test server for making HTTP requests.
    pub server: TestServer,
}

impl TestHarness {
    /// Create a new test harness with the built-in catalog.
    pub fn new() -> Self {
        Self::with_pricing(PricingConfig::default())
    }

    /// Create a test harness with a custom pricing configuration.
    pub fn with_pricing(pricing: PricingConfig) -> Self {
        let config = ServiceConfig {
            listen_addr: "127.0.0.1:0".into(),
            catalog_path: None,
            cors_origins: vec!["*".into()],
            max_body_bytes: 64 * 1024,
            request_timeout_seconds: 10,
            pricing,
        };

        let state = AppState::new(config);
        let router: Router = create_router(state);

        let server = TestServer::new(router).expect("Failed to create test server");

        Self { server }
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// Find a line item by dimension id in an estimate response.
pub fn line_item<'a>(body: &'a serde_json::Value, id: &str) -> &'a serde_json::Value {
    body["line_items"]
        .as_array()
        .expect("line_items should be an array")
        .iter()
        .find(|item| item["id"] == id)
        .unwrap_or_else(|| panic!("line item {id} missing"))
}
