//! Router configuration.
//!
//! This module sets up the Axum router with all routes and middleware.

use std::sync::Arc;
use std::time::Duration;

use axum::routing::{get, post};
use axum::Router;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{catalog, estimate, health, projection};
use crate::state::AppState;

/// Maximum concurrent requests for API endpoints.
const API_MAX_CONCURRENT_REQUESTS: usize = 100;

/// Create the service router with all routes and middleware.
///
/// # Routes
///
/// - `GET /health` - Health check
/// - `GET /v1/catalog` - List pricing dimensions and credit rules
/// - `GET /v1/catalog/:id` - Get one pricing dimension
/// - `POST /v1/estimate` - Price a usage set (optionally projected from a shape)
/// - `GET /v1/estimate/sample` - Price the default starting usage
/// - `POST /v1/projection` - Project usage from an estimator shape
/// - `GET /v1/projection/shape` - Default estimator shape
pub fn create_router(state: AppState) -> Router {
    // Extract config values before moving state
    let cors_origins = state.config.cors_origins.clone();
    let max_body_bytes = state.config.max_body_bytes;
    let request_timeout_seconds = state.config.request_timeout_seconds;

    let cors = build_cors_layer(&cors_origins);

    let state = Arc::new(state);

    let api_routes = Router::new()
        .route("/catalog", get(catalog::get_catalog))
        .route("/catalog/:id", get(catalog::get_dimension))
        .route("/estimate", post(estimate::create_estimate))
        .route("/estimate/sample", get(estimate::sample_estimate))
        .route("/projection", post(projection::project_usage))
        .route("/projection/shape", get(projection::default_shape))
        .layer(ConcurrencyLimitLayer::new(API_MAX_CONCURRENT_REQUESTS));

    Router::new()
        .route("/health", get(health::health))
        .nest("/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(TimeoutLayer::new(Duration::from_secs(
            request_timeout_seconds,
        )))
        .with_state(state)
}

/// Build the CORS layer from configured origins.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
