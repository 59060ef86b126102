//! o11y-pricing service - HTTP API for monthly cost estimates
//!
//! This is the main entry point for the o11y-pricing service.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use o11y_pricing_service::{create_router, AppState, ServiceConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,o11y_pricing=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting o11y-pricing service");

    let config = ServiceConfig::from_env()?;

    tracing::info!(
        listen_addr = %config.listen_addr,
        catalog_path = ?config.catalog_path,
        max_body_bytes = config.max_body_bytes,
        request_timeout_seconds = config.request_timeout_seconds,
        "Service configuration loaded"
    );

    let state = AppState::new(config.clone());
    let app = create_router(state);

    tracing::info!(listen_addr = %config.listen_addr, "Starting HTTP server");
    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
