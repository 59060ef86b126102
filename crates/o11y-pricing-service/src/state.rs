//! Application state.

use std::sync::Arc;

use o11y_pricing_core::PricingConfig;

use crate::config::ServiceConfig;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Service configuration.
    pub config: ServiceConfig,

    /// Pricing configuration, shared read-only with every estimate.
    pub pricing: Arc<PricingConfig>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: ServiceConfig) -> Self {
        let pricing = Arc::new(config.pricing.clone());

        tracing::info!(
            dimensions = pricing.catalog().len(),
            credit_rules = pricing.credit_rules().len(),
            catalog_path = ?config.catalog_path,
            "Pricing catalog ready"
        );

        Self { config, pricing }
    }
}
