//! Service configuration.

use std::path::Path;

use o11y_pricing_core::{PricingConfig, Result};

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Address to listen on (default: "0.0.0.0:8080").
    pub listen_addr: String,

    /// Path to a JSON pricing catalog; the built-in catalog is used if unset.
    pub catalog_path: Option<String>,

    /// CORS allowed origins.
    pub cors_origins: Vec<String>,

    /// Maximum request body size in bytes.
    pub max_body_bytes: usize,

    /// Request timeout in seconds.
    pub request_timeout_seconds: u64,

    /// Pricing configuration.
    pub pricing: PricingConfig,
}

impl ServiceConfig {
    /// Load configuration from environment variables.
    ///
    /// The pricing catalog is read once here; a malformed catalog file is a
    /// start-up error.
    ///
    /// # Errors
    ///
    /// Returns an error if `PRICING_CATALOG_PATH` is set but cannot be
    /// loaded or fails validation.
    pub fn from_env() -> Result<Self> {
        let catalog_path = std::env::var("PRICING_CATALOG_PATH").ok();
        let pricing = load_pricing(catalog_path.as_deref())?;

        Ok(Self {
            listen_addr: std::env::var("LISTEN_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".into()),
            catalog_path,
            cors_origins: std::env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| "*".into())
                .split(',')
                .map(|s| s.trim().to_string())
                .collect(),
            max_body_bytes: std::env::var("MAX_BODY_BYTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(64 * 1024), // 64KB
            request_timeout_seconds: std::env::var("REQUEST_TIMEOUT_SECONDS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),
            pricing,
        })
    }
}

/// Load the pricing catalog from `path`, or the built-in one if `None`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is invalid.
pub fn load_pricing(path: Option<&str>) -> Result<PricingConfig> {
    match path {
        Some(path) => PricingConfig::from_file(Path::new(path)),
        None => {
            tracing::debug!("PRICING_CATALOG_PATH not set, using built-in catalog");
            Ok(PricingConfig::default())
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".into(),
            catalog_path: None,
            cors_origins: vec!["*".into()],
            max_body_bytes: 64 * 1024,
            request_timeout_seconds: 10,
            pricing: PricingConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn built_in_catalog_without_path() {
        let pricing = load_pricing(None).unwrap();
        assert_eq!(pricing, PricingConfig::default());
    }

    #[test]
    fn catalog_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        std::fs::write(
            &path,
            r#"{
                "catalog": [
                    {"id": "logs", "included_quantity": 10, "unit_step": 1, "price_per_unit": 1.0},
                    {"id": "metrics", "included_quantity": 0, "unit_step": 1000, "price_per_unit": 2.0},
                    {"id": "traces", "included_quantity": 0, "unit_step": 1, "price_per_unit": 0.1},
                    {"id": "k8sHostHours", "included_quantity": 0, "unit_step": 1, "price_per_unit": 0.01, "metering": "hourly"},
                    {"id": "k8sContainerHours", "included_quantity": 0, "unit_step": 1, "price_per_unit": 0.001, "metering": "hourly"},
                    {"id": "appHostHours", "included_quantity": 0, "unit_step": 1, "price_per_unit": 0.02, "metering": "hourly"}
                ]
            }"#,
        )
        .unwrap();

        let pricing = load_pricing(path.to_str()).unwrap();
        assert_eq!(pricing.catalog().len(), 6);
        assert!(pricing.credit_rules().is_empty());
    }

    #[test]
    fn invalid_catalog_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        std::fs::write(
            &path,
            r#"{"catalog": [{"id": "logs", "included_quantity": 10, "unit_step": 0, "price_per_unit": 1.0}]}"#,
        )
        .unwrap();

        assert!(load_pricing(path.to_str()).is_err());
    }

    #[test]
    fn default_config() {
        let config = ServiceConfig::default();
        assert_eq!(config.listen_addr, "0.0.0.0:8080");
        assert_eq!(config.cors_origins, vec!["*".to_string()]);
        assert!(config.catalog_path.is_none());
    }
}
