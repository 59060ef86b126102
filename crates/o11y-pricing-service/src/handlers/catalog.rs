//! Catalog handlers.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

use o11y_pricing_core::format::{display_decimals, format_quantity, format_unit_price};
use o11y_pricing_core::{CreditRule, Metering, PricingRule};

use crate::error::ApiError;
use crate::state::AppState;

/// A catalog dimension as exposed by the API.
#[derive(Debug, Serialize)]
pub struct DimensionResponse {
    /// Dimension id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Unit of usage.
    pub unit: String,
    /// Description.
    pub description: String,
    /// Free allowance.
    pub included_quantity: f64,
    /// Billing step.
    pub unit_step: f64,
    /// Price per billing step.
    pub price_per_unit: f64,
    /// Metering kind.
    pub metering: Metering,
    /// Fraction digits used for this dimension's costs.
    pub cost_decimals: usize,
    /// Price formatted for display, e.g. "$6.50 / 1,000 Active Series".
    pub price_display: String,
}

impl From<&PricingRule> for DimensionResponse {
    fn from(rule: &PricingRule) -> Self {
        #[allow(clippy::float_cmp)]
        let per = if rule.unit_step == 1.0 {
            singular_unit(&rule.unit).to_string()
        } else {
            format!("{} {}", format_quantity(rule.unit_step), rule.unit)
        };

        Self {
            id: rule.id.to_string(),
            name: rule.display_name().to_string(),
            unit: rule.unit.clone(),
            description: rule.description.clone(),
            included_quantity: rule.included_quantity,
            unit_step: rule.unit_step,
            price_per_unit: rule.price_per_unit,
            metering: rule.metering,
            cost_decimals: display_decimals(rule),
            price_display: format!("${} / {}", format_unit_price(rule.price_per_unit), per.trim()),
        }
    }
}

/// Unit name for a single billing step: "Hours" reads as "Hour".
fn singular_unit(unit: &str) -> &str {
    let unit = unit.trim();
    if unit.ends_with("ss") || unit.to_ascii_lowercase().ends_with("series") {
        return unit;
    }
    unit.strip_suffix('s').unwrap_or(unit)
}

/// Catalog response.
#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    /// Dimensions in presentation order.
    pub dimensions: Vec<DimensionResponse>,
    /// Cross-dimension credit rules.
    pub credit_rules: Vec<CreditRule>,
}

/// List the pricing catalog.
pub async fn get_catalog(State(state): State<Arc<AppState>>) -> Json<CatalogResponse> {
    Json(CatalogResponse {
        dimensions: state
            .pricing
            .catalog()
            .iter()
            .map(DimensionResponse::from)
            .collect(),
        credit_rules: state.pricing.credit_rules().to_vec(),
    })
}

/// Get a single catalog dimension.
pub async fn get_dimension(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<DimensionResponse>, ApiError> {
    let rule = state
        .pricing
        .catalog()
        .get(&id)
        .ok_or_else(|| ApiError::NotFound(format!("Dimension {id} not found")))?;

    Ok(Json(DimensionResponse::from(rule)))
}
