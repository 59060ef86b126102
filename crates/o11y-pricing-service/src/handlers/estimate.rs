//! Cost estimate handlers.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use o11y_pricing_core::format::{format_cost, format_usd, CURRENCY_DECIMALS};
use o11y_pricing_core::{
    AppliedCredit, CostEstimate, CostLineItem, EstimatorSession, EstimatorShape, PricingConfig,
    ProjectedUsage, UsageQuantities,
};

use crate::error::ApiError;
use crate::state::AppState;

/// Estimate request.
#[derive(Debug, Default, Deserialize)]
pub struct EstimateRequest {
    /// Usage per dimension id. Negative values are clamped to zero.
    #[serde(default)]
    pub usage: BTreeMap<String, f64>,
    /// Estimator shape. When present, projected values override the
    /// corresponding `usage` entries.
    #[serde(default)]
    pub shape: Option<EstimatorShape>,
}

/// A priced line item.
#[derive(Debug, Serialize)]
pub struct LineItemResponse {
    /// Line item at full precision.
    #[serde(flatten)]
    pub item: CostLineItem,
    /// Cost formatted for display.
    pub cost_display: String,
}

/// Estimate response.
#[derive(Debug, Serialize)]
pub struct EstimateResponse {
    /// Line items in catalog order.
    pub line_items: Vec<LineItemResponse>,
    /// Credits applied.
    pub credits: Vec<AppliedCredit>,
    /// Monthly total at full precision.
    pub total: f64,
    /// Monthly total formatted for display.
    pub total_display: String,
    /// Whether every dimension stayed inside its allowance.
    pub within_free_tier: bool,
    /// Usage that was priced, after clamping and projection.
    pub usage: UsageQuantities,
    /// Projection applied, if a shape was supplied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projected: Option<ProjectedUsage>,
    /// When the estimate was computed (RFC 3339).
    pub generated_at: String,
}

impl EstimateResponse {
    fn build(
        pricing: &PricingConfig,
        estimate: CostEstimate,
        usage: UsageQuantities,
        projected: Option<ProjectedUsage>,
    ) -> Self {
        let within_free_tier = estimate.is_within_free_tier();
        let line_items = estimate
            .line_items
            .into_iter()
            .map(|item| {
                let cost_display = pricing.catalog().get(item.id.as_str()).map_or_else(
                    || format_usd(item.cost, CURRENCY_DECIMALS),
                    |rule| format_cost(item.cost, rule),
                );
                LineItemResponse { item, cost_display }
            })
            .collect();

        Self {
            line_items,
            credits: estimate.credits,
            total: estimate.total,
            total_display: format_usd(estimate.total, CURRENCY_DECIMALS),
            within_free_tier,
            usage,
            projected,
            generated_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Price a usage set, optionally overridden by a projected shape.
pub async fn create_estimate(
    State(state): State<Arc<AppState>>,
    Json(body): Json<EstimateRequest>,
) -> Result<Json<EstimateResponse>, ApiError> {
    let mut usage = UsageQuantities::new();
    for (id, quantity) in &body.usage {
        let rule = state.pricing.require_dimension(id)?;
        usage.set(rule.id.clone(), *quantity);
    }

    let mut session = EstimatorSession::with_usage(Arc::clone(&state.pricing), usage);
    let projected = body.shape.map(|shape| {
        session.set_shape(shape);
        session.set_estimator_enabled(true);
        session.projection()
    });

    let estimate = session.estimate();

    tracing::info!(
        dimensions = body.usage.len(),
        projected = projected.is_some(),
        total = estimate.total,
        "Estimate computed"
    );

    Ok(Json(EstimateResponse::build(
        &state.pricing,
        estimate,
        session.usage().clone(),
        projected,
    )))
}

/// Price the starting usage of a fresh estimator session.
pub async fn sample_estimate(State(state): State<Arc<AppState>>) -> Json<EstimateResponse> {
    let session = EstimatorSession::new(Arc::clone(&state.pricing));
    let estimate = session.estimate();

    Json(EstimateResponse::build(
        &state.pricing,
        estimate,
        session.usage().clone(),
        None,
    ))
}
