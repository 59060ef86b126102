//! Usage projection handlers.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use o11y_pricing_core::{EstimatorShape, ProjectedUsage, UsageQuantities};

use crate::state::AppState;

/// Projection response.
#[derive(Debug, Serialize)]
pub struct ProjectionResponse {
    /// Shape the projection was computed from, after clamping.
    pub shape: EstimatorShape,
    /// Projected quantities with infrastructure/application breakdown.
    pub projection: ProjectedUsage,
    /// Projected quantities keyed by dimension id.
    pub usage: UsageQuantities,
}

/// Project monthly usage from an estimator shape.
pub async fn project_usage(
    State(state): State<Arc<AppState>>,
    Json(shape): Json<EstimatorShape>,
) -> Json<ProjectionResponse> {
    let shape = shape.sanitized();
    let projection = state.pricing.project(&shape);
    let usage = projection.to_usage(&state.pricing.projection().targets);

    tracing::debug!(
        host_count = shape.host_count,
        app_instance_count = shape.app_instance_count,
        "Usage projected"
    );

    Json(ProjectionResponse {
        shape,
        projection,
        usage,
    })
}

/// Default estimator shape for new sessions.
pub async fn default_shape() -> Json<EstimatorShape> {
    Json(EstimatorShape::typical())
}
