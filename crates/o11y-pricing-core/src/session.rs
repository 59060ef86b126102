//! Interactive estimation session.
//!
//! An [`EstimatorSession`] is the stateful caller that composes the projector
//! and the pricing engine: it owns the usage set being edited and the
//! estimator shape, and decides when projected values overwrite manual ones.

use std::sync::Arc;

use crate::engine::CostEstimate;
use crate::error::Result;
use crate::ids::dims;
use crate::pricing::PricingConfig;
use crate::projector::{EstimatorShape, ProjectedUsage};
use crate::usage::UsageQuantities;

/// Usage a fresh session starts from: a small Kubernetes footprint with a
/// handful of users, slightly above the free metrics and logs allowances.
const STARTING_USAGE: &[(&str, f64)] = &[
    (dims::METRICS, 15_000.0),
    (dims::LOGS, 60.0),
    (dims::USERS, 5.0),
    (dims::K8S_HOST_HOURS, 3_650.0),
    (dims::APP_HOST_HOURS, 3_650.0),
];

/// Mutable estimation state over an immutable [`PricingConfig`].
#[derive(Debug, Clone)]
pub struct EstimatorSession {
    config: Arc<PricingConfig>,
    usage: UsageQuantities,
    shape: EstimatorShape,
    estimator_enabled: bool,
}

impl EstimatorSession {
    /// Start a session with the default starting usage and the typical
    /// estimator shape. The estimator starts disabled.
    ///
    /// Starting entries for dimensions the catalog does not price are
    /// skipped; every other catalog dimension starts at zero.
    #[must_use]
    pub fn new(config: Arc<PricingConfig>) -> Self {
        let usage = config
            .catalog()
            .iter()
            .map(|rule| {
                let quantity = STARTING_USAGE
                    .iter()
                    .find(|(id, _)| *id == rule.id.as_str())
                    .map_or(0.0, |(_, q)| *q);
                (rule.id.clone(), quantity)
            })
            .collect();

        Self {
            config,
            usage,
            shape: EstimatorShape::typical(),
            estimator_enabled: false,
        }
    }

    /// Start a session from explicit usage. The estimator starts disabled.
    #[must_use]
    pub fn with_usage(config: Arc<PricingConfig>, usage: UsageQuantities) -> Self {
        Self {
            config,
            usage,
            shape: EstimatorShape::typical(),
            estimator_enabled: false,
        }
    }

    /// The pricing configuration in use.
    #[must_use]
    pub fn config(&self) -> &PricingConfig {
        &self.config
    }

    /// Current usage.
    #[must_use]
    pub fn usage(&self) -> &UsageQuantities {
        &self.usage
    }

    /// Current estimator shape.
    #[must_use]
    pub fn shape(&self) -> &EstimatorShape {
        &self.shape
    }

    /// Whether projected values currently override manual entries.
    #[must_use]
    pub fn estimator_enabled(&self) -> bool {
        self.estimator_enabled
    }

    /// Manually set usage for a catalog dimension.
    ///
    /// Negative and non-finite input is clamped to zero. A later projection
    /// overwrites this value if the dimension is a projection target and the
    /// estimator is enabled.
    ///
    /// # Errors
    ///
    /// Returns [`crate::PricingError::UnknownDimension`] if the catalog does
    /// not price `id`.
    pub fn set_usage(&mut self, id: &str, quantity: f64) -> Result<()> {
        let rule = self.config.require_dimension(id)?;
        self.usage.set(rule.id.clone(), quantity);
        Ok(())
    }

    /// Replace the estimator shape.
    ///
    /// The shape is sanitized before it is stored. When the estimator is
    /// enabled, the projection is recomputed and applied immediately.
    pub fn set_shape(&mut self, shape: EstimatorShape) {
        self.shape = shape.sanitized();
        if self.estimator_enabled {
            self.apply_projection();
        }
    }

    /// Turn the estimator on or off.
    ///
    /// Enabling applies the current projection at once. Disabling leaves the
    /// last projected values in place as ordinary usage.
    pub fn set_estimator_enabled(&mut self, enabled: bool) {
        self.estimator_enabled = enabled;
        if enabled {
            self.apply_projection();
        }
    }

    /// Projection of the current shape, whether or not it is applied.
    #[must_use]
    pub fn projection(&self) -> ProjectedUsage {
        self.config.project(&self.shape)
    }

    /// Price the current usage.
    #[must_use]
    pub fn estimate(&self) -> CostEstimate {
        self.config.estimate(&self.usage)
    }

    fn apply_projection(&mut self) {
        let projected = self.config.projected_usage(&self.shape);
        tracing::debug!(
            dimensions = projected.len(),
            host_count = self.shape.host_count,
            app_instance_count = self.shape.app_instance_count,
            "Applying projected usage"
        );
        self.usage.merge(&projected);
    }
}
