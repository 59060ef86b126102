//! Pricing configuration for o11y-pricing.
//!
//! This module defines the per-dimension [`PricingRule`], the ordered
//! [`Catalog`] of rules, and [`PricingConfig`], the immutable bundle of
//! catalog, credit rules and projection constants that callers construct once
//! and pass into every engine operation.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::credits::CreditRule;
use crate::engine::{self, CostEstimate};
use crate::error::{PricingError, Result};
use crate::ids::{dims, DimensionId};
use crate::projector::{self, EstimatorShape, ProjectedUsage, ProjectionConstants};
use crate::usage::UsageQuantities;

/// How a dimension is metered.
///
/// Hourly dimensions have sub-cent unit prices and are displayed with an
/// extra decimal place.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metering {
    /// Plain quantity (series, GB, users, sessions).
    #[default]
    Quantity,
    /// Time-based metering (host-hours, container-hours).
    Hourly,
}

/// Pricing for a single usage dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingRule {
    /// Dimension this rule prices.
    pub id: DimensionId,

    /// Human-readable name (e.g., "K8s Host Hours").
    #[serde(default)]
    pub name: String,

    /// Unit of the consumed quantity (e.g., "GB", "Active Series").
    #[serde(default)]
    pub unit: String,

    /// Short description for display.
    #[serde(default)]
    pub description: String,

    /// Free allowance before billing starts.
    pub included_quantity: f64,

    /// Billing granularity: cost is charged per this many units, rounding up.
    pub unit_step: f64,

    /// Currency cost per `unit_step` units.
    pub price_per_unit: f64,

    /// How the dimension is metered.
    #[serde(default)]
    pub metering: Metering,
}

impl PricingRule {
    /// Create a rule with empty display metadata and quantity metering.
    #[must_use]
    pub fn new(
        id: DimensionId,
        included_quantity: f64,
        unit_step: f64,
        price_per_unit: f64,
    ) -> Self {
        Self {
            id,
            name: String::new(),
            unit: String::new(),
            description: String::new(),
            included_quantity,
            unit_step,
            price_per_unit,
            metering: Metering::Quantity,
        }
    }

    /// Set the display metadata.
    #[must_use]
    pub fn with_display(
        mut self,
        name: impl Into<String>,
        unit: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        self.name = name.into();
        self.unit = unit.into();
        self.description = description.into();
        self
    }

    /// Set the metering kind.
    #[must_use]
    pub fn with_metering(mut self, metering: Metering) -> Self {
        self.metering = metering;
        self
    }

    /// Check the numeric invariants of the rule.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::InvalidRule`] if any field is non-finite, the
    /// allowance or price is negative, or the unit step is not positive.
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: &str| PricingError::InvalidRule {
            id: self.id.clone(),
            reason: reason.to_string(),
        };

        if !self.included_quantity.is_finite() || self.included_quantity < 0.0 {
            return Err(invalid("included_quantity must be finite and >= 0"));
        }
        if !self.unit_step.is_finite() || self.unit_step <= 0.0 {
            return Err(invalid("unit_step must be finite and > 0"));
        }
        if !self.price_per_unit.is_finite() || self.price_per_unit < 0.0 {
            return Err(invalid("price_per_unit must be finite and >= 0"));
        }
        Ok(())
    }

    /// Display name, falling back to the dimension id.
    #[must_use]
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            self.id.as_str()
        } else {
            &self.name
        }
    }
}

/// An ordered, validated set of pricing rules.
///
/// Declaration order is preserved and drives the order of line items in a
/// [`CostEstimate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<PricingRule>", into = "Vec<PricingRule>")]
pub struct Catalog {
    rules: Vec<PricingRule>,
}

impl Catalog {
    /// Build a catalog from rules in presentation order.
    ///
    /// # Errors
    ///
    /// Returns an error if any rule is invalid or two rules share an id.
    pub fn new(rules: Vec<PricingRule>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(rules.len());
        for rule in &rules {
            rule.validate()?;
            if !seen.insert(rule.id.as_str()) {
                return Err(PricingError::DuplicateDimension(rule.id.clone()));
            }
        }
        Ok(Self { rules })
    }

    /// Look up the rule for a dimension.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&PricingRule> {
        self.rules.iter().find(|rule| rule.id.as_str() == id)
    }

    /// Whether the catalog prices the given dimension.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Iterate over rules in declaration order.
    pub fn iter(&self) -> std::slice::Iter<'_, PricingRule> {
        self.rules.iter()
    }

    /// Number of dimensions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the catalog has no dimensions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl TryFrom<Vec<PricingRule>> for Catalog {
    type Error = PricingError;

    fn try_from(rules: Vec<PricingRule>) -> Result<Self> {
        Self::new(rules)
    }
}

impl From<Catalog> for Vec<PricingRule> {
    fn from(catalog: Catalog) -> Self {
        catalog.rules
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a PricingRule;
    type IntoIter = std::slice::Iter<'a, PricingRule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        let rule = |id, name, unit, included, step, price, description| {
            PricingRule::new(DimensionId::from_static(id), included, step, price)
                .with_display(name, unit, description)
        };

        Self {
            rules: vec![
                rule(
                    dims::METRICS,
                    "Metrics",
                    "Active Series",
                    10_000.0,
                    1_000.0,
                    6.50,
                    "Standard active series. First 10k free. Deducts K8s credits.",
                ),
                rule(
                    dims::LOGS,
                    "Logs",
                    "GB",
                    50.0,
                    1.0,
                    0.50,
                    "Log ingestion. First 50GB free.",
                ),
                rule(
                    dims::TRACES,
                    "Traces",
                    "GB",
                    50.0,
                    1.0,
                    0.50,
                    "Trace ingestion. First 50GB free.",
                ),
                rule(
                    dims::PROFILES,
                    "Profiles",
                    "GB",
                    50.0,
                    1.0,
                    0.50,
                    "Continuous profiling. First 50GB free.",
                ),
                rule(
                    dims::K8S_HOST_HOURS,
                    "K8s Host Hours",
                    "Hours",
                    2_232.0,
                    1.0,
                    0.015,
                    "K8s Monitoring. 1 host (730 hours) = 600 active series credit.",
                )
                .with_metering(Metering::Hourly),
                rule(
                    dims::K8S_CONTAINER_HOURS,
                    "K8s Container Hours",
                    "Hours",
                    37_944.0,
                    1.0,
                    0.001,
                    "Billable container hours.",
                )
                .with_metering(Metering::Hourly),
                rule(
                    dims::APP_HOST_HOURS,
                    "App O11y Host Hours",
                    "Hours",
                    2_232.0,
                    1.0,
                    0.04,
                    "Application observability (host-based metering).",
                )
                .with_metering(Metering::Hourly),
                rule(
                    dims::FRONTEND_SESSIONS,
                    "Frontend Sessions",
                    "Sessions",
                    100_000.0,
                    1_000.0,
                    0.90,
                    "Frontend observability (RUM).",
                ),
                rule(
                    dims::SYNTHETICS_API,
                    "Synthetics (API)",
                    "Checks",
                    100_000.0,
                    10_000.0,
                    5.00,
                    "API test executions.",
                ),
                rule(
                    dims::SYNTHETICS_BROWSER,
                    "Synthetics (Browser)",
                    "Checks",
                    10_000.0,
                    10_000.0,
                    50.00,
                    "Browser test executions.",
                ),
                rule(
                    dims::USERS,
                    "Standard Users",
                    "Users",
                    3.0,
                    1.0,
                    8.00,
                    "Active users. First 3 free.",
                ),
                rule(
                    dims::ENTERPRISE_USERS,
                    "Enterprise Users",
                    "Users",
                    0.0,
                    1.0,
                    55.00,
                    "Users with Enterprise plugins access.",
                ),
                rule(
                    dims::IRM_USERS,
                    "IRM Users",
                    "Users",
                    3.0,
                    1.0,
                    20.00,
                    "Incident Response & Management users. First 3 free.",
                ),
                rule(
                    dims::K6,
                    "k6 Testing",
                    "VUh",
                    500.0,
                    1.0,
                    0.15,
                    "Virtual user hours for performance testing.",
                ),
            ],
        }
    }
}

/// Pricing configuration: catalog, credit rules and projection constants.
///
/// Constructed once at start-up and shared read-only. Every constructor
/// validates the whole bundle, so a `PricingConfig` in hand is always
/// internally consistent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PricingConfigFile")]
pub struct PricingConfig {
    catalog: Catalog,
    credit_rules: Vec<CreditRule>,
    projection: ProjectionConstants,
}

/// On-disk shape of a pricing configuration, prior to validation.
#[derive(Debug, Deserialize)]
struct PricingConfigFile {
    catalog: Catalog,
    #[serde(default)]
    credit_rules: Vec<CreditRule>,
    #[serde(default)]
    projection: ProjectionConstants,
}

impl TryFrom<PricingConfigFile> for PricingConfig {
    type Error = PricingError;

    fn try_from(file: PricingConfigFile) -> Result<Self> {
        Self::new(file.catalog, file.credit_rules, file.projection)
    }
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            catalog: Catalog::default(),
            credit_rules: vec![CreditRule::k8s_host_series_credit()],
            projection: ProjectionConstants::default(),
        }
    }
}

impl PricingConfig {
    /// Assemble and validate a configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a credit rule is malformed or references a
    /// dimension missing from the catalog, or if a projection target is not
    /// in the catalog or shared by two projector outputs.
    pub fn new(
        catalog: Catalog,
        credit_rules: Vec<CreditRule>,
        projection: ProjectionConstants,
    ) -> Result<Self> {
        for rule in &credit_rules {
            for (role, id) in [("source", rule.source()), ("target", rule.target())] {
                if !catalog.contains(id.as_str()) {
                    return Err(PricingError::InvalidCreditRule {
                        from: rule.source().clone(),
                        to: rule.target().clone(),
                        reason: format!("{role} dimension {id} is not in the catalog"),
                    });
                }
            }
        }

        projection.validate()?;
        if let Some(missing) = projection
            .targets
            .iter()
            .find(|id| !catalog.contains(id.as_str()))
        {
            return Err(PricingError::Configuration(format!(
                "projection target {missing} is not in the catalog"
            )));
        }
        let mut seen = HashSet::new();
        if let Some(repeated) = projection.targets.iter().find(|id| !seen.insert(*id)) {
            return Err(PricingError::Configuration(format!(
                "projection target {repeated} is used more than once"
            )));
        }

        Ok(Self {
            catalog,
            credit_rules,
            projection,
        })
    }

    /// Parse and validate a configuration from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the configuration fails
    /// validation.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| PricingError::Configuration(e.to_string()))
    }

    /// Read and validate a configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or its contents are
    /// invalid.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            PricingError::Configuration(format!("failed to read {}: {e}", path.display()))
        })?;
        let config = Self::from_json_str(&contents)?;
        tracing::info!(
            path = %path.display(),
            dimensions = config.catalog.len(),
            credit_rules = config.credit_rules.len(),
            "Loaded pricing catalog"
        );
        Ok(config)
    }

    /// The pricing catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Cross-dimension credit rules.
    #[must_use]
    pub fn credit_rules(&self) -> &[CreditRule] {
        &self.credit_rules
    }

    /// Constants used by the usage projector.
    #[must_use]
    pub fn projection(&self) -> &ProjectionConstants {
        &self.projection
    }

    /// Price a usage set against this configuration.
    #[must_use]
    pub fn estimate(&self, usage: &UsageQuantities) -> CostEstimate {
        engine::compute_total(usage, &self.catalog, &self.credit_rules)
    }

    /// Project usage from an estimator shape using this configuration's
    /// constants.
    #[must_use]
    pub fn project(&self, shape: &EstimatorShape) -> ProjectedUsage {
        projector::project_from_shape(shape, &self.projection)
    }

    /// Project usage and key it by the configured target dimensions.
    #[must_use]
    pub fn projected_usage(&self, shape: &EstimatorShape) -> UsageQuantities {
        self.project(shape).to_usage(&self.projection.targets)
    }

    /// Check that a caller-supplied dimension id is priced by the catalog.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::UnknownDimension`] if it is not.
    pub fn require_dimension(&self, id: &str) -> Result<&PricingRule> {
        self.catalog
            .get(id)
            .ok_or_else(|| PricingError::UnknownDimension(id.to_string()))
    }
}
