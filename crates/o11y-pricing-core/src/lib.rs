//! Core pricing engine for o11y-pricing.
//!
//! This crate turns usage of a metered observability catalog into a monthly
//! cost estimate:
//!
//! - **Identifiers**: `DimensionId`
//! - **Catalog**: `PricingRule`, `Catalog`, `PricingConfig`
//! - **Credits**: `CreditRule`
//! - **Usage**: `UsageQuantities`
//! - **Engine**: `compute_line_item_cost`, `resolve_credits`, `compute_total`
//! - **Projector**: `EstimatorShape`, `project_from_shape`
//! - **Session**: `EstimatorSession`
//!
//! # Pricing model
//!
//! Each dimension has a free allowance, a billing step and a price per step.
//! Usage above the allowance is billed in whole steps, rounding up:
//!
//! - 15,000 active series, 10,000 included, $6.50 per 1,000 → 5 steps → $32.50
//! - 3,650 K8s host-hours grant 3,000 extra series (600 per 730 hours), so
//!   the same 15,000 series cost 2 steps → $13.00
//!
//! Costs are kept at full precision; see [`format`] for display rounding.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod credits;
pub mod engine;
pub mod error;
pub mod format;
pub mod ids;
pub mod pricing;
pub mod projector;
pub mod session;
pub mod usage;

pub use credits::{CreditRule, HOURS_PER_HOST_MONTH, SERIES_CREDIT_PER_HOST};
pub use engine::{
    billed_units, compute_line_item_cost, compute_total, line_item, resolve_credits,
    AppliedCredit, CostEstimate, CostLineItem,
};
pub use error::{PricingError, Result};
pub use ids::{dims, DimensionId, IdError};
pub use pricing::{Catalog, Metering, PricingConfig, PricingRule};
pub use projector::{
    project_from_shape, project_from_shape_default, ApplicationProjection, EstimatorShape,
    InfrastructureProjection, ProjectedUsage, ProjectionConstants, ProjectionTargets,
};
pub use session::EstimatorSession;
pub use usage::{sanitize_quantity, UsageQuantities};
