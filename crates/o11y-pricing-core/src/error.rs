//! Error types for o11y-pricing.

use crate::ids::{DimensionId, IdError};

/// Result type for o11y-pricing operations.
pub type Result<T> = std::result::Result<T, PricingError>;

/// Errors that can occur in o11y-pricing operations.
///
/// Cost computation itself never fails; these errors surface when a catalog
/// or credit rule is malformed, or when a caller names a dimension the
/// catalog does not know.
#[derive(Debug, thiserror::Error)]
pub enum PricingError {
    /// A pricing rule has an out-of-range field.
    #[error("invalid pricing rule {id}: {reason}")]
    InvalidRule {
        /// The offending dimension.
        id: DimensionId,
        /// What is wrong with it.
        reason: String,
    },

    /// Two pricing rules share the same dimension id.
    #[error("duplicate dimension in catalog: {0}")]
    DuplicateDimension(DimensionId),

    /// A dimension id is not part of the catalog.
    #[error("unknown dimension: {0}")]
    UnknownDimension(String),

    /// A credit rule is malformed or references unknown dimensions.
    #[error("invalid credit rule {from} -> {to}: {reason}")]
    InvalidCreditRule {
        /// Dimension whose consumption grants the credit.
        from: DimensionId,
        /// Dimension receiving the bonus allowance.
        to: DimensionId,
        /// What is wrong with it.
        reason: String,
    },

    /// Invalid identifier.
    #[error("invalid identifier: {0}")]
    InvalidId(#[from] IdError),

    /// Configuration could not be loaded.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for PricingError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
