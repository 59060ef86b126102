//! Cross-dimension credit rules.
//!
//! A [`CreditRule`] grants bonus allowance to a target dimension in
//! proportion to what was consumed of a source dimension. The conversion is
//! a plain rational: every `source_units` consumed grant `bonus_units` of
//! target allowance, floored to a whole unit.

use serde::{Deserialize, Serialize};

use crate::error::{PricingError, Result};
use crate::ids::{dims, DimensionId};

/// Hours in a billing month for one host.
pub const HOURS_PER_HOST_MONTH: f64 = 730.0;

/// Active-series allowance granted per monitored Kubernetes host.
pub const SERIES_CREDIT_PER_HOST: f64 = 600.0;

/// A declarative cross-dimension credit.
///
/// Always validated: construction and deserialization reject ratios that
/// would produce an infinite or undefined bonus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CreditRuleFields", into = "CreditRuleFields")]
pub struct CreditRule {
    source: DimensionId,
    target: DimensionId,
    source_units: f64,
    bonus_units: f64,
}

/// Wire form of a [`CreditRule`], checked on the way in.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CreditRuleFields {
    source: DimensionId,
    target: DimensionId,
    source_units: f64,
    bonus_units: f64,
}

impl TryFrom<CreditRuleFields> for CreditRule {
    type Error = PricingError;

    fn try_from(fields: CreditRuleFields) -> Result<Self> {
        Self::new(
            fields.source,
            fields.target,
            fields.source_units,
            fields.bonus_units,
        )
    }
}

impl From<CreditRule> for CreditRuleFields {
    fn from(rule: CreditRule) -> Self {
        Self {
            source: rule.source,
            target: rule.target,
            source_units: rule.source_units,
            bonus_units: rule.bonus_units,
        }
    }
}

impl CreditRule {
    /// Create a credit rule.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::InvalidCreditRule`] if `source_units` is not
    /// strictly positive, `bonus_units` is negative, either is non-finite, or
    /// the rule credits its own source.
    pub fn new(
        source: DimensionId,
        target: DimensionId,
        source_units: f64,
        bonus_units: f64,
    ) -> Result<Self> {
        let rule = Self {
            source,
            target,
            source_units,
            bonus_units,
        };
        rule.validate()?;
        Ok(rule)
    }

    /// Kubernetes host-hours grant active-series allowance:
    /// every 730 host-hours (one host-month) adds 600 series.
    #[must_use]
    pub fn k8s_host_series_credit() -> Self {
        Self {
            source: DimensionId::from_static(dims::K8S_HOST_HOURS),
            target: DimensionId::from_static(dims::METRICS),
            source_units: HOURS_PER_HOST_MONTH,
            bonus_units: SERIES_CREDIT_PER_HOST,
        }
    }

    /// Dimension whose consumption grants the credit.
    #[must_use]
    pub fn source(&self) -> &DimensionId {
        &self.source
    }

    /// Dimension whose allowance is increased.
    #[must_use]
    pub fn target(&self) -> &DimensionId {
        &self.target
    }

    /// Source quantity per conversion block.
    #[must_use]
    pub fn source_units(&self) -> f64 {
        self.source_units
    }

    /// Target allowance granted per conversion block.
    #[must_use]
    pub fn bonus_units(&self) -> f64 {
        self.bonus_units
    }

    /// Bonus allowance granted for a consumed source quantity.
    ///
    /// Computes `floor(quantity * bonus_units / source_units)`. Negative or
    /// non-finite quantities grant nothing.
    #[must_use]
    pub fn bonus_for(&self, source_quantity: f64) -> f64 {
        if !source_quantity.is_finite() || source_quantity <= 0.0 {
            return 0.0;
        }
        (source_quantity * self.bonus_units / self.source_units).floor()
    }

    fn validate(&self) -> Result<()> {
        let invalid = |reason: &str| PricingError::InvalidCreditRule {
            from: self.source.clone(),
            to: self.target.clone(),
            reason: reason.to_string(),
        };

        if !self.source_units.is_finite() || self.source_units <= 0.0 {
            return Err(invalid("source_units must be finite and > 0"));
        }
        if !self.bonus_units.is_finite() || self.bonus_units < 0.0 {
            return Err(invalid("bonus_units must be finite and >= 0"));
        }
        if self.source == self.target {
            return Err(invalid("source and target must differ"));
        }
        Ok(())
    }
}
