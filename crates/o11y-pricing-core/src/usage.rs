//! Usage quantity types for o11y-pricing.
//!
//! A [`UsageQuantities`] set holds the consumed quantity per dimension for a
//! billing period. Dimensions that are absent count as zero.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ids::DimensionId;

/// Clamp a raw input quantity to the engine's domain.
///
/// Negative, NaN and infinite values become zero.
#[must_use]
pub fn sanitize_quantity(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Consumed quantity per dimension.
///
/// Every write path goes through [`sanitize_quantity`], so stored values are
/// always finite and non-negative.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<DimensionId, f64>", into = "BTreeMap<DimensionId, f64>")]
pub struct UsageQuantities {
    quantities: BTreeMap<DimensionId, f64>,
}

impl UsageQuantities {
    /// Create an empty usage set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Quantity consumed for a dimension, zero if absent.
    #[must_use]
    pub fn get(&self, id: &str) -> f64 {
        self.quantities.get(id).copied().unwrap_or(0.0)
    }

    /// Set the quantity for a dimension, clamping invalid input to zero.
    pub fn set(&mut self, id: DimensionId, quantity: f64) {
        self.quantities.insert(id, sanitize_quantity(quantity));
    }

    /// Builder form of [`UsageQuantities::set`].
    #[must_use]
    pub fn with(mut self, id: DimensionId, quantity: f64) -> Self {
        self.set(id, quantity);
        self
    }

    /// Remove a dimension, returning its previous quantity.
    pub fn remove(&mut self, id: &str) -> Option<f64> {
        self.quantities.remove(id)
    }

    /// Overwrite entries with those present in `other`.
    ///
    /// Dimensions missing from `other` keep their current value.
    pub fn merge(&mut self, other: &UsageQuantities) {
        for (id, quantity) in &other.quantities {
            self.quantities.insert(id.clone(), *quantity);
        }
    }

    /// Whether a dimension has an explicit entry.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.quantities.contains_key(id)
    }

    /// Iterate over explicit entries in id order.
    pub fn iter(&self) -> impl Iterator<Item = (&DimensionId, f64)> {
        self.quantities.iter().map(|(id, q)| (id, *q))
    }

    /// Number of explicit entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.quantities.len()
    }

    /// Whether there are no explicit entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.quantities.is_empty()
    }
}

impl From<BTreeMap<DimensionId, f64>> for UsageQuantities {
    fn from(map: BTreeMap<DimensionId, f64>) -> Self {
        map.into_iter().collect()
    }
}

impl From<UsageQuantities> for BTreeMap<DimensionId, f64> {
    fn from(usage: UsageQuantities) -> Self {
        usage.quantities
    }
}

impl FromIterator<(DimensionId, f64)> for UsageQuantities {
    fn from_iter<I: IntoIterator<Item = (DimensionId, f64)>>(iter: I) -> Self {
        let mut usage = Self::new();
        for (id, quantity) in iter {
            usage.set(id, quantity);
        }
        usage
    }
}
