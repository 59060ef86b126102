//! Pricing engine.
//!
//! Turns a [`UsageQuantities`] set into per-dimension [`CostLineItem`]s and a
//! total, applying cross-dimension credits first. All functions here are
//! pure: costs are returned at full precision and rounding for display is
//! left to [`crate::format`].

use std::collections::BTreeMap;

use serde::Serialize;

use crate::credits::CreditRule;
use crate::ids::DimensionId;
use crate::pricing::{Catalog, PricingRule};
use crate::usage::UsageQuantities;

/// Cost of one catalog dimension for a billing period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostLineItem {
    /// Dimension priced.
    pub id: DimensionId,
    /// Display name of the dimension.
    pub name: String,
    /// Consumed quantity.
    pub quantity: f64,
    /// Allowance from the catalog rule.
    pub included_quantity: f64,
    /// Extra allowance granted by credit rules.
    pub bonus_included: f64,
    /// Quantity above the effective allowance.
    pub billable_quantity: f64,
    /// Whole billing steps charged.
    pub billed_units: f64,
    /// Cost at full precision.
    pub cost: f64,
}

impl CostLineItem {
    /// Allowance after credits.
    #[must_use]
    pub fn effective_allowance(&self) -> f64 {
        self.included_quantity + self.bonus_included
    }

    /// Whether usage stayed inside the free allowance.
    #[must_use]
    pub fn is_free(&self) -> bool {
        self.cost <= 0.0
    }
}

/// Allowance summary for a dimension that received credits.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppliedCredit {
    /// Dimension receiving the credit.
    pub target: DimensionId,
    /// Allowance from the catalog rule.
    pub standard_included: f64,
    /// Bonus allowance from credit rules.
    pub bonus: f64,
    /// Sum of the two.
    pub total_included: f64,
}

/// Result of pricing a usage set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostEstimate {
    /// One line item per catalog dimension, in catalog order.
    pub line_items: Vec<CostLineItem>,
    /// Credits applied, one entry per credited catalog dimension.
    pub credits: Vec<AppliedCredit>,
    /// Sum of all line-item costs.
    pub total: f64,
}

impl CostEstimate {
    /// Line item for a dimension.
    #[must_use]
    pub fn line_item(&self, id: &str) -> Option<&CostLineItem> {
        self.line_items.iter().find(|item| item.id.as_str() == id)
    }

    /// Line items with a non-zero cost, in catalog order.
    pub fn billable_items(&self) -> impl Iterator<Item = &CostLineItem> {
        self.line_items.iter().filter(|item| !item.is_free())
    }

    /// Whether every dimension stayed inside its allowance.
    #[must_use]
    pub fn is_within_free_tier(&self) -> bool {
        self.line_items.iter().all(CostLineItem::is_free)
    }
}

/// Billing steps charged for a billable quantity: partial steps round up.
#[must_use]
pub fn billed_units(billable_quantity: f64, unit_step: f64) -> f64 {
    (billable_quantity / unit_step).ceil()
}

/// Cost of a single dimension.
///
/// `quantity` must already be sanitized (finite, non-negative) and `rule`
/// validated; `bonus_included` is the credit allowance for the dimension, or
/// zero when nothing credits it.
#[must_use]
pub fn compute_line_item_cost(quantity: f64, rule: &PricingRule, bonus_included: f64) -> f64 {
    line_item(quantity, rule, bonus_included).cost
}

/// Build the full line item for a single dimension.
#[must_use]
pub fn line_item(quantity: f64, rule: &PricingRule, bonus_included: f64) -> CostLineItem {
    let allowance = rule.included_quantity + bonus_included;
    let billable_quantity = (quantity - allowance).max(0.0);
    let units = billed_units(billable_quantity, rule.unit_step);

    CostLineItem {
        id: rule.id.clone(),
        name: rule.display_name().to_string(),
        quantity,
        included_quantity: rule.included_quantity,
        bonus_included,
        billable_quantity,
        billed_units: units,
        cost: units * rule.price_per_unit,
    }
}

/// Bonus allowance per target dimension.
///
/// Rules targeting the same dimension add up; the result does not depend on
/// rule order.
#[must_use]
pub fn resolve_credits(
    usage: &UsageQuantities,
    credit_rules: &[CreditRule],
) -> BTreeMap<DimensionId, f64> {
    let mut bonuses = BTreeMap::new();
    for rule in credit_rules {
        let bonus = rule.bonus_for(usage.get(rule.source().as_str()));
        *bonuses.entry(rule.target().clone()).or_insert(0.0) += bonus;
    }
    bonuses
}

/// Price every catalog dimension and sum the result.
///
/// Dimensions missing from `usage` still produce a zero-cost line item.
#[must_use]
pub fn compute_total(
    usage: &UsageQuantities,
    catalog: &Catalog,
    credit_rules: &[CreditRule],
) -> CostEstimate {
    let bonuses = resolve_credits(usage, credit_rules);

    let line_items: Vec<CostLineItem> = catalog
        .iter()
        .map(|rule| {
            let bonus = bonuses.get(rule.id.as_str()).copied().unwrap_or(0.0);
            line_item(usage.get(rule.id.as_str()), rule, bonus)
        })
        .collect();

    let credits = catalog
        .iter()
        .filter_map(|rule| {
            let bonus = *bonuses.get(rule.id.as_str())?;
            Some(AppliedCredit {
                target: rule.id.clone(),
                standard_included: rule.included_quantity,
                bonus,
                total_included: rule.included_quantity + bonus,
            })
        })
        .collect();

    let total: f64 = line_items.iter().map(|item| item.cost).sum();

    tracing::debug!(
        dimensions = line_items.len(),
        billable = line_items.iter().filter(|item| !item.is_free()).count(),
        total,
        "Computed cost estimate"
    );

    CostEstimate {
        line_items,
        credits,
        total,
    }
}
