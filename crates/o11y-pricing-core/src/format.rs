//! Display formatting for costs and quantities.
//!
//! The engine returns costs at full precision; these helpers are the only
//! place values get rounded, and only for presentation.

use crate::pricing::{Metering, PricingRule};

/// Fraction digits for ordinary currency values.
pub const CURRENCY_DECIMALS: usize = 2;

/// Fraction digits for costs of hourly-metered dimensions.
pub const HOURLY_CURRENCY_DECIMALS: usize = 3;

/// Fraction digits used when displaying a line-item cost for `rule`.
#[must_use]
pub fn display_decimals(rule: &PricingRule) -> usize {
    match rule.metering {
        Metering::Hourly => HOURLY_CURRENCY_DECIMALS,
        Metering::Quantity => CURRENCY_DECIMALS,
    }
}

/// Format a USD amount with thousands separators and a fixed number of
/// fraction digits, rounding half away from zero.
///
/// Non-finite values format as zero.
#[must_use]
pub fn format_usd(value: f64, decimals: usize) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    let (int_part, frac_part) = split_rounded(value.abs(), decimals);
    let negative = value < 0.0 && (int_part > 0 || frac_part > 0);

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push('$');
    out.push_str(&group_thousands(int_part));
    if decimals > 0 {
        out.push('.');
        out.push_str(&format!("{frac_part:0decimals$}"));
    }
    out
}

/// Format a line-item cost using the precision appropriate for its rule.
#[must_use]
pub fn format_cost(value: f64, rule: &PricingRule) -> String {
    format_usd(value, display_decimals(rule))
}

/// Format a unit price with two to four fraction digits (`6.50`, `0.015`).
#[must_use]
pub fn format_unit_price(price: f64) -> String {
    format_trimmed(price, 2, 4)
}

/// Format a quantity with thousands separators and up to three fraction
/// digits (`15,000`, `0.2`).
#[must_use]
pub fn format_quantity(value: f64) -> String {
    format_trimmed(value, 0, 3)
}

fn format_trimmed(value: f64, min_decimals: usize, max_decimals: usize) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    let (int_part, frac_part) = split_rounded(value.abs(), max_decimals);

    let mut frac = format!("{frac_part:0max_decimals$}");
    while frac.len() > min_decimals && frac.ends_with('0') {
        frac.pop();
    }

    let mut out = String::new();
    if value < 0.0 && (int_part > 0 || frac_part > 0) {
        out.push('-');
    }
    out.push_str(&group_thousands(int_part));
    if !frac.is_empty() {
        out.push('.');
        out.push_str(&frac);
    }
    out
}

/// Split a non-negative value into integer and fraction digits after
/// rounding to `decimals` places.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap
)]
fn split_rounded(value: f64, decimals: usize) -> (u128, u128) {
    let scale = 10u128.pow(decimals as u32);
    #[allow(clippy::cast_precision_loss)]
    let scaled = (value * scale as f64).round() as u128;
    (scaled / scale, scaled % scale)
}

fn group_thousands(value: u128) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::DimensionId;

    #[test]
    fn usd_two_decimals() {
        assert_eq!(format_usd(32.5, 2), "$32.50");
        assert_eq!(format_usd(0.0, 2), "$0.00");
        assert_eq!(format_usd(1_234.5, 2), "$1,234.50");
        assert_eq!(format_usd(1_234_567.891, 2), "$1,234,567.89");
    }

    #[test]
    fn usd_three_decimals() {
        assert_eq!(format_usd(0.0146, 3), "$0.015");
        assert_eq!(format_usd(21.27, 3), "$21.270");
    }

    #[test]
    fn usd_rounds_half_away_from_zero() {
        assert_eq!(format_usd(0.125, 2), "$0.13");
        assert_eq!(format_usd(-0.125, 2), "-$0.13");
    }

    #[test]
    fn usd_edge_values() {
        assert_eq!(format_usd(-0.001, 2), "$0.00");
        assert_eq!(format_usd(f64::NAN, 2), "$0.00");
        assert_eq!(format_usd(12.0, 0), "$12");
    }

    #[test]
    fn cost_precision_follows_metering() {
        let hourly = PricingRule::new(DimensionId::new("k8sHostHours").unwrap(), 0.0, 1.0, 0.015)
            .with_metering(Metering::Hourly);
        let plain = PricingRule::new(DimensionId::new("logs").unwrap(), 0.0, 1.0, 0.5);

        assert_eq!(display_decimals(&hourly), 3);
        assert_eq!(display_decimals(&plain), 2);
        assert_eq!(format_cost(21.27, &hourly), "$21.270");
        assert_eq!(format_cost(5.0, &plain), "$5.00");
    }

    #[test]
    fn unit_prices() {
        assert_eq!(format_unit_price(6.5), "6.50");
        assert_eq!(format_unit_price(0.015), "0.015");
        assert_eq!(format_unit_price(0.001), "0.001");
        assert_eq!(format_unit_price(55.0), "55.00");
    }

    #[test]
    fn quantities() {
        assert_eq!(format_quantity(15_000.0), "15,000");
        assert_eq!(format_quantity(0.2), "0.2");
        assert_eq!(format_quantity(100_000.0), "100,000");
        assert_eq!(format_quantity(999.0), "999");
        assert_eq!(format_quantity(1_000.5), "1,000.5");
    }
}
