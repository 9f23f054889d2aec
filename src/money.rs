//! Two-decimal rounding and tolerance helpers for monetary amounts.
//!
//! Amounts are carried as `f64` through every computation. Rounding goes
//! through `rust_decimal` so that midpoints like `1.005` round away from zero
//! the way a person would expect, rather than following the binary
//! representation of the float.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};

/// Number of decimal places amounts are rounded to on output.
pub const SCALE: u32 = 2;

/// Balances whose magnitude does not exceed this are considered settled.
pub const TOLERANCE: f64 = 0.01;

fn to_scaled_decimal(value: f64) -> Option<Decimal> {
    let rounded = Decimal::from_f64(value)?
        .round_dp_with_strategy(SCALE, RoundingStrategy::MidpointAwayFromZero);
    if rounded.is_zero() {
        Some(Decimal::ZERO)
    } else {
        Some(rounded)
    }
}

/// Rounds `value` to 2 decimal places, half away from zero.
///
/// Non-finite input is returned unchanged.
///
/// # Examples
///
/// ```
/// use expense_splitter::money::round2;
///
/// assert!((round2(13.3333) - 13.33).abs() < 1e-9);
/// assert_eq!(round2(-25.0), -25.0);
/// ```
pub fn round2(value: f64) -> f64 {
    to_scaled_decimal(value)
        .and_then(|d| d.to_f64())
        .unwrap_or(value)
}

/// Returns `true` if `value` lies inside the ±0.01 dead zone.
pub fn is_settled(value: f64) -> bool {
    value.abs() <= TOLERANCE
}

/// Formats `value` with exactly 2 decimal places.
///
/// Values outside the `rust_decimal` range fall back to `f64` formatting.
pub fn format_amount(value: f64) -> String {
    match to_scaled_decimal(value) {
        Some(mut d) => {
            d.rescale(SCALE);
            d.to_string()
        }
        None => format!("{:.2}", value),
    }
}
