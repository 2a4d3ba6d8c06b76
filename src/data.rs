//! Cell-level helpers shared by the analyzer and the aggregator.

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};

/// True when the cell is absent, empty, or only whitespace.
pub fn is_missing(cell: Option<&str>) -> bool {
    cell.is_none_or(|value| value.trim().is_empty())
}

/// Parses a cell as a finite float. `NaN` and infinities are rejected.
pub fn parse_numeric(cell: &str) -> Option<f64> {
    cell.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Rounds to `places` decimals with midpoints going away from zero.
///
/// Rounding happens on the shortest decimal form of `value`, so `2.675`
/// becomes `2.68` even though its binary value sits just below the midpoint.
/// Values outside `Decimal`'s range fall back to plain float rounding, and
/// values too large to carry a fractional part come back unchanged.
pub fn round_half_up(value: f64, places: u32) -> f64 {
    Decimal::from_str(&value.to_string())
        .ok()
        .map(|d| d.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|d| d.to_f64())
        .unwrap_or_else(|| {
            if value.abs() >= WHOLE_NUMBER_MAGNITUDE {
                return value;
            }
            let factor = 10f64.powi(places as i32);
            let scaled = (value * factor).round();
            if scaled.is_finite() {
                scaled / factor
            } else {
                value
            }
        })
}

// f64 has no fractional digits to round at or above this magnitude
const WHOLE_NUMBER_MAGNITUDE: f64 = 1e15;

pub fn format_fixed(value: f64, places: usize) -> String {
    let rounded = round_half_up(value, places as u32);
    // avoid rendering "-0.00"
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format!("{rounded:.places$}")
}
