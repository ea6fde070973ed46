use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

/// Parses an invariant-culture decimal (`.` separator, optional sign and
/// exponent) into `f64`.
///
/// Returns a human-readable reason on failure so callers can attach line
/// context.
pub fn parse_invariant_decimal(field: &str, field_name: &str) -> Result<f64, String> {
    let trimmed = field.trim();
    if trimmed.is_empty() {
        return Err(format!("{field_name} is empty"));
    }

    let decimal = if trimmed.contains(['e', 'E']) {
        Decimal::from_scientific(trimmed)
    } else {
        Decimal::from_str(trimmed)
    }
    .map_err(|e| format!("{field_name} `{trimmed}` is not a decimal: {e}"))?;

    decimal_to_f64(decimal, field_name)
}

pub fn decimal_to_f64(value: Decimal, field_name: &str) -> Result<f64, String> {
    value
        .to_f64()
        .filter(|v| v.is_finite())
        .ok_or_else(|| format!("{field_name} cannot be represented as f64"))
}

/// Clamps to `[0, 1]`, mapping NaN to `0`.
#[must_use]
pub fn clamp01(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}
