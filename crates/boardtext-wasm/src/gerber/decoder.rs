//! Fixed-point coordinate decoding.

use super::types::Unit;

/// Millimeters per inch.
pub const MM_PER_INCH: f64 = 25.4;

/// Decodes a Gerber fixed-point digit string to millimeters.
///
/// The digits are read as a non-negative integer, divided by
/// `10^decimal_places`, then scaled from inches if `unit` is [`Unit::Inch`].
/// An empty or non-numeric string decodes to `0.0` rather than failing.
pub fn decode(digits: &str, decimal_places: u32, unit: Unit) -> f64 {
    let value = integer_value(digits) / 10_f64.powi(saturate_i32(decimal_places));
    match unit {
        Unit::Inch => value * MM_PER_INCH,
        Unit::Millimeter => value,
    }
}

#[allow(clippy::cast_precision_loss)]
fn integer_value(digits: &str) -> f64 {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return 0.0;
    }

    if let Ok(value) = digits.parse::<u64>() {
        return value as f64;
    }

    // Longer than u64: accumulate in floating point.
    digits
        .bytes()
        .fold(0.0, |acc, b| acc.mul_add(10.0, f64::from(b - b'0')))
}

fn saturate_i32(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}
