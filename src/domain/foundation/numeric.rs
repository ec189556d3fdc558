//! Rounding and number formatting shared by labels and derivations.

/// Rounds to three significant digits for values in (-1, 1), otherwise to
/// three decimals.
pub fn significant_digits(value: f64) -> f64 {
    if value == 0.0 || !value.is_finite() {
        return value;
    }
    if value.abs() > 1.0 {
        return round_decimals(value, 3);
    }
    let magnitude = value.abs().log10().floor() as i32;
    let factor = 10f64.powi(2 - magnitude);
    (value * factor).round() / factor
}

/// Rounds to a fixed number of decimal places.
pub fn round_decimals(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Formats a number the shortest way that round-trips (`42`, `0.42`).
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    format!("{}", value)
}
