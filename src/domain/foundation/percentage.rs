//! Percentage/decimal scale conversion.
//!
//! Percentage-scaled inputs are edited on the 0-100 scale but every stored
//! performance value is on the natural (decimal) scale.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Factor between the percentage and decimal scale.
pub const PERCENT_FACTOR: f64 = 100.0;

/// Scale on which a parameter is entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputScale {
    Percentage,
    Decimal,
}

impl InputScale {
    /// Converts an entered value to the decimal scale.
    pub fn to_decimal(&self, value: f64) -> f64 {
        match self {
            InputScale::Percentage => from_percentage(value),
            InputScale::Decimal => value,
        }
    }

    /// Suffix shown after values entered on this scale.
    pub fn suffix(&self) -> &'static str {
        match self {
            InputScale::Percentage => "%",
            InputScale::Decimal => "",
        }
    }
}

impl fmt::Display for InputScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputScale::Percentage => write!(f, "percentage"),
            InputScale::Decimal => write!(f, "decimal"),
        }
    }
}

/// Converts a decimal value to the percentage scale.
pub fn to_percentage(value: f64) -> f64 {
    value * PERCENT_FACTOR
}

/// Converts a percentage value to the decimal scale.
pub fn from_percentage(value: f64) -> f64 {
    value / PERCENT_FACTOR
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn from_percentage_divides_by_hundred() {
        assert!((from_percentage(42.0) - 0.42).abs() < f64::EPSILON);
    }

    #[test]
    fn to_percentage_multiplies_by_hundred() {
        assert!((to_percentage(0.5) - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn decimal_scale_leaves_values_alone() {
        assert_eq!(InputScale::Decimal.to_decimal(0.3), 0.3);
        assert_eq!(InputScale::Decimal.suffix(), "");
    }

    #[test]
    fn percentage_scale_has_percent_suffix() {
        assert_eq!(InputScale::Percentage.suffix(), "%");
        assert!((InputScale::Percentage.to_decimal(25.0) - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn input_scale_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&InputScale::Percentage).unwrap(),
            "\"percentage\""
        );
    }

    proptest! {
        #[test]
        fn percentage_round_trip_is_idempotent(value in -1.0e9f64..1.0e9f64) {
            let round_tripped = from_percentage(to_percentage(value));
            let tolerance = 1e-12 * value.abs().max(1.0);
            prop_assert!((round_tripped - value).abs() <= tolerance);
        }
    }
}
