//! Unit of measurement and theoretical scale of a data source.

use serde::{Deserialize, Serialize};

/// Kind of unit a data source is measured in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitType {
    Percentage,
    Decimal,
    #[default]
    Custom,
}

/// Theoretical numeric range of a data source. `None` means unbounded on that
/// side and serializes as `null`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Scale(pub Option<f64>, pub Option<f64>);

impl Scale {
    /// The unbounded scale `[-inf, inf]`.
    pub const UNBOUNDED: Self = Self(None, None);

    /// Creates a scale from explicit bounds.
    pub fn new(lower: Option<f64>, upper: Option<f64>) -> Self {
        Self(lower, upper)
    }

    pub fn lower(&self) -> Option<f64> {
        self.0
    }

    pub fn upper(&self) -> Option<f64> {
        self.1
    }

    /// Returns true for the `[0, 1]` or `[0, 100]` scales.
    pub fn is_proportion(&self) -> bool {
        matches!(self, Scale(Some(l), Some(u)) if *l == 0.0 && (*u == 1.0 || *u == 100.0))
    }
}

/// Unit of measurement of a data source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitOfMeasurement {
    #[serde(rename = "type")]
    pub unit_type: UnitType,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub lower_bound: Option<f64>,
    #[serde(default)]
    pub upper_bound: Option<f64>,
}

impl UnitOfMeasurement {
    /// Percentage unit on `[0, 100]`.
    pub fn percentage() -> Self {
        Self {
            unit_type: UnitType::Percentage,
            label: "%".to_string(),
            lower_bound: Some(0.0),
            upper_bound: Some(100.0),
        }
    }

    /// Decimal proportion on `[0, 1]`.
    pub fn decimal() -> Self {
        Self {
            unit_type: UnitType::Decimal,
            label: String::new(),
            lower_bound: Some(0.0),
            upper_bound: Some(1.0),
        }
    }

    /// Custom unit with optional bounds.
    pub fn custom(label: impl Into<String>, lower_bound: Option<f64>, upper_bound: Option<f64>) -> Self {
        Self {
            unit_type: UnitType::Custom,
            label: label.into(),
            lower_bound,
            upper_bound,
        }
    }

    /// Scale implied by the unit's bounds.
    ///
    /// Percentages are stored on the decimal scale, so a percentage unit
    /// yields `[0, 1]`.
    pub fn scale(&self) -> Scale {
        match self.unit_type {
            UnitType::Percentage => Scale(Some(0.0), Some(1.0)),
            _ => Scale(self.lower_bound, self.upper_bound),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_unit_has_decimal_scale() {
        assert_eq!(UnitOfMeasurement::percentage().scale(), Scale(Some(0.0), Some(1.0)));
    }

    #[test]
    fn custom_unit_scale_follows_bounds() {
        let unit = UnitOfMeasurement::custom("mg", Some(0.0), None);
        assert_eq!(unit.scale(), Scale(Some(0.0), None));
        assert_eq!(UnitOfMeasurement::default().scale(), Scale::UNBOUNDED);
    }

    #[test]
    fn proportion_scales_are_detected() {
        assert!(Scale(Some(0.0), Some(1.0)).is_proportion());
        assert!(Scale(Some(0.0), Some(100.0)).is_proportion());
        assert!(!Scale(Some(0.0), None).is_proportion());
        assert!(!Scale::UNBOUNDED.is_proportion());
    }

    #[test]
    fn unbounded_scale_serializes_as_nulls() {
        assert_eq!(serde_json::to_string(&Scale::UNBOUNDED).unwrap(), "[null,null]");
    }

    #[test]
    fn unit_deserializes_from_camel_case_json() {
        let json = r#"{"type":"decimal","label":"","lowerBound":0,"upperBound":1}"#;
        let unit: UnitOfMeasurement = serde_json::from_str(json).unwrap();
        assert_eq!(unit, UnitOfMeasurement::decimal());
    }
}
