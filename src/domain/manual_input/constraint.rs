//! Field constraints for input cell parameters.
//!
//! Every constraint takes the parameter value, the parameter's display label
//! and the cell it belongs to, and yields an error message when it fails.
//! Missing values only fail `Defined` / `NotNanOrNull`; every other check
//! passes on a missing value, and a bound read from a missing sibling
//! parameter never fails.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::InputCell;
use crate::domain::foundation::{format_number, PERCENT_FACTOR};

/// Position of a parameter within an input cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParameterSlot {
    #[serde(rename = "firstParameter")]
    First,
    #[serde(rename = "secondParameter")]
    Second,
    #[serde(rename = "thirdParameter")]
    Third,
}

impl ParameterSlot {
    pub const ALL: [ParameterSlot; 3] = [ParameterSlot::First, ParameterSlot::Second, ParameterSlot::Third];
}

/// Bound of a comparison constraint: a fixed number or a sibling parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Bound {
    Value(f64),
    Parameter(ParameterSlot),
}

impl Bound {
    fn resolve(&self, cell: &InputCell) -> Option<f64> {
        match self {
            Bound::Value(v) => Some(*v),
            Bound::Parameter(slot) => cell.parameter(*slot),
        }
    }
}

/// A named validation rule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "bound", rename_all = "camelCase")]
pub enum Constraint {
    Defined,
    #[serde(rename = "notNaNOrNull")]
    NotNanOrNull,
    Integer,
    Positive,
    Above(f64),
    AboveOrEqualTo(Bound),
    BelowOrEqualTo(Bound),
    /// Marks a parameter as entered on the 0-100 scale.
    Percentage,
    /// Marks a parameter as a proportion on the 0-1 scale.
    Decimal,
}

impl Constraint {
    pub fn defined() -> Self {
        Constraint::Defined
    }

    pub fn not_nan_or_null() -> Self {
        Constraint::NotNanOrNull
    }

    pub fn integer() -> Self {
        Constraint::Integer
    }

    pub fn positive() -> Self {
        Constraint::Positive
    }

    pub fn above(x: f64) -> Self {
        Constraint::Above(x)
    }

    pub fn above_or_equal_to(bound: Bound) -> Self {
        Constraint::AboveOrEqualTo(bound)
    }

    pub fn below_or_equal_to(bound: Bound) -> Self {
        Constraint::BelowOrEqualTo(bound)
    }

    pub fn percentage() -> Self {
        Constraint::Percentage
    }

    pub fn decimal() -> Self {
        Constraint::Decimal
    }

    /// Display name of the constraint.
    pub fn label(&self) -> &'static str {
        match self {
            Constraint::Defined => "defined",
            Constraint::NotNanOrNull => "notNaNOrNull",
            Constraint::Integer => "integer",
            Constraint::Positive => "positive",
            Constraint::Above(_) => "above",
            Constraint::AboveOrEqualTo(_) => "aboveOrEqualTo",
            Constraint::BelowOrEqualTo(_) => "belowOrEqualTo",
            Constraint::Percentage => "Proportion (percentage)",
            Constraint::Decimal => "Proportion (decimal)",
        }
    }

    /// True for the percentage and decimal markers.
    pub fn is_scale_marker(&self) -> bool {
        matches!(self, Constraint::Percentage | Constraint::Decimal)
    }

    /// Checks a value, returning the error message on failure.
    pub fn validate(&self, value: Option<f64>, label: &str, cell: &InputCell) -> Option<String> {
        let value = value.filter(|v| !v.is_nan());
        match (self, value) {
            (Constraint::Defined | Constraint::NotNanOrNull, None) => Some(format!("Invalid {}", label)),
            (_, None) => None,
            (Constraint::Defined | Constraint::NotNanOrNull, Some(_)) => None,
            (Constraint::Integer, Some(v)) => {
                (v.fract() != 0.0).then(|| format!("{} must be integer", label))
            }
            (Constraint::Positive, Some(v)) => (v < 0.0).then(|| format!("{} must be positive", label)),
            (Constraint::Above(x), Some(v)) => {
                (v <= *x).then(|| format!("{} must be above {}", label, format_number(*x)))
            }
            (Constraint::AboveOrEqualTo(bound), Some(v)) => bound
                .resolve(cell)
                .filter(|x| v < *x)
                .map(|x| format!("{} must be above or equal to {}", label, format_number(x))),
            (Constraint::BelowOrEqualTo(bound), Some(v)) => bound
                .resolve(cell)
                .filter(|x| v > *x)
                .map(|x| format!("{} must be below or equal to {}", label, format_number(x))),
            (Constraint::Percentage, Some(v)) => (!(0.0..=PERCENT_FACTOR).contains(&v))
                .then(|| format!("{} must be between 0 and 100", label)),
            (Constraint::Decimal, Some(v)) => {
                (!(0.0..=1.0).contains(&v)).then(|| format!("{} must be between 0 and 1", label))
            }
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Runs constraints in order and returns the first failure.
pub fn first_violation<'a>(
    constraints: impl IntoIterator<Item = &'a Constraint>,
    value: Option<f64>,
    label: &str,
    cell: &InputCell,
) -> Option<String> {
    constraints
        .into_iter()
        .find_map(|constraint| constraint.validate(value, label, cell))
}
