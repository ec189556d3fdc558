//! Input-type descriptors.
//!
//! A descriptor names an input type, lists its parameters with their
//! constraints and knows how to render a cell of that type. Descriptors are
//! plain owned values built on demand; editing one cell's copy never leaks
//! into another.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::constraint::{first_violation, Bound, Constraint, ParameterSlot};
use super::InputCell;
use crate::domain::foundation::format_number;

/// Whether a cell holds a point estimate or a distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputCategory {
    Effect,
    Distribution,
}

/// All supported input types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InputKind {
    Value,
    #[serde(rename = "valueSE")]
    ValueSe,
    #[serde(rename = "valueCI")]
    ValueCi,
    ValueSampleSize,
    EventsSampleSize,
    Normal,
    Beta,
    Gamma,
    Empty,
}

impl InputKind {
    pub fn id(&self) -> &'static str {
        match self {
            InputKind::Value => "value",
            InputKind::ValueSe => "valueSE",
            InputKind::ValueCi => "valueCI",
            InputKind::ValueSampleSize => "valueSampleSize",
            InputKind::EventsSampleSize => "eventsSampleSize",
            InputKind::Normal => "normal",
            InputKind::Beta => "beta",
            InputKind::Gamma => "gamma",
            InputKind::Empty => "empty",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            InputKind::Value => "Value",
            InputKind::ValueSe => "Value, SE",
            InputKind::ValueCi => "Value, 95% C.I.",
            InputKind::ValueSampleSize => "Value, sample size",
            InputKind::EventsSampleSize => "Events / Sample size",
            InputKind::Normal => "Normal",
            InputKind::Beta => "Beta",
            InputKind::Gamma => "Gamma",
            InputKind::Empty => "Empty cell",
        }
    }

    /// Whether the unit of measurement adds scale and bound constraints.
    pub fn accepts_unit_constraints(&self) -> bool {
        matches!(
            self,
            InputKind::Value | InputKind::ValueSe | InputKind::ValueCi | InputKind::ValueSampleSize
        )
    }

    /// Types carrying a point value in their first parameter.
    pub fn is_value_class(&self) -> bool {
        !matches!(
            self,
            InputKind::Normal | InputKind::Beta | InputKind::Gamma | InputKind::Empty
        )
    }

    /// Input types offered for a category, in menu order.
    pub fn options(category: InputCategory) -> &'static [InputKind] {
        match category {
            InputCategory::Effect => &[
                InputKind::Value,
                InputKind::ValueSe,
                InputKind::ValueCi,
                InputKind::ValueSampleSize,
                InputKind::EventsSampleSize,
                InputKind::Empty,
            ],
            InputCategory::Distribution => &[
                InputKind::Normal,
                InputKind::Beta,
                InputKind::Gamma,
                InputKind::Value,
                InputKind::Empty,
            ],
        }
    }
}

impl fmt::Display for InputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// One parameter of an input type.
///
/// `constraints` belong to the input type; `unit_constraints` come from the
/// data source's unit of measurement and are replaced whenever it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterSpec {
    pub label: String,
    pub constraints: Vec<Constraint>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unit_constraints: Vec<Constraint>,
}

impl ParameterSpec {
    fn new(label: &str, constraints: Vec<Constraint>) -> Self {
        Self {
            label: label.to_string(),
            constraints,
            unit_constraints: Vec::new(),
        }
    }

    fn defined(label: &str) -> Self {
        Self::new(label, vec![Constraint::defined()])
    }

    fn positive_float(label: &str) -> Self {
        Self::new(label, vec![Constraint::defined(), Constraint::positive()])
    }

    fn float_above_zero(label: &str) -> Self {
        Self::new(label, vec![Constraint::defined(), Constraint::above(0.0)])
    }

    fn integer_above_zero(label: &str) -> Self {
        let mut spec = Self::float_above_zero(label);
        spec.constraints.push(Constraint::integer());
        spec
    }

    /// All constraints, own ones first.
    pub fn all_constraints(&self) -> impl Iterator<Item = &Constraint> {
        self.constraints.iter().chain(self.unit_constraints.iter())
    }

    pub fn has_constraint(&self, constraint: &Constraint) -> bool {
        self.all_constraints().any(|c| c == constraint)
    }

    /// Drops the percentage and decimal markers.
    pub fn without_scale_markers(mut self) -> Self {
        self.unit_constraints.retain(|c| !c.is_scale_marker());
        self
    }

    pub fn validate(&self, value: Option<f64>, cell: &InputCell) -> Option<String> {
        first_violation(self.all_constraints(), value, &self.label, cell)
    }
}

/// An input type together with its parameter metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputDescriptor {
    pub id: InputKind,
    pub category: InputCategory,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_parameter: Option<ParameterSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub second_parameter: Option<ParameterSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub third_parameter: Option<ParameterSpec>,
}

impl InputDescriptor {
    /// Builds a fresh descriptor for an input type.
    pub fn new(id: InputKind, category: InputCategory) -> Self {
        let (first, second, third) = match id {
            InputKind::Value => (Some(ParameterSpec::defined("Value")), None, None),
            InputKind::ValueSe => (
                Some(ParameterSpec::defined("Value")),
                Some(ParameterSpec::positive_float("Standard error")),
                None,
            ),
            InputKind::ValueCi => (
                Some(ParameterSpec::defined("Value")),
                Some(ParameterSpec::new(
                    "Lower bound",
                    vec![
                        Constraint::defined(),
                        Constraint::below_or_equal_to(Bound::Parameter(ParameterSlot::First)),
                    ],
                )),
                Some(ParameterSpec::new(
                    "Upper bound",
                    vec![
                        Constraint::defined(),
                        Constraint::above_or_equal_to(Bound::Parameter(ParameterSlot::First)),
                    ],
                )),
            ),
            InputKind::ValueSampleSize => (
                Some(ParameterSpec::defined("Value")),
                Some(ParameterSpec::integer_above_zero("Sample size")),
                None,
            ),
            InputKind::EventsSampleSize => (
                Some(ParameterSpec::new(
                    "Events",
                    vec![
                        Constraint::defined(),
                        Constraint::positive(),
                        Constraint::integer(),
                        Constraint::below_or_equal_to(Bound::Parameter(ParameterSlot::Second)),
                    ],
                )),
                Some(ParameterSpec::integer_above_zero("Sample size")),
                None,
            ),
            InputKind::Normal => (
                Some(ParameterSpec::defined("Mean")),
                Some(ParameterSpec::positive_float("Standard error")),
                None,
            ),
            InputKind::Beta => (
                Some(ParameterSpec::integer_above_zero("Alpha")),
                Some(ParameterSpec::integer_above_zero("Beta")),
                None,
            ),
            InputKind::Gamma => (
                Some(ParameterSpec::float_above_zero("Alpha")),
                Some(ParameterSpec::float_above_zero("Beta")),
                None,
            ),
            InputKind::Empty => (None, None, None),
        };
        Self {
            id,
            category,
            label: id.label().to_string(),
            first_parameter: first,
            second_parameter: second,
            third_parameter: third,
        }
    }

    pub fn parameter(&self, slot: ParameterSlot) -> Option<&ParameterSpec> {
        match slot {
            ParameterSlot::First => self.first_parameter.as_ref(),
            ParameterSlot::Second => self.second_parameter.as_ref(),
            ParameterSlot::Third => self.third_parameter.as_ref(),
        }
    }

    pub fn parameter_mut(&mut self, slot: ParameterSlot) -> Option<&mut ParameterSpec> {
        match slot {
            ParameterSlot::First => self.first_parameter.as_mut(),
            ParameterSlot::Second => self.second_parameter.as_mut(),
            ParameterSlot::Third => self.third_parameter.as_mut(),
        }
    }

    /// Slots whose values live on the same scale as the main value.
    pub fn value_slots(&self) -> &'static [ParameterSlot] {
        match self.id {
            InputKind::Value | InputKind::ValueSe | InputKind::ValueSampleSize => &[ParameterSlot::First],
            InputKind::ValueCi => &ParameterSlot::ALL,
            _ => &[],
        }
    }

    /// True when the first parameter carries the percentage marker.
    pub fn is_percentage(&self) -> bool {
        self.first_parameter
            .as_ref()
            .map(|spec| spec.has_constraint(&Constraint::Percentage))
            .unwrap_or(false)
    }

    /// First constraint failure over all parameters, skipping bounds marked
    /// non-estimable.
    pub fn input_error(&self, cell: &InputCell) -> Option<String> {
        ParameterSlot::ALL.iter().find_map(|slot| {
            if cell.is_not_estimable(*slot) {
                return None;
            }
            self.parameter(*slot)
                .and_then(|spec| spec.validate(cell.parameter(*slot), cell))
        })
    }

    /// Renders a cell of this type for display.
    pub fn format_cell(&self, cell: &InputCell) -> String {
        let pct = if self.is_percentage() { "%" } else { "" };
        let first = number(cell.first_parameter);
        let second = number(cell.second_parameter);
        match self.id {
            InputKind::Value => format!("{}{}", first, pct),
            InputKind::ValueSe => format!("{}{} ({}{})", first, pct, second, pct),
            InputKind::ValueCi => {
                let lower = bound_text(cell.lower_bound_ne, cell.second_parameter, pct);
                let upper = bound_text(cell.upper_bound_ne, cell.third_parameter, pct);
                format!("{}{} ({}; {})", first, pct, lower, upper)
            }
            InputKind::ValueSampleSize => format!("{}{} ({})", first, pct, second),
            InputKind::EventsSampleSize => format!("{} / {}", first, second),
            InputKind::Normal => format!("Normal({}, {})", first, second),
            InputKind::Beta => format!("Beta({}, {})", first, second),
            InputKind::Gamma => format!("Gamma({}, {})", first, second),
            InputKind::Empty => "empty cell".to_string(),
        }
    }
}

fn number(value: Option<f64>) -> String {
    value.map(format_number).unwrap_or_default()
}

fn bound_text(not_estimable: bool, value: Option<f64>, pct: &str) -> String {
    if not_estimable {
        "NE".to_string()
    } else {
        format!("{}{}", number(value), pct)
    }
}
