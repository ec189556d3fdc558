//! One editable cell of the manual input grid.

use serde::{Deserialize, Serialize};

use super::constraint::ParameterSlot;
use super::descriptor::{InputDescriptor, InputKind};

/// Message reported for a cell without an input type.
pub const NO_INPUT_TYPE: &str = "No input type selected";

fn default_invalid() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputCell {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_parameters: Option<InputDescriptor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_parameter: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub second_parameter: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub third_parameter: Option<f64>,
    #[serde(rename = "lowerBoundNE", default)]
    pub lower_bound_ne: bool,
    #[serde(rename = "upperBoundNE", default)]
    pub upper_bound_ne: bool,
    #[serde(default = "default_invalid")]
    pub is_invalid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl InputCell {
    /// A fresh cell with no input type, marked invalid.
    pub fn new_invalid() -> Self {
        Self {
            input_parameters: None,
            first_parameter: None,
            second_parameter: None,
            third_parameter: None,
            lower_bound_ne: false,
            upper_bound_ne: false,
            is_invalid: true,
            label: None,
        }
    }

    /// A cell of the given type with parameters filled in and validity
    /// computed.
    pub fn with_parameters(descriptor: InputDescriptor, parameters: [Option<f64>; 3]) -> Self {
        let [first, second, third] = parameters;
        let mut cell = Self {
            input_parameters: Some(descriptor),
            first_parameter: first,
            second_parameter: second,
            third_parameter: third,
            ..Self::new_invalid()
        };
        cell.refresh_validity();
        cell
    }

    pub fn kind(&self) -> Option<InputKind> {
        self.input_parameters.as_ref().map(|descriptor| descriptor.id)
    }

    pub fn parameter(&self, slot: ParameterSlot) -> Option<f64> {
        match slot {
            ParameterSlot::First => self.first_parameter,
            ParameterSlot::Second => self.second_parameter,
            ParameterSlot::Third => self.third_parameter,
        }
    }

    /// Sets one parameter and revalidates the cell.
    pub fn set_parameter(&mut self, slot: ParameterSlot, value: Option<f64>) {
        match slot {
            ParameterSlot::First => self.first_parameter = value,
            ParameterSlot::Second => self.second_parameter = value,
            ParameterSlot::Third => self.third_parameter = value,
        }
        self.refresh_validity();
    }

    /// Whether a bound parameter is flagged non-estimable.
    pub fn is_not_estimable(&self, slot: ParameterSlot) -> bool {
        match slot {
            ParameterSlot::Second => self.lower_bound_ne && self.kind() == Some(InputKind::ValueCi),
            ParameterSlot::Third => self.upper_bound_ne && self.kind() == Some(InputKind::ValueCi),
            ParameterSlot::First => false,
        }
    }

    pub fn is_percentage(&self) -> bool {
        self.input_parameters
            .as_ref()
            .map(InputDescriptor::is_percentage)
            .unwrap_or(false)
    }

    /// First validation message for this cell, if any. Empty cells are
    /// always valid.
    pub fn input_error(&self) -> Option<String> {
        match &self.input_parameters {
            None => Some(NO_INPUT_TYPE.to_string()),
            Some(descriptor) => descriptor.input_error(self),
        }
    }

    /// Valid by flag and by its current constraints, so a stale flag
    /// never lets a broken cell through.
    pub fn is_valid(&self) -> bool {
        !self.is_invalid && self.input_error().is_none()
    }

    /// Recomputes `is_invalid` from the constraints.
    pub fn refresh_validity(&mut self) {
        self.is_invalid = self.input_error().is_some();
    }

    /// Display text of a valid cell.
    pub fn format(&self) -> Option<String> {
        self.input_parameters
            .as_ref()
            .map(|descriptor| descriptor.format_cell(self))
    }
}

impl Default for InputCell {
    fn default() -> Self {
        Self::new_invalid()
    }
}
