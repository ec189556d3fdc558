//! Editing state of the manual input wizard.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::descriptor::InputCategory;
use super::InputCell;
use crate::domain::foundation::{AlternativeId, DataSourceId};
use crate::domain::workspace::{Alternative, Criterion, Problem};

/// Cells keyed by data source, then alternative.
pub type CellGrid = BTreeMap<DataSourceId, BTreeMap<AlternativeId, InputCell>>;

/// Effect and distribution grids.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputData {
    #[serde(default)]
    pub effect: CellGrid,
    #[serde(default)]
    pub distribution: CellGrid,
}

impl InputData {
    pub fn grid(&self, category: InputCategory) -> &CellGrid {
        match category {
            InputCategory::Effect => &self.effect,
            InputCategory::Distribution => &self.distribution,
        }
    }

    pub fn grid_mut(&mut self, category: InputCategory) -> &mut CellGrid {
        match category {
            InputCategory::Effect => &mut self.effect,
            InputCategory::Distribution => &mut self.distribution,
        }
    }

    pub fn cell(
        &self,
        category: InputCategory,
        data_source: &DataSourceId,
        alternative: &AlternativeId,
    ) -> Option<&InputCell> {
        self.grid(category).get(data_source)?.get(alternative)
    }

    /// Replaces a cell, creating its row when needed.
    pub fn set_cell(
        &mut self,
        category: InputCategory,
        data_source: DataSourceId,
        alternative: AlternativeId,
        cell: InputCell,
    ) {
        self.grid_mut(category)
            .entry(data_source)
            .or_default()
            .insert(alternative, cell);
    }
}

/// Step of the wizard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Step {
    #[default]
    Step1,
    Step2,
}

/// A previously saved workspace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OldWorkspace {
    pub problem: Problem,
}

/// Everything the manual input editor works on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct State {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_workspace: Option<OldWorkspace>,
    pub use_favorability: bool,
    pub step: Step,
    pub is_input_data_valid: bool,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub criteria: Vec<Criterion>,
    pub alternatives: Vec<Alternative>,
    pub input_data: InputData,
}
