//! Manual input service - grid preparation, validation and derivation.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::warn;

use super::constraint::{Bound, Constraint};
use super::errors::ManualInputError;
use super::state::{CellGrid, InputData};
use super::InputCell;
use crate::domain::foundation::{AlternativeId, DataSourceId, UnitOfMeasurement, UnitType};
use crate::domain::workspace::{Alternative, Criterion};
use crate::ports::IdGenerator;

/// Text shown for a cell that cannot be rendered.
pub const INVALID_INPUT_MESSAGE: &str = "Missing or invalid input";

/// Default schema version stamped on new problems.
pub const DEFAULT_SCHEMA_VERSION: &str = "1.2.0";

/// Default title of the value tree root.
pub const DEFAULT_VALUE_TREE_TITLE: &str = "Benefit-risk balance";

/// Values stamped on every problem this service creates.
#[derive(Debug, Clone, PartialEq)]
pub struct ProblemSettings {
    pub schema_version: String,
    pub value_tree_title: String,
}

impl Default for ProblemSettings {
    fn default() -> Self {
        Self {
            schema_version: DEFAULT_SCHEMA_VERSION.to_string(),
            value_tree_title: DEFAULT_VALUE_TREE_TITLE.to_string(),
        }
    }
}

/// Entry point for manual input operations.
///
/// Operations that only look at cells are associated functions. Problem
/// creation and workspace migration need settings and fresh ids, so they
/// are methods.
pub struct ManualInputService {
    pub(super) settings: ProblemSettings,
    pub(super) ids: Arc<dyn IdGenerator>,
}

impl fmt::Debug for ManualInputService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManualInputService")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl ManualInputService {
    pub fn new(settings: ProblemSettings, ids: Arc<dyn IdGenerator>) -> Self {
        Self { settings, ids }
    }

    pub fn settings(&self) -> &ProblemSettings {
        &self.settings
    }

    /// First constraint failure of a cell, checking parameters in order.
    pub fn get_input_error(cell: &InputCell) -> Option<String> {
        cell.input_error()
    }

    pub fn input_to_string(cell: &InputCell) -> String {
        if Self::get_input_error(cell).is_some() {
            return INVALID_INPUT_MESSAGE.to_string();
        }
        cell.format()
            .unwrap_or_else(|| INVALID_INPUT_MESSAGE.to_string())
    }

    /// Builds both grids for every data source and alternative.
    ///
    /// Cells from `old` are kept (and revalidated) for pairs that still
    /// exist; everything else starts as a new invalid cell.
    pub fn prepare_input_data(
        criteria: &[Criterion],
        alternatives: &[Alternative],
        old: Option<&InputData>,
    ) -> InputData {
        let build_grid = |old_grid: Option<&CellGrid>| -> CellGrid {
            let mut grid = CellGrid::new();
            for data_source in criteria.iter().flat_map(|c| c.data_sources.iter()) {
                let old_row = old_grid.and_then(|g| g.get(&data_source.id));
                let row: BTreeMap<AlternativeId, InputCell> = alternatives
                    .iter()
                    .map(|alternative| {
                        let cell = match old_row.and_then(|r| r.get(&alternative.id)) {
                            Some(existing) => {
                                let mut cell = existing.clone();
                                cell.refresh_validity();
                                cell
                            }
                            None => InputCell::new_invalid(),
                        };
                        (alternative.id.clone(), cell)
                    })
                    .collect();
                grid.insert(data_source.id.clone(), row);
            }
            grid
        };

        InputData {
            effect: build_grid(old.map(|o| &o.effect)),
            distribution: build_grid(old.map(|o| &o.distribution)),
        }
    }

    /// Derives a distribution grid from the effect grid.
    ///
    /// Invalid effect cells keep whatever distribution cell was there. A
    /// valid effect cell without input type, or of a type without a
    /// derivation rule, fails the whole call.
    pub fn generate_distributions(input_data: &InputData) -> Result<CellGrid, ManualInputError> {
        let mut distributions = input_data.distribution.clone();
        for (data_source, row) in &input_data.effect {
            for (alternative, effect_cell) in row {
                let keep_existing = |distributions: &mut CellGrid| {
                    distributions
                        .entry(data_source.clone())
                        .or_default()
                        .entry(alternative.clone())
                        .or_insert_with(InputCell::new_invalid);
                };
                if effect_cell.is_invalid {
                    keep_existing(&mut distributions);
                    continue;
                }
                let descriptor = effect_cell
                    .input_parameters
                    .as_ref()
                    .ok_or_else(|| ManualInputError::missing_input_type(data_source, alternative))?;
                if descriptor.input_error(effect_cell).is_some() {
                    keep_existing(&mut distributions);
                    continue;
                }
                let derived = descriptor
                    .generate_distribution(effect_cell)
                    .ok_or(ManualInputError::NoDistributionRule { kind: descriptor.id })?;
                distributions
                    .entry(data_source.clone())
                    .or_default()
                    .insert(alternative.clone(), derived);
            }
        }
        Ok(distributions)
    }

    /// First invalid cell of a grid, in key order.
    pub fn find_invalid_cell(grid: &CellGrid) -> Option<(&DataSourceId, &AlternativeId)> {
        grid.iter().find_map(|(data_source, row)| {
            row.iter()
                .find(|(_, cell)| !cell.is_valid())
                .map(|(alternative, _)| (data_source, alternative))
        })
    }

    /// True when neither grid contains an invalid cell.
    pub fn is_input_data_valid(input_data: &InputData) -> bool {
        Self::find_invalid_cell(&input_data.effect).is_none()
            && Self::find_invalid_cell(&input_data.distribution).is_none()
    }

    /// Data sources whose valid value cells all hold the same number.
    ///
    /// A row needs at least two such cells to count.
    pub fn duplicate_rows(grid: &CellGrid) -> Vec<DataSourceId> {
        grid.iter()
            .filter(|(_, row)| {
                let values: Vec<f64> = row
                    .values()
                    .filter(|cell| cell.is_valid() && cell.kind().is_some_and(|k| k.is_value_class()))
                    .filter_map(|cell| cell.first_parameter)
                    .collect();
                values.len() > 1 && values.iter().all(|v| *v == values[0])
            })
            .map(|(data_source, _)| data_source.clone())
            .collect()
    }

    pub fn find_duplicate_values(grid: &CellGrid) -> bool {
        let rows = Self::duplicate_rows(grid);
        if !rows.is_empty() {
            warn!(data_sources = ?rows, "Rows with identical values for every alternative");
        }
        !rows.is_empty()
    }

    /// Replaces the unit-derived constraints of a cell and revalidates it.
    ///
    /// Only value-style input types take unit constraints; other cells are
    /// returned unchanged.
    pub fn update_parameter_constraints(cell: &InputCell, unit: &UnitOfMeasurement) -> InputCell {
        let mut updated = cell.clone();
        let Some(descriptor) = updated.input_parameters.as_mut() else {
            return updated;
        };
        if !descriptor.id.accepts_unit_constraints() {
            return updated;
        }
        let constraints = unit_constraints(unit);
        for slot in descriptor.value_slots() {
            if let Some(spec) = descriptor.parameter_mut(*slot) {
                spec.unit_constraints = constraints.clone();
            }
        }
        updated.refresh_validity();
        updated
    }
}

/// Constraints implied by a unit of measurement.
pub fn unit_constraints(unit: &UnitOfMeasurement) -> Vec<Constraint> {
    match unit.unit_type {
        UnitType::Percentage => vec![Constraint::percentage()],
        UnitType::Decimal => vec![Constraint::decimal()],
        UnitType::Custom => {
            let mut constraints = Vec::new();
            match unit.lower_bound {
                Some(lower) if lower == 0.0 => constraints.push(Constraint::positive()),
                Some(lower) if lower.is_finite() => {
                    constraints.push(Constraint::above_or_equal_to(Bound::Value(lower)))
                }
                _ => {}
            }
            if let Some(upper) = unit.upper_bound.filter(|u| u.is_finite()) {
                constraints.push(Constraint::below_or_equal_to(Bound::Value(upper)));
            }
            constraints
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::UnitOfMeasurement;
    use crate::domain::manual_input::{InputCategory, InputDescriptor, InputKind, ParameterSlot};
    use crate::domain::workspace::DataSource;

    fn value_cell(value: f64) -> InputCell {
        InputCell::with_parameters(
            InputDescriptor::new(InputKind::Value, InputCategory::Effect),
            [Some(value), None, None],
        )
    }

    fn criteria() -> Vec<Criterion> {
        vec![
            Criterion::new("crit1", "Mortality")
                .with_data_source(DataSource::new("ds1", UnitOfMeasurement::decimal())),
            Criterion::new("crit2", "Nausea")
                .with_data_source(DataSource::new("ds2", UnitOfMeasurement::default())),
        ]
    }

    fn alternatives() -> Vec<Alternative> {
        vec![Alternative::new("alt1", "Placebo"), Alternative::new("alt2", "Drug")]
    }

    #[test]
    fn prepare_creates_invalid_cells_for_every_pair() {
        let data = ManualInputService::prepare_input_data(&criteria(), &alternatives(), None);
        assert_eq!(data.effect.len(), 2);
        assert_eq!(data.distribution["ds2"].len(), 2);
        assert!(data.effect.values().flat_map(|r| r.values()).all(|c| c.is_invalid));
    }

    #[test]
    fn prepare_keeps_old_cells_and_drops_removed_pairs() {
        let mut old = InputData::default();
        old.set_cell(InputCategory::Effect, "ds1".into(), "alt1".into(), value_cell(3.0));
        old.set_cell(InputCategory::Effect, "gone".into(), "alt1".into(), value_cell(4.0));
        let data = ManualInputService::prepare_input_data(&criteria(), &alternatives(), Some(&old));
        assert_eq!(data.effect["ds1"]["alt1"], value_cell(3.0));
        assert!(data.effect["ds1"]["alt2"].is_invalid);
        assert!(!data.effect.contains_key("gone"));
    }

    #[test]
    fn input_to_string_reports_invalid_cells() {
        assert_eq!(
            ManualInputService::input_to_string(&InputCell::new_invalid()),
            INVALID_INPUT_MESSAGE
        );
        assert_eq!(ManualInputService::input_to_string(&value_cell(0.5)), "0.5");
    }

    #[test]
    fn edited_cell_renders_as_invalid() {
        let mut cell = value_cell(0.5);
        cell.set_parameter(ParameterSlot::First, None);
        assert_eq!(ManualInputService::input_to_string(&cell), INVALID_INPUT_MESSAGE);

        let mut stale = value_cell(0.5);
        stale.first_parameter = None;
        assert!(!stale.is_invalid);
        assert_eq!(ManualInputService::input_to_string(&stale), INVALID_INPUT_MESSAGE);
    }

    #[test]
    fn stale_flag_does_not_generate_or_pass_validation() {
        let mut stale = InputCell::with_parameters(
            InputDescriptor::new(InputKind::EventsSampleSize, InputCategory::Effect),
            [Some(0.0), Some(10.0), None],
        );
        stale.second_parameter = Some(0.0);
        let mut data = InputData::default();
        data.set_cell(InputCategory::Effect, "ds1".into(), "alt1".into(), stale);
        let grid = ManualInputService::generate_distributions(&data).unwrap();
        assert_eq!(grid["ds1"]["alt1"], InputCell::new_invalid());
        assert_eq!(
            ManualInputService::find_invalid_cell(&data.effect),
            Some((&DataSourceId::from("ds1"), &AlternativeId::from("alt1")))
        );
    }

    #[test]
    fn generate_keeps_distribution_for_invalid_effect() {
        let mut data = InputData::default();
        data.set_cell(InputCategory::Effect, "ds1".into(), "alt1".into(), InputCell::new_invalid());
        let existing = InputCell::with_parameters(
            InputDescriptor::new(InputKind::Gamma, InputCategory::Distribution),
            [Some(2.0), Some(3.0), None],
        );
        data.set_cell(InputCategory::Distribution, "ds1".into(), "alt1".into(), existing.clone());
        let grid = ManualInputService::generate_distributions(&data).unwrap();
        assert_eq!(grid["ds1"]["alt1"], existing);
    }

    #[test]
    fn generate_derives_from_valid_effect() {
        let mut data = InputData::default();
        data.set_cell(InputCategory::Effect, "ds1".into(), "alt1".into(), value_cell(7.0));
        let grid = ManualInputService::generate_distributions(&data).unwrap();
        let derived = &grid["ds1"]["alt1"];
        assert_eq!(derived.kind(), Some(InputKind::Value));
        assert_eq!(derived.label.as_deref(), Some("7"));
    }

    #[test]
    fn generate_fails_on_valid_cell_without_type() {
        let mut data = InputData::default();
        let mut broken = InputCell::new_invalid();
        broken.is_invalid = false;
        data.set_cell(InputCategory::Effect, "ds1".into(), "alt1".into(), broken);
        let err = ManualInputService::generate_distributions(&data).unwrap_err();
        assert_eq!(err, ManualInputError::missing_input_type(&"ds1".into(), &"alt1".into()));
    }

    #[test]
    fn generate_fails_on_type_without_rule() {
        let mut data = InputData::default();
        let normal = InputCell::with_parameters(
            InputDescriptor::new(InputKind::Normal, InputCategory::Distribution),
            [Some(0.0), Some(1.0), None],
        );
        data.set_cell(InputCategory::Effect, "ds1".into(), "alt1".into(), normal);
        assert_eq!(
            ManualInputService::generate_distributions(&data).unwrap_err(),
            ManualInputError::NoDistributionRule { kind: InputKind::Normal }
        );
    }

    #[test]
    fn find_invalid_cell_scans_both_grids() {
        let mut data = InputData::default();
        data.set_cell(InputCategory::Effect, "ds1".into(), "alt1".into(), value_cell(1.0));
        assert!(ManualInputService::is_input_data_valid(&data));
        data.set_cell(InputCategory::Distribution, "ds1".into(), "alt2".into(), InputCell::new_invalid());
        assert!(!ManualInputService::is_input_data_valid(&data));
        assert_eq!(
            ManualInputService::find_invalid_cell(&data.distribution),
            Some((&DataSourceId::from("ds1"), &AlternativeId::from("alt2")))
        );
    }

    #[test]
    fn duplicate_rows_need_two_equal_valid_values() {
        let mut data = InputData::default();
        data.set_cell(InputCategory::Effect, "ds1".into(), "alt1".into(), value_cell(1.0));
        data.set_cell(InputCategory::Effect, "ds1".into(), "alt2".into(), value_cell(1.0));
        data.set_cell(InputCategory::Effect, "ds2".into(), "alt1".into(), value_cell(1.0));
        data.set_cell(InputCategory::Effect, "ds2".into(), "alt2".into(), InputCell::new_invalid());
        data.set_cell(InputCategory::Effect, "ds3".into(), "alt1".into(), value_cell(1.0));
        data.set_cell(InputCategory::Effect, "ds3".into(), "alt2".into(), value_cell(2.0));
        assert_eq!(ManualInputService::duplicate_rows(&data.effect), vec![DataSourceId::from("ds1")]);
        assert!(ManualInputService::find_duplicate_values(&data.effect));
    }

    #[test]
    fn duplicate_rows_cover_every_value_type() {
        let se_cell = |value: f64| {
            InputCell::with_parameters(
                InputDescriptor::new(InputKind::ValueSe, InputCategory::Effect),
                [Some(value), Some(0.5), None],
            )
        };
        let gamma = InputCell::with_parameters(
            InputDescriptor::new(InputKind::Gamma, InputCategory::Distribution),
            [Some(2.0), Some(3.0), None],
        );
        let mut data = InputData::default();
        data.set_cell(InputCategory::Effect, "ds1".into(), "alt1".into(), se_cell(3.5));
        data.set_cell(InputCategory::Effect, "ds1".into(), "alt2".into(), se_cell(3.5));
        data.set_cell(InputCategory::Effect, "ds2".into(), "alt1".into(), gamma.clone());
        data.set_cell(InputCategory::Effect, "ds2".into(), "alt2".into(), gamma);
        assert_eq!(ManualInputService::duplicate_rows(&data.effect), vec![DataSourceId::from("ds1")]);
    }

    #[test]
    fn percentage_unit_marks_cell_and_checks_range() {
        let updated = ManualInputService::update_parameter_constraints(
            &value_cell(150.0),
            &UnitOfMeasurement::percentage(),
        );
        assert!(updated.is_percentage());
        assert!(updated.is_invalid);
        assert_eq!(
            ManualInputService::get_input_error(&updated),
            Some("Value must be between 0 and 100".to_string())
        );
    }

    #[test]
    fn switching_units_replaces_previous_constraints() {
        let percentage = ManualInputService::update_parameter_constraints(
            &value_cell(50.0),
            &UnitOfMeasurement::percentage(),
        );
        let custom = ManualInputService::update_parameter_constraints(
            &percentage,
            &UnitOfMeasurement::custom("mg", Some(0.0), None),
        );
        assert!(!custom.is_percentage());
        assert!(!custom.is_invalid);
        let spec = custom.input_parameters.as_ref().unwrap().first_parameter.as_ref().unwrap();
        assert_eq!(spec.unit_constraints, vec![Constraint::positive()]);
    }

    #[test]
    fn custom_bounds_become_comparisons() {
        assert_eq!(
            unit_constraints(&UnitOfMeasurement::custom("score", Some(1.0), Some(10.0))),
            vec![
                Constraint::above_or_equal_to(Bound::Value(1.0)),
                Constraint::below_or_equal_to(Bound::Value(10.0)),
            ]
        );
        assert!(unit_constraints(&UnitOfMeasurement::default()).is_empty());
    }

    #[test]
    fn distribution_types_ignore_units() {
        let beta = InputCell::with_parameters(
            InputDescriptor::new(InputKind::Beta, InputCategory::Distribution),
            [Some(2.0), Some(3.0), None],
        );
        let updated = ManualInputService::update_parameter_constraints(&beta, &UnitOfMeasurement::percentage());
        assert_eq!(updated, beta);
    }
}
