//! Turning a saved workspace back into an editable state.

use std::collections::HashMap;
use tracing::{debug, warn};

use super::descriptor::InputCategory;
use super::input_knowledge::InputKnowledge;
use super::InputCell;
use super::service::ManualInputService;
use super::state::{InputData, OldWorkspace, State, Step};
use crate::domain::foundation::{AlternativeId, CriterionId, DataSourceId, UnitOfMeasurement, UnitType};
use crate::domain::workspace::{
    AbsoluteEntry, Alternative, Criterion, DataSource, PerformanceRecord, PerformanceTableEntry,
    ProblemCriterion, ProblemDataSource,
};

/// Maps ids of the saved workspace to the fresh ids of the new state.
#[derive(Default)]
struct IdMapping {
    data_sources: HashMap<DataSourceId, DataSourceId>,
    first_data_source: HashMap<CriterionId, DataSourceId>,
    alternatives: HashMap<AlternativeId, AlternativeId>,
}

impl IdMapping {
    fn data_source_for(&self, entry: &AbsoluteEntry) -> Option<&DataSourceId> {
        match &entry.data_source {
            Some(old_id) => self.data_sources.get(old_id),
            None => self.first_data_source.get(&entry.criterion),
        }
    }
}

impl ManualInputService {
    /// Copies a saved workspace into a new editing state.
    ///
    /// Criteria, data sources and alternatives get fresh ids and remember
    /// their old ones. Performance rows are turned back into cells; rows the
    /// cell types cannot represent leave their cells empty and invalid.
    pub fn create_state_from_old_workspace(&self, old_workspace: &OldWorkspace) -> State {
        let problem = &old_workspace.problem;
        let mut mapping = IdMapping::default();

        let criteria: Vec<Criterion> = problem
            .criteria
            .iter()
            .map(|(old_id, old_criterion)| self.copy_criterion(old_id, old_criterion, &mut mapping))
            .map(|criterion| match &problem.value_tree {
                Some(tree) if criterion.is_favorable.is_none() => Criterion {
                    is_favorable: criterion.old_id.as_ref().and_then(|id| tree.is_favorable(id)),
                    ..criterion
                },
                _ => criterion,
            })
            .collect();

        let alternatives: Vec<Alternative> = problem
            .alternatives
            .iter()
            .map(|(old_id, old_alternative)| {
                let id = AlternativeId::from(self.ids.generate());
                mapping.alternatives.insert(old_id.clone(), id.clone());
                Alternative {
                    id,
                    old_id: Some(old_id.clone()),
                    title: old_alternative.title.clone(),
                }
            })
            .collect();

        let mut input_data = Self::prepare_input_data(&criteria, &alternatives, None);
        for entry in &problem.performance_table {
            match entry {
                PerformanceTableEntry::Absolute(entry) => fill_cells(&mut input_data, entry, &mapping),
                PerformanceTableEntry::Relative(entry) => {
                    debug!(criterion = %entry.criterion, "Skipping relative performance row");
                }
            }
        }
        for data_source in criteria.iter().flat_map(|c| c.data_sources.iter()) {
            if let Some(row) = input_data.effect.get_mut(&data_source.id) {
                for cell in row.values_mut() {
                    *cell = with_unit_constraints(cell, &data_source.unit_of_measurement);
                }
            }
        }

        let use_favorability =
            problem.value_tree.is_some() || criteria.iter().any(|c| c.is_favorable.is_some());

        State {
            old_workspace: Some(old_workspace.clone()),
            use_favorability,
            step: Step::Step1,
            is_input_data_valid: Self::is_input_data_valid(&input_data),
            title: String::new(),
            description: Some(problem.description.clone()).filter(|d| !d.is_empty()),
            criteria,
            alternatives,
            input_data,
        }
    }

    fn copy_criterion(
        &self,
        old_id: &CriterionId,
        old: &ProblemCriterion,
        mapping: &mut IdMapping,
    ) -> Criterion {
        let criterion_unit = old.unit_of_measurement.as_ref().map(|unit| unit.to_unit());
        let data_sources: Vec<DataSource> = if old.data_sources.is_empty() {
            vec![self.new_data_source(None, criterion_unit.clone().unwrap_or_default(), old, None)]
        } else {
            old.data_sources
                .iter()
                .map(|old_data_source| {
                    let unit = old_data_source
                        .unit_of_measurement
                        .as_ref()
                        .map(|unit| unit.to_unit())
                        .or_else(|| criterion_unit.clone())
                        .unwrap_or_default();
                    let data_source =
                        self.new_data_source(Some(old_data_source.id.clone()), unit, old, Some(old_data_source));
                    mapping
                        .data_sources
                        .insert(old_data_source.id.clone(), data_source.id.clone());
                    data_source
                })
                .collect()
        };

        let id = CriterionId::from(self.ids.generate());
        if let Some(first) = data_sources.first() {
            mapping.first_data_source.insert(old_id.clone(), first.id.clone());
        }
        Criterion {
            id: id.clone(),
            old_id: Some(old_id.clone()),
            title: old.title.clone(),
            description: old.description.clone(),
            is_favorable: old.is_favorable,
            data_sources: data_sources
                .into_iter()
                .map(|data_source| DataSource {
                    criterion_id: Some(id.clone()),
                    ..data_source
                })
                .collect(),
        }
    }

    fn new_data_source(
        &self,
        old_id: Option<DataSourceId>,
        unit_of_measurement: UnitOfMeasurement,
        criterion: &ProblemCriterion,
        old: Option<&ProblemDataSource>,
    ) -> DataSource {
        DataSource {
            id: DataSourceId::from(self.ids.generate()),
            old_id,
            criterion_id: None,
            unit_of_measurement,
            source: old
                .and_then(|ds| ds.source.clone())
                .or_else(|| criterion.source.clone()),
            source_link: old
                .and_then(|ds| ds.source_link.clone())
                .or_else(|| criterion.source_link.clone()),
            scale: old.and_then(|ds| ds.scale).or(criterion.scale),
        }
    }
}

/// Reapplies the data source unit to a migrated effect cell. A stored
/// percentage input wins over a custom unit.
fn with_unit_constraints(cell: &InputCell, unit: &UnitOfMeasurement) -> InputCell {
    if cell.is_percentage() && unit.unit_type == UnitType::Custom {
        return ManualInputService::update_parameter_constraints(cell, &UnitOfMeasurement::percentage());
    }
    ManualInputService::update_parameter_constraints(cell, unit)
}

fn fill_cells(input_data: &mut InputData, entry: &AbsoluteEntry, mapping: &IdMapping) {
    let (Some(data_source), Some(alternative)) = (
        mapping.data_source_for(entry),
        mapping.alternatives.get(&entry.alternative),
    ) else {
        warn!(
            criterion = %entry.criterion,
            alternative = %entry.alternative,
            "Performance row does not match any criterion or alternative"
        );
        return;
    };

    let (effect, distribution) = match &entry.performance {
        PerformanceRecord::Split(split) => (split.effect.as_ref(), split.distribution.as_ref()),
        PerformanceRecord::Single(performance) => (Some(performance), Some(performance)),
    };

    for (category, performance) in [
        (InputCategory::Effect, effect),
        (InputCategory::Distribution, distribution),
    ] {
        let Some(performance) = performance else {
            continue;
        };
        match InputKnowledge::finish_input_cell(category, performance) {
            Some(cell) => input_data.set_cell(category, data_source.clone(), alternative.clone(), cell),
            None => debug!(
                performance_type = performance.type_name(),
                ?category,
                "No input type for stored performance"
            ),
        }
    }
}
