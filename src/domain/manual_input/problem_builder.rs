//! Assembling a problem from the editing state.

use super::descriptor::InputCategory;
use super::errors::ManualInputError;
use super::service::ManualInputService;
use super::state::InputData;
use crate::domain::foundation::{AlternativeId, DataSourceId};
use crate::domain::workspace::{
    AbsoluteEntry, Alternative, Criterion, Keyed, Performance, PerformanceRecord, PerformanceTableEntry,
    Problem, ProblemAlternative, ProblemCriterion, ProblemDataSource, SplitPerformance, UnitField,
    ValueTree,
};

impl ManualInputService {
    /// Builds a problem from criteria, alternatives and the cell grids.
    ///
    /// Every data source and alternative pair gets one performance table
    /// entry. Fails when a pair has neither an effect nor a distribution
    /// performance.
    pub fn create_problem(
        &self,
        criteria: &[Criterion],
        alternatives: &[Alternative],
        title: &str,
        description: &str,
        input_data: &InputData,
        use_favorability: bool,
    ) -> Result<Problem, ManualInputError> {
        let problem_criteria: Keyed<_, _> = criteria
            .iter()
            .map(|criterion| (criterion.id.clone(), build_criterion(criterion, use_favorability)))
            .collect();

        let problem_alternatives: Keyed<_, _> = alternatives
            .iter()
            .map(|alternative| {
                (alternative.id.clone(), ProblemAlternative { title: alternative.title.clone() })
            })
            .collect();

        let mut performance_table = Vec::new();
        for criterion in criteria {
            for data_source in &criterion.data_sources {
                for alternative in alternatives {
                    let performance = build_cell_performance(input_data, &data_source.id, &alternative.id)?;
                    performance_table.push(PerformanceTableEntry::Absolute(AbsoluteEntry {
                        alternative: alternative.id.clone(),
                        criterion: criterion.id.clone(),
                        data_source: Some(data_source.id.clone()),
                        performance: PerformanceRecord::Split(performance),
                    }));
                }
            }
        }

        let value_tree = use_favorability.then(|| {
            ValueTree::from_favorability(
                self.settings.value_tree_title.clone(),
                criteria
                    .iter()
                    .map(|criterion| (&criterion.id, criterion.is_favorable.unwrap_or(false))),
            )
        });

        Ok(Problem {
            schema_version: self.settings.schema_version.clone(),
            title: title.to_string(),
            description: description.to_string(),
            value_tree,
            criteria: problem_criteria,
            alternatives: problem_alternatives,
            performance_table,
        })
    }
}

fn build_criterion(criterion: &Criterion, use_favorability: bool) -> ProblemCriterion {
    ProblemCriterion {
        title: criterion.title.clone(),
        description: criterion.description.clone(),
        is_favorable: use_favorability.then(|| criterion.is_favorable.unwrap_or(false)),
        unit_of_measurement: None,
        scale: None,
        source: None,
        source_link: None,
        data_sources: criterion
            .data_sources
            .iter()
            .map(|data_source| ProblemDataSource {
                id: data_source.id.clone(),
                unit_of_measurement: Some(UnitField::Typed(data_source.unit_of_measurement.clone())),
                scale: Some(data_source.unit_of_measurement.scale()),
                source: data_source.source.clone(),
                source_link: data_source.source_link.clone(),
            })
            .collect(),
    }
}

fn build_cell_performance(
    input_data: &InputData,
    data_source: &DataSourceId,
    alternative: &AlternativeId,
) -> Result<SplitPerformance, ManualInputError> {
    let build = |category: InputCategory| -> Option<Performance> {
        let cell = input_data.cell(category, data_source, alternative)?;
        cell.input_parameters.as_ref()?.build_performance(cell)
    };
    let effect = build(InputCategory::Effect);
    let distribution = build(InputCategory::Distribution);
    if effect.is_none() && distribution.is_none() {
        return Err(ManualInputError::missing_performance(data_source, alternative));
    }
    Ok(SplitPerformance { effect, distribution })
}
