//! Registry of input types per category.

use std::collections::BTreeMap;

use super::descriptor::{InputCategory, InputDescriptor, InputKind};
use super::InputCell;
use crate::domain::workspace::Performance;

/// Input type lookup. Stateless; every call hands out new descriptors.
pub struct InputKnowledge;

impl InputKnowledge {
    /// Descriptors offered for a category, keyed by input type.
    pub fn get_options(category: InputCategory) -> BTreeMap<InputKind, InputDescriptor> {
        InputKind::options(category)
            .iter()
            .map(|kind| (*kind, InputDescriptor::new(*kind, category)))
            .collect()
    }

    /// A single descriptor, if the category offers that type.
    pub fn get_descriptor(category: InputCategory, kind: InputKind) -> Option<InputDescriptor> {
        InputKind::options(category)
            .contains(&kind)
            .then(|| InputDescriptor::new(kind, category))
    }

    /// Works out which input type produced a stored performance.
    ///
    /// Effects are told apart by the fields their `input` block carries.
    /// Returns `None` when the category has no matching type.
    pub fn infer_kind(category: InputCategory, performance: &Performance) -> Option<InputKind> {
        match (category, performance) {
            (_, Performance::Empty { .. }) => Some(InputKind::Empty),
            (InputCategory::Effect, Performance::Exact { input: None, .. }) => Some(InputKind::Value),
            (InputCategory::Effect, Performance::Exact { input: Some(input), .. }) => {
                let kind = if input.events.is_some() && input.sample_size.is_some() {
                    InputKind::EventsSampleSize
                } else if input.std_err.is_some() {
                    InputKind::ValueSe
                } else if input.lower_bound.is_some() || input.upper_bound.is_some() {
                    InputKind::ValueCi
                } else if input.sample_size.is_some() {
                    InputKind::ValueSampleSize
                } else {
                    InputKind::Value
                };
                Some(kind)
            }
            (InputCategory::Distribution, Performance::Exact { .. }) => Some(InputKind::Value),
            (InputCategory::Distribution, Performance::Dnorm { .. }) => Some(InputKind::Normal),
            (InputCategory::Distribution, Performance::Dbeta { .. }) => Some(InputKind::Beta),
            (InputCategory::Distribution, Performance::Dgamma { .. }) => Some(InputKind::Gamma),
            _ => None,
        }
    }

    /// Rebuilds an editable cell from a stored performance, or `None` when
    /// no input type of the category fits it.
    pub fn finish_input_cell(category: InputCategory, performance: &Performance) -> Option<InputCell> {
        let kind = Self::infer_kind(category, performance)?;
        let descriptor = InputDescriptor::new(kind, category);
        Some(descriptor.finish_input_cell(performance))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::workspace::{BoundValue, PerformanceInput, StudentsTParameters};

    #[test]
    fn effect_options_list_six_types() {
        let options = InputKnowledge::get_options(InputCategory::Effect);
        let ids: Vec<_> = options.keys().map(InputKind::id).collect();
        assert_eq!(
            ids,
            vec!["value", "valueSE", "valueCI", "valueSampleSize", "eventsSampleSize", "empty"]
        );
    }

    #[test]
    fn distribution_options_include_value_and_empty() {
        let options = InputKnowledge::get_options(InputCategory::Distribution);
        assert_eq!(options.len(), 5);
        assert_eq!(options[&InputKind::Value].category, InputCategory::Distribution);
        assert!(options.contains_key(&InputKind::Empty));
    }

    #[test]
    fn options_are_fresh_on_every_call() {
        let mut first = InputKnowledge::get_options(InputCategory::Effect);
        first.get_mut(&InputKind::Value).unwrap().label = "changed".to_string();
        let second = InputKnowledge::get_options(InputCategory::Effect);
        assert_eq!(second[&InputKind::Value].label, "Value");
    }

    #[test]
    fn descriptor_lookup_respects_category() {
        assert!(InputKnowledge::get_descriptor(InputCategory::Distribution, InputKind::ValueCi).is_none());
        assert!(InputKnowledge::get_descriptor(InputCategory::Effect, InputKind::ValueCi).is_some());
    }

    #[test]
    fn infers_effect_types_from_input_fields() {
        let with_input = |input: PerformanceInput| Performance::Exact { value: 1.0, input: Some(input) };
        assert_eq!(
            InputKnowledge::infer_kind(
                InputCategory::Effect,
                &with_input(PerformanceInput { events: Some(1.0), sample_size: Some(5.0), ..Default::default() })
            ),
            Some(InputKind::EventsSampleSize)
        );
        assert_eq!(
            InputKnowledge::infer_kind(
                InputCategory::Effect,
                &with_input(PerformanceInput {
                    value: Some(1.0),
                    upper_bound: Some(BoundValue::NotEstimable),
                    ..Default::default()
                })
            ),
            Some(InputKind::ValueCi)
        );
        assert_eq!(
            InputKnowledge::infer_kind(InputCategory::Effect, &Performance::exact(3.0)),
            Some(InputKind::Value)
        );
    }

    #[test]
    fn distributions_without_input_type_are_not_inferred() {
        let dt = Performance::Dt {
            parameters: StudentsTParameters { mu: 0.0, std_err: 1.0, dof: 4.0 },
            input: None,
        };
        assert_eq!(InputKnowledge::infer_kind(InputCategory::Distribution, &dt), None);
        assert_eq!(
            InputKnowledge::infer_kind(InputCategory::Effect, &Performance::beta(1.0, 2.0)),
            None
        );
    }

    #[test]
    fn finish_input_cell_builds_valid_cell() {
        let cell = InputKnowledge::finish_input_cell(InputCategory::Distribution, &Performance::beta(3.0, 8.0))
            .unwrap();
        assert_eq!(cell.kind(), Some(InputKind::Beta));
        assert!(!cell.is_invalid);
    }
}
