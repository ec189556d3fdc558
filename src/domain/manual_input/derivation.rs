//! Performance building and distribution derivation per input type.

use tracing::debug;

use super::constraint::{Constraint, ParameterSlot};
use super::descriptor::{InputCategory, InputDescriptor, InputKind, ParameterSpec};
use super::InputCell;
use crate::domain::foundation::{from_percentage, significant_digits, to_percentage, InputScale};
use crate::domain::workspace::{BoundValue, Performance, PerformanceInput};

/// z-score of a two-sided 95% confidence interval.
const Z_95: f64 = 1.96;

impl InputDescriptor {
    /// Builds the persisted performance of a cell. Returns `None` for an
    /// invalid cell.
    pub fn build_performance(&self, cell: &InputCell) -> Option<Performance> {
        if !cell.is_valid() {
            return None;
        }
        let percentage = self.is_percentage();
        let scale = percentage.then_some(InputScale::Percentage);
        let to_decimal = |v: f64| scale.map_or(v, |s| s.to_decimal(v));
        let first = cell.first_parameter;
        let second = cell.second_parameter;

        let performance = match self.id {
            InputKind::Value => {
                let value = first?;
                let input = percentage.then(|| PerformanceInput {
                    value: Some(value),
                    scale,
                    ..Default::default()
                });
                Performance::Exact { value: to_decimal(value), input }
            }
            InputKind::ValueSe => {
                let value = first?;
                Performance::Exact {
                    value: to_decimal(value),
                    input: Some(PerformanceInput {
                        value: Some(value),
                        std_err: second,
                        scale,
                        ..Default::default()
                    }),
                }
            }
            InputKind::ValueCi => {
                let value = first?;
                Performance::Exact {
                    value: to_decimal(value),
                    input: Some(PerformanceInput {
                        value: Some(value),
                        lower_bound: persisted_bound(cell.lower_bound_ne, second),
                        upper_bound: persisted_bound(cell.upper_bound_ne, cell.third_parameter),
                        scale,
                        ..Default::default()
                    }),
                }
            }
            InputKind::ValueSampleSize => {
                let value = first?;
                Performance::Exact {
                    value: to_decimal(value),
                    input: Some(PerformanceInput {
                        value: Some(value),
                        sample_size: second,
                        scale,
                        ..Default::default()
                    }),
                }
            }
            InputKind::EventsSampleSize => {
                let events = first?;
                let sample_size = second?;
                Performance::Exact {
                    value: events / sample_size,
                    input: Some(PerformanceInput {
                        events: Some(events),
                        sample_size: Some(sample_size),
                        ..Default::default()
                    }),
                }
            }
            InputKind::Normal => Performance::normal(first?, second?),
            InputKind::Beta => Performance::beta(first?, second?),
            InputKind::Gamma => Performance::gamma(first?, second?),
            InputKind::Empty => Performance::empty(),
        };
        Some(performance)
    }

    /// Derives the distribution cell for an effect cell.
    ///
    /// Returns `None` for types that already are distributions. The result
    /// always has a distribution-category descriptor, values on the decimal
    /// scale and a display label.
    pub fn generate_distribution(&self, cell: &InputCell) -> Option<InputCell> {
        let percentage = self.is_percentage();
        let to_decimal = |v: f64| if percentage { from_percentage(v) } else { v };
        let first = cell.first_parameter;
        let second = cell.second_parameter;

        let (descriptor, parameters) = match self.id {
            InputKind::Value | InputKind::ValueSampleSize => {
                (self.derived_value_descriptor(), [first.map(to_decimal), None, None])
            }
            InputKind::ValueSe => (
                distribution_descriptor(InputKind::Normal),
                [first.map(to_decimal), second.map(to_decimal), None],
            ),
            InputKind::ValueCi => match symmetric_standard_error(cell) {
                Some(std_err) => (
                    distribution_descriptor(InputKind::Normal),
                    [first.map(to_decimal), Some(to_decimal(std_err)), None],
                ),
                None => {
                    debug!(value = ?first, "Confidence interval is not symmetric, using value");
                    (self.derived_value_descriptor(), [first.map(to_decimal), None, None])
                }
            },
            InputKind::EventsSampleSize => {
                let alpha = first.map(|events| events + 1.0);
                let beta = match (first, second) {
                    (Some(events), Some(sample_size)) => Some(sample_size - events + 1.0),
                    _ => None,
                };
                (distribution_descriptor(InputKind::Beta), [alpha, beta, None])
            }
            InputKind::Empty => (distribution_descriptor(InputKind::Empty), [None, None, None]),
            InputKind::Normal | InputKind::Beta | InputKind::Gamma => return None,
        };

        let mut derived = InputCell::with_parameters(descriptor, parameters);
        derived.label = derived.format();
        Some(derived)
    }

    /// Distribution-category value descriptor keeping this descriptor's unit
    /// bounds but not its scale marker.
    fn derived_value_descriptor(&self) -> InputDescriptor {
        let mut descriptor = distribution_descriptor(InputKind::Value);
        descriptor.first_parameter = self
            .first_parameter
            .clone()
            .map(ParameterSpec::without_scale_markers);
        descriptor
    }

    /// Rebuilds an editable cell of this type from a stored performance.
    ///
    /// A performance of a different shape yields a cell without parameters,
    /// which then fails validation.
    pub fn finish_input_cell(&self, performance: &Performance) -> InputCell {
        let mut descriptor = self.clone();
        let input = performance.input();
        let mut parameters = [None, None, None];
        let mut lower_bound_ne = false;
        let mut upper_bound_ne = false;

        match (self.id, performance) {
            (InputKind::Value, Performance::Exact { value, input }) => {
                parameters[0] = match input {
                    Some(input) if input.is_percentage() => input.value.or(Some(to_percentage(*value))),
                    _ => Some(*value),
                };
            }
            (InputKind::ValueSe, Performance::Exact { input: Some(input), .. }) => {
                parameters = [input.value, input.std_err, None];
            }
            (InputKind::ValueCi, Performance::Exact { input: Some(input), .. }) => {
                lower_bound_ne = input.lower_bound.map_or(false, |b| b.is_not_estimable());
                upper_bound_ne = input.upper_bound.map_or(false, |b| b.is_not_estimable());
                parameters = [
                    input.value,
                    input.lower_bound.and_then(|b| b.value()),
                    input.upper_bound.and_then(|b| b.value()),
                ];
            }
            (InputKind::ValueSampleSize, Performance::Exact { input: Some(input), .. }) => {
                parameters = [input.value, input.sample_size, None];
            }
            (InputKind::EventsSampleSize, Performance::Exact { input: Some(input), .. }) => {
                parameters = [input.events, input.sample_size, None];
            }
            (InputKind::Normal, Performance::Dnorm { parameters: p, .. }) => {
                parameters = [Some(p.mu), Some(p.sigma), None];
            }
            (InputKind::Beta, Performance::Dbeta { parameters: p, .. })
            | (InputKind::Gamma, Performance::Dgamma { parameters: p }) => {
                parameters = [Some(p.alpha), Some(p.beta), None];
            }
            _ => {}
        }

        if input.map_or(false, PerformanceInput::is_percentage) && self.id.accepts_unit_constraints() {
            for slot in descriptor.value_slots() {
                if let Some(spec) = descriptor.parameter_mut(*slot) {
                    if !spec.has_constraint(&Constraint::Percentage) {
                        spec.unit_constraints.push(Constraint::percentage());
                    }
                }
            }
        }

        let mut cell = InputCell {
            lower_bound_ne,
            upper_bound_ne,
            ..InputCell::with_parameters(descriptor, parameters)
        };
        cell.refresh_validity();
        cell
    }
}

fn distribution_descriptor(kind: InputKind) -> InputDescriptor {
    InputDescriptor::new(kind, InputCategory::Distribution)
}

fn persisted_bound(not_estimable: bool, value: Option<f64>) -> Option<BoundValue> {
    if not_estimable {
        Some(BoundValue::NotEstimable)
    } else {
        value.map(BoundValue::Value)
    }
}

/// Standard error of a confidence interval centered exactly on its value.
fn symmetric_standard_error(cell: &InputCell) -> Option<f64> {
    if cell.lower_bound_ne || cell.upper_bound_ne {
        return None;
    }
    let value = cell.first_parameter?;
    let lower = cell.second_parameter?;
    let upper = cell.third_parameter?;
    ((lower + upper) / 2.0 == value).then(|| significant_digits((upper - lower) / (2.0 * Z_95)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::workspace::NormalParameters;
    use proptest::prelude::*;

    fn effect(kind: InputKind) -> InputDescriptor {
        InputDescriptor::new(kind, InputCategory::Effect)
    }

    fn percentage(kind: InputKind) -> InputDescriptor {
        let mut descriptor = effect(kind);
        if let Some(spec) = descriptor.parameter_mut(ParameterSlot::First) {
            spec.unit_constraints.push(Constraint::percentage());
        }
        descriptor
    }

    fn cell(descriptor: &InputDescriptor, params: [Option<f64>; 3]) -> InputCell {
        InputCell::with_parameters(descriptor.clone(), params)
    }

    #[test]
    fn exact_percentage_input_is_stored_as_decimal() {
        let descriptor = percentage(InputKind::Value);
        let performance = descriptor
            .build_performance(&cell(&descriptor, [Some(42.0), None, None]))
            .unwrap();
        assert_eq!(
            performance,
            Performance::Exact {
                value: 0.42,
                input: Some(PerformanceInput {
                    value: Some(42.0),
                    scale: Some(InputScale::Percentage),
                    ..Default::default()
                }),
            }
        );
    }

    #[test]
    fn invalid_cell_builds_nothing() {
        let descriptor = effect(InputKind::ValueSe);
        let invalid = cell(&descriptor, [Some(1.0), Some(-1.0), None]);
        assert!(invalid.is_invalid);
        assert_eq!(descriptor.build_performance(&invalid), None);
    }

    #[test]
    fn edited_cell_builds_nothing() {
        let descriptor = effect(InputKind::EventsSampleSize);
        let mut edited = cell(&descriptor, [Some(0.0), Some(10.0), None]);
        edited.set_parameter(ParameterSlot::Second, Some(0.0));
        assert!(edited.is_invalid);
        assert_eq!(descriptor.build_performance(&edited), None);

        let mut stale = cell(&descriptor, [Some(0.0), Some(10.0), None]);
        stale.second_parameter = Some(0.0);
        assert_eq!(descriptor.build_performance(&stale), None);
    }

    #[test]
    fn events_build_proportion_with_counts() {
        let descriptor = effect(InputKind::EventsSampleSize);
        let performance = descriptor
            .build_performance(&cell(&descriptor, [Some(5.0), Some(20.0), None]))
            .unwrap();
        assert_eq!(
            performance,
            Performance::Exact {
                value: 0.25,
                input: Some(PerformanceInput {
                    events: Some(5.0),
                    sample_size: Some(20.0),
                    ..Default::default()
                }),
            }
        );
    }

    #[test]
    fn ne_bound_is_persisted_as_marker() {
        let descriptor = effect(InputKind::ValueCi);
        let mut c = cell(&descriptor, [Some(2.0), None, Some(3.0)]);
        c.lower_bound_ne = true;
        c.refresh_validity();
        let performance = descriptor.build_performance(&c).unwrap();
        let input = performance.input().unwrap();
        assert_eq!(input.lower_bound, Some(BoundValue::NotEstimable));
        assert_eq!(input.upper_bound, Some(BoundValue::Value(3.0)));
    }

    #[test]
    fn symmetric_interval_becomes_normal() {
        let descriptor = effect(InputKind::ValueCi);
        let derived = descriptor
            .generate_distribution(&cell(&descriptor, [Some(1.0), Some(0.5), Some(1.5)]))
            .unwrap();
        assert_eq!(derived.kind(), Some(InputKind::Normal));
        assert_eq!(derived.first_parameter, Some(1.0));
        assert_eq!(derived.second_parameter, Some(0.255));
        assert_eq!(derived.third_parameter, None);
        assert_eq!(derived.label.as_deref(), Some("Normal(1, 0.255)"));
        assert!(!derived.is_invalid);
    }

    #[test]
    fn asymmetric_interval_falls_back_to_value() {
        let descriptor = effect(InputKind::ValueCi);
        let derived = descriptor
            .generate_distribution(&cell(&descriptor, [Some(1.0), Some(0.5), Some(2.0)]))
            .unwrap();
        assert_eq!(derived.kind(), Some(InputKind::Value));
        assert_eq!(
            derived.input_parameters.as_ref().map(|d| d.category),
            Some(InputCategory::Distribution)
        );
        assert_eq!(derived.second_parameter, None);
        assert_eq!(derived.label.as_deref(), Some("1"));
    }

    #[test]
    fn percentage_value_distribution_drops_marker() {
        let descriptor = percentage(InputKind::Value);
        let derived = descriptor
            .generate_distribution(&cell(&descriptor, [Some(42.0), None, None]))
            .unwrap();
        assert_eq!(derived.first_parameter, Some(0.42));
        assert!(!derived.is_percentage());
        assert_eq!(derived.label.as_deref(), Some("0.42"));
    }

    #[test]
    fn percentage_standard_error_scales_both_parameters() {
        let descriptor = percentage(InputKind::ValueSe);
        let derived = descriptor
            .generate_distribution(&cell(&descriptor, [Some(50.0), Some(5.0), None]))
            .unwrap();
        assert_eq!(derived.kind(), Some(InputKind::Normal));
        assert_eq!(derived.first_parameter, Some(0.5));
        assert_eq!(derived.second_parameter, Some(0.05));
    }

    #[test]
    fn distribution_types_have_no_derivation() {
        let descriptor = InputDescriptor::new(InputKind::Gamma, InputCategory::Distribution);
        assert!(descriptor
            .generate_distribution(&cell(&descriptor, [Some(1.0), Some(2.0), None]))
            .is_none());
    }

    #[test]
    fn finish_value_ci_maps_ne_bounds() {
        let descriptor = effect(InputKind::ValueCi);
        let performance = Performance::Exact {
            value: 2.0,
            input: Some(PerformanceInput {
                value: Some(2.0),
                lower_bound: Some(BoundValue::Value(1.0)),
                upper_bound: Some(BoundValue::NotEstimable),
                ..Default::default()
            }),
        };
        let finished = descriptor.finish_input_cell(&performance);
        assert!(finished.upper_bound_ne);
        assert!(!finished.lower_bound_ne);
        assert_eq!(finished.second_parameter, Some(1.0));
        assert_eq!(finished.third_parameter, None);
        assert!(!finished.is_invalid);
    }

    #[test]
    fn finish_reattaches_percentage_marker() {
        let descriptor = effect(InputKind::ValueSampleSize);
        let performance = Performance::Exact {
            value: 0.3,
            input: Some(PerformanceInput {
                value: Some(30.0),
                sample_size: Some(100.0),
                scale: Some(InputScale::Percentage),
                ..Default::default()
            }),
        };
        let finished = descriptor.finish_input_cell(&performance);
        assert!(finished.is_percentage());
        assert_eq!(finished.first_parameter, Some(30.0));
        assert_eq!(finished.second_parameter, Some(100.0));
    }

    #[test]
    fn finish_marks_every_interval_slot_as_percentage() {
        let descriptor = effect(InputKind::ValueCi);
        let performance = Performance::Exact {
            value: 0.3,
            input: Some(PerformanceInput {
                value: Some(30.0),
                lower_bound: Some(BoundValue::Value(20.0)),
                upper_bound: Some(BoundValue::Value(140.0)),
                scale: Some(InputScale::Percentage),
                ..Default::default()
            }),
        };
        let finished = descriptor.finish_input_cell(&performance);
        let finished_descriptor = finished.input_parameters.as_ref().unwrap();
        for slot in ParameterSlot::ALL {
            assert!(finished_descriptor
                .parameter(slot)
                .unwrap()
                .has_constraint(&Constraint::Percentage));
        }
        assert!(finished.is_invalid);
    }

    #[test]
    fn finish_normal_reads_parameters() {
        let descriptor = InputDescriptor::new(InputKind::Normal, InputCategory::Distribution);
        let finished = descriptor.finish_input_cell(&Performance::Dnorm {
            parameters: NormalParameters { mu: 0.5, sigma: 0.2 },
            input: None,
        });
        assert_eq!(finished.first_parameter, Some(0.5));
        assert_eq!(finished.second_parameter, Some(0.2));
    }

    #[test]
    fn mismatched_performance_yields_invalid_cell() {
        let descriptor = effect(InputKind::ValueSe);
        let finished = descriptor.finish_input_cell(&Performance::exact(1.0));
        assert!(finished.is_invalid);
    }

    fn kind_with_params() -> impl Strategy<Value = (InputKind, [Option<f64>; 3])> {
        prop_oneof![
            (-50f64..100.0).prop_map(|v| (InputKind::Value, [Some(v), None, None])),
            (-50f64..100.0, 0f64..1e3).prop_map(|(v, se)| (InputKind::ValueSe, [Some(v), Some(se), None])),
            (-50f64..100.0, 0f64..1e3, 0f64..1e3)
                .prop_map(|(v, a, b)| (InputKind::ValueCi, [Some(v), Some(v - a), Some(v + b)])),
            (-50f64..100.0, 1u32..1000)
                .prop_map(|(v, n)| (InputKind::ValueSampleSize, [Some(v), Some(n as f64), None])),
            (0u32..1000, 0u32..1000).prop_map(|(e, extra)| {
                (InputKind::EventsSampleSize, [Some(e as f64), Some((e + extra + 1) as f64), None])
            }),
        ]
    }

    proptest! {
        #[test]
        fn finish_recovers_built_cell((kind, params) in kind_with_params(), pct in any::<bool>()) {
            let descriptor = if pct && kind.accepts_unit_constraints() {
                let mut d = effect(kind);
                d.parameter_mut(ParameterSlot::First).unwrap().unit_constraints.push(Constraint::percentage());
                d
            } else {
                effect(kind)
            };
            let original = cell(&descriptor, params);
            prop_assume!(!original.is_invalid);
            let performance = descriptor.build_performance(&original).unwrap();
            let finished = descriptor.finish_input_cell(&performance);
            prop_assert_eq!(finished.kind(), original.kind());
            prop_assert_eq!(finished.is_percentage(), original.is_percentage());
            for slot in ParameterSlot::ALL {
                match (finished.parameter(slot), original.parameter(slot)) {
                    (Some(a), Some(b)) => prop_assert!((a - b).abs() < 1e-9),
                    (a, b) => prop_assert_eq!(a, b),
                }
            }
        }

        #[test]
        fn events_derive_conjugate_beta(events in 0u32..500, extra in 0u32..500) {
            let sample_size = events + extra + 1;
            let descriptor = effect(InputKind::EventsSampleSize);
            let derived = descriptor
                .generate_distribution(&cell(&descriptor, [Some(events as f64), Some(sample_size as f64), None]))
                .unwrap();
            let alpha = derived.first_parameter.unwrap();
            let beta = derived.second_parameter.unwrap();
            prop_assert_eq!(alpha, events as f64 + 1.0);
            prop_assert_eq!(beta, (sample_size - events) as f64 + 1.0);
            prop_assert_eq!(alpha - 1.0, events as f64);
            prop_assert_eq!(alpha + beta - 2.0, sample_size as f64);
        }
    }
}
