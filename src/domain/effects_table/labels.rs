//! Human-readable labels for stored performances.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{format_number, round_decimals};
use crate::domain::workspace::{BoundValue, Performance, PerformanceInput, PerformanceRecord};

/// Shown where no performance was entered.
pub const NOT_ENTERED: &str = "Not entered";

/// Continuity correction added to survival parameters when they were built.
const SURVIVAL_CORRECTION: f64 = 0.001;

/// Labels for one alternative's cell in the effects table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyDataLabel {
    /// Study data as entered, derived from the primary performance.
    pub label: String,
    pub effect_label: String,
    pub effect_value: String,
    pub distribution_label: String,
    pub has_uncertainty: bool,
}

/// Builds all labels for a performance record.
pub fn build_label(record: &PerformanceRecord) -> StudyDataLabel {
    StudyDataLabel {
        label: record
            .primary()
            .map(performance_label)
            .unwrap_or_else(|| NOT_ENTERED.to_string()),
        effect_label: effect_label(record),
        effect_value: effect_value(record),
        distribution_label: distribution_label(record.distribution()),
        has_uncertainty: record.distribution().map_or(false, Performance::has_uncertainty),
    }
}

/// Study-data text of a single performance.
pub fn performance_label(performance: &Performance) -> String {
    match performance {
        Performance::Exact { value, input } => match input {
            Some(input) => input_label(input).unwrap_or_else(|| format_number(*value)),
            None => format_number(*value),
        },
        Performance::Empty { value } => value.clone().unwrap_or_default(),
        Performance::Text { value } => value.clone(),
        Performance::Range { parameters } => format!(
            "[{}, {}]",
            format_number(parameters.lower_bound),
            format_number(parameters.upper_bound)
        ),
        Performance::Dt { parameters, input } => {
            match input.as_ref().and_then(|i| Some((i.mu?, i.sigma?, i.sample_size?))) {
                Some((mu, sigma, sample_size)) => format!(
                    "{} ({}), {}",
                    format_number(mu),
                    format_number(sigma),
                    format_number(sample_size)
                ),
                None => format!(
                    "{} ({}), {}",
                    format_number(parameters.mu),
                    format_number(round_decimals(parameters.std_err, 3)),
                    format_number(parameters.dof + 1.0)
                ),
            }
        }
        Performance::Dnorm { parameters, input } => input
            .as_ref()
            .and_then(normal_input_label)
            .unwrap_or_else(|| {
                format!(
                    "{} ({})",
                    format_number(parameters.mu),
                    format_number(round_decimals(parameters.sigma, 3))
                )
            }),
        Performance::Dbeta { parameters, input } => input
            .as_ref()
            .and_then(events_label)
            .unwrap_or_else(|| {
                format!(
                    "{} / {}",
                    format_number(parameters.alpha - 1.0),
                    format_number(parameters.beta + parameters.alpha - 2.0)
                )
            }),
        Performance::Dgamma { parameters } => format!(
            "{} / {}",
            format_number(parameters.alpha),
            format_number(parameters.beta)
        ),
        Performance::Dsurv { parameters } => format!(
            "{} / {}",
            format_number(round_decimals(parameters.alpha - SURVIVAL_CORRECTION, 3)),
            format_number(round_decimals(parameters.beta - SURVIVAL_CORRECTION, 3))
        ),
    }
}

fn events_label(input: &PerformanceInput) -> Option<String> {
    Some(format!(
        "{} / {}",
        format_number(input.events?),
        format_number(input.sample_size?)
    ))
}

/// Dichotomous inputs show counts, continuous ones show their spread.
fn normal_input_label(input: &PerformanceInput) -> Option<String> {
    if let Some(label) = events_label(input) {
        return Some(label);
    }
    let value = input.value?;
    let pct = percent_suffix(input);
    if let Some(sample_size) = input.sample_size {
        return Some(format!("{}{} ({})", format_number(value), pct, format_number(sample_size)));
    }
    if let Some(std_err) = input.std_err {
        return Some(format!("{}{} ({}{})", format_number(value), pct, format_number(std_err), pct));
    }
    match (input.lower_bound, input.upper_bound) {
        (Some(lower), Some(upper)) => Some(format!(
            "{}{} ({}; {})",
            format_number(value),
            pct,
            bound_label(lower, pct),
            bound_label(upper, pct)
        )),
        _ => None,
    }
}

/// Label of the values a user typed for an exact effect.
fn input_label(input: &PerformanceInput) -> Option<String> {
    if let Some(label) = events_label(input) {
        return Some(label);
    }
    let pct = percent_suffix(input);
    let mut label = format!("{}{}", format_number(input.value?), pct);
    if let Some(std_err) = input.std_err {
        label.push_str(&format!(" ({}{})", format_number(std_err), pct));
    }
    if let (Some(lower), Some(upper)) = (input.lower_bound, input.upper_bound) {
        label.push_str(&format!(" ({}; {})", bound_label(lower, pct), bound_label(upper, pct)));
    }
    if let Some(sample_size) = input.sample_size {
        label.push_str(&format!(" ({})", format_number(sample_size)));
    }
    Some(label)
}

fn percent_suffix(input: &PerformanceInput) -> &'static str {
    input.scale.map_or("", |scale| scale.suffix())
}

fn bound_label(bound: BoundValue, pct: &str) -> String {
    match bound {
        BoundValue::Value(v) => format!("{}{}", format_number(v), pct),
        BoundValue::NotEstimable => "NE".to_string(),
    }
}

/// Effect column text: entered values, else the plain effect value.
pub fn effect_label(record: &PerformanceRecord) -> String {
    match record.effect() {
        None => match record.distribution() {
            Some(distribution) => match distribution.input().and_then(input_label) {
                Some(label) => label,
                None => match distribution {
                    Performance::Exact { value, .. } => format_number(*value),
                    _ => NOT_ENTERED.to_string(),
                },
            },
            None => NOT_ENTERED.to_string(),
        },
        Some(effect) => match effect.input().and_then(input_label) {
            Some(label) => label,
            None => plain_value(effect),
        },
    }
}

/// The bare number of a non-empty effect, or an empty string.
pub fn effect_value(record: &PerformanceRecord) -> String {
    match record.effect() {
        Some(effect @ (Performance::Exact { .. } | Performance::Text { .. })) => plain_value(effect),
        _ => String::new(),
    }
}

fn plain_value(performance: &Performance) -> String {
    match performance {
        Performance::Exact { value, .. } => format_number(*value),
        Performance::Empty { value } => value.clone().unwrap_or_default(),
        Performance::Text { value } => value.clone(),
        other => performance_label(other),
    }
}

/// Distribution column text, naming the distribution and its parameters.
pub fn distribution_label(distribution: Option<&Performance>) -> String {
    let Some(distribution) = distribution else {
        return NOT_ENTERED.to_string();
    };
    match distribution {
        Performance::Dt { parameters, .. } => format!(
            "Student's t({}, {}, {})",
            format_number(parameters.mu),
            format_number(parameters.std_err),
            format_number(parameters.dof)
        ),
        Performance::Dnorm { parameters, .. } => format!(
            "Normal({}, {})",
            format_number(parameters.mu),
            format_number(parameters.sigma)
        ),
        Performance::Dbeta { parameters, .. } => format!(
            "Beta({}, {})",
            format_number(parameters.alpha),
            format_number(parameters.beta)
        ),
        Performance::Dgamma { parameters } => format!(
            "Gamma({}, {})",
            format_number(parameters.alpha),
            format_number(parameters.beta)
        ),
        Performance::Dsurv { parameters } => format!(
            "Gamma({}, {})",
            format_number(parameters.alpha),
            format_number(parameters.beta)
        ),
        other => plain_value(other),
    }
}
