//! Persisted performance of one alternative on one data source.
//!
//! Values are always stored on the decimal scale. The optional `input`
//! block keeps what the user originally typed (including the scale it was
//! typed on) so an editable cell can be rebuilt later.

use serde::de::{self, Deserializer, Visitor};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::InputScale;

/// Marker persisted for a confidence bound that could not be estimated.
pub const NOT_ESTIMABLE: &str = "NE";

/// A confidence-interval bound: a number or the `"NE"` marker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BoundValue {
    Value(f64),
    NotEstimable,
}

impl BoundValue {
    pub fn value(&self) -> Option<f64> {
        match self {
            BoundValue::Value(v) => Some(*v),
            BoundValue::NotEstimable => None,
        }
    }

    pub fn is_not_estimable(&self) -> bool {
        matches!(self, BoundValue::NotEstimable)
    }
}

impl Serialize for BoundValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            BoundValue::Value(v) => serializer.serialize_f64(*v),
            BoundValue::NotEstimable => serializer.serialize_str(NOT_ESTIMABLE),
        }
    }
}

struct BoundValueVisitor;

impl<'de> Visitor<'de> for BoundValueVisitor {
    type Value = BoundValue;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a number or \"{}\"", NOT_ESTIMABLE)
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<BoundValue, E> {
        Ok(BoundValue::Value(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<BoundValue, E> {
        Ok(BoundValue::Value(v as f64))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<BoundValue, E> {
        Ok(BoundValue::Value(v as f64))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<BoundValue, E> {
        if v == NOT_ESTIMABLE {
            Ok(BoundValue::NotEstimable)
        } else {
            Err(E::invalid_value(de::Unexpected::Str(v), &self))
        }
    }
}

impl<'de> Deserialize<'de> for BoundValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(BoundValueVisitor)
    }
}

/// Values the user entered, kept next to the derived performance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub std_err: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lower_bound: Option<BoundValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upper_bound: Option<BoundValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub events: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mu: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sigma: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<InputScale>,
}

impl PerformanceInput {
    pub fn is_percentage(&self) -> bool {
        self.scale == Some(InputScale::Percentage)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeParameters {
    pub lower_bound: f64,
    pub upper_bound: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalParameters {
    pub mu: f64,
    pub sigma: f64,
}

/// Shape parameters shared by Beta and Gamma distributions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapeParameters {
    pub alpha: f64,
    pub beta: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentsTParameters {
    pub mu: f64,
    pub std_err: f64,
    pub dof: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurvivalParameters {
    pub alpha: f64,
    pub beta: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary_measure: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<f64>,
}

/// A performance entry, tagged by `type` in JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Performance {
    Exact {
        value: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        input: Option<PerformanceInput>,
    },
    Empty {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<String>,
    },
    Text {
        value: String,
    },
    Range {
        parameters: RangeParameters,
    },
    Dnorm {
        parameters: NormalParameters,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        input: Option<PerformanceInput>,
    },
    Dbeta {
        parameters: ShapeParameters,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        input: Option<PerformanceInput>,
    },
    Dgamma {
        parameters: ShapeParameters,
    },
    Dt {
        parameters: StudentsTParameters,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        input: Option<PerformanceInput>,
    },
    Dsurv {
        parameters: SurvivalParameters,
    },
}

impl Performance {
    pub fn exact(value: f64) -> Self {
        Performance::Exact { value, input: None }
    }

    pub fn empty() -> Self {
        Performance::Empty { value: None }
    }

    pub fn normal(mu: f64, sigma: f64) -> Self {
        Performance::Dnorm {
            parameters: NormalParameters { mu, sigma },
            input: None,
        }
    }

    pub fn beta(alpha: f64, beta: f64) -> Self {
        Performance::Dbeta {
            parameters: ShapeParameters { alpha, beta },
            input: None,
        }
    }

    pub fn gamma(alpha: f64, beta: f64) -> Self {
        Performance::Dgamma {
            parameters: ShapeParameters { alpha, beta },
        }
    }

    /// The JSON `type` tag.
    pub fn type_name(&self) -> &'static str {
        match self {
            Performance::Exact { .. } => "exact",
            Performance::Empty { .. } => "empty",
            Performance::Text { .. } => "text",
            Performance::Range { .. } => "range",
            Performance::Dnorm { .. } => "dnorm",
            Performance::Dbeta { .. } => "dbeta",
            Performance::Dgamma { .. } => "dgamma",
            Performance::Dt { .. } => "dt",
            Performance::Dsurv { .. } => "dsurv",
        }
    }

    /// The preserved user input, if any.
    pub fn input(&self) -> Option<&PerformanceInput> {
        match self {
            Performance::Exact { input, .. }
            | Performance::Dnorm { input, .. }
            | Performance::Dbeta { input, .. }
            | Performance::Dt { input, .. } => input.as_ref(),
            _ => None,
        }
    }

    /// True for everything but point values and empty cells.
    pub fn has_uncertainty(&self) -> bool {
        !matches!(self, Performance::Exact { .. } | Performance::Empty { .. })
    }
}
