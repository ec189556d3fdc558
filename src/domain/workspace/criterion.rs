//! Editable criteria, data sources and alternatives.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{AlternativeId, CriterionId, DataSourceId, Scale, UnitOfMeasurement};

/// One body of evidence backing a criterion's measurements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSource {
    pub id: DataSourceId,
    /// Id in the workspace this data source was copied from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_id: Option<DataSourceId>,
    /// Back-reference to the owning criterion.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub criterion_id: Option<CriterionId>,
    #[serde(default)]
    pub unit_of_measurement: UnitOfMeasurement,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_link: Option<String>,
    /// Explicit theoretical range; derived from the unit when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<Scale>,
}

impl DataSource {
    /// Creates a data source with the given unit.
    pub fn new(id: impl Into<DataSourceId>, unit_of_measurement: UnitOfMeasurement) -> Self {
        Self {
            id: id.into(),
            old_id: None,
            criterion_id: None,
            unit_of_measurement,
            source: None,
            source_link: None,
            scale: None,
        }
    }

    /// Adds a reference.
    pub fn with_source(mut self, source: impl Into<String>, source_link: Option<String>) -> Self {
        self.source = Some(source.into());
        self.source_link = source_link;
        self
    }

    /// The explicit scale or the one implied by the unit.
    pub fn effective_scale(&self) -> Scale {
        self.scale.unwrap_or_else(|| self.unit_of_measurement.scale())
    }
}

/// An outcome dimension evaluated across alternatives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Criterion {
    pub id: CriterionId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_id: Option<CriterionId>,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_favorable: Option<bool>,
    #[serde(default)]
    pub data_sources: Vec<DataSource>,
}

impl Criterion {
    /// Creates a criterion without data sources.
    pub fn new(id: impl Into<CriterionId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            old_id: None,
            title: title.into(),
            description: None,
            is_favorable: None,
            data_sources: Vec::new(),
        }
    }

    /// Marks the criterion favorable or unfavorable.
    pub fn with_favorability(mut self, is_favorable: bool) -> Self {
        self.is_favorable = Some(is_favorable);
        self
    }

    /// Adds a data source, pointing its back-reference at this criterion.
    pub fn with_data_source(mut self, mut data_source: DataSource) -> Self {
        data_source.criterion_id = Some(self.id.clone());
        self.data_sources.push(data_source);
        self
    }
}

/// A treatment or intervention option being compared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alternative {
    pub id: AlternativeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_id: Option<AlternativeId>,
    pub title: String,
}

impl Alternative {
    pub fn new(id: impl Into<AlternativeId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            old_id: None,
            title: title.into(),
        }
    }
}
