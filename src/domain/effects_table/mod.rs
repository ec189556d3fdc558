//! Effects Table Module - Display layout and labels for performances.
//!
//! Lays out criteria and data sources as table rows, grouped by
//! favorability, and renders stored performances as study-data and
//! distribution labels.

mod info;
mod labels;
mod rows;

pub use info::{
    create_effects_table_info, is_study_data_available, rekey_effects_table_info, EffectsTableInfo,
};
pub use labels::{
    build_label, distribution_label, effect_label, effect_value, performance_label, StudyDataLabel,
    NOT_ENTERED,
};
pub use rows::{
    build_effects_table, build_table_rows, can_be_percentage, CriterionRow, DataSourceRow,
    EffectsTableRow, HeaderRow, FAVORABLE_HEADER, UNFAVORABLE_HEADER,
};

use std::collections::BTreeMap;

use crate::domain::workspace::{Criterion, PerformanceRecord, PerformanceTableEntry, ValueTree};

/// Effects table operations, grouped for callers that prefer a service.
pub struct EffectsTableService;

impl EffectsTableService {
    pub fn build_effects_table(value_tree: Option<&ValueTree>, criteria: &[Criterion]) -> Vec<EffectsTableRow> {
        build_effects_table(value_tree, criteria)
    }

    pub fn create_effects_table_info(
        performance_table: &[PerformanceTableEntry],
    ) -> BTreeMap<String, EffectsTableInfo> {
        create_effects_table_info(performance_table)
    }

    pub fn build_label(record: &PerformanceRecord) -> StudyDataLabel {
        build_label(record)
    }

    pub fn is_study_data_available(info: &BTreeMap<String, EffectsTableInfo>) -> bool {
        is_study_data_available(info)
    }
}
