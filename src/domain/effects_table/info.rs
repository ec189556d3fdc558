//! Per-row display metadata of the effects table.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

use super::labels::{build_label, StudyDataLabel};
use crate::domain::foundation::AlternativeId;
use crate::domain::workspace::{Alternative, Criterion, PerformanceTableEntry};

/// What the effects table knows about one data source row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectsTableInfo {
    pub is_absolute: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_uncertainty: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub study_data_labels_and_uncertainty: Option<BTreeMap<AlternativeId, StudyDataLabel>>,
}

impl EffectsTableInfo {
    fn relative() -> Self {
        Self {
            is_absolute: false,
            has_uncertainty: Some(true),
            study_data_labels_and_uncertainty: None,
        }
    }

    /// True when some alternative in an absolute row has an uncertain
    /// distribution.
    pub fn has_uncertain_study_data(&self) -> bool {
        self.is_absolute
            && self
                .study_data_labels_and_uncertainty
                .as_ref()
                .map_or(false, |labels| labels.values().any(|label| label.has_uncertainty))
    }
}

/// Builds display metadata keyed by data source id (criterion id for
/// tables without data sources). The first row seen for a key decides
/// whether it is absolute or relative.
pub fn create_effects_table_info(
    performance_table: &[PerformanceTableEntry],
) -> BTreeMap<String, EffectsTableInfo> {
    let mut info = BTreeMap::new();
    for entry in performance_table {
        let key = entry.row_key();
        if info.contains_key(key) {
            continue;
        }
        let row_info = match entry {
            PerformanceTableEntry::Absolute(_) => {
                let labels: BTreeMap<AlternativeId, StudyDataLabel> = performance_table
                    .iter()
                    .filter(|other| other.row_key() == key)
                    .filter_map(|other| match other {
                        PerformanceTableEntry::Absolute(absolute) => {
                            Some((absolute.alternative.clone(), build_label(&absolute.performance)))
                        }
                        PerformanceTableEntry::Relative(_) => None,
                    })
                    .collect();
                EffectsTableInfo {
                    is_absolute: true,
                    has_uncertainty: None,
                    study_data_labels_and_uncertainty: Some(labels),
                }
            }
            PerformanceTableEntry::Relative(_) => EffectsTableInfo::relative(),
        };
        info.insert(key.to_string(), row_info);
    }
    info
}

/// Moves info built from a stored problem onto the ids of migrated criteria
/// and alternatives.
///
/// Rows are found through the data sources' old ids, or through the old
/// criterion id for tables without data sources. Rows and labels with no
/// migrated counterpart are dropped.
pub fn rekey_effects_table_info(
    info: BTreeMap<String, EffectsTableInfo>,
    criteria: &[Criterion],
    alternatives: &[Alternative],
) -> BTreeMap<String, EffectsTableInfo> {
    let mut row_keys: HashMap<&str, &str> = HashMap::new();
    for criterion in criteria {
        if let (Some(old_id), Some(first)) = (&criterion.old_id, criterion.data_sources.first()) {
            row_keys.insert(old_id.as_str(), first.id.as_str());
        }
        for data_source in &criterion.data_sources {
            if let Some(old_id) = &data_source.old_id {
                row_keys.insert(old_id.as_str(), data_source.id.as_str());
            }
        }
    }
    let alternative_ids: HashMap<&str, &AlternativeId> = alternatives
        .iter()
        .filter_map(|a| a.old_id.as_ref().map(|old_id| (old_id.as_str(), &a.id)))
        .collect();

    info.into_iter()
        .filter_map(|(old_key, mut row_info)| {
            let Some(new_key) = row_keys.get(old_key.as_str()) else {
                debug!(row = %old_key, "No migrated data source for effects table row");
                return None;
            };
            row_info.study_data_labels_and_uncertainty = row_info.study_data_labels_and_uncertainty.map(|labels| {
                labels
                    .into_iter()
                    .filter_map(|(old_id, label)| {
                        alternative_ids.get(old_id.as_str()).map(|id| ((*id).clone(), label))
                    })
                    .collect()
            });
            Some((new_key.to_string(), row_info))
        })
        .collect()
}

/// Whether any row has study data worth showing uncertainty for.
pub fn is_study_data_available(info: &BTreeMap<String, EffectsTableInfo>) -> bool {
    info.values().any(EffectsTableInfo::has_uncertain_study_data)
}
