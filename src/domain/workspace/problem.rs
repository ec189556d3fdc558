//! The assembled problem document handed to persistence and the solver.

use serde::{Deserialize, Serialize};

use super::keyed::Keyed;
use super::performance::Performance;
use crate::domain::foundation::{AlternativeId, CriterionId, DataSourceId, Scale, UnitOfMeasurement};

/// Title of the favourable branch of a value tree.
pub const FAVOURABLE_EFFECTS: &str = "Favourable effects";
/// Title of the unfavourable branch of a value tree.
pub const UNFAVOURABLE_EFFECTS: &str = "Unfavourable effects";

/// A unit as stored in a problem: structured, or a bare label in older files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UnitField {
    Typed(UnitOfMeasurement),
    Label(String),
}

impl UnitField {
    /// Normalizes to a structured unit; bare labels become custom units.
    pub fn to_unit(&self) -> UnitOfMeasurement {
        match self {
            UnitField::Typed(unit) => unit.clone(),
            UnitField::Label(label) => UnitOfMeasurement::custom(label.clone(), None, None),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemDataSource {
    pub id: DataSourceId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_of_measurement: Option<UnitField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<Scale>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_link: Option<String>,
}

/// A criterion as stored in a problem.
///
/// Older problems have no data sources and keep unit, scale and reference
/// on the criterion itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemCriterion {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_favorable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_of_measurement: Option<UnitField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<Scale>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_link: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub data_sources: Vec<ProblemDataSource>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemAlternative {
    pub title: String,
}

/// Effect and distribution performance of one cell.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SplitPerformance {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effect: Option<Performance>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distribution: Option<Performance>,
}

/// Performance of a table row: the current split form or a legacy single
/// performance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PerformanceRecord {
    Single(Performance),
    Split(SplitPerformance),
}

impl PerformanceRecord {
    /// The performance a solver would use: distribution first, then effect.
    pub fn primary(&self) -> Option<&Performance> {
        match self {
            PerformanceRecord::Single(performance) => Some(performance),
            PerformanceRecord::Split(split) => split.distribution.as_ref().or(split.effect.as_ref()),
        }
    }

    pub fn effect(&self) -> Option<&Performance> {
        match self {
            PerformanceRecord::Single(_) => None,
            PerformanceRecord::Split(split) => split.effect.as_ref(),
        }
    }

    pub fn distribution(&self) -> Option<&Performance> {
        match self {
            PerformanceRecord::Single(performance) => Some(performance),
            PerformanceRecord::Split(split) => split.distribution.as_ref(),
        }
    }
}

/// Row of a performance table for one alternative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbsoluteEntry {
    pub alternative: AlternativeId,
    pub criterion: CriterionId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_source: Option<DataSourceId>,
    pub performance: PerformanceRecord,
}

/// Row describing relative effects between alternatives. Passed through
/// untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelativeEntry {
    pub criterion: CriterionId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_source: Option<DataSourceId>,
    pub performance: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PerformanceTableEntry {
    Absolute(AbsoluteEntry),
    Relative(RelativeEntry),
}

impl PerformanceTableEntry {
    pub fn criterion(&self) -> &CriterionId {
        match self {
            PerformanceTableEntry::Absolute(entry) => &entry.criterion,
            PerformanceTableEntry::Relative(entry) => &entry.criterion,
        }
    }

    pub fn data_source(&self) -> Option<&DataSourceId> {
        match self {
            PerformanceTableEntry::Absolute(entry) => entry.data_source.as_ref(),
            PerformanceTableEntry::Relative(entry) => entry.data_source.as_ref(),
        }
    }

    /// Key used to group rows: the data source, or the criterion in tables
    /// that predate data sources.
    pub fn row_key(&self) -> &str {
        self.data_source()
            .map(DataSourceId::as_str)
            .unwrap_or_else(|| self.criterion().as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueTreeNode {
    pub title: String,
    #[serde(default)]
    pub criteria: Vec<CriterionId>,
}

/// Grouping of criteria into favourable and unfavourable branches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueTree {
    pub title: String,
    #[serde(default)]
    pub children: Vec<ValueTreeNode>,
}

impl ValueTree {
    /// Builds the two-branch tree from `(criterion, is_favorable)` pairs.
    pub fn from_favorability<'a>(
        title: impl Into<String>,
        criteria: impl IntoIterator<Item = (&'a CriterionId, bool)>,
    ) -> Self {
        let mut favourable = Vec::new();
        let mut unfavourable = Vec::new();
        for (id, is_favorable) in criteria {
            if is_favorable {
                favourable.push(id.clone());
            } else {
                unfavourable.push(id.clone());
            }
        }
        Self {
            title: title.into(),
            children: vec![
                ValueTreeNode { title: FAVOURABLE_EFFECTS.to_string(), criteria: favourable },
                ValueTreeNode { title: UNFAVOURABLE_EFFECTS.to_string(), criteria: unfavourable },
            ],
        }
    }

    /// Whether the tree places the criterion in the favourable branch.
    /// `None` if the tree does not mention it.
    pub fn is_favorable(&self, id: &CriterionId) -> Option<bool> {
        self.children
            .iter()
            .find(|node| node.criteria.contains(id))
            .map(|node| node.title == FAVOURABLE_EFFECTS)
    }
}

/// A complete problem definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Problem {
    #[serde(default)]
    pub schema_version: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_tree: Option<ValueTree>,
    pub criteria: Keyed<CriterionId, ProblemCriterion>,
    pub alternatives: Keyed<AlternativeId, ProblemAlternative>,
    #[serde(default)]
    pub performance_table: Vec<PerformanceTableEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn legacy_single_performance_row_parses_as_single() {
        let entry: PerformanceTableEntry = serde_json::from_value(json!({
            "alternative": "alt1",
            "criterion": "crit1",
            "performance": {"type": "dbeta", "parameters": {"alpha": 3, "beta": 9}}
        }))
        .unwrap();
        match entry {
            PerformanceTableEntry::Absolute(entry) => {
                assert_eq!(entry.performance.primary(), Some(&Performance::beta(3.0, 9.0)));
                assert!(entry.performance.effect().is_none());
            }
            other => panic!("Expected absolute entry, got {:?}", other),
        }
    }

    #[test]
    fn split_performance_row_prefers_distribution() {
        let entry: PerformanceTableEntry = serde_json::from_value(json!({
            "alternative": "alt1",
            "criterion": "crit1",
            "dataSource": "ds1",
            "performance": {
                "effect": {"type": "exact", "value": 0.5},
                "distribution": {"type": "dnorm", "parameters": {"mu": 0.5, "sigma": 0.1}}
            }
        }))
        .unwrap();
        assert_eq!(entry.row_key(), "ds1");
        if let PerformanceTableEntry::Absolute(entry) = entry {
            assert_eq!(entry.performance.primary(), Some(&Performance::normal(0.5, 0.1)));
            assert_eq!(entry.performance.effect(), Some(&Performance::exact(0.5)));
        } else {
            panic!("Expected absolute entry");
        }
    }

    #[test]
    fn relative_row_without_alternative_is_kept_verbatim() {
        let entry: PerformanceTableEntry = serde_json::from_value(json!({
            "criterion": "crit1",
            "performance": {"type": "dmnorm", "parameters": {"baseline": {}}}
        }))
        .unwrap();
        assert!(matches!(entry, PerformanceTableEntry::Relative(_)));
        assert_eq!(entry.row_key(), "crit1");
    }

    #[test]
    fn criterion_unit_accepts_bare_label() {
        let criterion: ProblemCriterion =
            serde_json::from_value(json!({"title": "Weight", "unitOfMeasurement": "kg"})).unwrap();
        let unit = criterion.unit_of_measurement.unwrap().to_unit();
        assert_eq!(unit, UnitOfMeasurement::custom("kg", None, None));
    }

    #[test]
    fn value_tree_partitions_by_favorability() {
        let a = CriterionId::from("a");
        let b = CriterionId::from("b");
        let tree = ValueTree::from_favorability("Benefit-risk balance", vec![(&a, true), (&b, false)]);
        assert_eq!(tree.is_favorable(&a), Some(true));
        assert_eq!(tree.is_favorable(&b), Some(false));
        assert_eq!(tree.is_favorable(&CriterionId::from("c")), None);
    }
}
