//! Row layout of the effects table.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::CriterionId;
use crate::domain::workspace::{Criterion, DataSource, ValueTree};

pub const FAVORABLE_HEADER: &str = "Favorable effects";
pub const UNFAVORABLE_HEADER: &str = "Unfavorable effects";

/// Criterion columns repeated on each of its data source rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CriterionRow {
    pub id: CriterionId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_favorable: Option<bool>,
    pub can_be_percentage: bool,
    pub number_of_data_sources: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderRow {
    pub header_text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSourceRow {
    pub criterion: CriterionRow,
    pub is_first_row: bool,
    pub data_source: DataSource,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rowType", rename_all = "camelCase")]
pub enum EffectsTableRow {
    Header(HeaderRow),
    DataSource(DataSourceRow),
}

impl EffectsTableRow {
    fn header(text: &str) -> Self {
        EffectsTableRow::Header(HeaderRow { header_text: text.to_string() })
    }

    pub fn is_header(&self) -> bool {
        matches!(self, EffectsTableRow::Header(_))
    }
}

/// True when some data source measures a proportion.
pub fn can_be_percentage(criterion: &Criterion) -> bool {
    criterion
        .data_sources
        .iter()
        .any(|data_source| data_source.effective_scale().is_proportion())
}

/// Expands criteria into one row per data source.
pub fn build_table_rows<'a>(criteria: impl IntoIterator<Item = &'a Criterion>) -> Vec<EffectsTableRow> {
    let mut rows = Vec::new();
    for criterion in criteria {
        let criterion_row = CriterionRow {
            id: criterion.id.clone(),
            title: criterion.title.clone(),
            description: criterion.description.clone(),
            is_favorable: criterion.is_favorable,
            can_be_percentage: can_be_percentage(criterion),
            number_of_data_sources: criterion.data_sources.len(),
        };
        for (index, data_source) in criterion.data_sources.iter().enumerate() {
            rows.push(EffectsTableRow::DataSource(DataSourceRow {
                criterion: criterion_row.clone(),
                is_first_row: index == 0,
                data_source: data_source.clone(),
            }));
        }
    }
    rows
}

/// Lays out the table, splitting favorable from unfavorable criteria when
/// favorability is known.
///
/// The value tree decides favorability when given; otherwise the criteria's
/// own flags do. Without either, criteria keep their order and no header
/// rows are added. Order within each block is the input order.
pub fn build_effects_table(value_tree: Option<&ValueTree>, criteria: &[Criterion]) -> Vec<EffectsTableRow> {
    let favorability: Option<Vec<bool>> = match value_tree {
        Some(tree) => Some(
            criteria
                .iter()
                .map(|c| tree.is_favorable(&c.id).or(c.is_favorable).unwrap_or(false))
                .collect(),
        ),
        None if criteria.iter().any(|c| c.is_favorable.is_some()) => {
            Some(criteria.iter().map(|c| c.is_favorable == Some(true)).collect())
        }
        None => None,
    };

    let Some(favorability) = favorability else {
        return build_table_rows(criteria);
    };

    let favorable = criteria
        .iter()
        .zip(&favorability)
        .filter(|(_, is_favorable)| **is_favorable)
        .map(|(criterion, _)| criterion);
    let unfavorable = criteria
        .iter()
        .zip(&favorability)
        .filter(|(_, is_favorable)| !**is_favorable)
        .map(|(criterion, _)| criterion);

    let mut rows = vec![EffectsTableRow::header(FAVORABLE_HEADER)];
    rows.extend(build_table_rows(favorable));
    rows.push(EffectsTableRow::header(UNFAVORABLE_HEADER));
    rows.extend(build_table_rows(unfavorable));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{Scale, UnitOfMeasurement};

    fn criterion(id: &str, favorable: Option<bool>, data_sources: &[&str]) -> Criterion {
        let mut criterion = Criterion::new(id, id.to_uppercase());
        criterion.is_favorable = favorable;
        for ds in data_sources {
            criterion = criterion.with_data_source(DataSource::new(*ds, UnitOfMeasurement::default()));
        }
        criterion
    }

    fn titles(rows: &[EffectsTableRow]) -> Vec<String> {
        rows.iter()
            .map(|row| match row {
                EffectsTableRow::Header(header) => header.header_text.clone(),
                EffectsTableRow::DataSource(row) => row.data_source.id.to_string(),
            })
            .collect()
    }

    #[test]
    fn without_favorability_keeps_order() {
        let criteria = vec![criterion("c1", None, &["ds1"]), criterion("c2", None, &["ds2", "ds3"])];
        let rows = build_effects_table(None, &criteria);
        assert_eq!(titles(&rows), vec!["ds1", "ds2", "ds3"]);
        assert!(rows.iter().all(|row| !row.is_header()));
    }

    #[test]
    fn favorability_splits_into_blocks_keeping_relative_order() {
        let criteria = vec![
            criterion("c1", Some(false), &["ds1"]),
            criterion("c2", Some(true), &["ds2"]),
            criterion("c3", Some(false), &["ds3"]),
            criterion("c4", Some(true), &["ds4"]),
        ];
        let rows = build_effects_table(None, &criteria);
        assert_eq!(
            titles(&rows),
            vec![FAVORABLE_HEADER, "ds2", "ds4", UNFAVORABLE_HEADER, "ds1", "ds3"]
        );
    }

    #[test]
    fn value_tree_overrides_criterion_flags() {
        let criteria = vec![criterion("c1", None, &["ds1"]), criterion("c2", None, &["ds2"])];
        let c2 = CriterionId::from("c2");
        let tree = ValueTree::from_favorability("Benefit-risk balance", vec![(&c2, true)]);
        let rows = build_effects_table(Some(&tree), &criteria);
        assert_eq!(titles(&rows), vec![FAVORABLE_HEADER, "ds2", UNFAVORABLE_HEADER, "ds1"]);
    }

    #[test]
    fn rows_carry_first_row_and_data_source_count() {
        let rows = build_table_rows(&[criterion("c1", None, &["ds1", "ds2"])]);
        match (&rows[0], &rows[1]) {
            (EffectsTableRow::DataSource(first), EffectsTableRow::DataSource(second)) => {
                assert!(first.is_first_row);
                assert!(!second.is_first_row);
                assert_eq!(first.criterion.number_of_data_sources, 2);
            }
            other => panic!("Expected data source rows, got {:?}", other),
        }
    }

    #[test]
    fn proportion_scales_allow_percentages() {
        let mut c = criterion("c1", None, &[]);
        c = c.with_data_source(DataSource::new("ds1", UnitOfMeasurement::percentage()));
        assert!(can_be_percentage(&c));

        let mut d = criterion("c2", None, &["ds2"]);
        assert!(!can_be_percentage(&d));
        d.data_sources[0].scale = Some(Scale(Some(0.0), Some(100.0)));
        assert!(can_be_percentage(&d));
    }

    #[test]
    fn header_rows_serialize_with_row_type() {
        let json = serde_json::to_value(EffectsTableRow::header(FAVORABLE_HEADER)).unwrap();
        assert_eq!(json["rowType"], "header");
        assert_eq!(json["headerText"], FAVORABLE_HEADER);
    }
}
