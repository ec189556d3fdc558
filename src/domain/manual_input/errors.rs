//! Structural failures of manual input operations.
//!
//! A constraint violation is not an error here: it is reported as a message
//! on the cell and never aborts a batch. These variants cover states the
//! caller should never be able to produce.

use thiserror::Error;

use super::InputKind;
use crate::domain::foundation::{AlternativeId, DataSourceId, DomainError, ErrorCode};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ManualInputError {
    /// Neither an effect nor a distribution performance could be built.
    #[error("No performance for data source '{data_source}' and alternative '{alternative}'")]
    MissingPerformance {
        data_source: DataSourceId,
        alternative: AlternativeId,
    },

    /// A cell marked valid carries no input type.
    #[error("Cell for data source '{data_source}' and alternative '{alternative}' has no input type")]
    MissingInputType {
        data_source: DataSourceId,
        alternative: AlternativeId,
    },

    /// The input type cannot be turned into a distribution.
    #[error("Input type '{kind}' has no distribution rule")]
    NoDistributionRule { kind: InputKind },
}

impl ManualInputError {
    pub fn missing_performance(data_source: &DataSourceId, alternative: &AlternativeId) -> Self {
        ManualInputError::MissingPerformance {
            data_source: data_source.clone(),
            alternative: alternative.clone(),
        }
    }

    pub fn missing_input_type(data_source: &DataSourceId, alternative: &AlternativeId) -> Self {
        ManualInputError::MissingInputType {
            data_source: data_source.clone(),
            alternative: alternative.clone(),
        }
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            ManualInputError::MissingPerformance { .. } => ErrorCode::MissingPerformance,
            ManualInputError::MissingInputType { .. } => ErrorCode::MissingInputType,
            ManualInputError::NoDistributionRule { .. } => ErrorCode::NoDistributionRule,
        }
    }
}

impl From<ManualInputError> for DomainError {
    fn from(err: ManualInputError) -> Self {
        let domain_error = DomainError::new(err.code(), err.to_string());
        match err {
            ManualInputError::MissingPerformance { data_source, alternative }
            | ManualInputError::MissingInputType { data_source, alternative } => domain_error
                .with_detail("data_source", data_source.to_string())
                .with_detail("alternative", alternative.to_string()),
            ManualInputError::NoDistributionRule { kind } => {
                domain_error.with_detail("input_type", kind.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_performance_displays_pair() {
        let err = ManualInputError::missing_performance(
            &DataSourceId::from("ds1"),
            &AlternativeId::from("alt1"),
        );
        assert_eq!(
            err.to_string(),
            "No performance for data source 'ds1' and alternative 'alt1'"
        );
        assert_eq!(err.code(), ErrorCode::MissingPerformance);
    }

    #[test]
    fn converts_to_domain_error_with_details() {
        let err = ManualInputError::missing_input_type(
            &DataSourceId::from("ds1"),
            &AlternativeId::from("alt2"),
        );
        let domain: DomainError = err.into();
        assert_eq!(domain.code, ErrorCode::MissingInputType);
        assert_eq!(domain.details.get("alternative"), Some(&"alt2".to_string()));
    }

    #[test]
    fn no_distribution_rule_names_input_type() {
        let err = ManualInputError::NoDistributionRule { kind: InputKind::Beta };
        assert_eq!(err.to_string(), "Input type 'beta' has no distribution rule");
        let domain: DomainError = err.into();
        assert_eq!(domain.details.get("input_type"), Some(&"beta".to_string()));
    }
}
