//! Problem assembly configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::manual_input::{ProblemSettings, DEFAULT_SCHEMA_VERSION, DEFAULT_VALUE_TREE_TITLE};

/// Settings stamped onto every assembled problem
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ProblemConfig {
    /// Schema version written into new problems
    #[serde(default = "default_schema_version")]
    pub schema_version: String,

    /// Title of the root node of generated value trees
    #[serde(default = "default_value_tree_title")]
    pub value_tree_title: String,
}

impl ProblemConfig {
    /// Validate problem configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !is_semantic_version(&self.schema_version) {
            return Err(ValidationError::InvalidSchemaVersion(self.schema_version.clone()));
        }
        if self.value_tree_title.trim().is_empty() {
            return Err(ValidationError::EmptyValueTreeTitle);
        }
        Ok(())
    }
}

impl Default for ProblemConfig {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            value_tree_title: default_value_tree_title(),
        }
    }
}

impl From<&ProblemConfig> for ProblemSettings {
    fn from(config: &ProblemConfig) -> Self {
        ProblemSettings {
            schema_version: config.schema_version.clone(),
            value_tree_title: config.value_tree_title.clone(),
        }
    }
}

fn is_semantic_version(version: &str) -> bool {
    let parts: Vec<&str> = version.split('.').collect();
    parts.len() == 3
        && parts
            .iter()
            .all(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_digit()))
}

fn default_schema_version() -> String {
    DEFAULT_SCHEMA_VERSION.to_string()
}

fn default_value_tree_title() -> String {
    DEFAULT_VALUE_TREE_TITLE.to_string()
}
