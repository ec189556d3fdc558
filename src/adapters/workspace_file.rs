//! File-based Workspace Reader Adapter
//!
//! Reads saved workspaces from JSON or YAML files. The file may hold the
//! whole workspace (`{"problem": {...}, ...}`) or just the problem.

use serde::Deserialize;
use std::path::Path;

use crate::domain::manual_input::OldWorkspace;
use crate::domain::workspace::Problem;
use crate::ports::{WorkspaceFileError, WorkspaceReader};

#[derive(Deserialize)]
#[serde(untagged)]
enum WorkspaceDocument {
    Workspace(OldWorkspace),
    Problem(Problem),
}

impl From<WorkspaceDocument> for OldWorkspace {
    fn from(document: WorkspaceDocument) -> Self {
        match document {
            WorkspaceDocument::Workspace(workspace) => workspace,
            WorkspaceDocument::Problem(problem) => OldWorkspace { problem },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileFormat {
    Json,
    Yaml,
}

impl FileFormat {
    fn from_path(path: &Path) -> Result<Self, WorkspaceFileError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match extension.as_str() {
            "json" => Ok(FileFormat::Json),
            "yaml" | "yml" => Ok(FileFormat::Yaml),
            _ => Err(WorkspaceFileError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Reads workspaces from the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct FileWorkspaceReader;

impl FileWorkspaceReader {
    pub fn new() -> Self {
        Self
    }

    /// Parse workspace text in the given format
    fn parse(contents: &str, format: FileFormat) -> Result<OldWorkspace, WorkspaceFileError> {
        let document: WorkspaceDocument = match format {
            FileFormat::Json => serde_json::from_str(contents)
                .map_err(|e| WorkspaceFileError::DeserializationFailed(e.to_string()))?,
            FileFormat::Yaml => serde_yaml::from_str(contents)
                .map_err(|e| WorkspaceFileError::DeserializationFailed(e.to_string()))?,
        };
        Ok(document.into())
    }
}

impl WorkspaceReader for FileWorkspaceReader {
    fn read(&self, location: &Path) -> Result<OldWorkspace, WorkspaceFileError> {
        let format = FileFormat::from_path(location)?;

        if !location.exists() {
            return Err(WorkspaceFileError::NotFound(location.to_path_buf()));
        }

        let contents = std::fs::read_to_string(location)
            .map_err(|e| WorkspaceFileError::IoError(e.to_string()))?;

        let workspace = Self::parse(&contents, format)?;
        tracing::debug!(
            path = %location.display(),
            criteria = workspace.problem.criteria.len(),
            alternatives = workspace.problem.alternatives.len(),
            "Read workspace"
        );
        Ok(workspace)
    }
}
