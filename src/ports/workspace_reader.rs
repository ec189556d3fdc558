//! WorkspaceReader port - Loading previously saved workspaces.

use std::path::{Path, PathBuf};

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::manual_input::OldWorkspace;

/// Errors that can occur while reading a workspace
#[derive(Debug, thiserror::Error)]
pub enum WorkspaceFileError {
    #[error("Workspace not found: {0}")]
    NotFound(PathBuf),

    #[error("Unsupported workspace format: {0}")]
    UnsupportedFormat(String),

    #[error("Failed to deserialize workspace: {0}")]
    DeserializationFailed(String),

    #[error("IO error: {0}")]
    IoError(String),
}

impl From<WorkspaceFileError> for DomainError {
    fn from(err: WorkspaceFileError) -> Self {
        DomainError::new(ErrorCode::WorkspaceUnreadable, err.to_string())
    }
}

/// Port for loading a saved workspace to migrate into the editor
pub trait WorkspaceReader: Send + Sync {
    /// Load the workspace stored at `location`.
    ///
    /// # Errors
    /// Returns `WorkspaceFileError::NotFound` if nothing is stored there
    fn read(&self, location: &Path) -> Result<OldWorkspace, WorkspaceFileError>;
}
