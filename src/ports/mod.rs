//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `IdGenerator` - Fresh identifiers for migrated criteria, data sources
//!   and alternatives
//! - `WorkspaceReader` - Loading saved workspaces

mod id_generator;
mod workspace_reader;

pub use id_generator::IdGenerator;
pub use workspace_reader::{WorkspaceFileError, WorkspaceReader};
