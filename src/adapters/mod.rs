//! Adapters - Implementations of port interfaces.
//!
//! - `ids` - UUID and sequential identifier generators
//! - `workspace_file` - JSON/YAML workspace files on disk

pub mod ids;
pub mod workspace_file;

pub use ids::{SequentialIdGenerator, UuidIdGenerator};
pub use workspace_file::FileWorkspaceReader;
