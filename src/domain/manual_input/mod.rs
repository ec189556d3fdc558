//! Manual Input Module - Turning entered measurements into performances.
//!
//! Users fill a grid with one cell per data source and alternative, first
//! with effects (point estimates, standard errors, intervals, counts) and
//! then with distributions, most of which are derived from the effects.
//!
//! # Components
//!
//! - `Constraint` - Field validation rules
//! - `InputDescriptor` / `InputKnowledge` - Input types, their parameters,
//!   formatting and derivation rules
//! - `InputCell` - One editable cell
//! - `ManualInputService` - Grid preparation, validation, distribution
//!   generation, problem assembly and workspace migration
//!
//! All operations are synchronous and free of I/O.

mod constraint;
mod derivation;
mod descriptor;
mod errors;
mod input_cell;
mod input_knowledge;
mod migration;
mod problem_builder;
mod service;
mod state;

pub use constraint::{first_violation, Bound, Constraint, ParameterSlot};
pub use descriptor::{InputCategory, InputDescriptor, InputKind, ParameterSpec};
pub use errors::ManualInputError;
pub use input_cell::{InputCell, NO_INPUT_TYPE};
pub use input_knowledge::InputKnowledge;
pub use service::{
    unit_constraints, ManualInputService, ProblemSettings, DEFAULT_SCHEMA_VERSION,
    DEFAULT_VALUE_TREE_TITLE, INVALID_INPUT_MESSAGE,
};
pub use state::{CellGrid, InputData, OldWorkspace, State, Step};
