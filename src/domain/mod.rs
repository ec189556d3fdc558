//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (IDs, units, number formatting, errors)
//! - `workspace` - Criteria, alternatives, performances and the problem document
//! - `manual_input` - Input types, validation, cell grids and distribution derivation
//! - `effects_table` - Effects table layout and performance labels

pub mod effects_table;
pub mod foundation;
pub mod manual_input;
pub mod workspace;
