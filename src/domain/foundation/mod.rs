//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, numeric helpers, and error types
//! that form the vocabulary of the manual input domain.

mod errors;
mod ids;
mod numeric;
mod percentage;
mod unit_of_measurement;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{AlternativeId, CriterionId, DataSourceId};
pub use numeric::{format_number, round_decimals, significant_digits};
pub use percentage::{from_percentage, to_percentage, InputScale, PERCENT_FACTOR};
pub use unit_of_measurement::{Scale, UnitOfMeasurement, UnitType};
