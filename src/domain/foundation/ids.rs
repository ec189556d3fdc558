//! Strongly-typed identifier value objects.
//!
//! Identifiers in persisted problems are arbitrary strings (older workspaces
//! used titles as keys), so every id wraps a `String`. Fresh ids are UUID v4.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use uuid::Uuid;

use super::ValidationError;

/// Declares a string-backed identifier newtype.
///
/// Generates `new` (rejects empty strings), `generate` (random UUID v4),
/// `as_str`, `Display`, `AsRef<str>`, `Borrow<str>` (so maps keyed by id can
/// be queried with a `&str`) and `From` conversions.
macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident, $field:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates an id, returning error if empty.
            pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
                let id = id.into();
                if id.is_empty() {
                    return Err(ValidationError::empty_field($field));
                }
                Ok(Self(id))
            }

            /// Creates a new random id.
            pub fn generate() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            /// Returns the inner string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

string_id!(
    /// Identifier of a criterion (an outcome dimension).
    CriterionId,
    "criterion_id"
);

string_id!(
    /// Identifier of a data source backing a criterion.
    DataSourceId,
    "data_source_id"
);

string_id!(
    /// Identifier of an alternative (treatment option).
    AlternativeId,
    "alternative_id"
);
