//! IdGenerator port - Source of fresh identifiers.
//!
//! Migrating a workspace hands out new criterion, data source and
//! alternative ids. Production code uses random UUIDs; tests and
//! reproducible conversions use a deterministic sequence.

/// Port producing unique identifier strings.
pub trait IdGenerator: Send + Sync {
    /// Returns an identifier never returned before by this generator.
    fn generate(&self) -> String;
}
