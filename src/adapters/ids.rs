//! Identifier generators implementing the `IdGenerator` port.

use std::sync::atomic::{AtomicUsize, Ordering};

use uuid::Uuid;

use crate::ports::IdGenerator;

/// Random UUID v4 identifiers.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn generate(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Deterministic `uuid1`, `uuid2`, ... identifiers.
///
/// Used by tests and by conversions that must produce the same output on
/// every run.
#[derive(Debug, Default)]
pub struct SequentialIdGenerator {
    next: AtomicUsize,
}

impl SequentialIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn generate(&self) -> String {
        let n = self.next.fetch_add(1, Ordering::Relaxed) + 1;
        format!("uuid{}", n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn sequential_ids_count_from_one() {
        let ids = SequentialIdGenerator::new();
        assert_eq!(ids.generate(), "uuid1");
        assert_eq!(ids.generate(), "uuid2");
        assert_eq!(ids.generate(), "uuid3");
    }

    #[test]
    fn uuid_ids_parse_and_differ() {
        let ids = UuidIdGenerator;
        let generated: HashSet<String> = (0..20).map(|_| ids.generate()).collect();
        assert_eq!(generated.len(), 20);
        assert!(generated.iter().all(|id| Uuid::parse_str(id).is_ok()));
    }
}
