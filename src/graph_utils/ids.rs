use uuid::Uuid;

use super::graph::ElementId;

/// Source of fresh element identifiers.
pub trait IdSource {
    fn next_id(&mut self) -> ElementId;
}

/// Time-ordered random UUIDs.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidSource;

impl IdSource for UuidSource {
    fn next_id(&mut self) -> ElementId {
        Uuid::now_v7()
    }
}

/// Predictable ids (`00000000-...-0001`, `...-0002`, ...) for tests and
/// reproducible sample documents.
#[derive(Debug, Default, Clone)]
pub struct SequentialIds {
    next: u128,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdSource for SequentialIds {
    fn next_id(&mut self) -> ElementId {
        self.next += 1;
        Uuid::from_u128(self.next)
    }
}
