//! Identifier generators.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};

use uuid::Uuid;

use quill_core::ports::IdGenerator;

/// UUID v7 identifiers: time-ordered with a random tail, so two ids minted
/// in the same millisecond still differ.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn next_id(&self) -> String {
        Uuid::now_v7().to_string()
    }
}

/// Monotonic counter rendered as a decimal string.
#[derive(Debug)]
pub struct SequentialIdGenerator {
    next: AtomicU64,
}

impl SequentialIdGenerator {
    pub fn starting_at(first: u64) -> Self {
        Self {
            next: AtomicU64::new(first),
        }
    }
}

impl Default for SequentialIdGenerator {
    fn default() -> Self {
        Self::starting_at(1)
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&self) -> String {
        self.next.fetch_add(1, Ordering::Relaxed).to_string()
    }
}

/// Ids already present in a collection; used to skip generator output that
/// collides with seeded records.
pub(crate) fn next_unused<'a>(
    ids: &dyn IdGenerator,
    taken: impl IntoIterator<Item = &'a str>,
) -> String {
    let taken: HashSet<&str> = taken.into_iter().collect();
    loop {
        let id = ids.next_id();
        if !taken.contains(id.as_str()) {
            return id;
        }
        tracing::debug!(id = %id, "Generated id already in use, drawing another");
    }
}
