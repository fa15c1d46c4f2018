//! In-memory collections backing the demo routes.
//!
//! Nothing here is synchronized or persisted: a [`Collection`] is a plain
//! insertion-ordered `Vec` that lives as long as the process. Callers that
//! share one across requests wrap it in their own lock.

mod tasks;
mod users;

pub use tasks::TaskStore;
pub use users::{UserDirectory, SEED_USER_COUNT};

use shared::domain::{Task, TaskId, User, UserId};

/// A record addressable by a unique id within its collection.
pub trait Record: Clone {
    type Id: Copy + Eq + Ord + std::fmt::Debug;

    fn id(&self) -> Self::Id;
}

impl Record for Task {
    type Id = TaskId;

    fn id(&self) -> TaskId {
        self.id
    }
}

impl Record for User {
    type Id = UserId;

    fn id(&self) -> UserId {
        self.id
    }
}

/// One offset/limit slice of a collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub offset: usize,
    /// Offset of the following page, `None` once the slice reaches the end.
    pub next_offset: Option<usize>,
}

impl<T> Page<T> {
    pub fn has_more(&self) -> bool {
        self.next_offset.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct Collection<T> {
    records: Vec<T>,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
        }
    }
}

impl<T: Record> Collection<T> {
    pub fn new(seed: Vec<T>) -> Self {
        Self { records: seed }
    }

    pub fn list(&self) -> &[T] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: T::Id) -> Option<&T> {
        self.records.iter().find(|record| record.id() == id)
    }

    pub fn max_id(&self) -> Option<T::Id> {
        self.records.iter().map(Record::id).max()
    }

    /// Appends a record. The caller guarantees its id is not already present.
    pub fn push(&mut self, record: T) {
        debug_assert!(self.get(record.id()).is_none(), "duplicate record id");
        self.records.push(record);
    }

    pub fn update(&mut self, id: T::Id, apply: impl FnOnce(&mut T)) -> Option<T> {
        let record = self.records.iter_mut().find(|record| record.id() == id)?;
        apply(record);
        Some(record.clone())
    }

    pub fn remove(&mut self, id: T::Id) -> bool {
        match self.records.iter().position(|record| record.id() == id) {
            Some(index) => {
                self.records.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn find(&self, predicate: impl Fn(&T) -> bool) -> Vec<T> {
        self.records
            .iter()
            .filter(|record| predicate(record))
            .cloned()
            .collect()
    }

    pub fn page(&self, offset: usize, limit: usize) -> Page<T> {
        slice_page(&self.records, offset, limit)
    }
}

/// Slices `records` into a page. A zero limit is treated as one so callers
/// always make progress.
pub fn slice_page<T: Clone>(records: &[T], offset: usize, limit: usize) -> Page<T> {
    let limit = limit.max(1);
    let start = offset.min(records.len());
    let end = start.saturating_add(limit).min(records.len());
    Page {
        items: records[start..end].to_vec(),
        offset: start,
        next_offset: (end < records.len()).then_some(end),
    }
}

/// Case-insensitive substring test shared by the task and user searches.
pub(crate) fn contains_ignore_case(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
