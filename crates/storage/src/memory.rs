//! In-process mark store.

use crate::{Mark, MarkFilter, MarkStore, Result};
use std::cell::RefCell;
use tracing::debug;

/// Vec-backed mark store that relies on the [`MarkStore`] default queries.
///
/// Suited to tests and short-lived registries; nothing is persisted.
#[derive(Debug, Default)]
pub struct MemoryMarkStore {
    marks: RefCell<Vec<Mark>>,
}

impl MemoryMarkStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored edges.
    pub fn len(&self) -> usize {
        self.marks.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.marks.borrow().is_empty()
    }
}

impl MarkStore for MemoryMarkStore {
    fn exists(&self, filter: &MarkFilter) -> Result<bool> {
        Ok(self.marks.borrow().iter().any(|m| filter.matches(m)))
    }

    fn insert(&self, marks: &[Mark]) -> Result<usize> {
        let mut stored = self.marks.borrow_mut();
        let mut inserted = 0;
        for mark in marks {
            let edge = MarkFilter::edge(&mark.markable, &mark.marker, &mark.mark);
            if stored.iter().any(|m| edge.matches(m)) {
                continue;
            }
            stored.push(mark.clone());
            inserted += 1;
        }
        debug!(requested = marks.len(), inserted, "inserted marks");
        Ok(inserted)
    }

    fn delete(&self, filter: &MarkFilter) -> Result<usize> {
        let mut stored = self.marks.borrow_mut();
        let before = stored.len();
        stored.retain(|m| !filter.matches(m));
        let deleted = before - stored.len();
        debug!(deleted, "deleted marks");
        Ok(deleted)
    }

    fn list(&self, filter: &MarkFilter) -> Result<Vec<Mark>> {
        Ok(self
            .marks
            .borrow()
            .iter()
            .filter(|m| filter.matches(m))
            .cloned()
            .collect())
    }
}
