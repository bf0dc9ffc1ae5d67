//! The mark relation store contract.

use crate::{EntityRef, Mark, Result};

/// Predicate over any subset of a mark's five fields.
///
/// An empty filter matches every mark.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkFilter {
    pub markable_type: Option<String>,
    pub markable_id: Option<i64>,
    pub marker_type: Option<String>,
    pub marker_id: Option<i64>,
    pub mark: Option<String>,
}

impl MarkFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Match the exact edge.
    pub fn edge(markable: &EntityRef, marker: &EntityRef, mark: &str) -> Self {
        Self::new().markable(markable).marker(marker).mark(mark)
    }

    pub fn markable(mut self, markable: &EntityRef) -> Self {
        self.markable_type = Some(markable.type_name.clone());
        self.markable_id = Some(markable.id);
        self
    }

    pub fn markable_type(mut self, type_name: impl Into<String>) -> Self {
        self.markable_type = Some(type_name.into());
        self
    }

    pub fn marker(mut self, marker: &EntityRef) -> Self {
        self.marker_type = Some(marker.type_name.clone());
        self.marker_id = Some(marker.id);
        self
    }

    pub fn marker_type(mut self, type_name: impl Into<String>) -> Self {
        self.marker_type = Some(type_name.into());
        self
    }

    pub fn mark(mut self, mark: impl Into<String>) -> Self {
        self.mark = Some(mark.into());
        self
    }

    /// Check a mark against the filter.
    pub fn matches(&self, mark: &Mark) -> bool {
        fn eq<T: PartialEq>(want: &Option<T>, have: &T) -> bool {
            want.as_ref().is_none_or(|w| w == have)
        }

        eq(&self.markable_type, &mark.markable.type_name)
            && eq(&self.markable_id, &mark.markable.id)
            && eq(&self.marker_type, &mark.marker.type_name)
            && eq(&self.marker_id, &mark.marker.id)
            && eq(&self.mark, &mark.mark)
    }
}

/// Storage for mark edges.
///
/// Implementations must keep the `(markable, marker, mark)` tuple unique,
/// and must make [`MarkStore::insert`] all-or-nothing.
pub trait MarkStore {
    /// Whether any mark matches the filter.
    fn exists(&self, filter: &MarkFilter) -> Result<bool>;

    /// Insert marks in one transaction, skipping edges already present.
    ///
    /// Returns the number of edges actually created.
    fn insert(&self, marks: &[Mark]) -> Result<usize>;

    /// Delete every matching mark. Returns the number removed.
    fn delete(&self, filter: &MarkFilter) -> Result<usize>;

    /// Delete marks matching any of the filters. Returns the number removed.
    ///
    /// Stores with transactions should override this to apply all filters
    /// atomically.
    fn delete_many(&self, filters: &[MarkFilter]) -> Result<usize> {
        let mut deleted = 0;
        for filter in filters {
            deleted += self.delete(filter)?;
        }
        Ok(deleted)
    }

    /// Load matching marks in insertion order.
    fn list(&self, filter: &MarkFilter) -> Result<Vec<Mark>>;

    /// Distinct ids of markables of a type carrying a mark, ascending.
    fn query_markables(
        &self,
        markable_type: &str,
        mark: &str,
        marker: Option<&EntityRef>,
    ) -> Result<Vec<i64>> {
        let mut filter = MarkFilter::new().markable_type(markable_type).mark(mark);
        if let Some(marker) = marker {
            filter = filter.marker(marker);
        }
        let mut ids: Vec<i64> = self.list(&filter)?.iter().map(|m| m.markable.id).collect();
        ids.sort_unstable();
        ids.dedup();
        Ok(ids)
    }

    /// Distinct ids of markers of a type that marked a markable, ascending.
    fn query_markers(
        &self,
        marker_type: &str,
        markable: &EntityRef,
        mark: &str,
    ) -> Result<Vec<i64>> {
        let filter = MarkFilter::new()
            .markable(markable)
            .marker_type(marker_type)
            .mark(mark);
        let mut ids: Vec<i64> = self.list(&filter)?.iter().map(|m| m.marker.id).collect();
        ids.sort_unstable();
        ids.dedup();
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mark() -> Mark {
        Mark::new(EntityRef::new("Food", 1), EntityRef::new("User", 2), "favorite")
    }

    #[test]
    fn test_empty_filter_matches_all() {
        assert!(MarkFilter::new().matches(&mark()));
    }

    #[test]
    fn test_edge_filter() {
        let m = mark();
        assert!(MarkFilter::edge(&m.markable, &m.marker, "favorite").matches(&m));
        assert!(!MarkFilter::edge(&m.markable, &m.marker, "hated").matches(&m));
        assert!(!MarkFilter::edge(&m.marker, &m.markable, "favorite").matches(&m));
    }

    #[test]
    fn test_partial_filter() {
        let m = mark();
        assert!(MarkFilter::new().marker_type("User").matches(&m));
        assert!(!MarkFilter::new().marker_type("Admin").matches(&m));
        assert!(MarkFilter::new().markable_type("Food").mark("favorite").matches(&m));
    }
}
