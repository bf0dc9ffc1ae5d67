//! The marking engine: authorized mutations and queries over marks.

use crate::view::{MarkedSet, MarkerSet};
use crate::Result;
use registry::{MarkRequest, Registry};
use storage::{EntityRef, Mark, MarkFilter, MarkStore};
use tracing::{debug, warn};

/// Applies, removes and queries marks, checking every marker/markable pair
/// against the registry before touching the store.
pub struct MarkingEngine<'r, S> {
    registry: &'r Registry,
    store: S,
}

impl<'r, S: MarkStore> MarkingEngine<'r, S> {
    pub fn new(registry: &'r Registry, store: S) -> Self {
        Self { registry, store }
    }

    pub fn registry(&self) -> &'r Registry {
        self.registry
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Check that `marker` may apply `mark` to `markable`.
    pub fn authorize(&self, marker: &EntityRef, markable: &EntityRef, mark: &str) -> Result<()> {
        let request = MarkRequest::new(&marker.type_name, &markable.type_name, mark);
        self.registry.authorize(&request).map_err(|e| {
            warn!(%marker, %markable, mark, error = %e, "mark rejected");
            e.into()
        })
    }

    /// Boolean form of [`MarkingEngine::authorize`].
    pub fn can_mark(&self, marker: &EntityRef, markable: &EntityRef, mark: &str) -> bool {
        self.authorize(marker, markable, mark).is_ok()
    }

    /// Have each marker apply `mark` to `markable`.
    ///
    /// Every pair is checked before anything is written, and the markable's
    /// mark must be declared even when `markers` is empty. Returns the number
    /// of new edges; existing edges are left alone.
    pub fn mark_as(&self, markable: &EntityRef, mark: &str, markers: &[EntityRef]) -> Result<usize> {
        let mut marks = Vec::with_capacity(markers.len());
        for marker in markers {
            self.authorize(marker, markable, mark)?;
            marks.push(Mark::new(markable.clone(), self.stored_marker(marker), mark));
        }
        self.require_mark(&markable.type_name, mark)?;
        self.insert(&marks)
    }

    /// Have `marker` apply `mark` to each markable.
    ///
    /// Same contract as [`MarkingEngine::mark_as`], from the marker side.
    pub fn set_mark(&self, marker: &EntityRef, mark: &str, markables: &[EntityRef]) -> Result<usize> {
        self.require_marker(marker)?;
        let mut marks = Vec::with_capacity(markables.len());
        for markable in markables {
            self.authorize(marker, markable, mark)?;
            marks.push(Mark::new(markable.clone(), self.stored_marker(marker), mark));
        }
        self.insert(&marks)
    }

    /// Whether `markable` carries `mark`, optionally from one marker.
    pub fn is_marked_as(
        &self,
        markable: &EntityRef,
        mark: &str,
        by: Option<&EntityRef>,
    ) -> Result<bool> {
        let filter = match by {
            Some(marker) => {
                self.authorize(marker, markable, mark)?;
                MarkFilter::edge(markable, &self.stored_marker(marker), mark)
            }
            None => {
                self.require_mark(&markable.type_name, mark)?;
                MarkFilter::new().markable(markable).mark(mark)
            }
        };
        Ok(self.store.exists(&filter)?)
    }

    /// Remove `mark` from `markable`.
    ///
    /// With markers, only their edges are removed, after every marker is
    /// checked. Without, every edge for the mark goes. Returns the number
    /// of edges removed; removing absent marks is not an error.
    pub fn unmark(
        &self,
        markable: &EntityRef,
        mark: &str,
        by: Option<&[EntityRef]>,
    ) -> Result<usize> {
        let filters = match by {
            Some(markers) => {
                let mut filters = Vec::with_capacity(markers.len());
                for marker in markers {
                    self.authorize(marker, markable, mark)?;
                    filters.push(MarkFilter::edge(markable, &self.stored_marker(marker), mark));
                }
                self.require_mark(&markable.type_name, mark)?;
                filters
            }
            None => {
                self.require_mark(&markable.type_name, mark)?;
                vec![MarkFilter::new().markable(markable).mark(mark)]
            }
        };
        self.delete(&filters)
    }

    /// Remove `marker`'s `mark` from each markable.
    pub fn remove_mark(
        &self,
        marker: &EntityRef,
        mark: &str,
        markables: &[EntityRef],
    ) -> Result<usize> {
        self.require_marker(marker)?;
        let stored = self.stored_marker(marker);
        let mut filters = Vec::with_capacity(markables.len());
        for markable in markables {
            self.authorize(marker, markable, mark)?;
            filters.push(MarkFilter::edge(markable, &stored, mark));
        }
        self.delete(&filters)
    }

    /// Distinct markables of a type carrying `mark`, ordered by id.
    ///
    /// With a marker, only its marks count.
    pub fn marked_as(
        &self,
        markable_type: &str,
        mark: &str,
        by: Option<&EntityRef>,
    ) -> Result<Vec<EntityRef>> {
        let ids = match by {
            Some(marker) => {
                self.authorize_types(&marker.type_name, markable_type, mark)?;
                let stored = self.stored_marker(marker);
                self.store.query_markables(markable_type, mark, Some(&stored))?
            }
            None => {
                self.require_mark(markable_type, mark)?;
                self.store.query_markables(markable_type, mark, None)?
            }
        };
        Ok(ids
            .into_iter()
            .map(|id| EntityRef::new(markable_type, id))
            .collect())
    }

    /// Distinct markers of one type that applied `mark` to `markable`,
    /// ordered by id.
    pub fn markers_of(
        &self,
        markable: &EntityRef,
        mark: &str,
        marker_type: &str,
    ) -> Result<Vec<EntityRef>> {
        self.authorize_types(marker_type, &markable.type_name, mark)?;
        let type_name = self.marker_type_name(marker_type);
        let ids = self.store.query_markers(type_name, markable, mark)?;
        Ok(ids
            .into_iter()
            .map(|id| EntityRef::new(type_name, id))
            .collect())
    }

    /// The markables of one type that `marker` marked with `mark`, as a
    /// mutable set (`favorite_foods`).
    pub fn marked_set(
        &self,
        marker: &EntityRef,
        markable_type: &str,
        mark: &str,
    ) -> Result<MarkedSet<'_, 'r, S>> {
        self.authorize_types(&marker.type_name, markable_type, mark)?;
        Ok(MarkedSet::new(self, marker.clone(), markable_type, mark))
    }

    /// The markers of one type that marked `markable` with `mark`, as a
    /// mutable set (`users_have_marked_as_favorite`).
    pub fn marker_set(
        &self,
        markable: &EntityRef,
        mark: &str,
        marker_type: &str,
    ) -> Result<MarkerSet<'_, 'r, S>> {
        self.authorize_types(marker_type, &markable.type_name, mark)?;
        let type_name = self.marker_type_name(marker_type).to_string();
        Ok(MarkerSet::new(self, markable.clone(), mark, type_name))
    }

    /// Type-level check for queries and views.
    fn authorize_types(&self, marker_type: &str, markable_type: &str, mark: &str) -> Result<()> {
        let request = MarkRequest::new(marker_type, markable_type, mark);
        self.registry.authorize(&request).map_err(|e| {
            warn!(marker_type, markable_type, mark, error = %e, "mark rejected");
            e.into()
        })
    }

    fn require_marker(&self, marker: &EntityRef) -> Result<()> {
        if self.registry.marker(&marker.type_name).is_some() {
            return Ok(());
        }
        let e = registry::Error::UnknownMarkerType(marker.type_name.clone());
        warn!(%marker, error = %e, "mark rejected");
        Err(e.into())
    }

    fn require_mark(&self, markable_type: &str, mark: &str) -> Result<()> {
        match self.registry.mark(markable_type, mark) {
            Ok(_) => Ok(()),
            Err(e) => {
                warn!(markable_type, mark, error = %e, "mark rejected");
                Err(e.into())
            }
        }
    }

    fn insert(&self, marks: &[Mark]) -> Result<usize> {
        if marks.is_empty() {
            return Ok(0);
        }
        let inserted = self.store.insert(marks)?;
        debug!(requested = marks.len(), inserted, "applied marks");
        Ok(inserted)
    }

    fn delete(&self, filters: &[MarkFilter]) -> Result<usize> {
        if filters.is_empty() {
            return Ok(0);
        }
        let deleted = self.store.delete_many(filters)?;
        debug!(deleted, "removed marks");
        Ok(deleted)
    }

    /// Declared type name for a marker type given in any case.
    fn marker_type_name<'a>(&'a self, marker_type: &'a str) -> &'a str {
        self.registry
            .marker(marker_type)
            .map_or(marker_type, |spec| spec.type_name.as_str())
    }

    /// The marker as stored: declared type name, same id.
    fn stored_marker(&self, marker: &EntityRef) -> EntityRef {
        EntityRef::new(self.marker_type_name(&marker.type_name), marker.id)
    }
}
