//! Mutable views over one side of the mark relation.

use crate::{Error, MarkingEngine, Result};
use registry::marker_name;
use storage::{EntityRef, MarkStore};

/// Markables of one type that a marker marked with one mark.
///
/// Reads always hit the store, so the view never goes stale.
pub struct MarkedSet<'e, 'r, S> {
    engine: &'e MarkingEngine<'r, S>,
    marker: EntityRef,
    markable_type: String,
    mark: String,
}

impl<'e, 'r, S: MarkStore> MarkedSet<'e, 'r, S> {
    pub(crate) fn new(
        engine: &'e MarkingEngine<'r, S>,
        marker: EntityRef,
        markable_type: &str,
        mark: &str,
    ) -> Self {
        Self {
            engine,
            marker,
            markable_type: markable_type.to_string(),
            mark: mark.to_string(),
        }
    }

    pub fn marker(&self) -> &EntityRef {
        &self.marker
    }

    pub fn markable_type(&self) -> &str {
        &self.markable_type
    }

    pub fn mark(&self) -> &str {
        &self.mark
    }

    pub fn list(&self) -> Result<Vec<EntityRef>> {
        self.engine
            .marked_as(&self.markable_type, &self.mark, Some(&self.marker))
    }

    pub fn contains(&self, markable: &EntityRef) -> Result<bool> {
        if markable.type_name != self.markable_type {
            return Ok(false);
        }
        self.engine
            .is_marked_as(markable, &self.mark, Some(&self.marker))
    }

    /// Mark every markable. Fails before writing if any has another type.
    pub fn push(&self, markables: &[EntityRef]) -> Result<usize> {
        self.expect_type(markables)?;
        self.engine.set_mark(&self.marker, &self.mark, markables)
    }

    /// Unmark every markable. Fails before writing if any has another type.
    pub fn delete(&self, markables: &[EntityRef]) -> Result<usize> {
        self.expect_type(markables)?;
        self.engine.remove_mark(&self.marker, &self.mark, markables)
    }

    fn expect_type(&self, markables: &[EntityRef]) -> Result<()> {
        match markables
            .iter()
            .find(|m| m.type_name != self.markable_type)
        {
            Some(found) => Err(Error::WrongMarkableType {
                expected: self.markable_type.clone(),
                found: found.clone(),
            }),
            None => Ok(()),
        }
    }
}

/// Markers of one type that marked a markable with one mark.
pub struct MarkerSet<'e, 'r, S> {
    engine: &'e MarkingEngine<'r, S>,
    markable: EntityRef,
    mark: String,
    marker_type: String,
}

impl<'e, 'r, S: MarkStore> MarkerSet<'e, 'r, S> {
    pub(crate) fn new(
        engine: &'e MarkingEngine<'r, S>,
        markable: EntityRef,
        mark: &str,
        marker_type: String,
    ) -> Self {
        Self {
            engine,
            markable,
            mark: mark.to_string(),
            marker_type,
        }
    }

    pub fn markable(&self) -> &EntityRef {
        &self.markable
    }

    pub fn marker_type(&self) -> &str {
        &self.marker_type
    }

    pub fn mark(&self) -> &str {
        &self.mark
    }

    pub fn list(&self) -> Result<Vec<EntityRef>> {
        self.engine
            .markers_of(&self.markable, &self.mark, &self.marker_type)
    }

    /// Have every marker apply the mark.
    pub fn push(&self, markers: &[EntityRef]) -> Result<usize> {
        self.expect_type(markers)?;
        self.engine.mark_as(&self.markable, &self.mark, markers)
    }

    /// Remove the mark applied by every marker.
    pub fn delete(&self, markers: &[EntityRef]) -> Result<usize> {
        self.expect_type(markers)?;
        self.engine.unmark(&self.markable, &self.mark, Some(markers))
    }

    fn expect_type(&self, markers: &[EntityRef]) -> Result<()> {
        let expected = marker_name(&self.marker_type);
        match markers
            .iter()
            .find(|m| marker_name(&m.type_name) != expected)
        {
            Some(found) => Err(Error::WrongMarkerType {
                expected: self.marker_type.clone(),
                found: found.clone(),
            }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{Error, MarkingEngine};
    use registry::{AllowedMarkers, Registry};
    use storage::{EntityRef, MarkFilter, MarkStore, SqliteMarkStore};

    fn registry() -> Registry {
        let mut registry = Registry::new();
        registry.declare_marker("User").unwrap();
        registry.declare_marker("Admin").unwrap();
        registry
            .declare_markable(
                "Food",
                [
                    ("favorite", AllowedMarkers::All),
                    ("hated", AllowedMarkers::only(["user"])),
                ],
            )
            .unwrap();
        registry
            .declare_markable("Drink", [("favorite", AllowedMarkers::only(["admin"]))])
            .unwrap();
        registry
    }

    fn food(id: i64) -> EntityRef {
        EntityRef::new("Food", id)
    }

    fn drink(id: i64) -> EntityRef {
        EntityRef::new("Drink", id)
    }

    fn user(id: i64) -> EntityRef {
        EntityRef::new("User", id)
    }

    fn admin(id: i64) -> EntityRef {
        EntityRef::new("Admin", id)
    }

    #[test]
    fn test_marked_set_push_and_delete() {
        let registry = registry();
        let engine = MarkingEngine::new(&registry, SqliteMarkStore::in_memory().unwrap());

        let favorite_foods = engine.marked_set(&user(1), "Food", "favorite").unwrap();
        assert!(favorite_foods.list().unwrap().is_empty());

        favorite_foods.push(&[food(1), food(2)]).unwrap();
        assert_eq!(favorite_foods.list().unwrap(), [food(1), food(2)]);
        assert!(favorite_foods.contains(&food(1)).unwrap());
        assert!(!favorite_foods.contains(&drink(1)).unwrap());

        favorite_foods.delete(&[food(1)]).unwrap();
        assert_eq!(favorite_foods.list().unwrap(), [food(2)]);
    }

    #[test]
    fn test_marked_set_rejects_other_types() {
        let registry = registry();
        let engine = MarkingEngine::new(&registry, SqliteMarkStore::in_memory().unwrap());

        let favorite_foods = engine.marked_set(&admin(1), "Food", "favorite").unwrap();
        let err = favorite_foods.push(&[food(1), drink(1)]).unwrap_err();
        assert!(matches!(err, Error::WrongMarkableType { ref found, .. } if *found == drink(1)));
        assert!(matches!(
            favorite_foods.delete(&[user(2)]),
            Err(Error::WrongMarkableType { .. })
        ));
        assert!(favorite_foods.list().unwrap().is_empty());
    }

    #[test]
    fn test_marked_set_requires_authorization() {
        let registry = registry();
        let engine = MarkingEngine::new(&registry, SqliteMarkStore::in_memory().unwrap());

        assert!(matches!(
            engine.marked_set(&user(1), "Drink", "favorite"),
            Err(Error::Registry(registry::Error::NotAllowedMarker { .. }))
        ));
        assert!(engine.marked_set(&admin(1), "Drink", "favorite").is_ok());
    }

    #[test]
    fn test_marker_set_push_and_delete() {
        let registry = registry();
        let engine = MarkingEngine::new(&registry, SqliteMarkStore::in_memory().unwrap());

        let f1 = engine.marker_set(&food(1), "favorite", "user").unwrap();
        let f2 = engine.marker_set(&food(2), "favorite", "User").unwrap();
        assert_eq!(f1.marker_type(), "User");

        f1.push(&[user(1)]).unwrap();
        f2.push(&[user(1), user(2)]).unwrap();
        assert_eq!(f1.list().unwrap(), [user(1)]);
        assert_eq!(f2.list().unwrap(), [user(1), user(2)]);

        let favorite_foods = engine.marked_set(&user(1), "Food", "favorite").unwrap();
        assert_eq!(favorite_foods.list().unwrap(), [food(1), food(2)]);

        f2.delete(&[user(2)]).unwrap();
        assert_eq!(f2.list().unwrap(), [user(1)]);
    }

    #[test]
    fn test_marker_set_rejects_other_types() {
        let registry = registry();
        let engine = MarkingEngine::new(&registry, SqliteMarkStore::in_memory().unwrap());

        let users = engine.marker_set(&food(1), "favorite", "User").unwrap();
        assert!(matches!(
            users.push(&[user(1), admin(1)]),
            Err(Error::WrongMarkerType { .. })
        ));
        assert!(matches!(
            users.delete(&[food(2)]),
            Err(Error::WrongMarkerType { .. })
        ));
        assert!(engine.store().list(&MarkFilter::new()).unwrap().is_empty());
    }

    #[test]
    fn test_marker_set_requires_authorization() {
        let registry = registry();
        let engine = MarkingEngine::new(&registry, SqliteMarkStore::in_memory().unwrap());

        assert!(matches!(
            engine.marker_set(&drink(1), "favorite", "User"),
            Err(Error::Registry(registry::Error::NotAllowedMarker { .. }))
        ));
        let admins = engine.marker_set(&drink(1), "favorite", "Admin").unwrap();
        admins.push(&[admin(1)]).unwrap();
        admins.push(&[admin(2)]).unwrap();
        assert_eq!(admins.list().unwrap(), [admin(1), admin(2)]);
    }
}
