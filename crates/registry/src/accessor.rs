//! Accessor metadata for convenience-method generators.
//!
//! The registry never generates methods itself. It describes, for each
//! authorized `(marker, markable, mark)` triple, the names a generator
//! would synthesize, e.g. `favorite_foods` on a user.

use crate::check::MarkRequest;
use crate::types::marker_name;
use crate::Registry;
use serde::Serialize;

/// One authorized marker/markable/mark triple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessorSpec {
    pub marker_type: String,
    pub marker_name: String,
    pub markable_type: String,
    pub markable_singular: String,
    pub markable_plural: String,
    pub mark: String,
    pub methods: AccessorMethods,
}

/// Conventional method names for a triple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessorMethods {
    /// Marker side, e.g. `favorite_foods`.
    pub collection: String,
    /// Marker side, e.g. `foods_marked_as_favorite`.
    pub marked_as: String,
    /// Marker side, e.g. `mark_as_favorite`.
    pub mark_as: String,
    /// Marker side with the mark as an argument, e.g. `foods_marked_as`.
    pub marked_as_any: String,
    /// Markable side, e.g. `users_have_marked_as_favorite`.
    pub have_marked_as: String,
    /// Markable side with the mark as an argument, e.g. `users_have_marked_as`.
    pub have_marked_as_any: String,
    /// Markable type query, e.g. `marked_as_favorite`.
    pub type_query: String,
    /// Markable instance predicate, e.g. `marked_as_favorite?`.
    pub predicate: String,
}

/// Serializable list of every accessor, for external generators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessorManifest {
    pub accessors: Vec<AccessorSpec>,
}

/// A marker-side method name resolved against the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAccessor {
    pub marker_type: String,
    pub markable_type: String,
    /// `None` for the `{plural}_marked_as` form, where the caller passes the mark.
    pub mark: Option<String>,
}

impl Registry {
    /// Metadata for every authorized triple, ordered by marker, markable, mark.
    pub fn accessors(&self) -> Vec<AccessorSpec> {
        let mut specs = Vec::new();
        for marker in self.markers() {
            for markable in self.markables() {
                for mark in markable.marks.keys() {
                    let request = MarkRequest::new(&marker.name, &markable.type_name, mark);
                    if !self.can_mark(&request) {
                        continue;
                    }
                    specs.push(AccessorSpec {
                        marker_type: marker.type_name.clone(),
                        marker_name: marker.name.clone(),
                        markable_type: markable.type_name.clone(),
                        markable_singular: markable.singular.clone(),
                        markable_plural: markable.plural.clone(),
                        mark: mark.clone(),
                        methods: AccessorMethods {
                            collection: format!("{mark}_{}", markable.plural),
                            marked_as: format!("{}_marked_as_{mark}", markable.plural),
                            mark_as: format!("mark_as_{mark}"),
                            marked_as_any: format!("{}_marked_as", markable.plural),
                            have_marked_as: format!("{}_have_marked_as_{mark}", marker.plural),
                            have_marked_as_any: format!("{}_have_marked_as", marker.plural),
                            type_query: format!("marked_as_{mark}"),
                            predicate: format!("marked_as_{mark}?"),
                        },
                    });
                }
            }
        }
        specs
    }

    /// [`Registry::accessors`] wrapped for serialization.
    pub fn accessor_manifest(&self) -> AccessorManifest {
        AccessorManifest {
            accessors: self.accessors(),
        }
    }

    /// Resolve a marker-side convenience name.
    ///
    /// Matches `{mark}_{plural}`, `{plural}_marked_as_{mark}` and the bare
    /// `{plural}_marked_as`. Returns `None` when the name is unknown or the
    /// marker is not authorized for any matching triple.
    pub fn resolve_accessor(&self, marker_type: &str, method: &str) -> Option<ResolvedAccessor> {
        let name = marker_name(marker_type);
        let accessors = self.accessors();
        let mine = accessors.iter().filter(|spec| spec.marker_name == name);

        let mut any_mark = None;
        for spec in mine {
            if spec.methods.collection == method || spec.methods.marked_as == method {
                return Some(spec.resolved(Some(spec.mark.clone())));
            }
            if any_mark.is_none() && spec.methods.marked_as_any == method {
                any_mark = Some(spec.resolved(None));
            }
        }
        any_mark
    }
}

impl AccessorSpec {
    fn resolved(&self, mark: Option<String>) -> ResolvedAccessor {
        ResolvedAccessor {
            marker_type: self.marker_type.clone(),
            markable_type: self.markable_type.clone(),
            mark,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AllowedMarkers;

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

    fn collections(registry: &Registry, marker: &str) -> Vec<String> {
        registry
            .accessors()
            .into_iter()
            .filter(|spec| spec.marker_name == marker)
            .map(|spec| spec.methods.collection)
            .collect()
    }

    #[test]
    fn test_accessors_respect_allow_lists() {
        let registry = registry();
        assert_eq!(
            collections(&registry, "admin"),
            ["favorite_drinks", "favorite_foods"]
        );
        assert_eq!(collections(&registry, "user"), ["favorite_foods", "hated_foods"]);
    }

    #[test]
    fn test_accessor_method_names() {
        let registry = registry();
        let resolved = registry.resolve_accessor("User", "favorite_foods").unwrap();
        assert_eq!(resolved.markable_type, "Food");
        assert_eq!(resolved.mark.as_deref(), Some("favorite"));

        let spec = registry
            .accessors()
            .into_iter()
            .find(|spec| spec.marker_name == "user" && spec.methods.collection == "favorite_foods")
            .unwrap();
        assert_eq!(spec.methods.marked_as, "foods_marked_as_favorite");
        assert_eq!(spec.methods.mark_as, "mark_as_favorite");
        assert_eq!(spec.methods.marked_as_any, "foods_marked_as");
        assert_eq!(spec.methods.have_marked_as, "users_have_marked_as_favorite");
        assert_eq!(spec.methods.have_marked_as_any, "users_have_marked_as");
        assert_eq!(spec.methods.type_query, "marked_as_favorite");
        assert_eq!(spec.methods.predicate, "marked_as_favorite?");
    }

    #[test]
    fn test_resolve_marked_as_name() {
        let registry = registry();
        let resolved = registry
            .resolve_accessor("admin", "drinks_marked_as_favorite")
            .unwrap();
        assert_eq!(resolved.markable_type, "Drink");
        assert_eq!(resolved.mark.as_deref(), Some("favorite"));
    }

    #[test]
    fn test_resolve_bare_marked_as_name() {
        let registry = registry();
        let resolved = registry.resolve_accessor("User", "foods_marked_as").unwrap();
        assert_eq!(resolved.marker_type, "User");
        assert_eq!(resolved.markable_type, "Food");
        assert_eq!(resolved.mark, None);

        assert!(registry.resolve_accessor("User", "drinks_marked_as").is_none());
        assert!(registry.resolve_accessor("Admin", "drinks_marked_as").is_some());
    }

    #[test]
    fn test_resolve_rejects_unauthorized() {
        let registry = registry();
        assert!(registry.resolve_accessor("User", "favorite_drinks").is_none());
        assert!(registry.resolve_accessor("Admin", "hated_foods").is_none());
        assert!(registry.resolve_accessor("User", "favorite_pages").is_none());
    }

    #[test]
    fn test_plural_override() {
        let mut registry = registry();
        registry
            .declare_markable("Person", [("followed", AllowedMarkers::All)])
            .unwrap();
        registry.set_markable_plural("Person", "people").unwrap();

        let resolved = registry.resolve_accessor("User", "followed_people").unwrap();
        assert_eq!(resolved.markable_type, "Person");
        let spec = registry
            .accessors()
            .into_iter()
            .find(|spec| spec.markable_type == "Person")
            .unwrap();
        assert_eq!(spec.markable_singular, "person");
        assert_eq!(spec.methods.marked_as_any, "people_marked_as");
    }

    #[test]
    fn test_marker_plural_override() {
        let mut registry = registry();
        registry.set_marker_plural("Admin", "administrators").unwrap();

        let spec = registry
            .accessors()
            .into_iter()
            .find(|spec| spec.marker_name == "admin" && spec.markable_type == "Drink")
            .unwrap();
        assert_eq!(spec.methods.have_marked_as, "administrators_have_marked_as_favorite");
        assert_eq!(spec.methods.have_marked_as_any, "administrators_have_marked_as");
        assert!(registry.set_marker_plural("Guest", "guests").is_err());
    }

    #[test]
    fn test_manifest_serializes() {
        let registry = registry();
        let json = serde_json::to_value(registry.accessors()).unwrap();
        let first = &json[0];
        assert_eq!(first["marker_type"], "Admin");
        assert_eq!(first["markable_type"], "Drink");
        assert_eq!(first["methods"]["collection"], "favorite_drinks");
    }

    #[test]
    fn test_accessor_manifest_json() {
        let registry = registry();
        let manifest = registry.accessor_manifest();
        assert_eq!(manifest.accessors.len(), registry.accessors().len());

        let json = serde_json::to_value(&manifest).unwrap();
        let accessors = json["accessors"].as_array().unwrap();
        assert_eq!(accessors.len(), 4);
        assert_eq!(accessors[0]["methods"]["predicate"], "marked_as_favorite?");
        assert_eq!(accessors[3]["marker_name"], "user");
        assert_eq!(accessors[3]["methods"]["collection"], "hated_foods");
    }
}
