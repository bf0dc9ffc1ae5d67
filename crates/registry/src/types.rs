//! Marker and markable type declarations.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Canonical marker name for a type: the lower-cased type name.
pub fn marker_name(type_name: &str) -> String {
    type_name.to_lowercase()
}

/// Naive plural form used when no override is declared.
pub(crate) fn default_plural(singular: &str) -> String {
    format!("{singular}s")
}

/// Marker types permitted to apply a mark.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawAllowed", into = "RawAllowed")]
pub enum AllowedMarkers {
    /// Any declared marker type.
    All,
    /// Only these marker names (lower-cased).
    Only(BTreeSet<String>),
}

impl AllowedMarkers {
    /// Build an explicit allow-list, normalizing names to marker names.
    pub fn only<I, S>(markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::Only(markers.into_iter().map(|m| marker_name(m.as_ref())).collect())
    }

    /// Check whether a marker type may apply the mark.
    pub fn permits(&self, marker_type: &str) -> bool {
        match self {
            AllowedMarkers::All => true,
            AllowedMarkers::Only(names) => names.contains(&marker_name(marker_type)),
        }
    }
}

/// On-disk form: `"all"`, a single marker name, or a list of names.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawAllowed {
    One(String),
    Many(Vec<String>),
}

impl TryFrom<RawAllowed> for AllowedMarkers {
    type Error = String;

    fn try_from(raw: RawAllowed) -> Result<Self, Self::Error> {
        match raw {
            RawAllowed::One(s) if s == "all" => Ok(AllowedMarkers::All),
            RawAllowed::One(s) if s.trim().is_empty() => {
                Err("allowed markers must be \"all\" or marker names".to_string())
            }
            RawAllowed::One(s) => Ok(AllowedMarkers::only([s])),
            RawAllowed::Many(list) if list.is_empty() => {
                Err("allowed marker list must not be empty".to_string())
            }
            RawAllowed::Many(list) => Ok(AllowedMarkers::only(list)),
        }
    }
}

impl From<AllowedMarkers> for RawAllowed {
    fn from(allowed: AllowedMarkers) -> Self {
        match allowed {
            AllowedMarkers::All => RawAllowed::One("all".to_string()),
            AllowedMarkers::Only(names) => RawAllowed::Many(names.into_iter().collect()),
        }
    }
}

/// A type declared markable, with its marks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkableTypeSpec {
    pub type_name: String,
    pub singular: String,
    pub plural: String,
    pub marks: BTreeMap<String, AllowedMarkers>,
}

impl MarkableTypeSpec {
    pub(crate) fn new(type_name: String) -> Self {
        let singular = type_name.to_lowercase();
        Self {
            plural: default_plural(&singular),
            singular,
            type_name,
            marks: BTreeMap::new(),
        }
    }

    /// Allow-list of a mark, if declared.
    pub fn mark(&self, mark: &str) -> Option<&AllowedMarkers> {
        self.marks.get(mark)
    }
}

/// A type declared as a marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerTypeSpec {
    pub type_name: String,
    /// Canonical name used in allow-lists.
    pub name: String,
    pub plural: String,
}

impl MarkerTypeSpec {
    pub(crate) fn new(type_name: String) -> Self {
        let name = marker_name(&type_name);
        Self {
            plural: default_plural(&name),
            name,
            type_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_normalizes_case() {
        let allowed = AllowedMarkers::only(["Admin", "user"]);
        assert!(allowed.permits("admin"));
        assert!(allowed.permits("ADMIN"));
        assert!(allowed.permits("User"));
        assert!(!allowed.permits("guest"));
    }

    #[test]
    fn test_all_permits_anything() {
        assert!(AllowedMarkers::All.permits("whoever"));
    }

    #[test]
    fn test_parse_allowed_forms() {
        #[derive(Deserialize)]
        struct Wrapper {
            a: AllowedMarkers,
            b: AllowedMarkers,
            c: AllowedMarkers,
        }

        let w: Wrapper = toml::from_str(
            r#"
a = "all"
b = "admin"
c = ["User", "admin"]
"#,
        )
        .unwrap();

        assert_eq!(w.a, AllowedMarkers::All);
        assert_eq!(w.b, AllowedMarkers::only(["admin"]));
        assert_eq!(w.c, AllowedMarkers::only(["user", "admin"]));
    }

    #[test]
    fn test_parse_rejects_empty_list() {
        #[derive(Debug, Deserialize)]
        #[allow(dead_code)]
        struct Wrapper {
            a: AllowedMarkers,
        }

        assert!(toml::from_str::<Wrapper>("a = []").is_err());
    }

    #[test]
    fn test_marker_spec_names() {
        let spec = MarkerTypeSpec::new("Admin".to_string());
        assert_eq!(spec.name, "admin");
        assert_eq!(spec.plural, "admins");
    }
}
