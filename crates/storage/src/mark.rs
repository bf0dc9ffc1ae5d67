//! Mark edges and the polymorphic references they connect.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A unique identifier for a stored mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MarkId(pub Uuid);

impl MarkId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MarkId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for MarkId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A reference to an entity of any type: type name plus primary key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityRef {
    pub type_name: String,
    pub id: i64,
}

impl EntityRef {
    pub fn new(type_name: impl Into<String>, id: i64) -> Self {
        Self {
            type_name: type_name.into(),
            id,
        }
    }
}

impl std::fmt::Display for EntityRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}", self.type_name, self.id)
    }
}

/// A marker applied a mark to a markable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mark {
    pub id: MarkId,
    pub markable: EntityRef,
    pub marker: EntityRef,
    pub mark: String,
    pub created_at: DateTime<Utc>,
}

impl Mark {
    pub fn new(markable: EntityRef, marker: EntityRef, mark: impl Into<String>) -> Self {
        Self {
            id: MarkId::new(),
            markable,
            marker,
            mark: mark.into(),
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_ref_display() {
        assert_eq!(EntityRef::new("Food", 7).to_string(), "Food#7");
    }

    #[test]
    fn test_new_marks_get_fresh_ids() {
        let a = Mark::new(EntityRef::new("Food", 1), EntityRef::new("User", 2), "favorite");
        let b = Mark::new(EntityRef::new("Food", 1), EntityRef::new("User", 2), "favorite");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_mark_serializes_refs() {
        let mark = Mark::new(EntityRef::new("Food", 1), EntityRef::new("User", 2), "favorite");
        let json = serde_json::to_value(&mark).unwrap();
        assert_eq!(json["markable"]["type_name"], "Food");
        assert_eq!(json["marker"]["id"], 2);
        assert_eq!(json["mark"], "favorite");
    }
}
