//! Capability registry and declaration loading.

use crate::types::{marker_name, AllowedMarkers, MarkableTypeSpec, MarkerTypeSpec};
use crate::{Error, Result};
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use tracing::debug;

/// Declared marker and markable capabilities.
///
/// Built once at startup, then shared by reference.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    markables: BTreeMap<String, MarkableTypeSpec>,
    /// Keyed by canonical marker name.
    markers: BTreeMap<String, MarkerTypeSpec>,
    models: BTreeSet<String>,
}

/// Declaration file loaded from TOML.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct Declarations {
    #[serde(default)]
    models: Vec<String>,

    #[serde(default)]
    markers: Vec<String>,

    #[serde(default)]
    markables: BTreeMap<String, MarkableEntry>,
}

/// One `[markables.<Type>]` table: every key except `plural` is a mark.
#[derive(Debug, Default, Deserialize)]
struct MarkableEntry {
    plural: Option<String>,

    #[serde(flatten)]
    marks: BTreeMap<String, AllowedMarkers>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load declarations from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::parse(&content)
    }

    /// Parse declarations from a TOML string.
    pub fn parse(toml: &str) -> Result<Self> {
        let decls: Declarations = toml::from_str(toml).map_err(|e| Error::Parse(e.to_string()))?;

        let mut registry = Self::new();
        for model in decls.models {
            registry.register_model(model)?;
        }
        for marker in decls.markers {
            registry.declare_marker(marker)?;
        }
        for (type_name, entry) in decls.markables {
            registry.declare_markable(type_name.as_str(), entry.marks)?;
            if let Some(plural) = entry.plural {
                registry.set_markable_plural(&type_name, plural)?;
            }
        }
        Ok(registry)
    }

    /// Declare a type markable, or extend its marks.
    ///
    /// Redeclaring a mark replaces its allow-list.
    pub fn declare_markable<I, M>(
        &mut self,
        type_name: impl Into<String>,
        marks: I,
    ) -> Result<&MarkableTypeSpec>
    where
        I: IntoIterator<Item = (M, AllowedMarkers)>,
        M: Into<String>,
    {
        let type_name = non_empty(type_name.into(), "markable type name")?;
        let marks = marks
            .into_iter()
            .map(|(mark, allowed)| Ok((non_empty(mark.into(), "mark name")?, allowed)))
            .collect::<Result<Vec<_>>>()?;

        self.models.insert(type_name.clone());
        let spec = self
            .markables
            .entry(type_name.clone())
            .or_insert_with(|| MarkableTypeSpec::new(type_name));
        for (mark, allowed) in marks {
            debug!(markable = %spec.type_name, %mark, ?allowed, "declared mark");
            spec.marks.insert(mark, allowed);
        }
        Ok(&*spec)
    }

    /// Declare a type as a marker. Redeclaring is a no-op.
    pub fn declare_marker(&mut self, type_name: impl Into<String>) -> Result<&MarkerTypeSpec> {
        let type_name = non_empty(type_name.into(), "marker type name")?;
        let name = marker_name(&type_name);
        if !self.markers.contains_key(&name) {
            self.models.insert(type_name.clone());
        }
        let spec = self
            .markers
            .entry(name)
            .or_insert_with(|| MarkerTypeSpec::new(type_name));
        debug!(marker = %spec.name, "declared marker");
        Ok(&*spec)
    }

    /// Override the plural form of a markable type.
    pub fn set_markable_plural(&mut self, type_name: &str, plural: impl Into<String>) -> Result<()> {
        let plural = non_empty(plural.into(), "plural form")?;
        let spec = self
            .markables
            .get_mut(type_name)
            .ok_or_else(|| Error::UnknownMarkableType(type_name.to_string()))?;
        spec.plural = plural;
        Ok(())
    }

    /// Override the plural form of a marker type.
    pub fn set_marker_plural(&mut self, type_name: &str, plural: impl Into<String>) -> Result<()> {
        let plural = non_empty(plural.into(), "plural form")?;
        let spec = self
            .markers
            .get_mut(&marker_name(type_name))
            .ok_or_else(|| Error::UnknownMarkerType(type_name.to_string()))?;
        spec.plural = plural;
        Ok(())
    }

    /// Record an entity type name without granting it any capability.
    pub fn register_model(&mut self, type_name: impl Into<String>) -> Result<()> {
        let type_name = non_empty(type_name.into(), "model type name")?;
        self.models.insert(type_name);
        Ok(())
    }

    pub fn known_markable_types(&self) -> BTreeSet<&str> {
        self.markables.keys().map(String::as_str).collect()
    }

    /// Canonical names of all declared markers.
    pub fn known_marker_types(&self) -> BTreeSet<&str> {
        self.markers.keys().map(String::as_str).collect()
    }

    /// Every entity type name seen, markable, marker or plain model.
    pub fn known_models(&self) -> &BTreeSet<String> {
        &self.models
    }

    pub fn markable(&self, type_name: &str) -> Option<&MarkableTypeSpec> {
        self.markables.get(type_name)
    }

    /// Look up a marker by type name or canonical name.
    pub fn marker(&self, type_name: &str) -> Option<&MarkerTypeSpec> {
        self.markers.get(&marker_name(type_name))
    }

    pub(crate) fn markables(&self) -> impl Iterator<Item = &MarkableTypeSpec> {
        self.markables.values()
    }

    pub(crate) fn markers(&self) -> impl Iterator<Item = &MarkerTypeSpec> {
        self.markers.values()
    }

    /// Marks declared on a markable type.
    pub fn marks_for(&self, markable_type: &str) -> Result<&BTreeMap<String, AllowedMarkers>> {
        self.markable(markable_type)
            .map(|spec| &spec.marks)
            .ok_or_else(|| Error::UnknownMarkableType(markable_type.to_string()))
    }

    /// Resolve a declared mark, failing if the type or the mark is unknown.
    pub fn mark(&self, markable_type: &str, mark: &str) -> Result<&AllowedMarkers> {
        self.marks_for(markable_type)?
            .get(mark)
            .ok_or_else(|| Error::UnknownMark {
                markable_type: markable_type.to_string(),
                mark: mark.to_string(),
            })
    }
}

fn non_empty(value: String, what: &str) -> Result<String> {
    if value.trim().is_empty() {
        return Err(Error::Invalid(format!("{what} must not be empty")));
    }
    Ok(value)
}
