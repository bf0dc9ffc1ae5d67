//! Capability registry for marking.
//!
//! Core principle: **a marker may only apply a mark the markable type
//! declares, and only if the mark's allow-list admits the marker type.**
//!
//! # Example
//!
//! ```
//! use registry::{AllowedMarkers, MarkRequest, Registry};
//!
//! let mut registry = Registry::new();
//! registry.declare_marker("User")?;
//! registry.declare_marker("Admin")?;
//! registry.declare_markable("Food", [("favorite", AllowedMarkers::All)])?;
//! registry.declare_markable("Drink", [("favorite", AllowedMarkers::only(["admin"]))])?;
//!
//! assert!(registry.can_mark(&MarkRequest::new("User", "Food", "favorite")));
//! assert!(registry.authorize(&MarkRequest::new("User", "Drink", "favorite")).is_err());
//! # Ok::<(), registry::Error>(())
//! ```

mod accessor;
mod check;
mod error;
mod registry;
mod types;

pub use accessor::{AccessorManifest, AccessorMethods, AccessorSpec, ResolvedAccessor};
pub use check::MarkRequest;
pub use error::{Error, Result};
pub use registry::Registry;
pub use types::{marker_name, AllowedMarkers, MarkableTypeSpec, MarkerTypeSpec};
