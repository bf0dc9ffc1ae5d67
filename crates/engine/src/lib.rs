//! Marking engine: authorized marks between marker and markable entities.
//!
//! This crate ties the capability [`registry`] to a mark [`storage`]
//! backend. Every operation that connects a marker with a markable asks the
//! registry first and surfaces its typed failure unchanged; batches are
//! checked in full before anything is written.
//!
//! # Overview
//!
//! - **MarkingEngine**: applies, removes and queries marks.
//! - **MarkedSet**: the markables a marker marked, e.g. a user's favorite
//!   foods, with push/delete.
//! - **MarkerSet**: the markers that marked a markable, e.g. the users who
//!   favorited a food, with push/delete.
//!
//! # Example
//!
//! ```
//! use engine::MarkingEngine;
//! use registry::Registry;
//! use storage::{EntityRef, SqliteMarkStore};
//!
//! let registry = Registry::parse(
//!     r#"
//! markers = ["User", "Admin"]
//!
//! [markables.Food]
//! favorite = "all"
//!
//! [markables.Drink]
//! favorite = "admin"
//! "#,
//! )?;
//! let engine = MarkingEngine::new(&registry, SqliteMarkStore::in_memory()?);
//!
//! let admin = EntityRef::new("Admin", 1);
//! let food = EntityRef::new("Food", 1);
//! let drink = EntityRef::new("Drink", 1);
//!
//! engine.set_mark(&admin, "favorite", &[food.clone(), drink.clone()])?;
//! assert!(engine.set_mark(&EntityRef::new("User", 1), "favorite", &[drink]).is_err());
//! assert_eq!(engine.marked_as("Food", "favorite", None)?, [food]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod engine;
mod error;
mod view;

pub use engine::MarkingEngine;
pub use error::{Error, Result};
pub use view::{MarkedSet, MarkerSet};
