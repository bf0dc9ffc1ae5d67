//! SQLite-backed storage for mark edges.
//!
//! This crate persists the mark relation: the set of edges recording that a
//! marker entity applied a named mark to a markable entity. Both ends of an
//! edge are polymorphic, so each is stored as a type name plus an id.
//!
//! # Core Concepts
//!
//! ## EntityRef
//!
//! An [`EntityRef`] is a tagged reference to any entity: its declared type
//! name and its primary key. The store never assumes a concrete type on
//! either side of an edge.
//!
//! ## Mark
//!
//! A [`Mark`] is one edge `(markable, marker, mark)`. The tuple is unique;
//! each stored mark also carries an id and a creation timestamp.
//!
//! ## MarkStore
//!
//! The [`MarkStore`] trait is the contract the marking engine relies on:
//! existence checks, idempotent batch insert, filtered delete, and the two
//! distinct-id queries. [`MarkFilter`] constrains any subset of the five
//! tuple fields. [`SqliteMarkStore`] is the SQLite implementation and
//! [`MemoryMarkStore`] keeps edges in process.
//!
//! # Example
//!
//! ```no_run
//! use storage::{EntityRef, Mark, MarkFilter, MarkStore, SqliteMarkStore};
//!
//! let store = SqliteMarkStore::open("marks.db")?;
//!
//! let food = EntityRef::new("Food", 1);
//! let user = EntityRef::new("User", 7);
//! store.insert(&[Mark::new(food.clone(), user.clone(), "favorite")])?;
//!
//! assert!(store.exists(&MarkFilter::edge(&food, &user, "favorite"))?);
//! assert_eq!(store.query_markables("Food", "favorite", Some(&user))?, [1]);
//! # Ok::<(), storage::Error>(())
//! ```

mod error;
mod mark;
mod memory;
mod sqlite;
mod store;

pub use error::{Error, Result};
pub use mark::{EntityRef, Mark, MarkId};
pub use memory::MemoryMarkStore;
pub use sqlite::SqliteMarkStore;
pub use store::{MarkFilter, MarkStore};
