//! Domain model for the schema diagram document.
//!
//! This crate has zero internal dependencies so it can be used by the
//! history engine, a storage layer, and any future tooling alike. It
//! defines the document entities, their partial-update patches (with
//! inverse capture for undo), and the cascade queries used when a table
//! deletion must take its referencing edges with it.

pub mod dependency;
pub mod diagram;
pub mod error;
pub mod field;
pub mod index;
pub mod relationship;
pub mod table;
pub mod types;

pub use dependency::{Dependency, DependencyPatch};
pub use diagram::Diagram;
pub use error::CoreError;
pub use field::{Field, FieldPatch};
pub use index::{Index, IndexPatch};
pub use relationship::{Cardinality, Relationship, RelationshipPatch};
pub use table::{Table, TablePatch};
pub use types::{EntityId, Timestamp};
