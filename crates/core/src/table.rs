//! Table model: the primary entity of a schema diagram.
//!
//! A table owns its fields and indexes; relationships and dependencies
//! between tables live on the [`Diagram`](crate::diagram::Diagram) itself.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::field::Field;
use crate::index::Index;
use crate::types::{EntityId, Timestamp};

/// A table (or view) node on the diagram canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub id: EntityId,
    pub name: String,
    /// Database schema qualifier, e.g. `"public"`.
    pub schema: Option<String>,
    /// Canvas position.
    pub x: f64,
    pub y: f64,
    /// Header color as a hex string, e.g. `"#9ef07a"`.
    pub color: String,
    pub is_view: bool,
    pub fields: Vec<Field>,
    pub indexes: Vec<Index>,
    pub created_at: Timestamp,
}

/// Default header color for newly created tables.
pub const DEFAULT_TABLE_COLOR: &str = "#9ef07a";

impl Table {
    /// Create an empty table at the canvas origin with a fresh id.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: EntityId::new_v4(),
            name: name.into(),
            schema: None,
            x: 0.0,
            y: 0.0,
            color: DEFAULT_TABLE_COLOR.to_string(),
            is_view: false,
            fields: Vec::new(),
            indexes: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn field(&self, field_id: EntityId) -> Option<&Field> {
        self.fields.iter().find(|f| f.id == field_id)
    }

    pub fn field_mut(&mut self, field_id: EntityId) -> Option<&mut Field> {
        self.fields.iter_mut().find(|f| f.id == field_id)
    }

    pub fn index(&self, index_id: EntityId) -> Option<&Index> {
        self.indexes.iter().find(|i| i.id == index_id)
    }

    pub fn index_mut(&mut self, index_id: EntityId) -> Option<&mut Index> {
        self.indexes.iter_mut().find(|i| i.id == index_id)
    }
}

/// Partial update for a [`Table`]. `None` fields are left untouched.
///
/// Children (fields, indexes) are mutated through their own operations,
/// never through a table patch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TablePatch {
    pub name: Option<String>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub color: Option<String>,
    pub is_view: Option<bool>,
}

impl TablePatch {
    /// Set every `Some` field on `target`.
    pub fn apply(&self, target: &mut Table) {
        if let Some(name) = &self.name {
            target.name = name.clone();
        }
        if let Some(x) = self.x {
            target.x = x;
        }
        if let Some(y) = self.y {
            target.y = y;
        }
        if let Some(color) = &self.color {
            target.color = color.clone();
        }
        if let Some(is_view) = self.is_view {
            target.is_view = is_view;
        }
    }

    /// Capture the inverse of this patch against `current` (call before
    /// [`apply`](Self::apply)).
    pub fn reverse(&self, current: &Table) -> Self {
        Self {
            name: self.name.as_ref().map(|_| current.name.clone()),
            x: self.x.map(|_| current.x),
            y: self.y.map(|_| current.y),
            color: self.color.as_ref().map(|_| current.color.clone()),
            is_view: self.is_view.map(|_| current.is_view),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.x.is_none()
            && self.y.is_none()
            && self.color.is_none()
            && self.is_view.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_table_is_empty_at_origin() {
        let table = Table::new("users");
        assert_eq!(table.name, "users");
        assert_eq!(table.x, 0.0);
        assert!(table.fields.is_empty());
        assert!(table.indexes.is_empty());
        assert!(!table.is_view);
    }

    #[test]
    fn field_lookup_by_id() {
        let mut table = Table::new("users");
        let field = Field::new("id", "bigint");
        let field_id = field.id;
        table.fields.push(field);

        assert!(table.field(field_id).is_some());
        assert!(table.field(EntityId::new_v4()).is_none());
    }

    #[test]
    fn move_patch_round_trips() {
        let mut table = Table::new("users");
        table.x = 10.0;
        table.y = 20.0;
        let original = table.clone();

        let patch = TablePatch {
            x: Some(300.0),
            y: Some(450.0),
            ..Default::default()
        };

        let reverse = patch.reverse(&table);
        patch.apply(&mut table);
        assert_eq!(table.x, 300.0);

        reverse.apply(&mut table);
        assert_eq!(table, original);
    }

    #[test]
    fn rename_patch_leaves_position_alone() {
        let mut table = Table::new("users");
        table.x = 5.0;

        let patch = TablePatch {
            name: Some("accounts".to_string()),
            ..Default::default()
        };
        patch.apply(&mut table);

        assert_eq!(table.name, "accounts");
        assert_eq!(table.x, 5.0);
    }
}
