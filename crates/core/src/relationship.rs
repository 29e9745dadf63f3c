//! Foreign-key relationship model between two table fields.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::types::{EntityId, Timestamp};

/// End multiplicity of a relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cardinality {
    One,
    Many,
}

impl Cardinality {
    /// String representation for display and logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::One => "one",
            Self::Many => "many",
        }
    }
}

impl std::fmt::Display for Cardinality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A directed edge between a source field and a target field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    pub id: EntityId,
    pub name: String,
    pub source_table_id: EntityId,
    pub source_field_id: EntityId,
    pub target_table_id: EntityId,
    pub target_field_id: EntityId,
    pub source_cardinality: Cardinality,
    pub target_cardinality: Cardinality,
    pub created_at: Timestamp,
}

impl Relationship {
    /// Create a one-to-many relationship with a fresh id.
    pub fn new(
        name: impl Into<String>,
        source_table_id: EntityId,
        source_field_id: EntityId,
        target_table_id: EntityId,
        target_field_id: EntityId,
    ) -> Self {
        Self {
            id: EntityId::new_v4(),
            name: name.into(),
            source_table_id,
            source_field_id,
            target_table_id,
            target_field_id,
            source_cardinality: Cardinality::One,
            target_cardinality: Cardinality::Many,
            created_at: Utc::now(),
        }
    }

    /// True if either endpoint table is in `table_ids`.
    pub fn references_any(&self, table_ids: &[EntityId]) -> bool {
        table_ids.contains(&self.source_table_id) || table_ids.contains(&self.target_table_id)
    }
}

/// Partial update for a [`Relationship`]. `None` fields are left untouched.
///
/// Endpoints are immutable; re-linking is modeled as remove + add.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelationshipPatch {
    pub name: Option<String>,
    pub source_cardinality: Option<Cardinality>,
    pub target_cardinality: Option<Cardinality>,
}

impl RelationshipPatch {
    /// Set every `Some` field on `target`.
    pub fn apply(&self, target: &mut Relationship) {
        if let Some(name) = &self.name {
            target.name = name.clone();
        }
        if let Some(source) = self.source_cardinality {
            target.source_cardinality = source;
        }
        if let Some(dest) = self.target_cardinality {
            target.target_cardinality = dest;
        }
    }

    /// Capture the inverse of this patch against `current` (call before
    /// [`apply`](Self::apply)).
    pub fn reverse(&self, current: &Relationship) -> Self {
        Self {
            name: self.name.as_ref().map(|_| current.name.clone()),
            source_cardinality: self.source_cardinality.map(|_| current.source_cardinality),
            target_cardinality: self.target_cardinality.map(|_| current.target_cardinality),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.source_cardinality.is_none()
            && self.target_cardinality.is_none()
    }
}
