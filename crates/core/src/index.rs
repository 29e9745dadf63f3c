//! Table index model and its partial-update patch.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::types::{EntityId, Timestamp};

/// An index over one or more fields of a [`Table`](crate::table::Table).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Index {
    pub id: EntityId,
    pub name: String,
    /// Ids of the covered fields, in index column order.
    pub field_ids: Vec<EntityId>,
    pub unique: bool,
    pub created_at: Timestamp,
}

impl Index {
    /// Create a non-unique index with a fresh id.
    pub fn new(name: impl Into<String>, field_ids: Vec<EntityId>) -> Self {
        Self {
            id: EntityId::new_v4(),
            name: name.into(),
            field_ids,
            unique: false,
            created_at: Utc::now(),
        }
    }
}

/// Partial update for an [`Index`]. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexPatch {
    pub name: Option<String>,
    pub field_ids: Option<Vec<EntityId>>,
    pub unique: Option<bool>,
}

impl IndexPatch {
    /// Set every `Some` field on `target`.
    pub fn apply(&self, target: &mut Index) {
        if let Some(name) = &self.name {
            target.name = name.clone();
        }
        if let Some(field_ids) = &self.field_ids {
            target.field_ids = field_ids.clone();
        }
        if let Some(unique) = self.unique {
            target.unique = unique;
        }
    }

    /// Capture the inverse of this patch against `current` (call before
    /// [`apply`](Self::apply)).
    pub fn reverse(&self, current: &Index) -> Self {
        Self {
            name: self.name.as_ref().map(|_| current.name.clone()),
            field_ids: self.field_ids.as_ref().map(|_| current.field_ids.clone()),
            unique: self.unique.map(|_| current.unique),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.field_ids.is_none() && self.unique.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reverse_then_apply_round_trips() {
        let field_id = EntityId::new_v4();
        let mut index = Index::new("users_email_idx", vec![field_id]);
        let original = index.clone();

        let patch = IndexPatch {
            name: Some("users_email_unique".to_string()),
            unique: Some(true),
            field_ids: None,
        };

        let reverse = patch.reverse(&index);
        patch.apply(&mut index);
        assert!(index.unique);

        reverse.apply(&mut index);
        assert_eq!(index, original);
    }

    #[test]
    fn field_ids_replaced_wholesale() {
        let mut index = Index::new("idx", vec![EntityId::new_v4()]);
        let replacement = vec![EntityId::new_v4(), EntityId::new_v4()];
        let patch = IndexPatch {
            field_ids: Some(replacement.clone()),
            ..Default::default()
        };

        patch.apply(&mut index);
        assert_eq!(index.field_ids, replacement);
    }
}
