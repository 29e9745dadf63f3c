//! Cross-table dependency model (a view depending on a table).

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::types::{EntityId, Timestamp};

/// A dependency edge: `dependent_table_id` (typically a view) reads from
/// `table_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dependency {
    pub id: EntityId,
    pub schema: Option<String>,
    /// The table being depended on.
    pub table_id: EntityId,
    /// The table (view) that depends on it.
    pub dependent_table_id: EntityId,
    pub created_at: Timestamp,
}

impl Dependency {
    pub fn new(table_id: EntityId, dependent_table_id: EntityId) -> Self {
        Self {
            id: EntityId::new_v4(),
            schema: None,
            table_id,
            dependent_table_id,
            created_at: Utc::now(),
        }
    }

    /// True if either endpoint table is in `table_ids`.
    pub fn references_any(&self, table_ids: &[EntityId]) -> bool {
        table_ids.contains(&self.table_id) || table_ids.contains(&self.dependent_table_id)
    }
}

/// Partial update for a [`Dependency`]. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DependencyPatch {
    pub table_id: Option<EntityId>,
    pub dependent_table_id: Option<EntityId>,
}

impl DependencyPatch {
    /// Set every `Some` field on `target`.
    pub fn apply(&self, target: &mut Dependency) {
        if let Some(table_id) = self.table_id {
            target.table_id = table_id;
        }
        if let Some(dependent_table_id) = self.dependent_table_id {
            target.dependent_table_id = dependent_table_id;
        }
    }

    /// Capture the inverse of this patch against `current` (call before
    /// [`apply`](Self::apply)).
    pub fn reverse(&self, current: &Dependency) -> Self {
        Self {
            table_id: self.table_id.map(|_| current.table_id),
            dependent_table_id: self.dependent_table_id.map(|_| current.dependent_table_id),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.table_id.is_none() && self.dependent_table_id.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn references_any_matches_either_endpoint() {
        let dep = Dependency::new(EntityId::new_v4(), EntityId::new_v4());
        assert!(dep.references_any(&[dep.table_id]));
        assert!(dep.references_any(&[dep.dependent_table_id]));
        assert!(!dep.references_any(&[EntityId::new_v4()]));
    }

    #[test]
    fn retarget_patch_round_trips() {
        let mut dep = Dependency::new(EntityId::new_v4(), EntityId::new_v4());
        let original = dep.clone();

        let patch = DependencyPatch {
            table_id: Some(EntityId::new_v4()),
            dependent_table_id: None,
        };

        let reverse = patch.reverse(&dep);
        patch.apply(&mut dep);
        assert_ne!(dep, original);

        reverse.apply(&mut dep);
        assert_eq!(dep, original);
    }
}
