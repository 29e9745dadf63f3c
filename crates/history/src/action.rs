//! The closed taxonomy of recorded mutations.
//!
//! Every variant carries both the data needed to replay the mutation
//! forward (redo) and the data needed to replay it backward (undo). Both
//! halves are captured by the mutation engine at the moment of the
//! original action, before the pre-mutation state is lost, and are never
//! mutated afterwards.
//!
//! Payload asymmetry follows one rule: reconstructing an entity needs a
//! full snapshot, deleting one needs only its id, and reversing a partial
//! update needs the inverse patch captured against the pre-mutation value.

use serde::{Deserialize, Serialize};

use schemamap_core::{
    Dependency, DependencyPatch, EntityId, Field, FieldPatch, Index, IndexPatch, Relationship,
    RelationshipPatch, Table, TablePatch,
};

/// Compound undo payload for operations that remove tables together with
/// the relationship and dependency edges referencing them.
///
/// Restoring from this snapshot must re-insert all three collections; a
/// subset would leave dangling references.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSetSnapshot {
    pub tables: Vec<Table>,
    pub relationships: Vec<Relationship>,
    pub dependencies: Vec<Dependency>,
}

impl TableSetSnapshot {
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty() && self.relationships.is_empty() && self.dependencies.is_empty()
    }
}

/// One recorded, reversible mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Action {
    UpdateDiagramName {
        new_name: String,
        old_name: String,
    },
    AddTables {
        tables: Vec<Table>,
        table_ids: Vec<EntityId>,
    },
    RemoveTables {
        table_ids: Vec<EntityId>,
        removed: TableSetSnapshot,
    },
    UpdateTable {
        table_id: EntityId,
        patch: TablePatch,
        reverse: TablePatch,
    },
    /// Whole-set override of the table collection (e.g. re-import or
    /// auto-layout). Edges orphaned by the override are part of `prior`.
    ReplaceTables {
        tables: Vec<Table>,
        prior: TableSetSnapshot,
    },
    AddField {
        table_id: EntityId,
        field: Field,
        field_id: EntityId,
    },
    RemoveField {
        table_id: EntityId,
        field_id: EntityId,
        field: Field,
    },
    UpdateField {
        table_id: EntityId,
        field_id: EntityId,
        patch: FieldPatch,
        reverse: FieldPatch,
    },
    AddIndex {
        table_id: EntityId,
        index: Index,
        index_id: EntityId,
    },
    RemoveIndex {
        table_id: EntityId,
        index_id: EntityId,
        index: Index,
    },
    UpdateIndex {
        table_id: EntityId,
        index_id: EntityId,
        patch: IndexPatch,
        reverse: IndexPatch,
    },
    AddRelationships {
        relationships: Vec<Relationship>,
        relationship_ids: Vec<EntityId>,
    },
    UpdateRelationship {
        relationship_id: EntityId,
        patch: RelationshipPatch,
        reverse: RelationshipPatch,
    },
    RemoveRelationships {
        relationship_ids: Vec<EntityId>,
        relationships: Vec<Relationship>,
    },
    AddDependencies {
        dependencies: Vec<Dependency>,
        dependency_ids: Vec<EntityId>,
    },
    UpdateDependency {
        dependency_id: EntityId,
        patch: DependencyPatch,
        reverse: DependencyPatch,
    },
    RemoveDependencies {
        dependency_ids: Vec<EntityId>,
        dependencies: Vec<Dependency>,
    },
}

impl Action {
    /// Stable snake_case label for logging and diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Self::UpdateDiagramName { .. } => "update_diagram_name",
            Self::AddTables { .. } => "add_tables",
            Self::RemoveTables { .. } => "remove_tables",
            Self::UpdateTable { .. } => "update_table",
            Self::ReplaceTables { .. } => "replace_tables",
            Self::AddField { .. } => "add_field",
            Self::RemoveField { .. } => "remove_field",
            Self::UpdateField { .. } => "update_field",
            Self::AddIndex { .. } => "add_index",
            Self::RemoveIndex { .. } => "remove_index",
            Self::UpdateIndex { .. } => "update_index",
            Self::AddRelationships { .. } => "add_relationships",
            Self::UpdateRelationship { .. } => "update_relationship",
            Self::RemoveRelationships { .. } => "remove_relationships",
            Self::AddDependencies { .. } => "add_dependencies",
            Self::UpdateDependency { .. } => "update_dependency",
            Self::RemoveDependencies { .. } => "remove_dependencies",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_matches_serde_tag() {
        let action = Action::UpdateDiagramName {
            new_name: "after".to_string(),
            old_name: "before".to_string(),
        };

        let json = serde_json::to_value(&action).unwrap();
        assert_eq!(json["kind"], action.name());
        assert_eq!(json["new_name"], "after");
        assert_eq!(json["old_name"], "before");
    }

    #[test]
    fn serde_round_trip_preserves_payloads() {
        let table = Table::new("users");
        let action = Action::RemoveTables {
            table_ids: vec![table.id],
            removed: TableSetSnapshot {
                tables: vec![table],
                relationships: Vec::new(),
                dependencies: Vec::new(),
            },
        };

        let json = serde_json::to_string(&action).unwrap();
        let parsed: Action = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, action);
    }

    #[test]
    fn empty_snapshot_reported_empty() {
        let snapshot = TableSetSnapshot {
            tables: Vec::new(),
            relationships: Vec::new(),
            dependencies: Vec::new(),
        };
        assert!(snapshot.is_empty());
    }
}
