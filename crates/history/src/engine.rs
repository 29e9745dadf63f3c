//! The mutation-engine seam between the history controller and the
//! document owner.
//!
//! Every entity-mutating entry point takes an explicit [`HistoryPolicy`].
//! User-facing callers pass [`HistoryPolicy::Record`]; the undo/redo
//! handlers pass [`HistoryPolicy::Suppress`] so that replaying an inverse
//! action is never itself recorded (which would turn undo/redo into an
//! infinite ratchet). Suppression is always an explicit parameter, never
//! inferred from the call site.

use async_trait::async_trait;

use schemamap_core::{
    CoreError, Dependency, DependencyPatch, EntityId, Field, FieldPatch, Index, IndexPatch,
    Relationship, RelationshipPatch, Table, TablePatch,
};

/// Whether a mutation should append an action record to the history log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryPolicy {
    /// Capture the mutation as a new undoable action (the default for
    /// user-facing calls).
    Record,
    /// Apply the mutation with no history side effect. Used exclusively by
    /// undo/redo replay.
    Suppress,
}

impl HistoryPolicy {
    pub fn should_record(self) -> bool {
        matches!(self, Self::Record)
    }
}

/// The collaborator that owns the schema document and performs all entity
/// mutations.
///
/// One method per entity kind per verb. Each method applies the change and,
/// when `policy` records, captures a before/after pair sufficient for a
/// faithful round trip and passes it to the history log.
#[async_trait]
pub trait MutationEngine: Send + Sync {
    // -- Diagram metadata -------------------------------------------------

    async fn update_diagram_name(
        &self,
        name: String,
        policy: HistoryPolicy,
    ) -> Result<(), CoreError>;

    // -- Tables -----------------------------------------------------------

    async fn add_tables(&self, tables: Vec<Table>, policy: HistoryPolicy)
        -> Result<(), CoreError>;

    /// Remove the given tables and cascade-delete every relationship and
    /// dependency referencing them.
    async fn remove_tables(
        &self,
        table_ids: Vec<EntityId>,
        policy: HistoryPolicy,
    ) -> Result<(), CoreError>;

    async fn update_table(
        &self,
        table_id: EntityId,
        patch: TablePatch,
        policy: HistoryPolicy,
    ) -> Result<(), CoreError>;

    /// Override the whole table collection, cascade-deleting edges that
    /// reference a table absent from the new set.
    async fn replace_tables(
        &self,
        tables: Vec<Table>,
        policy: HistoryPolicy,
    ) -> Result<(), CoreError>;

    // -- Fields -----------------------------------------------------------

    async fn add_field(
        &self,
        table_id: EntityId,
        field: Field,
        policy: HistoryPolicy,
    ) -> Result<(), CoreError>;

    async fn remove_field(
        &self,
        table_id: EntityId,
        field_id: EntityId,
        policy: HistoryPolicy,
    ) -> Result<(), CoreError>;

    async fn update_field(
        &self,
        table_id: EntityId,
        field_id: EntityId,
        patch: FieldPatch,
        policy: HistoryPolicy,
    ) -> Result<(), CoreError>;

    // -- Indexes ----------------------------------------------------------

    async fn add_index(
        &self,
        table_id: EntityId,
        index: Index,
        policy: HistoryPolicy,
    ) -> Result<(), CoreError>;

    async fn remove_index(
        &self,
        table_id: EntityId,
        index_id: EntityId,
        policy: HistoryPolicy,
    ) -> Result<(), CoreError>;

    async fn update_index(
        &self,
        table_id: EntityId,
        index_id: EntityId,
        patch: IndexPatch,
        policy: HistoryPolicy,
    ) -> Result<(), CoreError>;

    // -- Relationships ----------------------------------------------------

    async fn add_relationships(
        &self,
        relationships: Vec<Relationship>,
        policy: HistoryPolicy,
    ) -> Result<(), CoreError>;

    async fn update_relationship(
        &self,
        relationship_id: EntityId,
        patch: RelationshipPatch,
        policy: HistoryPolicy,
    ) -> Result<(), CoreError>;

    async fn remove_relationships(
        &self,
        relationship_ids: Vec<EntityId>,
        policy: HistoryPolicy,
    ) -> Result<(), CoreError>;

    // -- Dependencies -----------------------------------------------------

    async fn add_dependencies(
        &self,
        dependencies: Vec<Dependency>,
        policy: HistoryPolicy,
    ) -> Result<(), CoreError>;

    async fn update_dependency(
        &self,
        dependency_id: EntityId,
        patch: DependencyPatch,
        policy: HistoryPolicy,
    ) -> Result<(), CoreError>;

    async fn remove_dependencies(
        &self,
        dependency_ids: Vec<EntityId>,
        policy: HistoryPolicy,
    ) -> Result<(), CoreError>;
}
