//! In-memory mutation engine: owns the diagram document and produces
//! action records.
//!
//! Every mutation follows the same shape: take the write lock, capture the
//! undo payload from the pre-mutation document, apply the change, then (if
//! the policy records) hand a fully-formed [`Action`] to the history log.
//! Capture happens strictly before the mutation so the undo payload always
//! reflects state that is about to be lost.
//!
//! Thread-safe via interior `RwLock`; designed to be wrapped in `Arc` and
//! shared between the UI layer and the history controller.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use schemamap_core::diagram::validate_diagram_name;
use schemamap_core::{
    CoreError, Dependency, DependencyPatch, Diagram, EntityId, Field, FieldPatch, Index,
    IndexPatch, Relationship, RelationshipPatch, Table, TablePatch,
};

use crate::action::{Action, TableSetSnapshot};
use crate::engine::{HistoryPolicy, MutationEngine};
use crate::log::HistoryLog;

/// The document owner for a single editing session.
pub struct InMemoryEngine {
    diagram: RwLock<Diagram>,
    log: Arc<HistoryLog>,
}

impl InMemoryEngine {
    pub fn new(diagram: Diagram, log: Arc<HistoryLog>) -> Self {
        Self {
            diagram: RwLock::new(diagram),
            log,
        }
    }

    /// Snapshot of the current document (for rendering and tests).
    pub async fn diagram(&self) -> Diagram {
        self.diagram.read().await.clone()
    }

    pub fn log(&self) -> &Arc<HistoryLog> {
        &self.log
    }

    async fn record(&self, policy: HistoryPolicy, action: Action) {
        if policy.should_record() {
            self.log.record(action).await;
        }
    }
}

#[async_trait]
impl MutationEngine for InMemoryEngine {
    async fn update_diagram_name(
        &self,
        name: String,
        policy: HistoryPolicy,
    ) -> Result<(), CoreError> {
        validate_diagram_name(&name)?;

        let old_name = {
            let mut diagram = self.diagram.write().await;
            let old = std::mem::replace(&mut diagram.name, name.clone());
            diagram.touch();
            old
        };

        tracing::debug!(name = %name, "diagram renamed");
        self.record(
            policy,
            Action::UpdateDiagramName {
                new_name: name,
                old_name,
            },
        )
        .await;
        Ok(())
    }

    async fn add_tables(
        &self,
        tables: Vec<Table>,
        policy: HistoryPolicy,
    ) -> Result<(), CoreError> {
        let table_ids: Vec<EntityId> = tables.iter().map(|t| t.id).collect();

        {
            let mut diagram = self.diagram.write().await;
            for table in &tables {
                if diagram.table(table.id).is_some() {
                    return Err(CoreError::Conflict(format!(
                        "Table {} already exists",
                        table.id
                    )));
                }
            }
            diagram.tables.extend(tables.iter().cloned());
            diagram.touch();
        }

        tracing::debug!(count = table_ids.len(), "tables added");
        self.record(policy, Action::AddTables { tables, table_ids })
            .await;
        Ok(())
    }

    async fn remove_tables(
        &self,
        table_ids: Vec<EntityId>,
        policy: HistoryPolicy,
    ) -> Result<(), CoreError> {
        let removed = {
            let mut diagram = self.diagram.write().await;

            // Capture the cascade before anything is dropped: every edge
            // referencing a removed table goes into the undo payload, so a
            // restore can never leave a dangling reference.
            let relationships = diagram.relationships_referencing(&table_ids);
            let dependencies = diagram.dependencies_referencing(&table_ids);

            let mut tables = Vec::new();
            diagram.tables.retain(|t| {
                if table_ids.contains(&t.id) {
                    tables.push(t.clone());
                    false
                } else {
                    true
                }
            });
            diagram.relationships.retain(|r| !r.references_any(&table_ids));
            diagram.dependencies.retain(|d| !d.references_any(&table_ids));
            diagram.touch();

            TableSetSnapshot {
                tables,
                relationships,
                dependencies,
            }
        };

        tracing::debug!(
            tables = removed.tables.len(),
            relationships = removed.relationships.len(),
            dependencies = removed.dependencies.len(),
            "tables removed with cascade",
        );
        self.record(policy, Action::RemoveTables { table_ids, removed })
            .await;
        Ok(())
    }

    async fn update_table(
        &self,
        table_id: EntityId,
        patch: TablePatch,
        policy: HistoryPolicy,
    ) -> Result<(), CoreError> {
        let reverse = {
            let mut diagram = self.diagram.write().await;
            let table = diagram.table_mut(table_id).ok_or(CoreError::NotFound {
                entity: "table",
                id: table_id,
            })?;
            let reverse = patch.reverse(table);
            patch.apply(table);
            diagram.touch();
            reverse
        };

        self.record(
            policy,
            Action::UpdateTable {
                table_id,
                patch,
                reverse,
            },
        )
        .await;
        Ok(())
    }

    async fn replace_tables(
        &self,
        tables: Vec<Table>,
        policy: HistoryPolicy,
    ) -> Result<(), CoreError> {
        let prior = {
            let mut diagram = self.diagram.write().await;

            // Edges referencing a table absent from the new set are orphaned
            // by the override and must be dropped and captured.
            let new_ids: Vec<EntityId> = tables.iter().map(|t| t.id).collect();
            let removed_ids: Vec<EntityId> = diagram
                .tables
                .iter()
                .map(|t| t.id)
                .filter(|id| !new_ids.contains(id))
                .collect();
            let relationships = diagram.relationships_referencing(&removed_ids);
            let dependencies = diagram.dependencies_referencing(&removed_ids);

            let prior_tables = std::mem::replace(&mut diagram.tables, tables.clone());
            diagram.relationships.retain(|r| !r.references_any(&removed_ids));
            diagram.dependencies.retain(|d| !d.references_any(&removed_ids));
            diagram.touch();

            TableSetSnapshot {
                tables: prior_tables,
                relationships,
                dependencies,
            }
        };

        tracing::debug!(
            tables = tables.len(),
            dropped_relationships = prior.relationships.len(),
            dropped_dependencies = prior.dependencies.len(),
            "table set replaced",
        );
        self.record(policy, Action::ReplaceTables { tables, prior })
            .await;
        Ok(())
    }

    async fn add_field(
        &self,
        table_id: EntityId,
        field: Field,
        policy: HistoryPolicy,
    ) -> Result<(), CoreError> {
        let field_id = field.id;

        {
            let mut diagram = self.diagram.write().await;
            let table = diagram.table_mut(table_id).ok_or(CoreError::NotFound {
                entity: "table",
                id: table_id,
            })?;
            if table.field(field_id).is_some() {
                return Err(CoreError::Conflict(format!(
                    "Field {field_id} already exists"
                )));
            }
            table.fields.push(field.clone());
            diagram.touch();
        }

        self.record(
            policy,
            Action::AddField {
                table_id,
                field,
                field_id,
            },
        )
        .await;
        Ok(())
    }

    async fn remove_field(
        &self,
        table_id: EntityId,
        field_id: EntityId,
        policy: HistoryPolicy,
    ) -> Result<(), CoreError> {
        let field = {
            let mut diagram = self.diagram.write().await;
            let table = diagram.table_mut(table_id).ok_or(CoreError::NotFound {
                entity: "table",
                id: table_id,
            })?;
            let position = table
                .fields
                .iter()
                .position(|f| f.id == field_id)
                .ok_or(CoreError::NotFound {
                    entity: "field",
                    id: field_id,
                })?;
            let field = table.fields.remove(position);
            diagram.touch();
            field
        };

        self.record(
            policy,
            Action::RemoveField {
                table_id,
                field_id,
                field,
            },
        )
        .await;
        Ok(())
    }

    async fn update_field(
        &self,
        table_id: EntityId,
        field_id: EntityId,
        patch: FieldPatch,
        policy: HistoryPolicy,
    ) -> Result<(), CoreError> {
        let reverse = {
            let mut diagram = self.diagram.write().await;
            let table = diagram.table_mut(table_id).ok_or(CoreError::NotFound {
                entity: "table",
                id: table_id,
            })?;
            let field = table.field_mut(field_id).ok_or(CoreError::NotFound {
                entity: "field",
                id: field_id,
            })?;
            let reverse = patch.reverse(field);
            patch.apply(field);
            diagram.touch();
            reverse
        };

        self.record(
            policy,
            Action::UpdateField {
                table_id,
                field_id,
                patch,
                reverse,
            },
        )
        .await;
        Ok(())
    }

    async fn add_index(
        &self,
        table_id: EntityId,
        index: Index,
        policy: HistoryPolicy,
    ) -> Result<(), CoreError> {
        let index_id = index.id;

        {
            let mut diagram = self.diagram.write().await;
            let table = diagram.table_mut(table_id).ok_or(CoreError::NotFound {
                entity: "table",
                id: table_id,
            })?;
            if table.index(index_id).is_some() {
                return Err(CoreError::Conflict(format!(
                    "Index {index_id} already exists"
                )));
            }
            table.indexes.push(index.clone());
            diagram.touch();
        }

        self.record(
            policy,
            Action::AddIndex {
                table_id,
                index,
                index_id,
            },
        )
        .await;
        Ok(())
    }

    async fn remove_index(
        &self,
        table_id: EntityId,
        index_id: EntityId,
        policy: HistoryPolicy,
    ) -> Result<(), CoreError> {
        let index = {
            let mut diagram = self.diagram.write().await;
            let table = diagram.table_mut(table_id).ok_or(CoreError::NotFound {
                entity: "table",
                id: table_id,
            })?;
            let position = table
                .indexes
                .iter()
                .position(|i| i.id == index_id)
                .ok_or(CoreError::NotFound {
                    entity: "index",
                    id: index_id,
                })?;
            let index = table.indexes.remove(position);
            diagram.touch();
            index
        };

        self.record(
            policy,
            Action::RemoveIndex {
                table_id,
                index_id,
                index,
            },
        )
        .await;
        Ok(())
    }

    async fn update_index(
        &self,
        table_id: EntityId,
        index_id: EntityId,
        patch: IndexPatch,
        policy: HistoryPolicy,
    ) -> Result<(), CoreError> {
        let reverse = {
            let mut diagram = self.diagram.write().await;
            let table = diagram.table_mut(table_id).ok_or(CoreError::NotFound {
                entity: "table",
                id: table_id,
            })?;
            let index = table.index_mut(index_id).ok_or(CoreError::NotFound {
                entity: "index",
                id: index_id,
            })?;
            let reverse = patch.reverse(index);
            patch.apply(index);
            diagram.touch();
            reverse
        };

        self.record(
            policy,
            Action::UpdateIndex {
                table_id,
                index_id,
                patch,
                reverse,
            },
        )
        .await;
        Ok(())
    }

    async fn add_relationships(
        &self,
        relationships: Vec<Relationship>,
        policy: HistoryPolicy,
    ) -> Result<(), CoreError> {
        let relationship_ids: Vec<EntityId> = relationships.iter().map(|r| r.id).collect();

        {
            let mut diagram = self.diagram.write().await;
            for relationship in &relationships {
                if diagram.relationship(relationship.id).is_some() {
                    return Err(CoreError::Conflict(format!(
                        "Relationship {} already exists",
                        relationship.id
                    )));
                }
            }
            diagram.relationships.extend(relationships.iter().cloned());
            diagram.touch();
        }

        tracing::debug!(count = relationship_ids.len(), "relationships added");
        self.record(
            policy,
            Action::AddRelationships {
                relationships,
                relationship_ids,
            },
        )
        .await;
        Ok(())
    }

    async fn update_relationship(
        &self,
        relationship_id: EntityId,
        patch: RelationshipPatch,
        policy: HistoryPolicy,
    ) -> Result<(), CoreError> {
        let reverse = {
            let mut diagram = self.diagram.write().await;
            let relationship =
                diagram
                    .relationship_mut(relationship_id)
                    .ok_or(CoreError::NotFound {
                        entity: "relationship",
                        id: relationship_id,
                    })?;
            let reverse = patch.reverse(relationship);
            patch.apply(relationship);
            diagram.touch();
            reverse
        };

        self.record(
            policy,
            Action::UpdateRelationship {
                relationship_id,
                patch,
                reverse,
            },
        )
        .await;
        Ok(())
    }

    async fn remove_relationships(
        &self,
        relationship_ids: Vec<EntityId>,
        policy: HistoryPolicy,
    ) -> Result<(), CoreError> {
        let relationships = {
            let mut diagram = self.diagram.write().await;
            let mut removed = Vec::new();
            diagram.relationships.retain(|r| {
                if relationship_ids.contains(&r.id) {
                    removed.push(r.clone());
                    false
                } else {
                    true
                }
            });
            diagram.touch();
            removed
        };

        tracing::debug!(count = relationships.len(), "relationships removed");
        self.record(
            policy,
            Action::RemoveRelationships {
                relationship_ids,
                relationships,
            },
        )
        .await;
        Ok(())
    }

    async fn add_dependencies(
        &self,
        dependencies: Vec<Dependency>,
        policy: HistoryPolicy,
    ) -> Result<(), CoreError> {
        let dependency_ids: Vec<EntityId> = dependencies.iter().map(|d| d.id).collect();

        {
            let mut diagram = self.diagram.write().await;
            for dependency in &dependencies {
                if diagram.dependency(dependency.id).is_some() {
                    return Err(CoreError::Conflict(format!(
                        "Dependency {} already exists",
                        dependency.id
                    )));
                }
            }
            diagram.dependencies.extend(dependencies.iter().cloned());
            diagram.touch();
        }

        tracing::debug!(count = dependency_ids.len(), "dependencies added");
        self.record(
            policy,
            Action::AddDependencies {
                dependencies,
                dependency_ids,
            },
        )
        .await;
        Ok(())
    }

    async fn update_dependency(
        &self,
        dependency_id: EntityId,
        patch: DependencyPatch,
        policy: HistoryPolicy,
    ) -> Result<(), CoreError> {
        let reverse = {
            let mut diagram = self.diagram.write().await;
            let dependency = diagram
                .dependency_mut(dependency_id)
                .ok_or(CoreError::NotFound {
                    entity: "dependency",
                    id: dependency_id,
                })?;
            let reverse = patch.reverse(dependency);
            patch.apply(dependency);
            diagram.touch();
            reverse
        };

        self.record(
            policy,
            Action::UpdateDependency {
                dependency_id,
                patch,
                reverse,
            },
        )
        .await;
        Ok(())
    }

    async fn remove_dependencies(
        &self,
        dependency_ids: Vec<EntityId>,
        policy: HistoryPolicy,
    ) -> Result<(), CoreError> {
        let dependencies = {
            let mut diagram = self.diagram.write().await;
            let mut removed = Vec::new();
            diagram.dependencies.retain(|d| {
                if dependency_ids.contains(&d.id) {
                    removed.push(d.clone());
                    false
                } else {
                    true
                }
            });
            diagram.touch();
            removed
        };

        tracing::debug!(count = dependencies.len(), "dependencies removed");
        self.record(
            policy,
            Action::RemoveDependencies {
                dependency_ids,
                dependencies,
            },
        )
        .await;
        Ok(())
    }
}
