//! History controller: orchestrates undo and redo.
//!
//! `undo` pops the most recent record from the undo stack, re-files it onto
//! the redo stack, then replays its undo payload through the mutation
//! engine with history suppressed. `redo` is symmetric. Dispatch is an
//! exhaustive match over [`Action`], so a new action kind without a handler
//! is a compile error rather than a silent runtime no-op.
//!
//! The re-file happens *before* the replay: if a constituent engine call
//! fails, the whole call fails and the record stays on its destination
//! stack with its payloads intact, so the caller may retry.
//!
//! Callers must serialize `undo`/`redo` invocations (one in flight at a
//! time); interleaving them would replay payloads against a document state
//! different from the one they were captured against.

use std::sync::Arc;

use schemamap_core::CoreError;

use crate::action::Action;
use crate::engine::{HistoryPolicy, MutationEngine};
use crate::log::HistoryLog;

/// Undo/redo orchestrator for one editing session.
///
/// The mutation engine is injected at construction so the controller can be
/// exercised against a stub engine in tests.
pub struct HistoryController {
    engine: Arc<dyn MutationEngine>,
    log: Arc<HistoryLog>,
}

impl HistoryController {
    pub fn new(engine: Arc<dyn MutationEngine>, log: Arc<HistoryLog>) -> Self {
        Self { engine, log }
    }

    /// True iff there is at least one action to undo.
    pub async fn has_undo(&self) -> bool {
        self.log.has_undo().await
    }

    /// True iff there is at least one undone action to redo.
    pub async fn has_redo(&self) -> bool {
        self.log.has_redo().await
    }

    /// Revert the most recently recorded, not-yet-undone action.
    ///
    /// A no-op when the undo stack is empty.
    pub async fn undo(&self) -> Result<(), CoreError> {
        let Some(action) = self.log.pop_undo().await else {
            return Ok(());
        };

        self.log.push_redo(Arc::clone(&action)).await;
        tracing::debug!(action = action.name(), "applying undo");
        self.apply_undo(&action).await
    }

    /// Re-apply the most recently undone action.
    ///
    /// A no-op when the redo stack is empty.
    pub async fn redo(&self) -> Result<(), CoreError> {
        let Some(action) = self.log.pop_redo().await else {
            return Ok(());
        };

        self.log.push_undo(Arc::clone(&action)).await;
        tracing::debug!(action = action.name(), "applying redo");
        self.apply_redo(&action).await
    }

    /// Replay a record's redo payload through the engine, suppressed.
    async fn apply_redo(&self, action: &Action) -> Result<(), CoreError> {
        const SUPPRESS: HistoryPolicy = HistoryPolicy::Suppress;
        let engine = &self.engine;

        match action {
            Action::UpdateDiagramName { new_name, .. } => {
                engine.update_diagram_name(new_name.clone(), SUPPRESS).await
            }
            Action::AddTables { tables, .. } => engine.add_tables(tables.clone(), SUPPRESS).await,
            Action::RemoveTables { table_ids, .. } => {
                engine.remove_tables(table_ids.clone(), SUPPRESS).await
            }
            Action::UpdateTable {
                table_id, patch, ..
            } => engine.update_table(*table_id, patch.clone(), SUPPRESS).await,
            Action::ReplaceTables { tables, .. } => {
                engine.replace_tables(tables.clone(), SUPPRESS).await
            }
            Action::AddField {
                table_id, field, ..
            } => engine.add_field(*table_id, field.clone(), SUPPRESS).await,
            Action::RemoveField {
                table_id, field_id, ..
            } => engine.remove_field(*table_id, *field_id, SUPPRESS).await,
            Action::UpdateField {
                table_id,
                field_id,
                patch,
                ..
            } => {
                engine
                    .update_field(*table_id, *field_id, patch.clone(), SUPPRESS)
                    .await
            }
            Action::AddIndex {
                table_id, index, ..
            } => engine.add_index(*table_id, index.clone(), SUPPRESS).await,
            Action::RemoveIndex {
                table_id, index_id, ..
            } => engine.remove_index(*table_id, *index_id, SUPPRESS).await,
            Action::UpdateIndex {
                table_id,
                index_id,
                patch,
                ..
            } => {
                engine
                    .update_index(*table_id, *index_id, patch.clone(), SUPPRESS)
                    .await
            }
            Action::AddRelationships { relationships, .. } => {
                engine
                    .add_relationships(relationships.clone(), SUPPRESS)
                    .await
            }
            Action::UpdateRelationship {
                relationship_id,
                patch,
                ..
            } => {
                engine
                    .update_relationship(*relationship_id, patch.clone(), SUPPRESS)
                    .await
            }
            Action::RemoveRelationships {
                relationship_ids, ..
            } => {
                engine
                    .remove_relationships(relationship_ids.clone(), SUPPRESS)
                    .await
            }
            Action::AddDependencies { dependencies, .. } => {
                engine.add_dependencies(dependencies.clone(), SUPPRESS).await
            }
            Action::UpdateDependency {
                dependency_id,
                patch,
                ..
            } => {
                engine
                    .update_dependency(*dependency_id, patch.clone(), SUPPRESS)
                    .await
            }
            Action::RemoveDependencies { dependency_ids, .. } => {
                engine
                    .remove_dependencies(dependency_ids.clone(), SUPPRESS)
                    .await
            }
        }
    }

    /// Replay a record's undo payload through the engine, suppressed.
    ///
    /// Compound restores (tables plus the edges that were cascade-deleted
    /// with them) run their constituent calls concurrently; the collections
    /// are disjoint, and the whole replay fails if any constituent fails.
    async fn apply_undo(&self, action: &Action) -> Result<(), CoreError> {
        const SUPPRESS: HistoryPolicy = HistoryPolicy::Suppress;
        let engine = &self.engine;

        match action {
            Action::UpdateDiagramName { old_name, .. } => {
                engine.update_diagram_name(old_name.clone(), SUPPRESS).await
            }
            Action::AddTables { table_ids, .. } => {
                engine.remove_tables(table_ids.clone(), SUPPRESS).await
            }
            Action::RemoveTables { removed, .. } => {
                tokio::try_join!(
                    engine.add_tables(removed.tables.clone(), SUPPRESS),
                    engine.add_relationships(removed.relationships.clone(), SUPPRESS),
                    engine.add_dependencies(removed.dependencies.clone(), SUPPRESS),
                )?;
                Ok(())
            }
            Action::UpdateTable {
                table_id, reverse, ..
            } => {
                engine
                    .update_table(*table_id, reverse.clone(), SUPPRESS)
                    .await
            }
            Action::ReplaceTables { prior, .. } => {
                tokio::try_join!(
                    engine.replace_tables(prior.tables.clone(), SUPPRESS),
                    engine.add_relationships(prior.relationships.clone(), SUPPRESS),
                    engine.add_dependencies(prior.dependencies.clone(), SUPPRESS),
                )?;
                Ok(())
            }
            Action::AddField {
                table_id, field_id, ..
            } => engine.remove_field(*table_id, *field_id, SUPPRESS).await,
            Action::RemoveField {
                table_id, field, ..
            } => engine.add_field(*table_id, field.clone(), SUPPRESS).await,
            Action::UpdateField {
                table_id,
                field_id,
                reverse,
                ..
            } => {
                engine
                    .update_field(*table_id, *field_id, reverse.clone(), SUPPRESS)
                    .await
            }
            Action::AddIndex {
                table_id, index_id, ..
            } => engine.remove_index(*table_id, *index_id, SUPPRESS).await,
            Action::RemoveIndex {
                table_id, index, ..
            } => engine.add_index(*table_id, index.clone(), SUPPRESS).await,
            Action::UpdateIndex {
                table_id,
                index_id,
                reverse,
                ..
            } => {
                engine
                    .update_index(*table_id, *index_id, reverse.clone(), SUPPRESS)
                    .await
            }
            Action::AddRelationships {
                relationship_ids, ..
            } => {
                engine
                    .remove_relationships(relationship_ids.clone(), SUPPRESS)
                    .await
            }
            Action::UpdateRelationship {
                relationship_id,
                reverse,
                ..
            } => {
                engine
                    .update_relationship(*relationship_id, reverse.clone(), SUPPRESS)
                    .await
            }
            Action::RemoveRelationships { relationships, .. } => {
                engine
                    .add_relationships(relationships.clone(), SUPPRESS)
                    .await
            }
            Action::AddDependencies { dependency_ids, .. } => {
                engine
                    .remove_dependencies(dependency_ids.clone(), SUPPRESS)
                    .await
            }
            Action::UpdateDependency {
                dependency_id,
                reverse,
                ..
            } => {
                engine
                    .update_dependency(*dependency_id, reverse.clone(), SUPPRESS)
                    .await
            }
            Action::RemoveDependencies { dependencies, .. } => {
                engine.add_dependencies(dependencies.clone(), SUPPRESS).await
            }
        }
    }
}
