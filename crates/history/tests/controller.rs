//! Controller behaviour against a stub mutation engine.
//!
//! The stub stands in for the document owner so these tests can exercise
//! failure propagation and stack discipline without a real document:
//! engine failures must fail the whole undo/redo call while the record
//! stays on its destination stack, ready for a retry.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use assert_matches::assert_matches;
use async_trait::async_trait;

use schemamap_core::{
    CoreError, Dependency, DependencyPatch, EntityId, Field, FieldPatch, Index, IndexPatch,
    Relationship, RelationshipPatch, Table, TablePatch,
};
use schemamap_history::{
    Action, HistoryController, HistoryLog, HistoryPolicy, MutationEngine, TableSetSnapshot,
};

/// Engine stub: every mutation succeeds or fails according to two switches,
/// and calls are counted.
#[derive(Default)]
struct StubEngine {
    fail_all: AtomicBool,
    fail_relationships: AtomicBool,
    calls: AtomicUsize,
}

impl StubEngine {
    fn outcome(&self) -> Result<(), CoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_all.load(Ordering::SeqCst) {
            Err(CoreError::Internal("storage unreachable".to_string()))
        } else {
            Ok(())
        }
    }

    fn relationship_outcome(&self) -> Result<(), CoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_all.load(Ordering::SeqCst) || self.fail_relationships.load(Ordering::SeqCst) {
            Err(CoreError::Internal("storage unreachable".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl MutationEngine for StubEngine {
    async fn update_diagram_name(&self, _: String, _: HistoryPolicy) -> Result<(), CoreError> {
        self.outcome()
    }
    async fn add_tables(&self, _: Vec<Table>, _: HistoryPolicy) -> Result<(), CoreError> {
        self.outcome()
    }
    async fn remove_tables(&self, _: Vec<EntityId>, _: HistoryPolicy) -> Result<(), CoreError> {
        self.outcome()
    }
    async fn update_table(
        &self,
        _: EntityId,
        _: TablePatch,
        _: HistoryPolicy,
    ) -> Result<(), CoreError> {
        self.outcome()
    }
    async fn replace_tables(&self, _: Vec<Table>, _: HistoryPolicy) -> Result<(), CoreError> {
        self.outcome()
    }
    async fn add_field(
        &self,
        _: EntityId,
        _: Field,
        _: HistoryPolicy,
    ) -> Result<(), CoreError> {
        self.outcome()
    }
    async fn remove_field(
        &self,
        _: EntityId,
        _: EntityId,
        _: HistoryPolicy,
    ) -> Result<(), CoreError> {
        self.outcome()
    }
    async fn update_field(
        &self,
        _: EntityId,
        _: EntityId,
        _: FieldPatch,
        _: HistoryPolicy,
    ) -> Result<(), CoreError> {
        self.outcome()
    }
    async fn add_index(
        &self,
        _: EntityId,
        _: Index,
        _: HistoryPolicy,
    ) -> Result<(), CoreError> {
        self.outcome()
    }
    async fn remove_index(
        &self,
        _: EntityId,
        _: EntityId,
        _: HistoryPolicy,
    ) -> Result<(), CoreError> {
        self.outcome()
    }
    async fn update_index(
        &self,
        _: EntityId,
        _: EntityId,
        _: IndexPatch,
        _: HistoryPolicy,
    ) -> Result<(), CoreError> {
        self.outcome()
    }
    async fn add_relationships(
        &self,
        _: Vec<Relationship>,
        _: HistoryPolicy,
    ) -> Result<(), CoreError> {
        self.relationship_outcome()
    }
    async fn update_relationship(
        &self,
        _: EntityId,
        _: RelationshipPatch,
        _: HistoryPolicy,
    ) -> Result<(), CoreError> {
        self.relationship_outcome()
    }
    async fn remove_relationships(
        &self,
        _: Vec<EntityId>,
        _: HistoryPolicy,
    ) -> Result<(), CoreError> {
        self.relationship_outcome()
    }
    async fn add_dependencies(
        &self,
        _: Vec<Dependency>,
        _: HistoryPolicy,
    ) -> Result<(), CoreError> {
        self.outcome()
    }
    async fn update_dependency(
        &self,
        _: EntityId,
        _: DependencyPatch,
        _: HistoryPolicy,
    ) -> Result<(), CoreError> {
        self.outcome()
    }
    async fn remove_dependencies(
        &self,
        _: Vec<EntityId>,
        _: HistoryPolicy,
    ) -> Result<(), CoreError> {
        self.outcome()
    }
}

fn rename_action() -> Action {
    Action::UpdateDiagramName {
        new_name: "after".to_string(),
        old_name: "before".to_string(),
    }
}

fn stubbed() -> (Arc<StubEngine>, Arc<HistoryLog>, HistoryController) {
    let engine = Arc::new(StubEngine::default());
    let log = Arc::new(HistoryLog::new());
    let controller = HistoryController::new(
        Arc::clone(&engine) as Arc<dyn MutationEngine>,
        Arc::clone(&log),
    );
    (engine, log, controller)
}

// ---------------------------------------------------------------------------
// Test: engine failure propagates and the record stays retryable
// ---------------------------------------------------------------------------

#[tokio::test]
async fn failed_undo_propagates_and_keeps_record_on_redo_stack() {
    let (engine, log, controller) = stubbed();
    log.record(rename_action()).await;
    engine.fail_all.store(true, Ordering::SeqCst);

    let err = controller.undo().await.unwrap_err();
    assert_matches!(err, CoreError::Internal(_));

    // The record moved to the redo stack before the replay and stays there.
    assert!(!controller.has_undo().await);
    assert!(controller.has_redo().await);

    // Once the engine recovers, the same record replays cleanly.
    engine.fail_all.store(false, Ordering::SeqCst);
    controller.redo().await.unwrap();
    assert!(controller.has_undo().await);
    assert!(!controller.has_redo().await);
}

#[tokio::test]
async fn failed_compound_undo_fails_as_a_whole() {
    let (engine, log, controller) = stubbed();
    let table = Table::new("users");
    log.record(Action::RemoveTables {
        table_ids: vec![table.id],
        removed: TableSetSnapshot {
            tables: vec![table],
            relationships: vec![Relationship::new(
                "fk",
                EntityId::new_v4(),
                EntityId::new_v4(),
                EntityId::new_v4(),
                EntityId::new_v4(),
            )],
            dependencies: Vec::new(),
        },
    })
    .await;

    // Only the relationship restore fails; the whole undo must fail.
    engine.fail_relationships.store(true, Ordering::SeqCst);
    let err = controller.undo().await.unwrap_err();
    assert_matches!(err, CoreError::Internal(_));
    assert!(controller.has_redo().await);
}

// ---------------------------------------------------------------------------
// Test: replay always goes through the suppressed path
// ---------------------------------------------------------------------------

#[tokio::test]
async fn undo_then_redo_never_grows_history() {
    let (_engine, log, controller) = stubbed();
    log.record(rename_action()).await;

    for _ in 0..5 {
        controller.undo().await.unwrap();
        controller.redo().await.unwrap();
    }

    // Five round trips later there is still exactly one record.
    assert_eq!(log.undo_depth().await, 1);
    assert_eq!(log.redo_depth().await, 0);
}

#[tokio::test]
async fn empty_stacks_do_not_touch_the_engine() {
    let (engine, _log, controller) = stubbed();

    controller.undo().await.unwrap();
    controller.redo().await.unwrap();

    assert_eq!(engine.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn compound_undo_issues_all_constituent_calls() {
    let (engine, log, controller) = stubbed();
    let table = Table::new("users");
    log.record(Action::RemoveTables {
        table_ids: vec![table.id],
        removed: TableSetSnapshot {
            tables: vec![table],
            relationships: Vec::new(),
            dependencies: Vec::new(),
        },
    })
    .await;

    controller.undo().await.unwrap();

    // Tables, relationships, and dependencies are restored by three
    // distinct engine calls, even when some payload halves are empty.
    assert_eq!(engine.calls.load(Ordering::SeqCst), 3);
}
