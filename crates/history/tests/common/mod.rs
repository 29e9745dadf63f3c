//! Shared fixtures for the history integration tests.

use std::sync::Arc;

use schemamap_core::{Diagram, Field, Table};
use schemamap_history::{HistoryController, HistoryLog, InMemoryEngine, MutationEngine};

/// One wired editing session: a document-owning engine and the history
/// controller driving it, sharing a single log.
pub struct Session {
    pub engine: Arc<InMemoryEngine>,
    pub history: HistoryController,
}

/// Build a session over an empty diagram named `"test"`.
pub fn session() -> Session {
    let log = Arc::new(HistoryLog::new());
    let engine = Arc::new(InMemoryEngine::new(
        Diagram::new("test"),
        Arc::clone(&log),
    ));
    let history = HistoryController::new(
        Arc::clone(&engine) as Arc<dyn MutationEngine>,
        log,
    );
    Session { engine, history }
}

/// A table with a single `id bigint` primary-key field.
pub fn table_with_pk(name: &str) -> Table {
    let mut table = Table::new(name);
    let mut field = Field::new("id", "bigint");
    field.primary_key = true;
    field.nullable = false;
    table.fields.push(field);
    table
}

/// Entity-set equality, ignoring the `updated_at` bookkeeping timestamp.
///
/// Collections are compared as sets ordered by id: restores append at the
/// end of their collection, so positional order is not part of the
/// document's meaning.
pub fn same_content(a: &Diagram, b: &Diagram) -> bool {
    fn canonical(d: &Diagram) -> Diagram {
        let mut d = d.clone();
        d.tables.sort_by_key(|t| t.id);
        d.relationships.sort_by_key(|r| r.id);
        d.dependencies.sort_by_key(|dep| dep.id);
        d
    }

    let (a, b) = (canonical(a), canonical(b));
    a.name == b.name
        && a.tables == b.tables
        && a.relationships == b.relationships
        && a.dependencies == b.dependencies
}
