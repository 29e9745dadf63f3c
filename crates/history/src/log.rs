//! Shared history log: the undo/redo stack pair.
//!
//! [`HistoryLog`] is shared via `Arc` between the mutation engine (which
//! records new actions) and the history controller (which moves records
//! between the two stacks during undo/redo). The interior mutex only
//! protects stack integrity; callers are expected to serialize
//! `record`/`undo`/`redo` themselves, since the document has exactly one
//! writer.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::action::Action;
use crate::stack::ActionStack;

#[derive(Debug, Default)]
struct LogInner {
    undo: ActionStack,
    redo: ActionStack,
}

/// The undo and redo stacks of one editing session.
#[derive(Debug, Default)]
pub struct HistoryLog {
    inner: Mutex<LogInner>,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a freshly captured action.
    ///
    /// Pushes onto the undo stack and clears the redo stack: recording a new
    /// forward action forks history and discards the alternate future.
    pub async fn record(&self, action: Action) {
        let mut inner = self.inner.lock().await;
        tracing::debug!(action = action.name(), "recording action");
        inner.undo.push(Arc::new(action));
        inner.redo.clear();
    }

    /// Pop the most recent not-yet-undone action.
    pub async fn pop_undo(&self) -> Option<Arc<Action>> {
        self.inner.lock().await.undo.pop()
    }

    /// Pop the most recently undone action.
    pub async fn pop_redo(&self) -> Option<Arc<Action>> {
        self.inner.lock().await.redo.pop()
    }

    /// Re-file a record onto the undo stack (during redo). Does not touch
    /// the redo stack.
    pub async fn push_undo(&self, action: Arc<Action>) {
        self.inner.lock().await.undo.push(action);
    }

    /// Re-file a record onto the redo stack (during undo).
    pub async fn push_redo(&self, action: Arc<Action>) {
        self.inner.lock().await.redo.push(action);
    }

    pub async fn has_undo(&self) -> bool {
        !self.inner.lock().await.undo.is_empty()
    }

    pub async fn has_redo(&self) -> bool {
        !self.inner.lock().await.redo.is_empty()
    }

    pub async fn undo_depth(&self) -> usize {
        self.inner.lock().await.undo.len()
    }

    pub async fn redo_depth(&self) -> usize {
        self.inner.lock().await.redo.len()
    }

    /// Drop both histories (e.g. after loading a different document).
    pub async fn clear(&self) {
        let mut inner = self.inner.lock().await;
        inner.undo.clear();
        inner.redo.clear();
    }
}
