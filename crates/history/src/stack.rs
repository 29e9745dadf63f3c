//! Capacity-bounded LIFO stack of action records.

use std::collections::VecDeque;
use std::sync::Arc;

use crate::action::Action;

/// Maximum number of records held per stack.
///
/// When a push would exceed the bound, the oldest record (the bottom of the
/// stack) is dropped. Losing the far end of the history only shortens how
/// far back undo can reach; it never affects the correctness of the entries
/// that remain.
pub const MAX_STACK_DEPTH: usize = 500;

/// LIFO stack of immutable action records.
///
/// Records are shared via `Arc` so a popped record can be re-filed onto the
/// opposite stack verbatim, without cloning its payloads.
#[derive(Debug, Default)]
pub struct ActionStack {
    entries: VecDeque<Arc<Action>>,
}

impl ActionStack {
    pub fn new() -> Self {
        Self {
            entries: VecDeque::new(),
        }
    }

    /// Push a record, evicting the oldest entry if the stack is full.
    pub fn push(&mut self, action: Arc<Action>) {
        if self.entries.len() == MAX_STACK_DEPTH {
            self.entries.pop_front();
        }
        self.entries.push_back(action);
    }

    /// Pop the most recent record, or `None` if the stack is empty.
    pub fn pop(&mut self) -> Option<Arc<Action>> {
        self.entries.pop_back()
    }

    /// Most recent record without removing it.
    pub fn peek(&self) -> Option<&Arc<Action>> {
        self.entries.back()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
