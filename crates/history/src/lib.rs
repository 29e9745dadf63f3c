//! Reversible command/history engine for the schema diagram document.
//!
//! Every structural mutation to the in-memory document is captured as an
//! [`Action`] pairing a redo payload with the undo payload needed to revert
//! it, recorded onto an undo stack, and replayed through the
//! [`MutationEngine`] seam on undo/redo with history suppressed.
//!
//! Typical wiring:
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use schemamap_core::{Diagram, Table};
//! use schemamap_history::{
//!     HistoryController, HistoryLog, HistoryPolicy, InMemoryEngine, MutationEngine,
//! };
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), schemamap_core::CoreError> {
//! let log = Arc::new(HistoryLog::new());
//! let engine = Arc::new(InMemoryEngine::new(Diagram::new("shop"), Arc::clone(&log)));
//! let history = HistoryController::new(engine.clone(), log);
//!
//! engine
//!     .add_tables(vec![Table::new("users")], HistoryPolicy::Record)
//!     .await?;
//! history.undo().await?;
//! assert!(engine.diagram().await.tables.is_empty());
//! history.redo().await?;
//! assert_eq!(engine.diagram().await.tables.len(), 1);
//! # Ok(())
//! # }
//! ```

pub mod action;
pub mod controller;
pub mod engine;
pub mod log;
pub mod memory;
pub mod stack;

pub use action::{Action, TableSetSnapshot};
pub use controller::HistoryController;
pub use engine::{HistoryPolicy, MutationEngine};
pub use log::HistoryLog;
pub use memory::InMemoryEngine;
pub use stack::{ActionStack, MAX_STACK_DEPTH};
