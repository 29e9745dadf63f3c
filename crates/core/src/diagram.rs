//! The schema diagram document: tables plus the relationship and dependency
//! edges between them, with the cascade queries the history engine relies on.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::dependency::Dependency;
use crate::error::CoreError;
use crate::relationship::Relationship;
use crate::table::Table;
use crate::types::{EntityId, Timestamp};

/// Maximum allowed length for a diagram name.
pub const MAX_DIAGRAM_NAME_LENGTH: usize = 100;

/// Validate a diagram name: must be non-empty, trimmed, and within
/// [`MAX_DIAGRAM_NAME_LENGTH`].
pub fn validate_diagram_name(name: &str) -> Result<(), CoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(
            "Diagram name must not be empty".to_string(),
        ));
    }
    if trimmed.len() != name.len() {
        return Err(CoreError::Validation(
            "Diagram name must not have leading or trailing whitespace".to_string(),
        ));
    }
    if name.len() > MAX_DIAGRAM_NAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "Diagram name must not exceed {MAX_DIAGRAM_NAME_LENGTH} characters, got {}",
            name.len()
        )));
    }
    Ok(())
}

/// The in-memory schema document for one editing session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagram {
    pub id: EntityId,
    pub name: String,
    pub tables: Vec<Table>,
    pub relationships: Vec<Relationship>,
    pub dependencies: Vec<Dependency>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Diagram {
    /// Create an empty diagram with a fresh id.
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: EntityId::new_v4(),
            name: name.into(),
            tables: Vec::new(),
            relationships: Vec::new(),
            dependencies: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    // -- Lookups --------------------------------------------------------

    pub fn table(&self, table_id: EntityId) -> Option<&Table> {
        self.tables.iter().find(|t| t.id == table_id)
    }

    pub fn table_mut(&mut self, table_id: EntityId) -> Option<&mut Table> {
        self.tables.iter_mut().find(|t| t.id == table_id)
    }

    pub fn relationship(&self, relationship_id: EntityId) -> Option<&Relationship> {
        self.relationships.iter().find(|r| r.id == relationship_id)
    }

    pub fn relationship_mut(&mut self, relationship_id: EntityId) -> Option<&mut Relationship> {
        self.relationships
            .iter_mut()
            .find(|r| r.id == relationship_id)
    }

    pub fn dependency(&self, dependency_id: EntityId) -> Option<&Dependency> {
        self.dependencies.iter().find(|d| d.id == dependency_id)
    }

    pub fn dependency_mut(&mut self, dependency_id: EntityId) -> Option<&mut Dependency> {
        self.dependencies.iter_mut().find(|d| d.id == dependency_id)
    }

    // -- Cascade queries --------------------------------------------------

    /// Every relationship with an endpoint in `table_ids`, cloned.
    ///
    /// This is the relationship half of a deletion cascade: when the given
    /// tables are removed, exactly these edges must be removed (and captured
    /// for a later restore).
    pub fn relationships_referencing(&self, table_ids: &[EntityId]) -> Vec<Relationship> {
        self.relationships
            .iter()
            .filter(|r| r.references_any(table_ids))
            .cloned()
            .collect()
    }

    /// Every dependency with an endpoint in `table_ids`, cloned.
    pub fn dependencies_referencing(&self, table_ids: &[EntityId]) -> Vec<Dependency> {
        self.dependencies
            .iter()
            .filter(|d| d.references_any(table_ids))
            .cloned()
            .collect()
    }

    /// Refresh `updated_at`. Called by the mutation engine after every
    /// applied change.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
