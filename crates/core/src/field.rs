//! Table column model and its partial-update patch.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::types::{EntityId, Timestamp};

/// A column on a [`Table`](crate::table::Table).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub id: EntityId,
    pub name: String,
    /// Dialect-specific type name, e.g. `"bigint"` or `"varchar(255)"`.
    pub data_type: String,
    pub primary_key: bool,
    pub unique: bool,
    pub nullable: bool,
    pub created_at: Timestamp,
}

impl Field {
    /// Create a nullable, non-key field with a fresh id.
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            id: EntityId::new_v4(),
            name: name.into(),
            data_type: data_type.into(),
            primary_key: false,
            unique: false,
            nullable: true,
            created_at: Utc::now(),
        }
    }
}

/// Partial update for a [`Field`]. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldPatch {
    pub name: Option<String>,
    pub data_type: Option<String>,
    pub primary_key: Option<bool>,
    pub unique: Option<bool>,
    pub nullable: Option<bool>,
}

impl FieldPatch {
    /// Set every `Some` field on `target`.
    pub fn apply(&self, target: &mut Field) {
        if let Some(name) = &self.name {
            target.name = name.clone();
        }
        if let Some(data_type) = &self.data_type {
            target.data_type = data_type.clone();
        }
        if let Some(primary_key) = self.primary_key {
            target.primary_key = primary_key;
        }
        if let Some(unique) = self.unique {
            target.unique = unique;
        }
        if let Some(nullable) = self.nullable {
            target.nullable = nullable;
        }
    }

    /// Capture the inverse of this patch against `current`.
    ///
    /// Must be called before [`apply`](Self::apply): the returned patch holds
    /// the current value of every field this patch is about to overwrite.
    pub fn reverse(&self, current: &Field) -> Self {
        Self {
            name: self.name.as_ref().map(|_| current.name.clone()),
            data_type: self.data_type.as_ref().map(|_| current.data_type.clone()),
            primary_key: self.primary_key.map(|_| current.primary_key),
            unique: self.unique.map(|_| current.unique),
            nullable: self.nullable.map(|_| current.nullable),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.data_type.is_none()
            && self.primary_key.is_none()
            && self.unique.is_none()
            && self.nullable.is_none()
    }
}
