//! Relationship annotations between models
//!
//! This module contains the `Relation` struct. Relations are produced by the
//! introspection layer alongside the columns and describe how one model
//! reaches another: through a foreign key it holds (`BelongsTo`), through a
//! foreign key the target holds (`HasMany`), or through a join table
//! (`ManyToMany`).

use crate::naming;
use schemaloader_core::{ReferentialAction, RelationKind};
use serde::{Deserialize, Serialize};

// ============================================================================
// Relation
// ============================================================================

/// A relationship annotation declared on a model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation {
    /// Field name on the declaring model (e.g. "author", "items")
    pub name: String,

    /// Kind of relationship
    pub kind: RelationKind,

    /// Name of the target model (e.g. "User")
    pub target: String,

    /// Local foreign key columns (`BelongsTo` only); defaults to `<target>_id`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<String>,

    /// Referenced columns on the target; defaults to the target's primary key
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<String>,

    /// Explicit join table for `ManyToMany`, matched against model or table names
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub through: Option<String>,

    /// Referential action on delete
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_delete: Option<ReferentialAction>,

    /// Referential action on update
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_update: Option<ReferentialAction>,
}

impl Relation {
    /// Create a new relation of the given kind
    pub fn new(name: impl Into<String>, kind: RelationKind, target: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            target: target.into(),
            columns: Vec::new(),
            references: Vec::new(),
            through: None,
            on_delete: None,
            on_update: None,
        }
    }

    /// The declaring model holds a foreign key to `target`
    pub fn belongs_to(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self::new(name, RelationKind::BelongsTo, target)
    }

    /// `target` holds a foreign key to the declaring model
    pub fn has_many(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self::new(name, RelationKind::HasMany, target)
    }

    /// Many-to-many through a join table
    pub fn many_to_many(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self::new(name, RelationKind::ManyToMany, target)
    }

    // ========================================================================
    // Builder methods
    // ========================================================================

    /// Set the local foreign key columns
    pub fn with_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Set the referenced columns on the target
    pub fn referencing<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.references = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Name the join table explicitly
    pub fn through(mut self, join: impl Into<String>) -> Self {
        self.through = Some(join.into());
        self
    }

    /// Set the on delete action
    pub fn on_delete(mut self, action: ReferentialAction) -> Self {
        self.on_delete = Some(action);
        self
    }

    /// Set the on update action
    pub fn on_update(mut self, action: ReferentialAction) -> Self {
        self.on_update = Some(action);
        self
    }

    // ========================================================================
    // Query methods
    // ========================================================================

    /// Check if this is a belongs-to relation
    pub fn is_belongs_to(&self) -> bool {
        self.kind == RelationKind::BelongsTo
    }

    /// Check if this is a many-to-many relation
    pub fn is_many_to_many(&self) -> bool {
        self.kind.requires_join_table()
    }

    /// Local foreign key columns, falling back to `<target>_id`
    pub fn local_columns(&self) -> Vec<String> {
        if self.columns.is_empty() {
            vec![naming::fk_column_name(&self.target)]
        } else {
            self.columns.clone()
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
