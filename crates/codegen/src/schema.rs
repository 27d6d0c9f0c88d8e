//! # Derived Schema
//!
//! The dialect-agnostic result of schema assembly: an ordered sequence of
//! tables, each with its columns, primary key, foreign keys and unique
//! constraints. Renderers consume it read-only.

use schemaloader_core::{EngineError, EngineResult, ReferentialAction};
use schemaloader_ir::{Column, SourcePos};
use std::collections::HashMap;

// ============================================================================
// ForeignKey
// ============================================================================

/// A foreign key constraint on a table
#[derive(Debug, Clone, PartialEq)]
pub struct ForeignKey {
    /// Columns on the referencing table
    pub columns: Vec<String>,

    /// Referenced table name
    pub ref_table: String,

    /// Referenced columns
    pub ref_columns: Vec<String>,

    /// Referential action on delete
    pub on_delete: Option<ReferentialAction>,

    /// Referential action on update
    pub on_update: Option<ReferentialAction>,
}

// ============================================================================
// UniqueConstraint
// ============================================================================

/// A single- or multi-column unique constraint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniqueConstraint {
    pub columns: Vec<String>,
}

// ============================================================================
// Table
// ============================================================================

/// One table of the derived schema
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// Table name (unique within the schema)
    pub name: String,

    /// Model the table was derived from
    pub model: String,

    /// Ordered columns
    pub columns: Vec<Column>,

    /// Primary key column names
    pub primary_key: Vec<String>,

    /// Foreign key constraints, in declaration order
    pub foreign_keys: Vec<ForeignKey>,

    /// Unique constraints, in declaration order
    pub uniques: Vec<UniqueConstraint>,

    /// For join tables: the two tables it connects
    pub joins: Option<(String, String)>,

    /// Where the model is defined, if known
    pub source: Option<SourcePos>,
}

impl Table {
    /// Get a column by name
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Check if this table realizes a many-to-many relationship
    pub fn is_join(&self) -> bool {
        self.joins.is_some()
    }

    /// Tables this one must be created after (self references excluded)
    pub fn dependencies(&self) -> impl Iterator<Item = &str> {
        self.foreign_keys
            .iter()
            .map(|fk| fk.ref_table.as_str())
            .filter(move |t| *t != self.name)
    }
}

// ============================================================================
// DerivedSchema
// ============================================================================

/// Ordered tables ready for rendering
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DerivedSchema {
    tables: Vec<Table>,
}

impl DerivedSchema {
    /// Wrap already-ordered tables, checking the schema invariants
    pub fn new(tables: Vec<Table>) -> EngineResult<Self> {
        let schema = Self { tables };
        schema.check()?;
        Ok(schema)
    }

    /// All tables in emission order
    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    /// Get a table by name
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }

    /// Table names in emission order
    pub fn table_names(&self) -> Vec<&str> {
        self.tables.iter().map(|t| t.name.as_str()).collect()
    }

    /// Number of tables
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Check if the schema has no tables
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Verify the invariants: unique names, every referenced table present
    /// and emitted earlier, join tables after both sides.
    pub fn check(&self) -> EngineResult<()> {
        let mut positions: HashMap<&str, usize> = HashMap::new();
        for (i, table) in self.tables.iter().enumerate() {
            if positions.insert(table.name.as_str(), i).is_some() {
                return Err(EngineError::DuplicateTable(table.name.clone()));
            }
        }

        for (i, table) in self.tables.iter().enumerate() {
            let joined = table
                .joins
                .iter()
                .flat_map(|(left, right)| [left.as_str(), right.as_str()]);

            for dep in table.dependencies().chain(joined) {
                match positions.get(dep) {
                    None => {
                        return Err(EngineError::internal(format!(
                            "table '{}' references '{}' which is not in the schema",
                            table.name, dep
                        )));
                    }
                    Some(&pos) if pos > i => {
                        return Err(EngineError::internal(format!(
                            "table '{}' is emitted before '{}' which it references",
                            table.name, dep
                        )));
                    }
                    Some(_) => {}
                }
            }
        }

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
