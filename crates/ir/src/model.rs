//! Model descriptors
//!
//! A `ModelDescriptor` is the normalized, dialect-independent description
//! of one model: its table name, ordered columns, relationship annotations
//! and composite unique groups.

use crate::column::Column;
use crate::naming;
use crate::relationship::Relation;
use schemaloader_core::{EngineError, EngineResult, RelationKind, Validatable};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;

// ============================================================================
// ModelDescriptor
// ============================================================================

/// Normalized metadata for one model (maps to a database table)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    /// Model name (PascalCase, e.g. "OrderToItem")
    pub name: String,

    /// Table name; empty means "derive from the model name"
    #[serde(default, rename = "table", skip_serializing_if = "String::is_empty")]
    pub table_name: String,

    /// Ordered columns (order determines emitted column order)
    pub columns: Vec<Column>,

    /// Relationship annotations
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub relations: Vec<Relation>,

    /// Composite unique constraints, each a list of column names
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unique_groups: Vec<Vec<String>>,

    /// Where the model is defined, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<SourcePos>,
}

impl ModelDescriptor {
    /// Create a new descriptor; the table name is derived from the model name
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let table_name = naming::table_name(&name);

        Self {
            name,
            table_name,
            columns: Vec::new(),
            relations: Vec::new(),
            unique_groups: Vec::new(),
            source: None,
        }
    }

    // ========================================================================
    // Builder methods
    // ========================================================================

    /// Set the table name
    pub fn with_table_name(mut self, table_name: impl Into<String>) -> Self {
        self.table_name = table_name.into();
        self
    }

    /// Append a column
    pub fn with_column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    /// Append a relation
    pub fn with_relation(mut self, relation: Relation) -> Self {
        self.relations.push(relation);
        self
    }

    /// Add a composite unique constraint
    pub fn with_unique<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.unique_groups
            .push(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Record where the model is defined
    pub fn defined_at(mut self, file: impl Into<PathBuf>, line: u32) -> Self {
        self.source = Some(SourcePos {
            file: file.into(),
            line,
        });
        self
    }

    /// Fill in derived values (the table name) left empty by the producer
    pub fn normalized(mut self) -> Self {
        if self.table_name.is_empty() {
            self.table_name = naming::table_name(&self.name);
        }
        self
    }

    // ========================================================================
    // Query methods
    // ========================================================================

    /// Get a column by name
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Check if the model has a column
    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Names of the primary key columns, in column order
    pub fn primary_key(&self) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| c.primary_key)
            .map(|c| c.name.clone())
            .collect()
    }

    /// Relations of a given kind
    pub fn relations_of(&self, kind: RelationKind) -> impl Iterator<Item = &Relation> {
        self.relations.iter().filter(move |r| r.kind == kind)
    }

    /// Distinct targets reached by `BelongsTo` relations, in declaration order
    pub fn belongs_to_targets(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.relations_of(RelationKind::BelongsTo)
            .map(|r| r.target.as_str())
            .filter(|t| seen.insert(*t))
            .collect()
    }

    /// Check if this model answers to `name` as either model or table name
    pub fn answers_to(&self, name: &str) -> bool {
        self.name == name || self.table_name == name
    }
}

impl Validatable for ModelDescriptor {
    fn validate(&self) -> EngineResult<()> {
        let fail = |msg: String| Err(EngineError::extraction(&self.name, msg));

        if self.name.is_empty() {
            return Err(EngineError::extraction("<unnamed>", "model name cannot be empty"));
        }

        if self.table_name.is_empty() {
            return fail("table name cannot be empty".to_string());
        }

        if self.columns.is_empty() {
            return fail("model has no columns".to_string());
        }

        let mut seen: HashSet<&str> = HashSet::new();
        for column in &self.columns {
            if column.name.is_empty() {
                return fail("column name cannot be empty".to_string());
            }
            if !seen.insert(column.name.as_str()) {
                return fail(format!("duplicate column '{}'", column.name));
            }
            if column.primary_key && column.nullable {
                return fail(format!(
                    "primary key column '{}' cannot be nullable",
                    column.name
                ));
            }
            if column.auto_increment && column.default.is_some() {
                return fail(format!(
                    "auto-increment column '{}' cannot have a default",
                    column.name
                ));
            }
        }

        for group in &self.unique_groups {
            if group.is_empty() {
                return fail("unique constraint has no columns".to_string());
            }
            if let Some(missing) = group.iter().find(|c| !self.has_column(c)) {
                return fail(format!("unique constraint names unknown column '{missing}'"));
            }
        }

        for relation in &self.relations {
            if relation.name.is_empty() || relation.target.is_empty() {
                return fail("relation must have a name and a target".to_string());
            }
            match relation.kind {
                RelationKind::BelongsTo => {
                    if !relation.references.is_empty()
                        && relation.references.len() != relation.local_columns().len()
                    {
                        return fail(format!(
                            "relation '{}' maps {} columns onto {} referenced columns",
                            relation.name,
                            relation.local_columns().len(),
                            relation.references.len()
                        ));
                    }
                }
                RelationKind::HasMany | RelationKind::ManyToMany => {
                    if !relation.columns.is_empty() {
                        return fail(format!(
                            "{} relation '{}' cannot declare local columns",
                            relation.kind, relation.name
                        ));
                    }
                }
            }
        }

        Ok(())
    }
}

// ============================================================================
// SourcePos
// ============================================================================

/// Location of a model definition
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourcePos {
    /// File the model is defined in (absolute or relative)
    pub file: PathBuf,

    /// 1-based line number
    pub line: u32,
}

impl std::fmt::Display for SourcePos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.file.display(), self.line)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::DefaultValue;
    use pretty_assertions::assert_eq;
    use schemaloader_core::DataType;

    fn story() -> ModelDescriptor {
        ModelDescriptor::new("Story")
            .with_column(Column::id())
            .with_column(Column::new("title", DataType::string()))
            .with_column(Column::new("author_id", DataType::BigInt))
            .with_relation(Relation::belongs_to("author", "User").with_columns(["author_id"]))
    }

    #[test]
    fn test_model_new() {
        let model = ModelDescriptor::new("Story");
        assert_eq!(model.name, "Story");
        assert_eq!(model.table_name, "stories");
        assert!(model.columns.is_empty());
    }

    #[test]
    fn test_primary_key() {
        let model = story();
        assert_eq!(model.primary_key(), vec!["id".to_string()]);
        assert!(model.has_column("title"));
        assert!(!model.has_column("body"));
    }

    #[test]
    fn test_belongs_to_targets_dedup() {
        let model = ModelDescriptor::new("Edge")
            .with_column(Column::new("from_id", DataType::BigInt))
            .with_column(Column::new("to_id", DataType::BigInt))
            .with_relation(Relation::belongs_to("from", "Node").with_columns(["from_id"]))
            .with_relation(Relation::belongs_to("to", "Node").with_columns(["to_id"]));
        assert_eq!(model.belongs_to_targets(), vec!["Node"]);
    }

    #[test]
    fn test_normalized_fills_table_name() {
        let mut model = ModelDescriptor::new("OrderToItem");
        model.table_name = String::new();
        let model = model.normalized();
        assert_eq!(model.table_name, "order_to_items");
        assert!(model.answers_to("OrderToItem"));
        assert!(model.answers_to("order_to_items"));
    }

    #[test]
    fn test_validate_ok() {
        assert!(story().validate().is_ok());
    }

    #[test]
    fn test_validate_duplicate_column() {
        let model = story().with_column(Column::new("title", DataType::Text));
        let err = model.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to extract descriptor for 'Story': duplicate column 'title'"
        );
    }

    #[test]
    fn test_validate_auto_increment_with_default() {
        let model = ModelDescriptor::new("Story")
            .with_column(Column::id().with_default(DefaultValue::Int(5)));
        let err = model.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to extract descriptor for 'Story': auto-increment column 'id' cannot have a default"
        );
    }

    #[test]
    fn test_validate_no_columns() {
        assert!(!ModelDescriptor::new("Empty").is_valid());
    }

    #[test]
    fn test_validate_unknown_unique_column() {
        let model = story().with_unique(["title", "slug"]);
        assert!(model.validate().is_err());
    }

    #[test]
    fn test_validate_m2m_with_columns() {
        let model = story().with_relation(
            Relation::many_to_many("tags", "Tag").with_columns(["tag_id"]),
        );
        assert!(model.validate().is_err());
    }

    #[test]
    fn test_source_pos_display() {
        let model = story().defined_at("models/story.rs", 12);
        assert_eq!(
            model.source.map(|s| s.to_string()),
            Some("models/story.rs:12".to_string())
        );
    }
}
