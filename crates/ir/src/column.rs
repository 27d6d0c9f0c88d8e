//! Column definitions for model descriptors
//!
//! This module contains the `Column` struct and the `DefaultValue` type used
//! to describe the ordered columns of a model.

use schemaloader_core::DataType;
use serde::{Deserialize, Serialize};

// ============================================================================
// Column
// ============================================================================

/// One column of a model (maps to a table column)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// Column name (unique within its model)
    pub name: String,

    /// Semantic type of the column
    #[serde(rename = "type")]
    pub data_type: DataType,

    /// Whether NULL is allowed
    #[serde(default)]
    pub nullable: bool,

    /// Whether this column is (part of) the primary key
    #[serde(default)]
    pub primary_key: bool,

    /// Whether the database generates values for this column
    #[serde(default)]
    pub auto_increment: bool,

    /// Whether values must be unique
    #[serde(default)]
    pub unique: bool,

    /// Default value for the column
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<DefaultValue>,
}

impl Column {
    /// Create a new NOT NULL column with the given name and type
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            nullable: false,
            primary_key: false,
            auto_increment: false,
            unique: false,
            default: None,
        }
    }

    /// Create an auto-incrementing `id BIGINT` primary key
    pub fn id() -> Self {
        Self::new("id", DataType::BigInt).primary_key().auto_increment()
    }

    // ========================================================================
    // Builder methods
    // ========================================================================

    /// Allow NULL values
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Mark the column as (part of) the primary key
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self.nullable = false;
        self
    }

    /// Let the database generate values
    pub fn auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self
    }

    /// Mark the column as unique
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Set a default value
    pub fn with_default(mut self, default: DefaultValue) -> Self {
        self.default = Some(default);
        self
    }
}

// ============================================================================
// DefaultValue
// ============================================================================

/// Default values for columns
///
/// Dialects render these as literals; `Now` and `Expression` are rendered
/// as SQL expressions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum DefaultValue {
    /// NULL value
    Null,
    /// Boolean value
    Bool(bool),
    /// Integer value
    Int(i64),
    /// Float value
    Float(f64),
    /// String value
    String(String),
    /// Current timestamp
    Now,
    /// Raw SQL expression, emitted verbatim
    Expression(String),
}

impl DefaultValue {
    /// Quote a string literal with SQL single-quote escaping
    pub fn quoted(value: &str) -> String {
        format!("'{}'", value.replace('\'', "''"))
    }
}

// ============================================================================
// Tests
// ============================================================================
