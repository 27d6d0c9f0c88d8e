//! Core types used throughout schemaloader
//!
//! This module contains the dialect-independent vocabulary shared by the
//! model descriptors, the schema assembler and the dialect renderers.

use crate::error::{EngineError, EngineResult};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

// ============================================================================
// Data Types
// ============================================================================

/// Semantic column types
///
/// Each dialect maps these onto its own type names. A dialect that has no
/// mapping for a type rejects it at render time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    /// 16-bit signed integer
    SmallInt,
    /// 32-bit signed integer
    Integer,
    /// 64-bit signed integer
    BigInt,
    /// 32-bit floating point
    Float,
    /// 64-bit floating point
    Double,
    /// Exact numeric with precision and scale
    Decimal { precision: u8, scale: u8 },
    /// Boolean true/false
    Boolean,
    /// Bounded string
    Varchar(u32),
    /// Unbounded text
    Text,
    /// UUID
    Uuid,
    /// Date without time
    Date,
    /// Time without date
    Time,
    /// Date and time without zone
    Timestamp,
    /// Date and time with zone
    TimestampTz,
    /// Binary data
    Binary,
    /// JSON document
    Json,
    /// Time span
    Interval,
    /// Array of another type
    Array(Box<DataType>),
}

impl DataType {
    /// Default bounded string
    pub fn string() -> Self {
        DataType::Varchar(255)
    }

    /// Check if this is an integer type (eligible for auto-increment)
    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            DataType::SmallInt | DataType::Integer | DataType::BigInt
        )
    }

    /// Check if this is an array type
    pub fn is_array(&self) -> bool {
        matches!(self, DataType::Array(_))
    }
}

impl Default for DataType {
    fn default() -> Self {
        DataType::string()
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataType::SmallInt => write!(f, "smallint"),
            DataType::Integer => write!(f, "integer"),
            DataType::BigInt => write!(f, "bigint"),
            DataType::Float => write!(f, "float"),
            DataType::Double => write!(f, "double"),
            DataType::Decimal { precision, scale } => write!(f, "decimal({precision},{scale})"),
            DataType::Boolean => write!(f, "boolean"),
            DataType::Varchar(len) => write!(f, "varchar({len})"),
            DataType::Text => write!(f, "text"),
            DataType::Uuid => write!(f, "uuid"),
            DataType::Date => write!(f, "date"),
            DataType::Time => write!(f, "time"),
            DataType::Timestamp => write!(f, "timestamp"),
            DataType::TimestampTz => write!(f, "timestamptz"),
            DataType::Binary => write!(f, "binary"),
            DataType::Json => write!(f, "json"),
            DataType::Interval => write!(f, "interval"),
            DataType::Array(inner) => write!(f, "array<{inner}>"),
        }
    }
}

// ============================================================================
// Dialects
// ============================================================================

/// Supported SQL dialects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    #[default]
    Postgres,
    Mysql,
    Sqlite,
    Mssql,
    Oracle,
}

impl Dialect {
    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            Dialect::Postgres => "PostgreSQL",
            Dialect::Mysql => "MySQL",
            Dialect::Sqlite => "SQLite",
            Dialect::Mssql => "SQL Server",
            Dialect::Oracle => "Oracle",
        }
    }

    /// Selector string accepted by [`Dialect::from_str`]
    pub fn as_str(&self) -> &'static str {
        match self {
            Dialect::Postgres => "postgres",
            Dialect::Mysql => "mysql",
            Dialect::Sqlite => "sqlite",
            Dialect::Mssql => "mssql",
            Dialect::Oracle => "oracle",
        }
    }

    /// Statement terminator used when no delimiter is configured
    pub fn default_delimiter(&self) -> &'static str {
        ";"
    }

    /// Get all dialects
    pub fn all() -> &'static [Dialect] {
        &[
            Dialect::Postgres,
            Dialect::Mysql,
            Dialect::Sqlite,
            Dialect::Mssql,
            Dialect::Oracle,
        ]
    }
}

impl FromStr for Dialect {
    type Err = EngineError;

    fn from_str(s: &str) -> EngineResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Dialect::Postgres),
            "mysql" => Ok(Dialect::Mysql),
            "sqlite" | "sqlite3" => Ok(Dialect::Sqlite),
            "mssql" | "sqlserver" => Ok(Dialect::Mssql),
            "oracle" => Ok(Dialect::Oracle),
            _ => Err(EngineError::UnsupportedDialect(s.to_string())),
        }
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

// ============================================================================
// Relation Kinds
// ============================================================================

/// Kind of a relationship annotation on a model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    /// Many rows of this model point at one target row; this model holds
    /// the foreign key (the one-to-many relationship seen from the "many" side)
    BelongsTo,
    /// Inverse of `BelongsTo`; carries no columns of its own
    HasMany,
    /// Many-to-many through a join table
    ManyToMany,
}

impl RelationKind {
    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            RelationKind::BelongsTo => "belongs-to",
            RelationKind::HasMany => "has-many",
            RelationKind::ManyToMany => "m2m",
        }
    }

    /// Check if this relationship requires a join table
    pub fn requires_join_table(&self) -> bool {
        matches!(self, RelationKind::ManyToMany)
    }
}

impl std::fmt::Display for RelationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

// ============================================================================
// Referential Actions
// ============================================================================

/// Actions for foreign key constraints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferentialAction {
    /// Delete related records when parent is deleted
    Cascade,
    /// Set foreign key to NULL when parent is deleted
    SetNull,
    /// Prevent deletion if related records exist
    Restrict,
    /// Do nothing (database default)
    NoAction,
    /// Set to default value
    SetDefault,
}

impl ReferentialAction {
    /// Get SQL keyword
    pub fn to_sql(&self) -> &'static str {
        match self {
            ReferentialAction::Cascade => "CASCADE",
            ReferentialAction::SetNull => "SET NULL",
            ReferentialAction::Restrict => "RESTRICT",
            ReferentialAction::NoAction => "NO ACTION",
            ReferentialAction::SetDefault => "SET DEFAULT",
        }
    }
}

impl std::fmt::Display for ReferentialAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_sql())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dialect_from_str() {
        assert_eq!("postgres".parse::<Dialect>().unwrap(), Dialect::Postgres);
        assert_eq!("PostgreSQL".parse::<Dialect>().unwrap(), Dialect::Postgres);
        assert_eq!("mssql".parse::<Dialect>().unwrap(), Dialect::Mssql);
        assert_eq!("sqlite3".parse::<Dialect>().unwrap(), Dialect::Sqlite);

        let err = "db2".parse::<Dialect>().unwrap_err();
        assert!(matches!(err, EngineError::UnsupportedDialect(name) if name == "db2"));
    }

    #[test]
    fn test_dialect_round_trip_selector() {
        for dialect in Dialect::all() {
            assert_eq!(dialect.as_str().parse::<Dialect>().unwrap(), *dialect);
        }
    }

    #[test]
    fn test_data_type_display() {
        assert_eq!(DataType::BigInt.to_string(), "bigint");
        assert_eq!(DataType::Varchar(64).to_string(), "varchar(64)");
        assert_eq!(
            DataType::Decimal {
                precision: 10,
                scale: 2
            }
            .to_string(),
            "decimal(10,2)"
        );
        assert_eq!(
            DataType::Array(Box::new(DataType::Integer)).to_string(),
            "array<integer>"
        );
    }

    #[test]
    fn test_data_type_serde() {
        let ty: DataType = serde_json::from_str("\"bigint\"").unwrap();
        assert_eq!(ty, DataType::BigInt);

        let ty: DataType = serde_json::from_str("{\"varchar\": 64}").unwrap();
        assert_eq!(ty, DataType::Varchar(64));

        let ty: DataType =
            serde_json::from_str("{\"decimal\": {\"precision\": 12, \"scale\": 4}}").unwrap();
        assert_eq!(
            ty,
            DataType::Decimal {
                precision: 12,
                scale: 4
            }
        );
    }

    #[test]
    fn test_integer_types() {
        assert!(DataType::SmallInt.is_integer());
        assert!(DataType::BigInt.is_integer());
        assert!(!DataType::Uuid.is_integer());
        assert!(!DataType::Double.is_integer());
    }

    #[test]
    fn test_relation_kind() {
        assert!(RelationKind::ManyToMany.requires_join_table());
        assert!(!RelationKind::BelongsTo.requires_join_table());
        assert_eq!(RelationKind::BelongsTo.to_string(), "belongs-to");
    }

    #[test]
    fn test_referential_action_sql() {
        assert_eq!(ReferentialAction::SetNull.to_sql(), "SET NULL");
        assert_eq!(ReferentialAction::NoAction.to_string(), "NO ACTION");
    }
}
