//! Error types for schemaloader
//!
//! Every failure of a `load` call is reported as a single [`EngineError`].
//! Resolution and rendering errors are never downgraded to warnings.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for schemaloader
#[derive(Debug, Error)]
pub enum EngineError {
    // ========================================================================
    // Relationship Resolution Errors
    // ========================================================================
    /// More than one join descriptor connects the same many-to-many pair
    #[error(
        "Ambiguous join table between '{left}' and '{right}': candidates {}",
        candidates.join(", ")
    )]
    AmbiguousJoinTable {
        left: String,
        right: String,
        candidates: Vec<String>,
    },

    /// An explicit join-table override does not match a supplied many-to-many pair
    #[error("Invalid join table override '{model}': {reason}")]
    InvalidJoinTableOverride { model: String, reason: String },

    /// A relationship that cannot be resolved against the supplied models
    #[error("Unresolved relationship from '{model}' to '{target}': {reason}")]
    UnresolvedRelationship {
        model: String,
        target: String,
        reason: String,
    },

    // ========================================================================
    // Schema Assembly Errors
    // ========================================================================
    /// Foreign keys form a cycle that cannot be linearized
    #[error("Cyclic foreign key dependency between tables: {}", tables.join(", "))]
    CyclicSchema { tables: Vec<String> },

    /// Two models map to the same table name
    #[error("Duplicate table name: '{0}' already exists")]
    DuplicateTable(String),

    /// The introspection collaborator produced an unusable descriptor
    #[error("Failed to extract descriptor for '{model}': {message}")]
    DescriptorExtractionFailed { model: String, message: String },

    // ========================================================================
    // Rendering Errors
    // ========================================================================
    /// Unknown dialect selector
    #[error("Unsupported dialect: '{0}'")]
    UnsupportedDialect(String),

    /// The dialect cannot express a column's semantic type
    #[error("Unsupported column type {data_type} for '{table}.{column}' in {dialect}")]
    UnsupportedColumnType {
        dialect: String,
        table: String,
        column: String,
        data_type: String,
    },

    // ========================================================================
    // IO Errors
    // ========================================================================
    /// File read error
    #[error("Failed to read file '{path}': {message}")]
    FileRead { path: PathBuf, message: String },

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// TOML configuration could not be parsed
    #[error("Invalid configuration file: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ========================================================================
    // Generic Errors
    // ========================================================================
    /// Internal error (should not happen)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl EngineError {
    /// Create an unresolved-relationship error
    pub fn unresolved(
        model: impl Into<String>,
        target: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        EngineError::UnresolvedRelationship {
            model: model.into(),
            target: target.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid-override error
    pub fn invalid_override(model: impl Into<String>, reason: impl Into<String>) -> Self {
        EngineError::InvalidJoinTableOverride {
            model: model.into(),
            reason: reason.into(),
        }
    }

    /// Create a descriptor extraction error
    pub fn extraction(model: impl Into<String>, msg: impl Into<String>) -> Self {
        EngineError::DescriptorExtractionFailed {
            model: model.into(),
            message: msg.into(),
        }
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        EngineError::Internal(msg.into())
    }

    /// Check if this error came out of relationship resolution or assembly
    pub fn is_resolution(&self) -> bool {
        matches!(
            self,
            EngineError::AmbiguousJoinTable { .. }
                | EngineError::InvalidJoinTableOverride { .. }
                | EngineError::UnresolvedRelationship { .. }
                | EngineError::CyclicSchema { .. }
                | EngineError::DuplicateTable(_)
        )
    }

    /// Check if this error came out of a dialect renderer
    pub fn is_render(&self) -> bool {
        matches!(
            self,
            EngineError::UnsupportedDialect(_) | EngineError::UnsupportedColumnType { .. }
        )
    }

    /// Check if this is a file read error
    pub fn is_io(&self) -> bool {
        matches!(self, EngineError::FileRead { .. })
    }
}

/// Result type alias using EngineError
pub type EngineResult<T> = Result<T, EngineError>;

// ============================================================================
// Tests
// ============================================================================
