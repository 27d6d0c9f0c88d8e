//! Loader configuration
//!
//! A `LoaderConfig` is a plain snapshot of every option the loader honors.
//! It can be built in code, or read from a TOML file:
//!
//! ```toml
//! dialect = "mssql"
//! delimiter = "\nGO"
//! ordering = "name"
//! join_tables = ["OrderToItem"]
//! ```

use schemaloader_core::{Dialect, EngineError, EngineResult, Validatable};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// ============================================================================
// TableOrdering
// ============================================================================

/// Tie-break rule for tables with no dependency between them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableOrdering {
    /// Ascending table name; output is independent of supply order
    #[default]
    Name,
    /// Order in which the models were supplied; synthesized join tables last
    Supply,
}

impl std::str::FromStr for TableOrdering {
    type Err = EngineError;

    fn from_str(s: &str) -> EngineResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(TableOrdering::Name),
            "supply" => Ok(TableOrdering::Supply),
            other => Err(EngineError::InvalidConfig(format!(
                "unknown table ordering '{other}' (expected 'name' or 'supply')"
            ))),
        }
    }
}

// ============================================================================
// LoaderConfig
// ============================================================================

/// Configuration for a [`Loader`](crate::Loader)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Target dialect
    pub dialect: Dialect,

    /// Statement delimiter; the dialect terminator when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delimiter: Option<String>,

    /// Whether identifiers are quoted
    pub quote_identifiers: bool,

    /// Tie-break rule for independent tables
    pub ordering: TableOrdering,

    /// Root that absolute source paths are made relative to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_root: Option<PathBuf>,

    /// Explicit join-table models (deprecated, auto-detection covers these)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub join_tables: Vec<String>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            dialect: Dialect::default(),
            delimiter: None,
            quote_identifiers: true,
            ordering: TableOrdering::default(),
            project_root: None,
            join_tables: Vec::new(),
        }
    }
}

impl LoaderConfig {
    /// Create a configuration for a dialect with default options
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            ..Self::default()
        }
    }

    /// Effective statement delimiter
    pub fn delimiter(&self) -> &str {
        self.delimiter
            .as_deref()
            .unwrap_or_else(|| self.dialect.default_delimiter())
    }

    /// Parse a configuration from TOML text
    pub fn from_toml_str(text: &str) -> EngineResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> EngineResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| EngineError::FileRead {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&text)
    }
}

impl Validatable for LoaderConfig {
    fn validate(&self) -> EngineResult<()> {
        if self.delimiter.as_deref().is_some_and(str::is_empty) {
            return Err(EngineError::InvalidConfig(
                "statement delimiter cannot be empty".to_string(),
            ));
        }

        if let Some(name) = self.join_tables.iter().find(|name| name.trim().is_empty()) {
            return Err(EngineError::InvalidConfig(format!(
                "join table override '{name}' is blank"
            )));
        }

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
