//! # Loader
//!
//! The entry point of the engine. A `Loader` holds an immutable
//! configuration; every call extracts descriptors afresh and runs
//! resolution, assembly and rendering in turn.
//!
//! ```rust,ignore
//! let loader = Loader::new(Dialect::Mssql).with_stmt_delimiter("\nGO");
//! let sql = loader.load(&[&model::<User>(), &model::<Story>()])?;
//! ```

use crate::assembler;
use crate::config::{LoaderConfig, TableOrdering};
use crate::dialect::{RenderContext, renderer_for};
use crate::resolver;
use crate::schema::DerivedSchema;
use crate::sink::{SqlText, StatementSink};
use schemaloader_core::{Dialect, EngineError, EngineResult, Validatable};
use schemaloader_ir::{ModelDescriptor, ModelSource};
use std::collections::HashSet;
use std::path::PathBuf;
use tracing::{debug, info};

/// Derives `CREATE TABLE` statements from model descriptors
#[derive(Debug, Clone)]
pub struct Loader {
    config: LoaderConfig,
}

impl Loader {
    /// Create a loader for a dialect with default options
    pub fn new(dialect: Dialect) -> Self {
        Self {
            config: LoaderConfig::new(dialect),
        }
    }

    /// Create a loader from a dialect selector such as `"postgres"`
    pub fn from_name(name: &str) -> EngineResult<Self> {
        Ok(Self::new(name.parse()?))
    }

    /// Create a loader from a configuration snapshot
    pub fn from_config(config: LoaderConfig) -> EngineResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    // ========================================================================
    // Builder methods
    // ========================================================================

    /// Set the text written after every statement
    pub fn with_stmt_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.config.delimiter = Some(delimiter.into());
        self
    }

    /// Name a model as the join table of its many-to-many pair
    #[deprecated(note = "join tables are detected automatically; drop this option")]
    pub fn with_join_table(mut self, model: impl Into<String>) -> Self {
        self.config.join_tables.push(model.into());
        self
    }

    /// Set the tie-break rule for independent tables
    pub fn with_table_ordering(mut self, ordering: TableOrdering) -> Self {
        self.config.ordering = ordering;
        self
    }

    /// Set the root that source paths are made relative to
    pub fn with_project_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.config.project_root = Some(root.into());
        self
    }

    /// Emit identifiers without quotes
    pub fn without_identifier_quoting(mut self) -> Self {
        self.config.quote_identifiers = false;
        self
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    pub fn dialect(&self) -> Dialect {
        self.config.dialect
    }

    // ========================================================================
    // Loading
    // ========================================================================

    /// Extract, resolve and assemble without rendering
    pub fn derive(&self, models: &[&dyn ModelSource]) -> EngineResult<DerivedSchema> {
        let descriptors = extract(models)?;
        let resolution = resolver::resolve(&descriptors, &self.config.join_tables)?;
        assembler::assemble(&descriptors, &resolution, self.config.ordering)
    }

    /// Render statement by statement into a sink
    ///
    /// Nothing reaches the sink unless every table renders.
    pub fn load_into(
        &self,
        models: &[&dyn ModelSource],
        sink: &mut dyn StatementSink,
    ) -> EngineResult<usize> {
        self.config.validate()?;
        let schema = self.derive(models)?;
        let ctx = RenderContext {
            quote_identifiers: self.config.quote_identifiers,
            project_root: self.config.project_root.clone(),
        };
        renderer_for(self.config.dialect).render(&schema, &ctx, sink)?;
        Ok(schema.len())
    }

    /// Render the whole script
    pub fn load(&self, models: &[&dyn ModelSource]) -> EngineResult<String> {
        let mut text = SqlText::new(self.config.delimiter());
        let tables = self.load_into(models, &mut text)?;
        info!(dialect = %self.config.dialect, tables, "loaded schema");
        Ok(text.into_string())
    }
}

/// Describe and validate every source; model names must be unique
fn extract(models: &[&dyn ModelSource]) -> EngineResult<Vec<ModelDescriptor>> {
    let mut descriptors = Vec::with_capacity(models.len());
    let mut names = HashSet::new();

    for source in models {
        let descriptor = source.describe()?;
        descriptor.validate()?;
        if !names.insert(descriptor.name.clone()) {
            return Err(EngineError::extraction(
                &descriptor.name,
                "model was supplied more than once",
            ));
        }
        descriptors.push(descriptor);
    }

    debug!(models = descriptors.len(), "extracted descriptors");
    Ok(descriptors)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::Recorder;
    use schemaloader_core::DataType;
    use schemaloader_ir::{Column, JsonModel, Relation};

    fn user() -> ModelDescriptor {
        ModelDescriptor::new("User")
            .with_column(Column::id())
            .with_column(Column::new("name", DataType::string()))
    }

    fn story() -> ModelDescriptor {
        ModelDescriptor::new("Story")
            .with_column(Column::id())
            .with_column(Column::new("title", DataType::string()))
            .with_column(Column::new("author_id", DataType::BigInt))
            .with_relation(Relation::belongs_to("author", "User").with_columns(["author_id"]))
    }

    #[test]
    fn test_loader_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Loader>();
    }

    #[test]
    fn test_from_name() {
        assert_eq!(Loader::from_name("sqlite").unwrap().dialect(), Dialect::Sqlite);
        assert!(matches!(
            Loader::from_name("db2").unwrap_err(),
            EngineError::UnsupportedDialect(_)
        ));
    }

    #[test]
    fn test_from_config_rejects_empty_delimiter() {
        let config = LoaderConfig {
            delimiter: Some(String::new()),
            ..LoaderConfig::default()
        };
        assert!(Loader::from_config(config).is_err());
    }

    #[test]
    fn test_builders() {
        let loader = Loader::new(Dialect::Mssql)
            .with_stmt_delimiter("\nGO")
            .with_table_ordering(TableOrdering::Supply)
            .with_project_root("/srv")
            .without_identifier_quoting();

        let config = loader.config();
        assert_eq!(config.delimiter(), "\nGO");
        assert_eq!(config.ordering, TableOrdering::Supply);
        assert_eq!(config.project_root, Some(PathBuf::from("/srv")));
        assert!(!config.quote_identifiers);
    }

    #[test]
    fn test_load() {
        let sql = Loader::new(Dialect::Postgres)
            .load(&[&user(), &story()])
            .unwrap();
        assert_eq!(
            sql,
            "CREATE TABLE \"users\" (\"id\" BIGSERIAL NOT NULL, \"name\" VARCHAR(255) NOT NULL, PRIMARY KEY (\"id\"));\n\
             CREATE TABLE \"stories\" (\"id\" BIGSERIAL NOT NULL, \"title\" VARCHAR(255) NOT NULL, \"author_id\" BIGINT NOT NULL, PRIMARY KEY (\"id\"), FOREIGN KEY (\"author_id\") REFERENCES \"users\" (\"id\"));\n"
        );
    }

    #[test]
    fn test_load_into_recorder() {
        let mut recorder = Recorder::new();
        let loader = Loader::new(Dialect::Mysql);

        let count = loader
            .load_into(&[&story(), &user()], &mut recorder.in_session("mysql"))
            .unwrap();
        assert_eq!(count, 2);

        let tables: Vec<&str> = recorder
            .statements("mysql")
            .iter()
            .map(|s| s.table.as_str())
            .collect();
        assert_eq!(tables, vec!["users", "stories"]);

        recorder.reset("mysql");
        assert!(recorder.statements("mysql").is_empty());
    }

    #[test]
    fn test_duplicate_model() {
        let err = Loader::new(Dialect::Postgres)
            .load(&[&user(), &user()])
            .unwrap_err();
        assert!(matches!(err, EngineError::DescriptorExtractionFailed { .. }));
    }

    #[test]
    fn test_invalid_descriptor() {
        let broken = JsonModel::new("broken.json", "{");
        let err = Loader::new(Dialect::Postgres)
            .load(&[&user(), &broken])
            .unwrap_err();
        assert!(matches!(err, EngineError::DescriptorExtractionFailed { .. }));
    }

    #[test]
    fn test_derive_stops_before_rendering() {
        let event = ModelDescriptor::new("Event")
            .with_column(Column::id())
            .with_column(Column::new("starts_at", DataType::Time));

        let loader = Loader::new(Dialect::Oracle);
        let schema = loader.derive(&[&event]).unwrap();
        assert_eq!(schema.table_names(), vec!["events"]);
        assert!(loader.load(&[&event]).unwrap_err().is_render());
    }
}
