//! # Dialect Renderers
//!
//! Every supported database gets its own [`DialectRenderer`] backend. A
//! backend owns the parts of `CREATE TABLE` that differ between databases:
//! identifier quoting, type names, auto-increment syntax, default literals
//! and the foreign key actions it accepts. The statement layout itself is
//! shared:
//!
//! ```sql
//! CREATE TABLE "stories" ("id" BIGSERIAL NOT NULL, ..., PRIMARY KEY ("id"), FOREIGN KEY ("author_id") REFERENCES "users" ("id"))
//! ```

mod mssql;
mod mysql;
mod oracle;
mod postgres;
mod sqlite;

pub use mssql::Mssql;
pub use mysql::Mysql;
pub use oracle::Oracle;
pub use postgres::Postgres;
pub use sqlite::Sqlite;

use crate::paths;
use crate::schema::{DerivedSchema, ForeignKey, Table};
use crate::sink::{Statement, StatementSink};
use schemaloader_core::{DataType, Dialect, EngineError, EngineResult};
use schemaloader_ir::{Column, DefaultValue};
use std::path::PathBuf;

/// Options that apply to every backend
#[derive(Debug, Clone)]
pub struct RenderContext {
    /// Quote identifiers
    pub quote_identifiers: bool,

    /// Root for project-relative source paths
    pub project_root: Option<PathBuf>,
}

impl Default for RenderContext {
    fn default() -> Self {
        Self {
            quote_identifiers: true,
            project_root: None,
        }
    }
}

/// Get the renderer for a dialect
pub fn renderer_for(dialect: Dialect) -> Box<dyn DialectRenderer> {
    match dialect {
        Dialect::Postgres => Box::new(Postgres),
        Dialect::Mysql => Box::new(Mysql),
        Dialect::Sqlite => Box::new(Sqlite),
        Dialect::Mssql => Box::new(Mssql),
        Dialect::Oracle => Box::new(Oracle),
    }
}

/// Renders a derived schema as `CREATE TABLE` statements for one database
pub trait DialectRenderer: Send + Sync {
    /// The dialect this backend renders
    fn dialect(&self) -> Dialect;

    /// Opening and closing identifier quote
    fn quote_chars(&self) -> (char, char) {
        ('"', '"')
    }

    /// Type name for a semantic type, `None` when the dialect has none
    fn sql_type(&self, data_type: &DataType) -> Option<String>;

    /// One column definition inside `CREATE TABLE (...)`
    fn column_definition(
        &self,
        table: &Table,
        column: &Column,
        ctx: &RenderContext,
    ) -> EngineResult<String>;

    /// Expression for the current timestamp
    fn now(&self) -> &'static str {
        "CURRENT_TIMESTAMP"
    }

    fn bool_literal(&self, value: bool) -> &'static str {
        if value { "TRUE" } else { "FALSE" }
    }

    /// `ON DELETE` and `ON UPDATE` keywords the dialect accepts for a key
    fn referential_actions(&self, fk: &ForeignKey) -> (Option<&'static str>, Option<&'static str>) {
        (
            fk.on_delete.map(|a| a.to_sql()),
            fk.on_update.map(|a| a.to_sql()),
        )
    }

    /// Whether the primary key is declared on the column instead of the table
    fn inlines_primary_key(&self, _table: &Table) -> bool {
        false
    }

    // ========================================================================
    // Provided
    // ========================================================================

    /// Quote an identifier, doubling embedded closing quotes
    fn quote(&self, ident: &str, ctx: &RenderContext) -> String {
        if !ctx.quote_identifiers {
            return ident.to_string();
        }
        let (open, close) = self.quote_chars();
        let escaped = ident.replace(close, &format!("{close}{close}"));
        format!("{open}{escaped}{close}")
    }

    /// Quote and join a column list
    fn quote_list(&self, idents: &[String], ctx: &RenderContext) -> String {
        idents
            .iter()
            .map(|i| self.quote(i, ctx))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Type name of a column, rejecting types the dialect lacks and
    /// auto-increment on non-integer columns
    fn column_type(&self, table: &Table, column: &Column) -> EngineResult<String> {
        if column.auto_increment && !column.data_type.is_integer() {
            return Err(self.unsupported(table, column));
        }
        self.sql_type(&column.data_type)
            .ok_or_else(|| self.unsupported(table, column))
    }

    fn unsupported(&self, table: &Table, column: &Column) -> EngineError {
        let data_type = if column.auto_increment {
            format!("{} auto increment", column.data_type)
        } else {
            column.data_type.to_string()
        };
        EngineError::UnsupportedColumnType {
            dialect: self.dialect().display_name().to_string(),
            table: table.name.clone(),
            column: column.name.clone(),
            data_type,
        }
    }

    fn default_literal(&self, default: &DefaultValue) -> String {
        match default {
            DefaultValue::Null => "NULL".to_string(),
            DefaultValue::Bool(value) => self.bool_literal(*value).to_string(),
            DefaultValue::Int(value) => value.to_string(),
            DefaultValue::Float(value) => value.to_string(),
            DefaultValue::String(value) => DefaultValue::quoted(value),
            DefaultValue::Now => self.now().to_string(),
            DefaultValue::Expression(expr) => expr.clone(),
        }
    }

    /// ` DEFAULT <literal>` or nothing
    fn default_clause(&self, column: &Column) -> String {
        column
            .default
            .as_ref()
            .map(|d| format!(" DEFAULT {}", self.default_literal(d)))
            .unwrap_or_default()
    }

    fn foreign_key_clause(&self, fk: &ForeignKey, ctx: &RenderContext) -> String {
        let mut clause = format!(
            "FOREIGN KEY ({}) REFERENCES {} ({})",
            self.quote_list(&fk.columns, ctx),
            self.quote(&fk.ref_table, ctx),
            self.quote_list(&fk.ref_columns, ctx)
        );
        let (on_delete, on_update) = self.referential_actions(fk);
        if let Some(action) = on_delete {
            clause.push_str(" ON DELETE ");
            clause.push_str(action);
        }
        if let Some(action) = on_update {
            clause.push_str(" ON UPDATE ");
            clause.push_str(action);
        }
        clause
    }

    /// The `CREATE TABLE` statement for one table, without delimiter
    fn create_table(&self, table: &Table, ctx: &RenderContext) -> EngineResult<String> {
        let mut parts = Vec::with_capacity(table.columns.len() + table.foreign_keys.len() + 1);

        for column in &table.columns {
            parts.push(self.column_definition(table, column, ctx)?);
        }

        if !table.primary_key.is_empty() && !self.inlines_primary_key(table) {
            parts.push(format!(
                "PRIMARY KEY ({})",
                self.quote_list(&table.primary_key, ctx)
            ));
        }

        for unique in &table.uniques {
            parts.push(format!("UNIQUE ({})", self.quote_list(&unique.columns, ctx)));
        }

        for fk in &table.foreign_keys {
            parts.push(self.foreign_key_clause(fk, ctx));
        }

        Ok(format!(
            "CREATE TABLE {} ({})",
            self.quote(&table.name, ctx),
            parts.join(", ")
        ))
    }

    /// Position comment for tables with a known source
    fn position_comment(&self, table: &Table, ctx: &RenderContext) -> Option<String> {
        table.source.as_ref().map(|pos| {
            let comment = format!("-- atlas:pos {}[type=table] {}", table.name, pos);
            paths::relativize(&comment, ctx.project_root.as_deref()).into_owned()
        })
    }

    /// Render every table into the sink; nothing is pushed if any table fails
    fn render(
        &self,
        schema: &DerivedSchema,
        ctx: &RenderContext,
        sink: &mut dyn StatementSink,
    ) -> EngineResult<()> {
        let statements = schema
            .tables()
            .iter()
            .map(|table| {
                Ok(Statement {
                    table: table.name.clone(),
                    sql: self.create_table(table, ctx)?,
                    comment: self.position_comment(table, ctx),
                })
            })
            .collect::<EngineResult<Vec<_>>>()?;

        for statement in statements {
            sink.push(statement);
        }
        Ok(())
    }
}

/// ` NOT NULL` for non-nullable columns
pub(crate) fn not_null(column: &Column) -> &'static str {
    if column.nullable { "" } else { " NOT NULL" }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::schema::UniqueConstraint;
    use pretty_assertions::assert_eq;
    use schemaloader_core::ReferentialAction;

    /// `stories` with an auto-increment key, a unique slug and a key to users
    pub(crate) fn stories() -> Table {
        Table {
            name: "stories".to_string(),
            model: "Story".to_string(),
            columns: vec![
                Column::id(),
                Column::new("title", DataType::Varchar(120)),
                Column::new("slug", DataType::Text).nullable(),
                Column::new("author_id", DataType::BigInt),
            ],
            primary_key: vec!["id".to_string()],
            foreign_keys: vec![ForeignKey {
                columns: vec!["author_id".to_string()],
                ref_table: "users".to_string(),
                ref_columns: vec!["id".to_string()],
                on_delete: Some(ReferentialAction::Restrict),
                on_update: Some(ReferentialAction::Cascade),
            }],
            uniques: vec![UniqueConstraint {
                columns: vec!["slug".to_string()],
            }],
            joins: None,
            source: None,
        }
    }

    pub(crate) fn with_column(mut table: Table, column: Column) -> Table {
        table.columns.push(column);
        table
    }

    #[test]
    fn test_renderer_for() {
        for dialect in Dialect::all() {
            assert_eq!(renderer_for(*dialect).dialect(), *dialect);
        }
    }

    #[test]
    fn test_quote_escaping() {
        let ctx = RenderContext::default();
        assert_eq!(Postgres.quote("we\"ird", &ctx), "\"we\"\"ird\"");
        assert_eq!(Mysql.quote("we`ird", &ctx), "`we``ird`");
        assert_eq!(Mssql.quote("we]ird", &ctx), "[we]]ird]");
    }

    #[test]
    fn test_unquoted_identifiers() {
        let ctx = RenderContext {
            quote_identifiers: false,
            ..RenderContext::default()
        };
        let sql = Postgres.create_table(&stories(), &ctx).unwrap();
        assert!(sql.starts_with("CREATE TABLE stories (id BIGSERIAL NOT NULL"));
    }

    #[test]
    fn test_position_comment() {
        let mut table = stories();
        table.source = Some(schemaloader_ir::SourcePos {
            file: PathBuf::from("/work/shop/models/story.rs"),
            line: 7,
        });
        let ctx = RenderContext {
            project_root: Some(PathBuf::from("/work/shop")),
            ..RenderContext::default()
        };
        assert_eq!(
            Postgres.position_comment(&table, &ctx).as_deref(),
            Some("-- atlas:pos stories[type=table] models/story.rs:7")
        );
    }

    #[test]
    fn test_render_is_all_or_nothing() {
        let good = stories();
        let mut bad = stories();
        bad.name = "events".to_string();
        bad.foreign_keys.clear();
        bad.columns.push(Column::new("at", DataType::Time));

        let users = Table {
            name: "users".to_string(),
            model: "User".to_string(),
            columns: vec![Column::id()],
            primary_key: vec!["id".to_string()],
            foreign_keys: Vec::new(),
            uniques: Vec::new(),
            joins: None,
            source: None,
        };
        let schema = DerivedSchema::new(vec![users, good, bad]).unwrap();

        let mut sink: Vec<Statement> = Vec::new();
        let err = Oracle
            .render(&schema, &RenderContext::default(), &mut sink)
            .unwrap_err();
        assert!(err.is_render());
        assert!(sink.is_empty());
    }

    #[test]
    fn test_default_literals() {
        assert_eq!(Postgres.default_literal(&DefaultValue::Bool(true)), "TRUE");
        assert_eq!(Mssql.default_literal(&DefaultValue::Bool(true)), "1");
        assert_eq!(
            Postgres.default_literal(&DefaultValue::String("it's".into())),
            "'it''s'"
        );
        assert_eq!(Postgres.default_literal(&DefaultValue::Float(1.5)), "1.5");
        assert_eq!(Oracle.default_literal(&DefaultValue::Now), "SYSTIMESTAMP");
        assert_eq!(
            Sqlite.default_literal(&DefaultValue::Expression("(random())".into())),
            "(random())"
        );
    }
}
