//! PostgreSQL backend

use super::{DialectRenderer, RenderContext, not_null};
use crate::schema::Table;
use schemaloader_core::{DataType, Dialect, EngineResult};
use schemaloader_ir::Column;

#[derive(Debug, Clone, Copy, Default)]
pub struct Postgres;

impl DialectRenderer for Postgres {
    fn dialect(&self) -> Dialect {
        Dialect::Postgres
    }

    fn sql_type(&self, data_type: &DataType) -> Option<String> {
        let name = match data_type {
            DataType::SmallInt => "SMALLINT".to_string(),
            DataType::Integer => "INTEGER".to_string(),
            DataType::BigInt => "BIGINT".to_string(),
            DataType::Float => "REAL".to_string(),
            DataType::Double => "DOUBLE PRECISION".to_string(),
            DataType::Decimal { precision, scale } => format!("NUMERIC({precision},{scale})"),
            DataType::Boolean => "BOOLEAN".to_string(),
            DataType::Varchar(len) => format!("VARCHAR({len})"),
            DataType::Text => "TEXT".to_string(),
            DataType::Uuid => "UUID".to_string(),
            DataType::Date => "DATE".to_string(),
            DataType::Time => "TIME".to_string(),
            DataType::Timestamp => "TIMESTAMP".to_string(),
            DataType::TimestampTz => "TIMESTAMPTZ".to_string(),
            DataType::Binary => "BYTEA".to_string(),
            DataType::Json => "JSONB".to_string(),
            DataType::Interval => "INTERVAL".to_string(),
            // one level of nesting only
            DataType::Array(inner) if inner.is_array() => return None,
            DataType::Array(inner) => format!("{}[]", self.sql_type(inner)?),
        };
        Some(name)
    }

    fn column_definition(
        &self,
        table: &Table,
        column: &Column,
        ctx: &RenderContext,
    ) -> EngineResult<String> {
        let ty = if column.auto_increment {
            match column.data_type {
                DataType::SmallInt => "SMALLSERIAL".to_string(),
                DataType::Integer => "SERIAL".to_string(),
                DataType::BigInt => "BIGSERIAL".to_string(),
                _ => return Err(self.unsupported(table, column)),
            }
        } else {
            self.column_type(table, column)?
        };

        Ok(format!(
            "{} {ty}{}{}",
            self.quote(&column.name, ctx),
            not_null(column),
            self.default_clause(column)
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::tests::{stories, with_column};
    use pretty_assertions::assert_eq;
    use schemaloader_core::EngineError;
    use schemaloader_ir::DefaultValue;

    #[test]
    fn test_create_table() {
        let sql = Postgres
            .create_table(&stories(), &RenderContext::default())
            .unwrap();
        assert_eq!(
            sql,
            "CREATE TABLE \"stories\" (\"id\" BIGSERIAL NOT NULL, \"title\" VARCHAR(120) NOT NULL, \
             \"slug\" TEXT, \"author_id\" BIGINT NOT NULL, PRIMARY KEY (\"id\"), UNIQUE (\"slug\"), \
             FOREIGN KEY (\"author_id\") REFERENCES \"users\" (\"id\") ON DELETE RESTRICT ON UPDATE CASCADE)"
        );
    }

    #[test]
    fn test_types() {
        assert_eq!(
            Postgres.sql_type(&DataType::Decimal {
                precision: 10,
                scale: 2
            }),
            Some("NUMERIC(10,2)".to_string())
        );
        assert_eq!(
            Postgres.sql_type(&DataType::Array(Box::new(DataType::Text))),
            Some("TEXT[]".to_string())
        );
        assert_eq!(
            Postgres.sql_type(&DataType::Array(Box::new(DataType::Array(Box::new(
                DataType::Integer
            ))))),
            None
        );
    }

    #[test]
    fn test_default_and_serial() {
        let table = with_column(
            stories(),
            Column::new("published", DataType::Boolean).with_default(DefaultValue::Bool(false)),
        );
        let ctx = RenderContext::default();
        assert_eq!(
            Postgres
                .column_definition(&table, &table.columns[4], &ctx)
                .unwrap(),
            "\"published\" BOOLEAN NOT NULL DEFAULT FALSE"
        );

        let counter = Column::new("n", DataType::Integer).auto_increment();
        assert_eq!(
            Postgres.column_definition(&table, &counter, &ctx).unwrap(),
            "\"n\" SERIAL NOT NULL"
        );
    }

    #[test]
    fn test_auto_increment_on_text() {
        let table = stories();
        let column = Column::new("code", DataType::Text).auto_increment();
        let err = Postgres
            .column_definition(&table, &column, &RenderContext::default())
            .unwrap_err();
        assert!(matches!(err, EngineError::UnsupportedColumnType { .. }));
    }
}
