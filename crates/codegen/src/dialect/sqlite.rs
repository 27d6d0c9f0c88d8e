//! SQLite backend
//!
//! `AUTOINCREMENT` is only valid on an `INTEGER PRIMARY KEY` column, so an
//! auto-increment key is declared inline and the table-level primary key
//! is left out.

use super::{DialectRenderer, RenderContext, not_null};
use crate::schema::Table;
use schemaloader_core::{DataType, Dialect, EngineResult};
use schemaloader_ir::Column;

#[derive(Debug, Clone, Copy, Default)]
pub struct Sqlite;

impl Sqlite {
    /// The single primary key column, if the table has exactly one
    fn sole_key<'a>(table: &'a Table) -> Option<&'a str> {
        match table.primary_key.as_slice() {
            [key] => Some(key.as_str()),
            _ => None,
        }
    }
}

impl DialectRenderer for Sqlite {
    fn dialect(&self) -> Dialect {
        Dialect::Sqlite
    }

    fn sql_type(&self, data_type: &DataType) -> Option<String> {
        let name = match data_type {
            DataType::SmallInt | DataType::Integer | DataType::BigInt => "INTEGER".to_string(),
            DataType::Float | DataType::Double => "REAL".to_string(),
            DataType::Decimal { precision, scale } => format!("NUMERIC({precision},{scale})"),
            DataType::Boolean => "BOOLEAN".to_string(),
            DataType::Varchar(len) => format!("VARCHAR({len})"),
            DataType::Text | DataType::Uuid | DataType::Json => "TEXT".to_string(),
            DataType::Date => "DATE".to_string(),
            DataType::Time => "TIME".to_string(),
            DataType::Timestamp | DataType::TimestampTz => "TIMESTAMP".to_string(),
            DataType::Binary => "BLOB".to_string(),
            DataType::Interval | DataType::Array(_) => return None,
        };
        Some(name)
    }

    fn column_definition(
        &self,
        table: &Table,
        column: &Column,
        ctx: &RenderContext,
    ) -> EngineResult<String> {
        let ty = self.column_type(table, column)?;

        let inline_key = if column.auto_increment {
            if Self::sole_key(table) != Some(column.name.as_str()) {
                return Err(self.unsupported(table, column));
            }
            " PRIMARY KEY AUTOINCREMENT"
        } else {
            ""
        };

        Ok(format!(
            "{} {ty}{}{inline_key}{}",
            self.quote(&column.name, ctx),
            not_null(column),
            self.default_clause(column)
        ))
    }

    fn inlines_primary_key(&self, table: &Table) -> bool {
        Self::sole_key(table)
            .and_then(|key| table.column(key))
            .is_some_and(|c| c.auto_increment)
    }
}
