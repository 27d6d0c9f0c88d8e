//! SQL Server backend

use super::{DialectRenderer, RenderContext, not_null};
use crate::schema::{ForeignKey, Table};
use schemaloader_core::{DataType, Dialect, EngineResult, ReferentialAction};
use schemaloader_ir::Column;

#[derive(Debug, Clone, Copy, Default)]
pub struct Mssql;

fn action(action: ReferentialAction) -> &'static str {
    match action {
        ReferentialAction::Restrict => ReferentialAction::NoAction.to_sql(),
        other => other.to_sql(),
    }
}

impl DialectRenderer for Mssql {
    fn dialect(&self) -> Dialect {
        Dialect::Mssql
    }

    fn quote_chars(&self) -> (char, char) {
        ('[', ']')
    }

    fn sql_type(&self, data_type: &DataType) -> Option<String> {
        let name = match data_type {
            DataType::SmallInt => "SMALLINT".to_string(),
            DataType::Integer => "INT".to_string(),
            DataType::BigInt => "BIGINT".to_string(),
            DataType::Float => "REAL".to_string(),
            DataType::Double => "FLOAT".to_string(),
            DataType::Decimal { precision, scale } => format!("DECIMAL({precision},{scale})"),
            DataType::Boolean => "BIT".to_string(),
            DataType::Varchar(len) => format!("NVARCHAR({len})"),
            DataType::Text | DataType::Json => "NVARCHAR(MAX)".to_string(),
            DataType::Uuid => "UNIQUEIDENTIFIER".to_string(),
            DataType::Date => "DATE".to_string(),
            DataType::Time => "TIME".to_string(),
            DataType::Timestamp => "DATETIME2".to_string(),
            DataType::TimestampTz => "DATETIMEOFFSET".to_string(),
            DataType::Binary => "VARBINARY(MAX)".to_string(),
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
        let identity = if column.auto_increment {
            " IDENTITY(1,1)"
        } else {
            ""
        };

        Ok(format!(
            "{} {ty}{identity}{}{}",
            self.quote(&column.name, ctx),
            not_null(column),
            self.default_clause(column)
        ))
    }

    fn now(&self) -> &'static str {
        "SYSDATETIME()"
    }

    fn bool_literal(&self, value: bool) -> &'static str {
        if value { "1" } else { "0" }
    }

    fn referential_actions(&self, fk: &ForeignKey) -> (Option<&'static str>, Option<&'static str>) {
        (fk.on_delete.map(action), fk.on_update.map(action))
    }
}
