//! Oracle backend
//!
//! Oracle has no `ON UPDATE` clause and accepts only `CASCADE` and
//! `SET NULL` on delete; other actions are left to the default behaviour.
//! `DEFAULT` must precede the `NOT NULL` constraint.

use super::{DialectRenderer, RenderContext, not_null};
use crate::schema::{ForeignKey, Table};
use schemaloader_core::{DataType, Dialect, EngineResult, ReferentialAction};
use schemaloader_ir::Column;

#[derive(Debug, Clone, Copy, Default)]
pub struct Oracle;

impl DialectRenderer for Oracle {
    fn dialect(&self) -> Dialect {
        Dialect::Oracle
    }

    fn sql_type(&self, data_type: &DataType) -> Option<String> {
        let name = match data_type {
            DataType::SmallInt => "NUMBER(5)".to_string(),
            DataType::Integer => "NUMBER(10)".to_string(),
            DataType::BigInt => "NUMBER(19)".to_string(),
            DataType::Float => "BINARY_FLOAT".to_string(),
            DataType::Double => "BINARY_DOUBLE".to_string(),
            DataType::Decimal { precision, scale } => format!("NUMBER({precision},{scale})"),
            DataType::Boolean => "NUMBER(1)".to_string(),
            DataType::Varchar(len) => format!("VARCHAR2({len})"),
            DataType::Text => "CLOB".to_string(),
            DataType::Uuid => "RAW(16)".to_string(),
            DataType::Date => "DATE".to_string(),
            DataType::Timestamp => "TIMESTAMP".to_string(),
            DataType::TimestampTz => "TIMESTAMP WITH TIME ZONE".to_string(),
            DataType::Binary => "BLOB".to_string(),
            DataType::Json => "JSON".to_string(),
            DataType::Interval => "INTERVAL DAY TO SECOND".to_string(),
            DataType::Time | DataType::Array(_) => return None,
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
            " GENERATED BY DEFAULT AS IDENTITY"
        } else {
            ""
        };

        Ok(format!(
            "{} {ty}{identity}{}{}",
            self.quote(&column.name, ctx),
            self.default_clause(column),
            not_null(column)
        ))
    }

    fn now(&self) -> &'static str {
        "SYSTIMESTAMP"
    }

    fn bool_literal(&self, value: bool) -> &'static str {
        if value { "1" } else { "0" }
    }

    fn referential_actions(&self, fk: &ForeignKey) -> (Option<&'static str>, Option<&'static str>) {
        let on_delete = fk.on_delete.and_then(|action| match action {
            ReferentialAction::Cascade | ReferentialAction::SetNull => Some(action.to_sql()),
            _ => None,
        });
        (on_delete, None)
    }
}
