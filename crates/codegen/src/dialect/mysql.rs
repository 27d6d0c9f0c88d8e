//! MySQL backend

use super::{DialectRenderer, RenderContext, not_null};
use crate::schema::Table;
use schemaloader_core::{DataType, Dialect, EngineResult};
use schemaloader_ir::Column;

#[derive(Debug, Clone, Copy, Default)]
pub struct Mysql;

impl DialectRenderer for Mysql {
    fn dialect(&self) -> Dialect {
        Dialect::Mysql
    }

    fn quote_chars(&self) -> (char, char) {
        ('`', '`')
    }

    fn sql_type(&self, data_type: &DataType) -> Option<String> {
        let name = match data_type {
            DataType::SmallInt => "SMALLINT".to_string(),
            DataType::Integer => "INT".to_string(),
            DataType::BigInt => "BIGINT".to_string(),
            DataType::Float => "FLOAT".to_string(),
            DataType::Double => "DOUBLE".to_string(),
            DataType::Decimal { precision, scale } => format!("DECIMAL({precision},{scale})"),
            DataType::Boolean => "BOOLEAN".to_string(),
            DataType::Varchar(len) => format!("VARCHAR({len})"),
            DataType::Text => "LONGTEXT".to_string(),
            DataType::Uuid => "CHAR(36)".to_string(),
            DataType::Date => "DATE".to_string(),
            DataType::Time => "TIME".to_string(),
            DataType::Timestamp => "DATETIME".to_string(),
            DataType::TimestampTz => "TIMESTAMP".to_string(),
            DataType::Binary => "BLOB".to_string(),
            DataType::Json => "JSON".to_string(),
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
            " AUTO_INCREMENT"
        } else {
            ""
        };

        Ok(format!(
            "{} {ty}{}{identity}{}",
            self.quote(&column.name, ctx),
            not_null(column),
            self.default_clause(column)
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::tests::stories;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_create_table() {
        let sql = Mysql
            .create_table(&stories(), &RenderContext::default())
            .unwrap();
        assert_eq!(
            sql,
            "CREATE TABLE `stories` (`id` BIGINT NOT NULL AUTO_INCREMENT, `title` VARCHAR(120) NOT NULL, \
             `slug` LONGTEXT, `author_id` BIGINT NOT NULL, PRIMARY KEY (`id`), UNIQUE (`slug`), \
             FOREIGN KEY (`author_id`) REFERENCES `users` (`id`) ON DELETE RESTRICT ON UPDATE CASCADE)"
        );
    }

    #[test]
    fn test_unsupported_types() {
        assert_eq!(Mysql.sql_type(&DataType::Interval), None);
        assert_eq!(
            Mysql.sql_type(&DataType::Array(Box::new(DataType::Integer))),
            None
        );
        assert_eq!(Mysql.sql_type(&DataType::Uuid), Some("CHAR(36)".to_string()));
    }
}
