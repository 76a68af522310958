// In: src/mapper/sql.rs

use serde::{Deserialize, Serialize};

use super::TypeMapper;
use crate::error::ConvError;
use crate::types::{FieldDescriptor, LogicalType};

/// Which driver vocabulary the declared type names come from.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SqlDialect {
    Postgres,
    MySql,
}

/// Column metadata as reported by a SQL driver.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SqlColumn {
    pub name: String,
    /// The driver's type name, e.g. `INT4` or `UNSIGNED BIGINT`.
    pub database_type_name: String,
    /// `None` when the driver cannot tell; treated as nullable.
    pub nullable: Option<bool>,
    /// `(precision, scale)` for decimal columns.
    pub decimal_size: Option<(i64, i64)>,
}

impl SqlColumn {
    pub fn new(name: impl Into<String>, database_type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            database_type_name: database_type_name.into(),
            nullable: None,
            decimal_size: None,
        }
    }

    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = Some(nullable);
        self
    }

    pub fn with_decimal_size(mut self, precision: i64, scale: i64) -> Self {
        self.decimal_size = Some((precision, scale));
        self
    }
}

impl TypeMapper {
    /// Maps driver column metadata to a field descriptor.
    pub fn map_sql_column(&self, dialect: SqlDialect, column: &SqlColumn) -> Result<FieldDescriptor, ConvError> {
        let type_name = column.database_type_name.trim().to_ascii_uppercase();
        let logical = match dialect {
            SqlDialect::Postgres => self.postgres_type(&type_name, column)?,
            SqlDialect::MySql => self.mysql_type(&type_name, column)?,
        };
        log::debug!(
            "{:?} column '{}' ({}) -> {}",
            dialect,
            column.name,
            column.database_type_name,
            logical
        );
        Ok(FieldDescriptor::new(
            column.name.clone(),
            logical,
            column.nullable.unwrap_or(true),
        ))
    }

    fn postgres_type(&self, type_name: &str, column: &SqlColumn) -> Result<LogicalType, ConvError> {
        match type_name {
            "INT2" | "INT8" => Ok(LogicalType::Int64),
            "INT4" => Ok(LogicalType::Int32),
            "BOOL" => Ok(LogicalType::Bool),
            "FLOAT4" | "FLOAT8" => Ok(LogicalType::Float64),
            "VARCHAR" | "CHAR" | "BPCHAR" | "TEXT" => Ok(LogicalType::String),
            "NUMERIC" => self.sized_decimal(type_name, column),
            "TIMESTAMP" | "TIMESTAMPTZ" => Ok(LogicalType::Timestamp(self.config().sql_timestamp_unit)),
            "DATE" => Ok(LogicalType::Date),
            _ => Err(unsupported(type_name, column)),
        }
    }

    fn mysql_type(&self, type_name: &str, column: &SqlColumn) -> Result<LogicalType, ConvError> {
        match type_name {
            "TINYINT" | "BOOL" | "BOOLEAN" => Ok(LogicalType::Bool),
            "INT" | "BIGINT" | "SMALLINT" | "MEDIUMINT" => Ok(LogicalType::Int64),
            "UNSIGNED BIGINT" => Ok(LogicalType::UInt64),
            "VARCHAR" | "TEXT" | "CHAR" => Ok(LogicalType::String),
            "FLOAT" | "DOUBLE" => Ok(LogicalType::Float64),
            "TIMESTAMP" | "DATETIME" => Ok(LogicalType::Timestamp(self.config().sql_timestamp_unit)),
            "DATE" => Ok(LogicalType::Date),
            "DECIMAL" => self.sized_decimal(type_name, column),
            _ => Err(unsupported(type_name, column)),
        }
    }

    fn sized_decimal(&self, type_name: &str, column: &SqlColumn) -> Result<LogicalType, ConvError> {
        let (precision, scale) = column.decimal_size.ok_or_else(|| {
            ConvError::UnsupportedType(format!(
                "{} column '{}' reports no decimal size",
                type_name, column.name
            ))
        })?;
        self.decimal_type(type_name, precision, scale)
    }
}

fn unsupported(type_name: &str, column: &SqlColumn) -> ConvError {
    ConvError::UnsupportedType(format!("SQL type {} (column '{}')", type_name, column.name))
}
