// In: src/bridge/sql.rs

//! The SQL boundary.
//!
//! `RowSource` stands in for a driver cursor (column metadata plus a scan of
//! the next row) and `RowSink` for a prepared insert. Neither touches a
//! network; a real driver adapter implements them.

use std::io::Write;
use std::sync::Arc;

use arrow::record_batch::RecordBatch;

use crate::bridge::container::write_parquet;
use crate::column::ChunkedTable;
use crate::config::ConvConfig;
use crate::error::ConvError;
use crate::manager::{ReadManager, WriteManager};
use crate::mapper::{SqlColumn, SqlDialect, TypeMapper};
use crate::types::FieldDescriptor;
use crate::value::Value;

//==================================================================================
// 1. Row Source (SQL -> columns)
//==================================================================================

pub trait RowSource {
    /// Column metadata, in result-set order.
    fn columns(&self) -> Result<Vec<SqlColumn>, ConvError>;

    /// Scans the next row, `Ok(None)` at the end of the result set.
    fn next_row(&mut self) -> Result<Option<Vec<Value>>, ConvError>;
}

/// A result set held in memory.
#[derive(Debug, Clone)]
pub struct MemoryRowSource {
    columns: Vec<SqlColumn>,
    rows: std::vec::IntoIter<Vec<Value>>,
}

impl MemoryRowSource {
    pub fn new(columns: Vec<SqlColumn>, rows: Vec<Vec<Value>>) -> Self {
        Self {
            columns,
            rows: rows.into_iter(),
        }
    }
}

impl RowSource for MemoryRowSource {
    fn columns(&self) -> Result<Vec<SqlColumn>, ConvError> {
        Ok(self.columns.clone())
    }

    fn next_row(&mut self) -> Result<Option<Vec<Value>>, ConvError> {
        Ok(self.rows.next())
    }
}

//==================================================================================
// 2. Row Sink (columns -> SQL)
//==================================================================================

pub trait RowSink {
    /// Called once with the column layout before the first row.
    fn begin(&mut self, _columns: &[FieldDescriptor]) -> Result<(), ConvError> {
        Ok(())
    }

    fn write_row(&mut self, row: &[Value]) -> Result<(), ConvError>;
}

impl RowSink for Vec<Vec<Value>> {
    fn write_row(&mut self, row: &[Value]) -> Result<(), ConvError> {
        self.push(row.to_vec());
        Ok(())
    }
}

/// Feeds every row of `table` to `sink`. Returns the number of rows written.
///
/// A ragged table is refused before `begin` or any row reaches the sink.
pub fn drain_table_into<K: RowSink + ?Sized>(
    table: &ChunkedTable,
    mapper: &TypeMapper,
    sink: &mut K,
) -> Result<usize, ConvError> {
    let mut manager = ReadManager::for_table(table, mapper)?;
    manager.check_cardinality()?;
    sink.begin(&manager.descriptors())?;
    manager.for_each_row(|row| sink.write_row(row))
}

//==================================================================================
// 3. The Converter
//==================================================================================

pub struct SqlConverter {
    dialect: SqlDialect,
    mapper: TypeMapper,
}

impl SqlConverter {
    pub fn new(dialect: SqlDialect, config: Arc<ConvConfig>) -> Self {
        Self {
            dialect,
            mapper: TypeMapper::new(config),
        }
    }

    pub fn dialect(&self) -> SqlDialect {
        self.dialect
    }

    pub fn mapper(&self) -> &TypeMapper {
        &self.mapper
    }

    /// One write handler per column, in result-set order.
    pub fn create_handlers(&self, columns: &[SqlColumn]) -> Result<WriteManager, ConvError> {
        let mut manager = WriteManager::new();
        for column in columns {
            let descriptor = self.mapper.map_sql_column(self.dialect, column)?;
            manager.add_handler(self.mapper.writer_for(descriptor));
        }
        Ok(manager)
    }

    /// Drains `source` into `manager`. Any failing row aborts the batch.
    pub fn read_into_handlers<S: RowSource + ?Sized>(
        &self,
        source: &mut S,
        manager: &mut WriteManager,
    ) -> Result<usize, ConvError> {
        let mut rows = 0;
        while let Some(row) = source.next_row()? {
            manager.add_row(row)?;
            rows += 1;
        }
        Ok(rows)
    }

    /// Converts a whole result set into one `RecordBatch`.
    pub fn to_record_batch<S: RowSource + ?Sized>(&self, source: &mut S) -> Result<RecordBatch, ConvError> {
        let mut manager = self.create_handlers(&source.columns()?)?;
        let rows = self.read_into_handlers(source, &mut manager)?;
        log::debug!("{:?} result set: {} columns, {} rows", self.dialect, manager.len(), rows);
        manager.finish()
    }

    /// Converts a whole result set and writes it as one Parquet file.
    pub fn write_parquet<S: RowSource + ?Sized, W: Write + Send>(
        &self,
        source: &mut S,
        writer: W,
    ) -> Result<usize, ConvError> {
        let batch = self.to_record_batch(source)?;
        write_parquet(writer, batch.schema(), &[batch.clone()], &self.mapper.config().container)?;
        Ok(batch.num_rows())
    }

    /// Feeds a table back out row by row, e.g. into prepared inserts.
    pub fn write_rows<K: RowSink + ?Sized>(&self, table: &ChunkedTable, sink: &mut K) -> Result<usize, ConvError> {
        drain_table_into(table, &self.mapper, sink)
    }

    /// `INSERT INTO <table>(<columns>) VALUES (...)` with one placeholder per
    /// column in the dialect's style. Values bind by the listed names, not by
    /// the target table's physical column order.
    pub fn insert_statement(&self, table: &str, columns: &[FieldDescriptor]) -> String {
        let names: Vec<&str> = columns.iter().map(|c| c.name.as_str()).collect();
        let placeholders: Vec<String> = (1..=columns.len())
            .map(|i| match self.dialect {
                SqlDialect::Postgres => format!("${}", i),
                SqlDialect::MySql => "?".to_string(),
            })
            .collect();
        format!(
            "INSERT INTO {}({}) VALUES ({})",
            table,
            names.join(", "),
            placeholders.join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LogicalType;

    fn pg() -> SqlConverter {
        SqlConverter::new(SqlDialect::Postgres, Arc::new(ConvConfig::default()))
    }

    #[test]
    fn test_create_handlers_follows_column_order() {
        let columns = vec![
            SqlColumn::new("id", "INT4").with_nullable(false),
            SqlColumn::new("price", "NUMERIC").with_decimal_size(12, 4),
        ];
        let manager = pg().create_handlers(&columns).unwrap();
        let descriptors = manager.descriptors();
        assert_eq!(descriptors[0].logical_type, LogicalType::Int32);
        assert_eq!(
            descriptors[1].logical_type,
            LogicalType::Decimal {
                precision: 12,
                scale: 4
            }
        );
    }

    #[test]
    fn test_failing_row_aborts_the_batch() {
        let mut source = MemoryRowSource::new(
            vec![SqlColumn::new("id", "INT4")],
            vec![vec![Value::Int32(1)], vec![Value::from("two")]],
        );
        let result = pg().to_record_batch(&mut source);
        assert!(matches!(result, Err(ConvError::TypeMismatch { .. })));
    }

    #[test]
    fn test_unsupported_column_fails_before_any_row() {
        let mut source = MemoryRowSource::new(vec![SqlColumn::new("geom", "GEOMETRY")], vec![]);
        assert!(matches!(
            pg().to_record_batch(&mut source),
            Err(ConvError::UnsupportedType(_))
        ));
    }

    #[test]
    fn test_insert_statement_placeholders() {
        let columns = vec![
            FieldDescriptor::new("a", LogicalType::Int64, true),
            FieldDescriptor::new("b", LogicalType::String, true),
        ];
        assert_eq!(
            pg().insert_statement("t", &columns),
            "INSERT INTO t(a, b) VALUES ($1, $2)"
        );
        let mysql = SqlConverter::new(SqlDialect::MySql, Arc::new(ConvConfig::default()));
        assert_eq!(mysql.insert_statement("t", &columns), "INSERT INTO t(a, b) VALUES (?, ?)");
    }
}
