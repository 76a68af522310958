// In: src/column/table.rs

//! The read-side table: named columns, each an ordered sequence of chunks.

use arrow::array::ArrayRef;
use arrow::datatypes::{FieldRef, SchemaRef};
use arrow::record_batch::RecordBatch;

use crate::error::ConvError;

#[derive(Debug, Clone)]
pub struct ChunkedColumn {
    field: FieldRef,
    chunks: Vec<ArrayRef>,
}

impl ChunkedColumn {
    /// Every chunk must carry the field's data type.
    pub fn try_new(field: FieldRef, chunks: Vec<ArrayRef>) -> Result<Self, ConvError> {
        if let Some(bad) = chunks.iter().find(|c| c.data_type() != field.data_type()) {
            return Err(ConvError::mismatch(
                bad.data_type().to_string(),
                field.data_type().to_string(),
            )
            .in_column(field.name()));
        }
        Ok(Self { field, chunks })
    }

    pub fn name(&self) -> &str {
        self.field.name()
    }

    pub fn field(&self) -> &FieldRef {
        &self.field
    }

    pub fn chunks(&self) -> &[ArrayRef] {
        &self.chunks
    }

    /// Total rows across chunks.
    pub fn len(&self) -> usize {
        self.chunks.iter().map(|c| c.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone)]
pub struct ChunkedTable {
    schema: SchemaRef,
    columns: Vec<ChunkedColumn>,
}

impl ChunkedTable {
    /// Columns must match the schema's fields one to one, in order.
    ///
    /// Column lengths are not checked here; unequal lengths are reported as a
    /// `SchemaCardinalityError` by whoever walks the rows.
    pub fn try_new(schema: SchemaRef, columns: Vec<ChunkedColumn>) -> Result<Self, ConvError> {
        if schema.fields().len() != columns.len() {
            return Err(ConvError::SchemaCardinalityError(format!(
                "schema has {} fields but {} columns were supplied",
                schema.fields().len(),
                columns.len()
            )));
        }
        for (field, column) in schema.fields().iter().zip(&columns) {
            if field.name() != column.name() {
                return Err(ConvError::FieldNotFound(format!(
                    "column '{}' sits where the schema expects '{}'",
                    column.name(),
                    field.name()
                )));
            }
        }
        Ok(Self { schema, columns })
    }

    /// Each batch contributes one chunk to every column.
    pub fn from_batches(schema: SchemaRef, batches: &[RecordBatch]) -> Result<Self, ConvError> {
        let mut chunks: Vec<Vec<ArrayRef>> = vec![Vec::with_capacity(batches.len()); schema.fields().len()];
        for batch in batches {
            if batch.num_columns() != chunks.len() {
                return Err(ConvError::SchemaCardinalityError(format!(
                    "batch has {} columns, schema has {}",
                    batch.num_columns(),
                    chunks.len()
                )));
            }
            for (column_chunks, array) in chunks.iter_mut().zip(batch.columns()) {
                column_chunks.push(array.clone());
            }
        }
        let columns = schema
            .fields()
            .iter()
            .cloned()
            .zip(chunks)
            .map(|(field, column_chunks)| ChunkedColumn::try_new(field, column_chunks))
            .collect::<Result<Vec<_>, _>>()?;
        Self::try_new(schema, columns)
    }

    pub fn schema(&self) -> SchemaRef {
        self.schema.clone()
    }

    pub fn columns(&self) -> &[ChunkedColumn] {
        &self.columns
    }

    pub fn column(&self, index: usize) -> Option<&ChunkedColumn> {
        self.columns.get(index)
    }

    /// Position and column for `name`.
    pub fn column_by_name(&self, name: &str) -> Option<(usize, &ChunkedColumn)> {
        self.columns.iter().enumerate().find(|(_, c)| c.name() == name)
    }

    /// Like `column_by_name`, but a name shared by several columns is an
    /// error instead of resolving to the first of them.
    pub fn unique_column(&self, name: &str) -> Result<(usize, &ChunkedColumn), ConvError> {
        let mut matches = self.columns.iter().enumerate().filter(|(_, c)| c.name() == name);
        let found = matches
            .next()
            .ok_or_else(|| ConvError::FieldNotFound(format!("table has no column '{}'", name)))?;
        if let Some((second, _)) = matches.next() {
            return Err(ConvError::FieldNotFound(format!(
                "column name '{}' is ambiguous: positions {} and {} share it",
                name, found.0, second
            )));
        }
        Ok(found)
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Length of the longest column.
    pub fn num_rows(&self) -> usize {
        self.columns.iter().map(ChunkedColumn::len).max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{Int32Array, StringArray};
    use arrow::datatypes::{DataType, Field, Schema};
    use std::sync::Arc;

    fn schema() -> SchemaRef {
        Arc::new(Schema::new(vec![
            Field::new("id", DataType::Int32, false),
            Field::new("name", DataType::Utf8, true),
        ]))
    }

    fn batch(ids: Vec<i32>, names: Vec<Option<&str>>) -> RecordBatch {
        RecordBatch::try_new(
            schema(),
            vec![Arc::new(Int32Array::from(ids)), Arc::new(StringArray::from(names))],
        )
        .unwrap()
    }

    #[test]
    fn test_from_batches_makes_one_chunk_per_batch() {
        let batches = vec![
            batch(vec![1, 2], vec![Some("a"), None]),
            batch(vec![], vec![]),
            batch(vec![3], vec![Some("c")]),
        ];
        let table = ChunkedTable::from_batches(schema(), &batches).unwrap();
        assert_eq!(table.num_columns(), 2);
        assert_eq!(table.num_rows(), 3);
        let (index, names) = table.column_by_name("name").unwrap();
        assert_eq!(index, 1);
        assert_eq!(names.chunks().len(), 3);
        assert_eq!(names.len(), 3);
        assert!(table.column_by_name("missing").is_none());
    }

    #[test]
    fn test_unique_column_rejects_shared_names() {
        let schema = Arc::new(Schema::new(vec![
            Field::new("id", DataType::Int32, false),
            Field::new("id", DataType::Int32, false),
            Field::new("name", DataType::Utf8, true),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(Int32Array::from(vec![1])),
                Arc::new(Int32Array::from(vec![100])),
                Arc::new(StringArray::from(vec![Some("a")])),
            ],
        )
        .unwrap();
        let table = ChunkedTable::from_batches(schema, &[batch]).unwrap();
        assert_eq!(table.unique_column("name").unwrap().0, 2);
        assert!(matches!(
            table.unique_column("id"),
            Err(ConvError::FieldNotFound(ref m)) if m.contains("ambiguous")
        ));
        assert!(matches!(table.unique_column("nope"), Err(ConvError::FieldNotFound(_))));
    }

    #[test]
    fn test_chunk_type_must_match_field() {
        let field = Arc::new(Field::new("id", DataType::Int64, false));
        let chunk: ArrayRef = Arc::new(Int32Array::from(vec![1]));
        let result = ChunkedColumn::try_new(field, vec![chunk]);
        assert!(matches!(result, Err(ConvError::TypeMismatch { ref column, .. }) if column == "id"));
    }

    #[test]
    fn test_columns_must_line_up_with_schema() {
        let id = ChunkedColumn::try_new(schema().field(0).clone().into(), vec![]).unwrap();
        let result = ChunkedTable::try_new(schema(), vec![id]);
        assert!(matches!(result, Err(ConvError::SchemaCardinalityError(_))));
    }
}
