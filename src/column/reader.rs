// In: src/column/reader.rs

use arrow::array::{Array, ArrayRef};

use crate::column::kinds::ColumnKind;
use crate::column::{ChunkCursor, ChunkedColumn, Handler, IndexToken, ReadHandler};
use crate::error::ConvError;
use crate::types::{FieldDescriptor, LogicalType};
use crate::value::Value;

/// The read cursor for any `ColumnKind`.
pub struct ColumnReader<K: ColumnKind> {
    descriptor: FieldDescriptor,
    index: usize,
    kind: K,
    chunks: Vec<ArrayRef>,
    cursor: ChunkCursor,
}

impl<K: ColumnKind> ColumnReader<K> {
    pub fn new(descriptor: FieldDescriptor, kind: K) -> Self {
        debug_assert_eq!(descriptor.logical_type, kind.logical_type());
        Self {
            descriptor,
            index: 0,
            kind,
            chunks: Vec::new(),
            cursor: ChunkCursor::new(Vec::new()),
        }
    }
}

impl<K: ColumnKind> Handler for ColumnReader<K> {
    fn descriptor(&self) -> &FieldDescriptor {
        &self.descriptor
    }

    fn index(&self) -> usize {
        self.index
    }

    fn set_index(&mut self, index: usize, _token: IndexToken) {
        self.index = index;
    }
}

impl<K: ColumnKind> ReadHandler for ColumnReader<K> {
    fn bind(&mut self, column: &ChunkedColumn) -> Result<(), ConvError> {
        let expected = self.kind.logical_type();
        for chunk in column.chunks() {
            let found = LogicalType::from_arrow_type(chunk.data_type())?;
            if found != expected {
                return Err(ConvError::mismatch(found.to_string(), expected.to_string())
                    .in_column(&self.descriptor.name));
            }
        }
        self.chunks = column.chunks().to_vec();
        self.cursor = ChunkCursor::over_arrays(&self.chunks);
        Ok(())
    }

    fn advance(&mut self) -> bool {
        self.cursor.advance()
    }

    fn decode(&self) -> Result<Value, ConvError> {
        let (chunk_index, row) = self.cursor.current().ok_or_else(|| {
            ConvError::InternalError(format!(
                "decode on column '{}' without a current row",
                self.descriptor.name
            ))
        })?;
        let chunk = &self.chunks[chunk_index];
        if chunk.is_null(row) {
            return Ok(Value::Null);
        }
        let array = chunk.as_any().downcast_ref::<K::Array>().ok_or_else(|| {
            ConvError::mismatch(chunk.data_type().to_string(), self.kind.logical_type().to_string())
                .in_column(&self.descriptor.name)
        })?;
        self.kind.decode(array, row)
    }

    fn reset(&mut self) {
        self.cursor.reset();
    }

    fn len(&self) -> usize {
        self.cursor.total_len()
    }
}
