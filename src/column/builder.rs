// In: src/column/builder.rs

use arrow::array::{make_builder, ArrayBuilder, ArrayRef};
use arrow::datatypes::SchemaRef;
use arrow::record_batch::RecordBatch;

use crate::error::ConvError;

/// A positionally addressed set of Arrow array builders, one per schema field.
///
/// Handlers reach their builder by index only. The builder at `i` is created
/// from field `i`'s data type, so a handler whose kind disagrees with the
/// schema fails the downcast in `field_builder` instead of writing into the
/// wrong column.
pub struct RecordBuilder {
    schema: SchemaRef,
    builders: Vec<Box<dyn ArrayBuilder>>,
}

impl RecordBuilder {
    pub fn new(schema: SchemaRef, capacity: usize) -> Self {
        let builders = schema
            .fields()
            .iter()
            .map(|field| make_builder(field.data_type(), capacity))
            .collect();
        Self { schema, builders }
    }

    pub fn schema(&self) -> SchemaRef {
        self.schema.clone()
    }

    pub fn num_fields(&self) -> usize {
        self.builders.len()
    }

    /// The concrete builder at `index`.
    pub fn field_builder<B: ArrayBuilder>(&mut self, index: usize) -> Result<&mut B, ConvError> {
        let field_count = self.builders.len();
        let builder = self.builders.get_mut(index).ok_or_else(|| {
            ConvError::InternalError(format!(
                "builder index {} out of range for {} fields",
                index, field_count
            ))
        })?;
        builder.as_any_mut().downcast_mut::<B>().ok_or_else(|| {
            ConvError::InternalError(format!(
                "builder {} is not a {}",
                index,
                std::any::type_name::<B>()
            ))
        })
    }

    /// Finishes every builder and assembles the batch.
    ///
    /// Arrow validates column lengths and nullability here: a null in a
    /// non-nullable field surfaces as `ConvError::Arrow`.
    pub fn finish(&mut self) -> Result<RecordBatch, ConvError> {
        let columns: Vec<ArrayRef> = self.builders.iter_mut().map(|b| b.finish()).collect();
        Ok(RecordBatch::try_new(self.schema.clone(), columns)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{Array, Int32Builder, StringBuilder};
    use arrow::datatypes::{DataType, Field, Schema};
    use std::sync::Arc;

    fn schema() -> SchemaRef {
        Arc::new(Schema::new(vec![
            Field::new("id", DataType::Int32, false),
            Field::new("name", DataType::Utf8, true),
        ]))
    }

    #[test]
    fn test_builders_are_addressed_by_position() {
        let mut builder = RecordBuilder::new(schema(), 4);
        assert_eq!(builder.num_fields(), 2);
        builder
            .field_builder::<Int32Builder>(0)
            .unwrap()
            .append_values(&[1, 2], &[true, true]);
        let names = builder.field_builder::<StringBuilder>(1).unwrap();
        names.append_value("a");
        names.append_null();
        let batch = builder.finish().unwrap();
        assert_eq!(batch.num_rows(), 2);
        assert!(batch.column(1).is_null(1));
    }

    #[test]
    fn test_wrong_builder_type_is_an_error() {
        let mut builder = RecordBuilder::new(schema(), 4);
        assert!(builder.field_builder::<StringBuilder>(0).is_err());
        assert!(builder.field_builder::<Int32Builder>(5).is_err());
    }

    #[test]
    fn test_null_in_non_nullable_field_fails_at_finish() {
        let mut builder = RecordBuilder::new(schema(), 4);
        builder
            .field_builder::<Int32Builder>(0)
            .unwrap()
            .append_values(&[0], &[false]);
        builder.field_builder::<StringBuilder>(1).unwrap().append_value("x");
        assert!(matches!(builder.finish(), Err(ConvError::Arrow(_))));
    }
}
