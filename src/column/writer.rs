// In: src/column/writer.rs

use crate::column::kinds::ColumnKind;
use crate::column::{Handler, IndexToken, RecordBuilder, WriteHandler};
use crate::error::ConvError;
use crate::types::FieldDescriptor;
use crate::value::Value;

/// The write accumulator for any `ColumnKind`.
///
/// `values` and `validity` always have equal length. A null slot holds
/// `K::Native::default()`, which the builder never reads as data because the
/// validity track is passed alongside.
pub struct ColumnWriter<K: ColumnKind> {
    descriptor: FieldDescriptor,
    index: usize,
    kind: K,
    values: Vec<K::Native>,
    validity: Vec<bool>,
}

impl<K: ColumnKind> ColumnWriter<K> {
    pub fn new(descriptor: FieldDescriptor, kind: K, capacity: usize) -> Self {
        debug_assert_eq!(descriptor.logical_type, kind.logical_type());
        Self {
            descriptor,
            index: 0,
            kind,
            values: Vec::with_capacity(capacity),
            validity: Vec::with_capacity(capacity),
        }
    }

    pub fn validity(&self) -> &[bool] {
        &self.validity
    }

    pub fn null_count(&self) -> usize {
        self.validity.iter().filter(|v| !**v).count()
    }
}

impl<K: ColumnKind> Handler for ColumnWriter<K> {
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

impl<K: ColumnKind> WriteHandler for ColumnWriter<K> {
    fn add(&mut self, value: Value) -> Result<(), ConvError> {
        if value.is_null() {
            self.values.push(K::Native::default());
            self.validity.push(false);
            return Ok(());
        }
        let native = self
            .kind
            .encode(value)
            .map_err(|e| e.in_column(&self.descriptor.name))?;
        self.values.push(native);
        self.validity.push(true);
        Ok(())
    }

    fn build(&mut self, builder: &mut RecordBuilder) -> Result<(), ConvError> {
        let target = builder.field_builder::<K::Builder>(self.index)?;
        let values = std::mem::take(&mut self.values);
        let validity = std::mem::take(&mut self.validity);
        self.kind.append(target, &values, &validity);
        Ok(())
    }

    fn len(&self) -> usize {
        self.values.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::kinds::{DecimalKind, Int32Kind, Utf8Kind};
    use crate::types::LogicalType;
    use arrow::array::{Array, Decimal128Array, Int32Array, StringArray};
    use arrow::datatypes::Schema;
    use std::sync::Arc;

    fn int_writer() -> ColumnWriter<Int32Kind> {
        ColumnWriter::new(FieldDescriptor::new("id", LogicalType::Int32, true), Int32Kind, 4)
    }

    #[test]
    fn test_null_appends_placeholder_and_false_validity() {
        let mut writer = int_writer();
        writer.add(Value::Int32(7)).unwrap();
        writer.add(Value::Null).unwrap();
        writer.add(Value::Int32(9)).unwrap();
        assert_eq!(writer.len(), 3);
        assert_eq!(writer.validity(), &[true, false, true]);
        assert_eq!(writer.null_count(), 1);
    }

    #[test]
    fn test_mismatch_names_column_and_leaves_buffers_untouched() {
        let mut writer = int_writer();
        writer.add(Value::Int32(1)).unwrap();
        let err = writer.add(Value::Utf8("x".into())).unwrap_err();
        match err {
            ConvError::TypeMismatch {
                column,
                received,
                expected,
            } => {
                assert_eq!(column, "id");
                assert_eq!(received, "Utf8");
                assert_eq!(expected, "Int32");
            }
            other => panic!("unexpected error {:?}", other),
        }
        assert_eq!(writer.len(), 1);
        assert_eq!(writer.validity().len(), 1);
    }

    #[test]
    fn test_build_threads_validity_into_the_array() {
        let descriptors = [
            FieldDescriptor::new("id", LogicalType::Int32, true),
            FieldDescriptor::new("name", LogicalType::String, true),
        ];
        let schema = Arc::new(Schema::new(
            descriptors.iter().map(|d| d.to_arrow_field()).collect::<Vec<_>>(),
        ));
        let mut ids = ColumnWriter::new(descriptors[0].clone(), Int32Kind, 4);
        let mut names = ColumnWriter::new(descriptors[1].clone(), Utf8Kind, 4);
        names.set_index(1, IndexToken::new());
        for (id, name) in [(Value::Int32(1), Value::from("a")), (Value::Null, Value::Null)] {
            ids.add(id).unwrap();
            names.add(name).unwrap();
        }

        let mut builder = RecordBuilder::new(schema, 4);
        ids.build(&mut builder).unwrap();
        names.build(&mut builder).unwrap();
        assert!(ids.is_empty());
        let batch = builder.finish().unwrap();

        let id_col = batch.column(0).as_any().downcast_ref::<Int32Array>().unwrap();
        assert_eq!(id_col.value(0), 1);
        assert!(id_col.is_null(1));
        let name_col = batch.column(1).as_any().downcast_ref::<StringArray>().unwrap();
        assert_eq!(name_col.value(0), "a");
        assert!(name_col.is_null(1));
    }

    #[test]
    fn test_decimal_writer_keeps_exact_coefficients() {
        let logical = LogicalType::Decimal {
            precision: 10,
            scale: 2,
        };
        let descriptor = FieldDescriptor::new("amount", logical, false);
        let schema = Arc::new(Schema::new(vec![descriptor.to_arrow_field()]));
        let mut writer = ColumnWriter::new(descriptor, DecimalKind::new(10, 2), 2);
        writer.add(Value::from("123.45")).unwrap();
        writer.add(Value::from("-0.01")).unwrap();

        let mut builder = RecordBuilder::new(schema, 2);
        writer.build(&mut builder).unwrap();
        let batch = builder.finish().unwrap();
        let col = batch.column(0).as_any().downcast_ref::<Decimal128Array>().unwrap();
        assert_eq!(col.value(0), 12345);
        assert_eq!(col.value(1), -1);
    }

    #[test]
    fn test_build_into_wrong_position_fails() {
        let schema = Arc::new(Schema::new(vec![
            FieldDescriptor::new("name", LogicalType::String, true).to_arrow_field(),
        ]));
        let mut writer = int_writer();
        writer.add(Value::Int32(1)).unwrap();
        let mut builder = RecordBuilder::new(schema, 1);
        assert!(matches!(
            writer.build(&mut builder),
            Err(ConvError::InternalError(_))
        ));
    }
}
