// In: src/mapper/mod.rs

//! The TypeMapper.
//!
//! Translates an external type description into exactly one `LogicalType`
//! and constructs the matching handler. Two external vocabularies are
//! supported, each with its own explicit table:
//!
//! - `sql`: a database column's declared type name, nullability and decimal
//!   size, per SQL dialect.
//! - `record`: a record field's declared Rust type plus an optional
//!   `arrow_type` override.
//!
//! Anything not in a table fails with `ConvError::UnsupportedType`.

pub mod record;
pub mod sql;

pub use record::DeclaredType;
pub use sql::{SqlColumn, SqlDialect};

use std::sync::Arc;

use arrow::datatypes::{
    TimeUnit, TimestampMicrosecondType, TimestampMillisecondType, TimestampNanosecondType,
    TimestampSecondType,
};
use arrow_schema::Field;

use crate::codec::MAX_DECIMAL_PRECISION;
use crate::column::kinds::{
    BoolKind, DateKind, DecimalKind, Float64Kind, Int32Kind, Int64Kind, TimestampKind,
    UInt64Kind, Utf8Kind,
};
use crate::column::{ColumnReader, ColumnWriter, ReadHandler, WriteHandler};
use crate::config::{ConvConfig, DecimalOverflowPolicy};
use crate::error::ConvError;
use crate::types::{FieldDescriptor, LogicalType};

/// Binds `$kind` to the `ColumnKind` for `$logical` and evaluates `$body`.
///
/// This is the only place a `LogicalType` is matched to a concrete kind.
macro_rules! with_column_kind {
    ($logical:expr, |$kind:ident| $body:expr) => {
        match $logical {
            LogicalType::Bool => {
                let $kind = BoolKind;
                $body
            }
            LogicalType::Int32 => {
                let $kind = Int32Kind;
                $body
            }
            LogicalType::Int64 => {
                let $kind = Int64Kind;
                $body
            }
            LogicalType::UInt64 => {
                let $kind = UInt64Kind;
                $body
            }
            LogicalType::Float64 => {
                let $kind = Float64Kind;
                $body
            }
            LogicalType::String => {
                let $kind = Utf8Kind;
                $body
            }
            LogicalType::Decimal { precision, scale } => {
                let $kind = DecimalKind::new(precision, scale);
                $body
            }
            LogicalType::Timestamp(TimeUnit::Second) => {
                let $kind = TimestampKind::<TimestampSecondType>::new();
                $body
            }
            LogicalType::Timestamp(TimeUnit::Millisecond) => {
                let $kind = TimestampKind::<TimestampMillisecondType>::new();
                $body
            }
            LogicalType::Timestamp(TimeUnit::Microsecond) => {
                let $kind = TimestampKind::<TimestampMicrosecondType>::new();
                $body
            }
            LogicalType::Timestamp(TimeUnit::Nanosecond) => {
                let $kind = TimestampKind::<TimestampNanosecondType>::new();
                $body
            }
            LogicalType::Date => {
                let $kind = DateKind;
                $body
            }
        }
    };
}

#[derive(Debug, Clone, Default)]
pub struct TypeMapper {
    config: Arc<ConvConfig>,
}

impl TypeMapper {
    pub fn new(config: Arc<ConvConfig>) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ConvConfig {
        &self.config
    }

    /// A write handler fixed to `descriptor.logical_type` for its lifetime.
    pub fn writer_for(&self, descriptor: FieldDescriptor) -> Box<dyn WriteHandler> {
        log::debug!(
            "write handler for '{}': {} (nullable: {})",
            descriptor.name,
            descriptor.logical_type,
            descriptor.nullable
        );
        let capacity = self.config.builder_capacity;
        let logical = descriptor.logical_type;
        with_column_kind!(logical, |kind| {
            Box::new(ColumnWriter::new(descriptor, kind, capacity)) as Box<dyn WriteHandler>
        })
    }

    /// A read handler fixed to `descriptor.logical_type` for its lifetime.
    pub fn reader_for(&self, descriptor: FieldDescriptor) -> Box<dyn ReadHandler> {
        log::debug!(
            "read handler for '{}': {}",
            descriptor.name,
            descriptor.logical_type
        );
        let logical = descriptor.logical_type;
        with_column_kind!(logical, |kind| {
            Box::new(ColumnReader::new(descriptor, kind)) as Box<dyn ReadHandler>
        })
    }

    /// Maps a column of a table read back from the container.
    pub fn map_arrow_field(&self, field: &Field) -> Result<FieldDescriptor, ConvError> {
        FieldDescriptor::from_arrow_field(field).map_err(|e| match e {
            ConvError::UnsupportedType(msg) => {
                ConvError::UnsupportedType(format!("column '{}': {}", field.name(), msg))
            }
            other => other,
        })
    }

    /// Resolves a declared decimal size against the Decimal128 ceiling.
    ///
    /// Under `DecimalOverflowPolicy::Clamp` a precision above 38 becomes 38 and
    /// the scale is capped at `clamped_decimal_scale`; the loss is logged at
    /// `warn`. Under `Reject` the same input is a `ConversionOverflow`.
    pub fn decimal_type(&self, source: &str, precision: i64, scale: i64) -> Result<LogicalType, ConvError> {
        if precision <= 0 || scale < 0 || scale > precision {
            return Err(ConvError::UnsupportedType(format!(
                "{} with precision {} and scale {}",
                source, precision, scale
            )));
        }
        let max = MAX_DECIMAL_PRECISION as i64;
        if precision <= max {
            return Ok(LogicalType::Decimal {
                precision: precision as u8,
                scale: scale as i8,
            });
        }
        match self.config.decimal_overflow {
            DecimalOverflowPolicy::Reject => Err(ConvError::ConversionOverflow(format!(
                "{}({}, {}) exceeds the maximum decimal precision {}",
                source, precision, scale, max
            ))),
            DecimalOverflowPolicy::Clamp => {
                let clamped_scale = scale.min(self.config.clamped_decimal_scale as i64);
                log::warn!(
                    "clamping {}({}, {}) to Decimal({}, {}); digits beyond the clamp are lost",
                    source,
                    precision,
                    scale,
                    max,
                    clamped_scale
                );
                Ok(LogicalType::Decimal {
                    precision: max as u8,
                    scale: clamped_scale as i8,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    fn mapper_with(policy: DecimalOverflowPolicy) -> TypeMapper {
        TypeMapper::new(Arc::new(ConvConfig {
            decimal_overflow: policy,
            ..ConvConfig::default()
        }))
    }

    #[test]
    fn test_decimal_within_ceiling_is_kept() {
        let mapper = TypeMapper::default();
        assert_eq!(
            mapper.decimal_type("NUMERIC", 10, 2).unwrap(),
            LogicalType::Decimal {
                precision: 10,
                scale: 2
            }
        );
    }

    #[test]
    fn test_decimal_clamp_policy() {
        let mapper = mapper_with(DecimalOverflowPolicy::Clamp);
        assert_eq!(
            mapper.decimal_type("NUMERIC", 65535, 20).unwrap(),
            LogicalType::Decimal {
                precision: 38,
                scale: 8
            }
        );
        assert_eq!(
            mapper.decimal_type("NUMERIC", 40, 4).unwrap(),
            LogicalType::Decimal {
                precision: 38,
                scale: 4
            }
        );
    }

    #[test]
    fn test_decimal_reject_policy() {
        let mapper = mapper_with(DecimalOverflowPolicy::Reject);
        assert!(matches!(
            mapper.decimal_type("NUMERIC", 39, 2),
            Err(ConvError::ConversionOverflow(_))
        ));
    }

    #[test]
    fn test_nonsense_decimal_size_is_unsupported() {
        let mapper = TypeMapper::default();
        assert!(matches!(
            mapper.decimal_type("DECIMAL", 2, 5),
            Err(ConvError::UnsupportedType(_))
        ));
        assert!(mapper.decimal_type("DECIMAL", 0, 0).is_err());
    }

    #[test]
    fn test_every_logical_type_gets_a_writer_and_reader() {
        let mapper = TypeMapper::default();
        let all = [
            LogicalType::Bool,
            LogicalType::Int32,
            LogicalType::Int64,
            LogicalType::UInt64,
            LogicalType::Float64,
            LogicalType::String,
            LogicalType::Decimal {
                precision: 12,
                scale: 3,
            },
            LogicalType::Timestamp(TimeUnit::Second),
            LogicalType::Timestamp(TimeUnit::Millisecond),
            LogicalType::Timestamp(TimeUnit::Microsecond),
            LogicalType::Timestamp(TimeUnit::Nanosecond),
            LogicalType::Date,
        ];
        for logical in all {
            let descriptor = FieldDescriptor::new("c", logical, true);
            let mut writer = mapper.writer_for(descriptor.clone());
            assert_eq!(writer.descriptor().logical_type, logical);
            writer.add(Value::Null).unwrap();
            assert_eq!(writer.len(), 1);
            let reader = mapper.reader_for(descriptor);
            assert_eq!(reader.descriptor().logical_type, logical);
        }
    }

    #[test]
    fn test_map_arrow_field_names_the_column() {
        let field = Field::new("blob", arrow::datatypes::DataType::LargeBinary, true);
        let err = TypeMapper::default().map_arrow_field(&field).unwrap_err();
        assert!(err.to_string().contains("blob"));
    }
}
