// In: src/column/kinds.rs

//! One `ColumnKind` per logical type.
//!
//! A kind is the only type-specific piece of a handler: which `Value` shapes it
//! accepts, how an accepted value becomes a buffer element, which Arrow
//! builder/array it drives, and how a valid slot decodes back into a `Value`.
//! `ColumnWriter<K>` and `ColumnReader<K>` supply everything else (buffers,
//! validity, cursor), so there is exactly one writer and one reader
//! implementation for the whole family.

use std::marker::PhantomData;

use arrow::array::{
    Array, ArrayBuilder, BooleanArray, BooleanBuilder, Date32Array, Date32Builder,
    Decimal128Array, Decimal128Builder, PrimitiveArray, PrimitiveBuilder, StringArray,
    StringBuilder,
};
use arrow::datatypes::{
    ArrowPrimitiveType, ArrowTimestampType, Float64Type, Int32Type, Int64Type, UInt64Type,
};
use chrono::{DateTime, NaiveDate, Utc};

use crate::codec::{temporal, DecimalValue};
use crate::error::ConvError;
use crate::types::LogicalType;
use crate::value::Value;

/// The per-type contract behind every handler.
pub trait ColumnKind: Send + 'static {
    /// Buffer element. `Default::default()` is the placeholder stored in null slots.
    type Native: Clone + Default + Send;
    /// The Arrow builder this kind flushes into.
    type Builder: ArrayBuilder;
    /// The Arrow array this kind decodes from.
    type Array: Array + 'static;

    fn logical_type(&self) -> LogicalType;

    /// Converts a non-null value from the kind's convertible set.
    fn encode(&self, value: Value) -> Result<Self::Native, ConvError>;

    /// Bulk-appends values with their validity. Both slices have equal length.
    fn append(&self, builder: &mut Self::Builder, values: &[Self::Native], validity: &[bool]);

    /// Decodes a slot already known to be valid.
    fn decode(&self, array: &Self::Array, row: usize) -> Result<Value, ConvError>;
}

fn reject<K: ColumnKind>(kind: &K, value: &Value) -> ConvError {
    ConvError::mismatch(value.kind_name(), kind.logical_type().to_string())
}

//==================================================================================
// 1. Plain Primitive Kinds
//==================================================================================

macro_rules! primitive_kind {
    (
        $(#[$doc:meta])*
        $name:ident, $arrow:ty, $logical:expr, $variant:ident,
        { $($pat:pat => $conv:expr),+ $(,)? }
    ) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $name;

        impl ColumnKind for $name {
            type Native = <$arrow as ArrowPrimitiveType>::Native;
            type Builder = PrimitiveBuilder<$arrow>;
            type Array = PrimitiveArray<$arrow>;

            fn logical_type(&self) -> LogicalType {
                $logical
            }

            fn encode(&self, value: Value) -> Result<Self::Native, ConvError> {
                match value {
                    $($pat => Ok($conv),)+
                    other => Err(reject(self, &other)),
                }
            }

            fn append(&self, builder: &mut Self::Builder, values: &[Self::Native], validity: &[bool]) {
                builder.append_values(values, validity);
            }

            fn decode(&self, array: &Self::Array, row: usize) -> Result<Value, ConvError> {
                Ok(Value::$variant(array.value(row)))
            }
        }
    };
}

primitive_kind!(
    /// Accepts `Int32`.
    Int32Kind, Int32Type, LogicalType::Int32, Int32,
    { Value::Int32(v) => v }
);

primitive_kind!(
    /// Accepts `Int32` (widened) and `Int64`.
    Int64Kind, Int64Type, LogicalType::Int64, Int64,
    { Value::Int32(v) => v as i64, Value::Int64(v) => v }
);

primitive_kind!(
    /// Accepts `UInt64`.
    UInt64Kind, UInt64Type, LogicalType::UInt64, UInt64,
    { Value::UInt64(v) => v }
);

primitive_kind!(
    /// Accepts `Float64` and `Int32` (exact in f64).
    Float64Kind, Float64Type, LogicalType::Float64, Float64,
    { Value::Float64(v) => v, Value::Int32(v) => v as f64 }
);

/// Accepts `Boolean`, and `Int32`/`Int64` holding exactly 0 or 1 (the way
/// MySQL drivers report `TINYINT(1)`).
#[derive(Debug, Clone, Copy, Default)]
pub struct BoolKind;

impl ColumnKind for BoolKind {
    type Native = bool;
    type Builder = BooleanBuilder;
    type Array = BooleanArray;

    fn logical_type(&self) -> LogicalType {
        LogicalType::Bool
    }

    fn encode(&self, value: Value) -> Result<bool, ConvError> {
        match value {
            Value::Boolean(v) => Ok(v),
            Value::Int32(0) | Value::Int64(0) => Ok(false),
            Value::Int32(1) | Value::Int64(1) => Ok(true),
            Value::Int32(v) => Err(ConvError::mismatch(format!("Int32({})", v), "Bool")),
            Value::Int64(v) => Err(ConvError::mismatch(format!("Int64({})", v), "Bool")),
            other => Err(reject(self, &other)),
        }
    }

    fn append(&self, builder: &mut BooleanBuilder, values: &[bool], validity: &[bool]) {
        builder.append_values(values, validity);
    }

    fn decode(&self, array: &BooleanArray, row: usize) -> Result<Value, ConvError> {
        Ok(Value::Boolean(array.value(row)))
    }
}

/// Accepts `Utf8`, and `Bytes` holding valid UTF-8.
#[derive(Debug, Clone, Copy, Default)]
pub struct Utf8Kind;

impl ColumnKind for Utf8Kind {
    type Native = String;
    type Builder = StringBuilder;
    type Array = StringArray;

    fn logical_type(&self) -> LogicalType {
        LogicalType::String
    }

    fn encode(&self, value: Value) -> Result<String, ConvError> {
        match value {
            Value::Utf8(v) => Ok(v),
            Value::Bytes(bytes) => String::from_utf8(bytes)
                .map_err(|_| ConvError::mismatch("Bytes (invalid UTF-8)", "String")),
            other => Err(reject(self, &other)),
        }
    }

    fn append(&self, builder: &mut StringBuilder, values: &[String], validity: &[bool]) {
        for (value, valid) in values.iter().zip(validity) {
            if *valid {
                builder.append_value(value);
            } else {
                builder.append_null();
            }
        }
    }

    fn decode(&self, array: &StringArray, row: usize) -> Result<Value, ConvError> {
        Ok(Value::Utf8(array.value(row).to_string()))
    }
}

//==================================================================================
// 2. Codec-Backed Kinds
//==================================================================================

/// Decimal128 with precision and scale fixed for the column.
///
/// Accepts `Decimal` (rescaled half up), `Utf8`/`Bytes` decimal text (parsed
/// half up), and `Int32`/`Int64`. Every accepted value is checked against the
/// column precision before it is buffered.
#[derive(Debug, Clone, Copy)]
pub struct DecimalKind {
    precision: u8,
    scale: i8,
}

impl DecimalKind {
    pub fn new(precision: u8, scale: i8) -> Self {
        Self { precision, scale }
    }

    fn coefficient(&self, decimal: DecimalValue) -> Result<i128, ConvError> {
        Ok(decimal
            .rescale(self.scale)?
            .check_precision(self.precision)?
            .coefficient())
    }
}

impl ColumnKind for DecimalKind {
    type Native = i128;
    type Builder = Decimal128Builder;
    type Array = Decimal128Array;

    fn logical_type(&self) -> LogicalType {
        LogicalType::Decimal {
            precision: self.precision,
            scale: self.scale,
        }
    }

    fn encode(&self, value: Value) -> Result<i128, ConvError> {
        match value {
            Value::Decimal(d) => self.coefficient(d),
            Value::Utf8(text) => self.coefficient(DecimalValue::parse_with_scale(&text, self.scale)?),
            Value::Bytes(bytes) => {
                let text = std::str::from_utf8(&bytes)
                    .map_err(|_| ConvError::mismatch("Bytes (invalid UTF-8)", "decimal literal"))?;
                self.coefficient(DecimalValue::parse_with_scale(text, self.scale)?)
            }
            Value::Int32(v) => self.coefficient(DecimalValue::new(v as i128, 0)?),
            Value::Int64(v) => self.coefficient(DecimalValue::new(v as i128, 0)?),
            other => Err(reject(self, &other)),
        }
    }

    fn append(&self, builder: &mut Decimal128Builder, values: &[i128], validity: &[bool]) {
        builder.append_values(values, validity);
    }

    fn decode(&self, array: &Decimal128Array, row: usize) -> Result<Value, ConvError> {
        Ok(Value::Decimal(DecimalValue::new(array.value(row), self.scale)?))
    }
}

/// Timestamp ticks at the unit of `T`.
///
/// Accepts `Timestamp`, `NaiveTimestamp` (read as UTC) and `Date` (midnight
/// UTC). Decodes to `Value::Timestamp`.
#[derive(Debug, Clone, Copy)]
pub struct TimestampKind<T> {
    _unit: PhantomData<fn() -> T>,
}

impl<T: ArrowTimestampType> TimestampKind<T> {
    pub fn new() -> Self {
        Self { _unit: PhantomData }
    }
}

impl<T: ArrowTimestampType> Default for TimestampKind<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ArrowTimestampType> ColumnKind for TimestampKind<T> {
    type Native = i64;
    type Builder = PrimitiveBuilder<T>;
    type Array = PrimitiveArray<T>;

    fn logical_type(&self) -> LogicalType {
        LogicalType::Timestamp(T::UNIT)
    }

    fn encode(&self, value: Value) -> Result<i64, ConvError> {
        let instant: DateTime<Utc> = match value {
            Value::Timestamp(v) => v,
            Value::NaiveTimestamp(v) => v.and_utc(),
            Value::Date(v) => midnight_utc(&v)?,
            other => return Err(reject(self, &other)),
        };
        temporal::instant_to_ticks(&instant, T::UNIT)
    }

    fn append(&self, builder: &mut PrimitiveBuilder<T>, values: &[i64], validity: &[bool]) {
        builder.append_values(values, validity);
    }

    fn decode(&self, array: &PrimitiveArray<T>, row: usize) -> Result<Value, ConvError> {
        Ok(Value::Timestamp(temporal::ticks_to_instant(array.value(row), T::UNIT)?))
    }
}

/// Calendar dates as days since the epoch.
///
/// Accepts `Date`, and the date part of `Timestamp`/`NaiveTimestamp`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateKind;

impl ColumnKind for DateKind {
    type Native = i32;
    type Builder = Date32Builder;
    type Array = Date32Array;

    fn logical_type(&self) -> LogicalType {
        LogicalType::Date
    }

    fn encode(&self, value: Value) -> Result<i32, ConvError> {
        let date = match value {
            Value::Date(v) => v,
            Value::Timestamp(v) => v.date_naive(),
            Value::NaiveTimestamp(v) => v.date(),
            other => return Err(reject(self, &other)),
        };
        Ok(temporal::date_to_days(&date))
    }

    fn append(&self, builder: &mut Date32Builder, values: &[i32], validity: &[bool]) {
        builder.append_values(values, validity);
    }

    fn decode(&self, array: &Date32Array, row: usize) -> Result<Value, ConvError> {
        Ok(Value::Date(temporal::days_to_date(array.value(row))?))
    }
}

fn midnight_utc(date: &NaiveDate) -> Result<DateTime<Utc>, ConvError> {
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc())
        .ok_or_else(|| ConvError::InternalError(format!("no midnight on {}", date)))
}
