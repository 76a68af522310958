// In: src/record/native.rs

//! Rust field types that can sit in a tagged record.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::codec::DecimalValue;
use crate::error::ConvError;
use crate::mapper::DeclaredType;
use crate::value::Value;

/// A field type with a declared-type tag and a `Value` conversion each way.
///
/// `from_value` receives whatever the bound column decodes to, which can be
/// wider than `to_value` produces (e.g. an `i16` field read from an `Int64`
/// column). `Value::Null` is only accepted by `Option<T>`.
pub trait ArrowNative: Sized {
    const DECLARED: DeclaredType;
    const NULLABLE: bool = false;

    fn to_value(&self) -> Value;

    fn from_value(value: Value) -> Result<Self, ConvError>;
}

fn unexpected(value: &Value, target: &str) -> ConvError {
    ConvError::mismatch(value.kind_name(), target)
}

fn out_of_range(value: impl std::fmt::Display, target: &str) -> ConvError {
    ConvError::ConversionOverflow(format!("{} does not fit in {}", value, target))
}

macro_rules! impl_integer_native {
    ($ty:ty, $declared:ident, $variant:ident) => {
        impl ArrowNative for $ty {
            const DECLARED: DeclaredType = DeclaredType::$declared;

            fn to_value(&self) -> Value {
                Value::$variant((*self).into())
            }

            fn from_value(value: Value) -> Result<Self, ConvError> {
                let target = stringify!($ty);
                match value {
                    Value::Int32(v) => <$ty>::try_from(v).map_err(|_| out_of_range(v, target)),
                    Value::Int64(v) => <$ty>::try_from(v).map_err(|_| out_of_range(v, target)),
                    Value::UInt64(v) => <$ty>::try_from(v).map_err(|_| out_of_range(v, target)),
                    other => Err(unexpected(&other, target)),
                }
            }
        }
    };
}

impl_integer_native!(i8, Int8, Int32);
impl_integer_native!(i16, Int16, Int32);
impl_integer_native!(i32, Int32, Int32);
impl_integer_native!(i64, Int64, Int64);
impl_integer_native!(u8, UInt8, Int64);
impl_integer_native!(u16, UInt16, Int64);
impl_integer_native!(u32, UInt32, Int64);
impl_integer_native!(u64, UInt64, UInt64);

impl ArrowNative for bool {
    const DECLARED: DeclaredType = DeclaredType::Bool;

    fn to_value(&self) -> Value {
        Value::Boolean(*self)
    }

    fn from_value(value: Value) -> Result<Self, ConvError> {
        match value {
            Value::Boolean(v) => Ok(v),
            other => Err(unexpected(&other, "bool")),
        }
    }
}

impl ArrowNative for f64 {
    const DECLARED: DeclaredType = DeclaredType::Float64;

    fn to_value(&self) -> Value {
        Value::Float64(*self)
    }

    fn from_value(value: Value) -> Result<Self, ConvError> {
        match value {
            Value::Float64(v) => Ok(v),
            Value::Int32(v) => Ok(v as f64),
            // Display-only approximation of an exact decimal.
            Value::Decimal(d) => Ok(d.to_f64()),
            other => Err(unexpected(&other, "f64")),
        }
    }
}

impl ArrowNative for f32 {
    const DECLARED: DeclaredType = DeclaredType::Float32;

    fn to_value(&self) -> Value {
        Value::Float64(*self as f64)
    }

    fn from_value(value: Value) -> Result<Self, ConvError> {
        f64::from_value(value).map(|v| v as f32)
    }
}

impl ArrowNative for String {
    const DECLARED: DeclaredType = DeclaredType::String;

    fn to_value(&self) -> Value {
        Value::Utf8(self.clone())
    }

    fn from_value(value: Value) -> Result<Self, ConvError> {
        match value {
            Value::Utf8(v) => Ok(v),
            Value::Decimal(d) => Ok(d.to_string()),
            other => Err(unexpected(&other, "String")),
        }
    }
}

impl ArrowNative for Vec<u8> {
    const DECLARED: DeclaredType = DeclaredType::Bytes;

    fn to_value(&self) -> Value {
        Value::Bytes(self.clone())
    }

    fn from_value(value: Value) -> Result<Self, ConvError> {
        match value {
            Value::Bytes(v) => Ok(v),
            Value::Utf8(v) => Ok(v.into_bytes()),
            other => Err(unexpected(&other, "Vec<u8>")),
        }
    }
}

impl ArrowNative for DecimalValue {
    const DECLARED: DeclaredType = DeclaredType::Decimal;

    fn to_value(&self) -> Value {
        Value::Decimal(*self)
    }

    fn from_value(value: Value) -> Result<Self, ConvError> {
        match value {
            Value::Decimal(v) => Ok(v),
            Value::Utf8(v) => v.parse(),
            Value::Int32(v) => DecimalValue::new(v as i128, 0),
            Value::Int64(v) => DecimalValue::new(v as i128, 0),
            other => Err(unexpected(&other, "DecimalValue")),
        }
    }
}

fn midnight(date: NaiveDate) -> Result<NaiveDateTime, ConvError> {
    date.and_hms_opt(0, 0, 0)
        .ok_or_else(|| ConvError::InternalError(format!("no midnight on {}", date)))
}

impl ArrowNative for DateTime<Utc> {
    const DECLARED: DeclaredType = DeclaredType::DateTimeUtc;

    fn to_value(&self) -> Value {
        Value::Timestamp(*self)
    }

    fn from_value(value: Value) -> Result<Self, ConvError> {
        match value {
            Value::Timestamp(v) => Ok(v),
            Value::NaiveTimestamp(v) => Ok(v.and_utc()),
            Value::Date(v) => Ok(midnight(v)?.and_utc()),
            other => Err(unexpected(&other, "DateTime<Utc>")),
        }
    }
}

impl ArrowNative for NaiveDateTime {
    const DECLARED: DeclaredType = DeclaredType::NaiveDateTime;

    fn to_value(&self) -> Value {
        Value::NaiveTimestamp(*self)
    }

    fn from_value(value: Value) -> Result<Self, ConvError> {
        match value {
            Value::Timestamp(v) => Ok(v.naive_utc()),
            Value::NaiveTimestamp(v) => Ok(v),
            Value::Date(v) => midnight(v),
            other => Err(unexpected(&other, "NaiveDateTime")),
        }
    }
}

impl ArrowNative for NaiveDate {
    const DECLARED: DeclaredType = DeclaredType::NaiveDate;

    fn to_value(&self) -> Value {
        Value::Date(*self)
    }

    fn from_value(value: Value) -> Result<Self, ConvError> {
        match value {
            Value::Date(v) => Ok(v),
            Value::Timestamp(v) => Ok(v.date_naive()),
            Value::NaiveTimestamp(v) => Ok(v.date()),
            other => Err(unexpected(&other, "NaiveDate")),
        }
    }
}

impl<T: ArrowNative> ArrowNative for Option<T> {
    const DECLARED: DeclaredType = T::DECLARED;
    const NULLABLE: bool = true;

    fn to_value(&self) -> Value {
        match self {
            Some(v) => v.to_value(),
            None => Value::Null,
        }
    }

    fn from_value(value: Value) -> Result<Self, ConvError> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}
