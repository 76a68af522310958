// In: src/value.rs

//! The dynamically-typed cell that flows into `add` and out of `decode`.
//!
//! Row sources (SQL cursors, record getters) produce `Value`s, write handlers
//! accept a documented subset of them, and read handlers return exactly one
//! variant per logical type (or `Value::Null`).

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::codec::DecimalValue;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// The null sentinel.
    Null,
    Boolean(bool),
    Int32(i32),
    Int64(i64),
    UInt64(u64),
    Float64(f64),
    Utf8(String),
    /// Raw bytes as delivered by a SQL driver, e.g. `NUMERIC` or `VARCHAR` text.
    Bytes(Vec<u8>),
    Decimal(DecimalValue),
    Timestamp(DateTime<Utc>),
    /// A zone-less date-time. Handlers read it as UTC.
    NaiveTimestamp(NaiveDateTime),
    Date(NaiveDate),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// The variant name, used in `TypeMismatch` messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "Null",
            Value::Boolean(_) => "Boolean",
            Value::Int32(_) => "Int32",
            Value::Int64(_) => "Int64",
            Value::UInt64(_) => "UInt64",
            Value::Float64(_) => "Float64",
            Value::Utf8(_) => "Utf8",
            Value::Bytes(_) => "Bytes",
            Value::Decimal(_) => "Decimal",
            Value::Timestamp(_) => "Timestamp",
            Value::NaiveTimestamp(_) => "NaiveTimestamp",
            Value::Date(_) => "Date",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("NULL"),
            Value::Boolean(v) => write!(f, "{}", v),
            Value::Int32(v) => write!(f, "{}", v),
            Value::Int64(v) => write!(f, "{}", v),
            Value::UInt64(v) => write!(f, "{}", v),
            Value::Float64(v) => write!(f, "{}", v),
            Value::Utf8(v) => write!(f, "{:?}", v),
            Value::Bytes(v) => write!(f, "<{} bytes>", v.len()),
            Value::Decimal(v) => write!(f, "{}", v),
            Value::Timestamp(v) => write!(f, "{}", v.to_rfc3339()),
            Value::NaiveTimestamp(v) => write!(f, "{}", v),
            Value::Date(v) => write!(f, "{}", v),
        }
    }
}

macro_rules! impl_from_for_value {
    ($variant:ident, $ty:ty) => {
        impl From<$ty> for Value {
            fn from(v: $ty) -> Self {
                Value::$variant(v)
            }
        }
    };
}

impl_from_for_value!(Boolean, bool);
impl_from_for_value!(Int32, i32);
impl_from_for_value!(Int64, i64);
impl_from_for_value!(UInt64, u64);
impl_from_for_value!(Float64, f64);
impl_from_for_value!(Utf8, String);
impl_from_for_value!(Bytes, Vec<u8>);
impl_from_for_value!(Decimal, DecimalValue);
impl_from_for_value!(Timestamp, DateTime<Utc>);
impl_from_for_value!(NaiveTimestamp, NaiveDateTime);
impl_from_for_value!(Date, NaiveDate);

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Utf8(v.to_string())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}
