//! This module defines the canonical, type-safe representation of a column's
//! logical type.

use crate::error::ConvError;
use arrow_schema::{DataType as ArrowDataType, TimeUnit};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The engine's internal type tag, independent of any SQL type name or Rust
/// field type.
///
/// The set is closed. A handler is fixed to exactly one variant for its whole
/// lifetime; decimal precision/scale and the timestamp unit are part of the
/// type, not of individual values.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalType {
    Bool,
    Int32,
    Int64,
    UInt64,
    Float64,
    String,
    Decimal { precision: u8, scale: i8 },
    Timestamp(TimeUnit),
    Date,
}

impl LogicalType {
    /// Converts an Arrow `DataType` into a `LogicalType`.
    ///
    /// Timestamps map regardless of time zone; values are always decoded as UTC.
    pub fn from_arrow_type(arrow_type: &ArrowDataType) -> Result<Self, ConvError> {
        match arrow_type {
            ArrowDataType::Boolean => Ok(Self::Bool),
            ArrowDataType::Int32 => Ok(Self::Int32),
            ArrowDataType::Int64 => Ok(Self::Int64),
            ArrowDataType::UInt64 => Ok(Self::UInt64),
            ArrowDataType::Float64 => Ok(Self::Float64),
            ArrowDataType::Utf8 => Ok(Self::String),
            ArrowDataType::Decimal128(precision, scale) => Ok(Self::Decimal {
                precision: *precision,
                scale: *scale,
            }),
            ArrowDataType::Timestamp(unit, _) => Ok(Self::Timestamp(*unit)),
            ArrowDataType::Date32 => Ok(Self::Date),
            dt => Err(ConvError::UnsupportedType(format!(
                "Cannot convert Arrow type {:?} to a logical type",
                dt
            ))),
        }
    }

    /// Converts a `LogicalType` back into an Arrow `DataType`.
    pub fn to_arrow_type(&self) -> ArrowDataType {
        match self {
            Self::Bool => ArrowDataType::Boolean,
            Self::Int32 => ArrowDataType::Int32,
            Self::Int64 => ArrowDataType::Int64,
            Self::UInt64 => ArrowDataType::UInt64,
            Self::Float64 => ArrowDataType::Float64,
            Self::String => ArrowDataType::Utf8,
            Self::Decimal { precision, scale } => ArrowDataType::Decimal128(*precision, *scale),
            Self::Timestamp(unit) => ArrowDataType::Timestamp(*unit, None),
            Self::Date => ArrowDataType::Date32,
        }
    }
}

impl fmt::Display for LogicalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decimal { precision, scale } => write!(f, "Decimal({}, {})", precision, scale),
            Self::Timestamp(unit) => write!(f, "Timestamp({:?})", unit),
            other => write!(f, "{:?}", other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arrow_type_roundtrip_for_every_variant() {
        let all = [
            LogicalType::Bool,
            LogicalType::Int32,
            LogicalType::Int64,
            LogicalType::UInt64,
            LogicalType::Float64,
            LogicalType::String,
            LogicalType::Decimal {
                precision: 10,
                scale: 2,
            },
            LogicalType::Timestamp(TimeUnit::Second),
            LogicalType::Timestamp(TimeUnit::Nanosecond),
            LogicalType::Date,
        ];
        for logical in all {
            let arrow_type = logical.to_arrow_type();
            assert_eq!(LogicalType::from_arrow_type(&arrow_type).unwrap(), logical);
        }
    }

    #[test]
    fn test_timezone_is_ignored_on_the_way_in() {
        let dt = ArrowDataType::Timestamp(TimeUnit::Millisecond, Some("+02:00".into()));
        assert_eq!(
            LogicalType::from_arrow_type(&dt).unwrap(),
            LogicalType::Timestamp(TimeUnit::Millisecond)
        );
    }

    #[test]
    fn test_unsupported_arrow_type() {
        let result = LogicalType::from_arrow_type(&ArrowDataType::Int16);
        assert!(matches!(result, Err(ConvError::UnsupportedType(_))));
    }

    #[test]
    fn test_display() {
        let dec = LogicalType::Decimal {
            precision: 10,
            scale: 2,
        };
        assert_eq!(dec.to_string(), "Decimal(10, 2)");
        assert_eq!(
            LogicalType::Timestamp(TimeUnit::Microsecond).to_string(),
            "Timestamp(Microsecond)"
        );
        assert_eq!(LogicalType::Int32.to_string(), "Int32");
    }
}
