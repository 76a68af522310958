// In: src/mapper/record.rs

use std::fmt;

use arrow_schema::TimeUnit;

use super::TypeMapper;
use crate::error::ConvError;
use crate::types::LogicalType;

/// The Rust type a record field is declared with, `Option` stripped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclaredType {
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float32,
    Float64,
    String,
    Bytes,
    Decimal,
    DateTimeUtc,
    NaiveDateTime,
    NaiveDate,
}

impl fmt::Display for DeclaredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DeclaredType::Bool => "bool",
            DeclaredType::Int8 => "i8",
            DeclaredType::Int16 => "i16",
            DeclaredType::Int32 => "i32",
            DeclaredType::Int64 => "i64",
            DeclaredType::UInt8 => "u8",
            DeclaredType::UInt16 => "u16",
            DeclaredType::UInt32 => "u32",
            DeclaredType::UInt64 => "u64",
            DeclaredType::Float32 => "f32",
            DeclaredType::Float64 => "f64",
            DeclaredType::String => "String",
            DeclaredType::Bytes => "Vec<u8>",
            DeclaredType::Decimal => "DecimalValue",
            DeclaredType::DateTimeUtc => "DateTime<Utc>",
            DeclaredType::NaiveDateTime => "NaiveDateTime",
            DeclaredType::NaiveDate => "NaiveDate",
        };
        f.write_str(name)
    }
}

impl TypeMapper {
    /// Maps a record field's declared type, honouring an `arrow_type` override.
    ///
    /// An override outside the declared type's compatible set is an
    /// `UnsupportedType`, as is an override name this mapper does not know.
    pub fn map_declared_type(
        &self,
        declared: DeclaredType,
        arrow_type: Option<&str>,
    ) -> Result<LogicalType, ConvError> {
        match arrow_type.map(str::trim).filter(|s| !s.is_empty()) {
            None => Ok(self.default_declared_type(declared)),
            Some(name) => self.overridden_type(declared, name),
        }
    }

    fn default_declared_type(&self, declared: DeclaredType) -> LogicalType {
        use DeclaredType as D;
        match declared {
            D::Bool => LogicalType::Bool,
            D::Int8 | D::Int16 | D::Int32 => LogicalType::Int32,
            D::Int64 | D::UInt8 | D::UInt16 | D::UInt32 => LogicalType::Int64,
            D::UInt64 => LogicalType::UInt64,
            D::Float32 | D::Float64 => LogicalType::Float64,
            D::String | D::Bytes => LogicalType::String,
            D::Decimal => LogicalType::Decimal {
                precision: self.config().default_decimal_precision,
                scale: self.config().default_decimal_scale,
            },
            D::DateTimeUtc | D::NaiveDateTime => {
                LogicalType::Timestamp(self.config().record_timestamp_unit)
            }
            D::NaiveDate => LogicalType::Date,
        }
    }

    fn overridden_type(&self, declared: DeclaredType, name: &str) -> Result<LogicalType, ConvError> {
        let lowered = name.to_ascii_lowercase();
        let (logical, compatible) = match lowered.as_str() {
            "bool" => (LogicalType::Bool, BOOL_SOURCES),
            "int32" => (LogicalType::Int32, INT32_SOURCES),
            "int64" => (LogicalType::Int64, INT64_SOURCES),
            "uint64" => (LogicalType::UInt64, UINT64_SOURCES),
            "float64" => (LogicalType::Float64, FLOAT64_SOURCES),
            "utf8" | "string" => (LogicalType::String, STRING_SOURCES),
            "date32" | "date_32" | "date" => (LogicalType::Date, TEMPORAL_SOURCES),
            "timestamp_s" => (LogicalType::Timestamp(TimeUnit::Second), TEMPORAL_SOURCES),
            "timestamp_ms" => (LogicalType::Timestamp(TimeUnit::Millisecond), TEMPORAL_SOURCES),
            "timestamp_us" => (LogicalType::Timestamp(TimeUnit::Microsecond), TEMPORAL_SOURCES),
            "timestamp_ns" => (LogicalType::Timestamp(TimeUnit::Nanosecond), TEMPORAL_SOURCES),
            other => match parse_decimal_override(other) {
                Some((precision, scale)) => {
                    (self.decimal_type("decimal", precision, scale)?, DECIMAL_SOURCES)
                }
                None => {
                    return Err(ConvError::UnsupportedType(format!(
                        "unknown arrow_type override '{}'",
                        name
                    )))
                }
            },
        };

        if !compatible.contains(&declared) {
            return Err(ConvError::UnsupportedType(format!(
                "arrow_type '{}' cannot hold a field declared as {}",
                name, declared
            )));
        }
        Ok(logical)
    }
}

// Declared types each override can hold.
const BOOL_SOURCES: &[DeclaredType] = &[DeclaredType::Bool];
const INT32_SOURCES: &[DeclaredType] = &[DeclaredType::Int8, DeclaredType::Int16, DeclaredType::Int32];
const INT64_SOURCES: &[DeclaredType] = &[
    DeclaredType::Int8,
    DeclaredType::Int16,
    DeclaredType::Int32,
    DeclaredType::Int64,
    DeclaredType::UInt8,
    DeclaredType::UInt16,
    DeclaredType::UInt32,
];
const UINT64_SOURCES: &[DeclaredType] = &[DeclaredType::UInt64];
const FLOAT64_SOURCES: &[DeclaredType] = &[DeclaredType::Float32, DeclaredType::Float64];
const STRING_SOURCES: &[DeclaredType] = &[DeclaredType::String, DeclaredType::Bytes];
const TEMPORAL_SOURCES: &[DeclaredType] = &[
    DeclaredType::DateTimeUtc,
    DeclaredType::NaiveDateTime,
    DeclaredType::NaiveDate,
];
const DECIMAL_SOURCES: &[DeclaredType] = &[DeclaredType::Decimal, DeclaredType::String];

/// Parses `decimal(p,s)`.
fn parse_decimal_override(text: &str) -> Option<(i64, i64)> {
    let inner = text.strip_prefix("decimal(")?.strip_suffix(')')?;
    let (precision, scale) = inner.split_once(',')?;
    Some((precision.trim().parse().ok()?, scale.trim().parse().ok()?))
}
