// In: src/error.rs

//! This module defines the single, unified error type for the entire arrowconv library.
//! Variants are derived with `thiserror`; foreign errors convert through `#[from]`.
//!
//! Every data error is returned to the immediate caller of accumulate, build or
//! extract. Nothing in this crate logs an error and carries on.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvError {
    // =========================================================================
    // === Handler-Layer Errors
    // =========================================================================
    /// A value's runtime shape is outside the handler's convertible set.
    #[error("Type mismatch in column '{column}': received {received}, expected {expected}")]
    TypeMismatch {
        column: String,
        received: String,
        expected: String,
    },

    /// No mapping exists from an external type description to a logical type.
    #[error("Unsupported type: {0}")]
    UnsupportedType(String),

    /// Columns of unequal length met during row reconstruction, or a row
    /// whose arity does not match the handler set.
    #[error("Schema cardinality error: {0}")]
    SchemaCardinalityError(String),

    /// A destination record and a table disagree on a column/tag name.
    #[error("Field not found: {0}")]
    FieldNotFound(String),

    /// A decimal or temporal value does not fit the representable range.
    #[error("Conversion overflow: {0}")]
    ConversionOverflow(String),

    #[error("Invalid `arrow` tag: {0}")]
    InvalidTag(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Internal logic error (this is a bug): {0}")]
    InternalError(String),

    // =========================================================================
    // === Wrapped Library Errors
    // =========================================================================
    /// An error originating from the Arrow library.
    #[error("Arrow operation failed: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// An error originating from the Parquet container reader or writer.
    #[error("Parquet operation failed: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An error from the Serde JSON library, typically while loading a config.
    #[error("Serde JSON error: {0}")]
    SerdeJson(#[from] serde_json::Error),
}

impl ConvError {
    /// Builds a `TypeMismatch` that is not yet attached to a column.
    /// Handlers fill the column in with [`ConvError::in_column`].
    pub fn mismatch(received: impl Into<String>, expected: impl Into<String>) -> Self {
        ConvError::TypeMismatch {
            column: String::new(),
            received: received.into(),
            expected: expected.into(),
        }
    }

    /// Attaches a column name to a `TypeMismatch`. Other variants pass through.
    pub fn in_column(self, name: &str) -> Self {
        match self {
            ConvError::TypeMismatch {
                received, expected, ..
            } => ConvError::TypeMismatch {
                column: name.to_string(),
                received,
                expected,
            },
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mismatch_names_both_types_and_column() {
        let err = ConvError::mismatch("Float64", "Int32").in_column("id");
        let msg = err.to_string();
        assert!(msg.contains("'id'"));
        assert!(msg.contains("received Float64"));
        assert!(msg.contains("expected Int32"));
    }

    #[test]
    fn test_in_column_leaves_other_variants_alone() {
        let err = ConvError::UnsupportedType("JSONB".into()).in_column("doc");
        assert!(matches!(err, ConvError::UnsupportedType(ref t) if t == "JSONB"));
    }
}
