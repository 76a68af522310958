// In: src/config.rs

//! The single source of truth for all arrowconv configuration.
//!
//! `ConvConfig` is created once at the application boundary (from JSON or in
//! code) and passed down through the system as a shared, read-only
//! `Arc<ConvConfig>`. Every field has a default, so an empty JSON object is a
//! valid configuration.

use arrow_schema::TimeUnit;
use serde::{Deserialize, Serialize};

use crate::error::ConvError;

//==================================================================================
// I. Core Configuration Enums & Structs
//==================================================================================

/// What the type mapper does when a declared decimal does not fit Decimal128.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DecimalOverflowPolicy {
    /// **Default:** clamp precision to 38 and scale to `clamped_decimal_scale`.
    /// Lossy. Every clamp is logged at `warn`.
    #[default]
    Clamp,
    /// Fail with `ConvError::ConversionOverflow`.
    Reject,
}

/// Page compression handed to the Parquet writer. The container owns the
/// codec; this only selects it.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ContainerCompression {
    Uncompressed,
    #[default]
    Snappy,
    Zstd,
}

/// Settings for the on-disk container boundary.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct ContainerConfig {
    #[serde(default)]
    pub compression: ContainerCompression,

    /// Upper bound on rows per Parquet row group.
    #[serde(default = "default_max_row_group_size")]
    pub max_row_group_size: usize,

    /// Rows per decoded record batch when reading. Each batch becomes one
    /// chunk of every column in the resulting `ChunkedTable`.
    #[serde(default = "default_read_batch_size")]
    pub read_batch_size: usize,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            compression: ContainerCompression::default(),
            max_row_group_size: default_max_row_group_size(),
            read_batch_size: default_read_batch_size(),
        }
    }
}

//==================================================================================
// II. The Unified ConvConfig
//==================================================================================

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct ConvConfig {
    /// Tick unit for SQL `TIMESTAMP`/`DATETIME` columns.
    #[serde(default = "default_timestamp_unit")]
    pub sql_timestamp_unit: TimeUnit,

    /// Tick unit for date-time record fields without an `arrow_type` override.
    #[serde(default = "default_timestamp_unit")]
    pub record_timestamp_unit: TimeUnit,

    /// Precision for `DecimalValue` record fields without an override.
    #[serde(default = "default_decimal_precision")]
    pub default_decimal_precision: u8,

    /// Scale for `DecimalValue` record fields without an override.
    #[serde(default = "default_decimal_scale")]
    pub default_decimal_scale: i8,

    #[serde(default)]
    pub decimal_overflow: DecimalOverflowPolicy,

    /// Scale ceiling applied when a decimal is clamped.
    #[serde(default = "default_clamped_decimal_scale")]
    pub clamped_decimal_scale: i8,

    /// If false, a table column with no matching record field raises
    /// `ConvError::FieldNotFound` during record decoding.
    #[serde(default = "default_true")]
    pub ignore_unknown_columns: bool,

    /// Initial capacity of every Arrow array builder.
    #[serde(default = "default_builder_capacity")]
    pub builder_capacity: usize,

    #[serde(default)]
    pub container: ContainerConfig,
}

impl Default for ConvConfig {
    fn default() -> Self {
        Self {
            sql_timestamp_unit: default_timestamp_unit(),
            record_timestamp_unit: default_timestamp_unit(),
            default_decimal_precision: default_decimal_precision(),
            default_decimal_scale: default_decimal_scale(),
            decimal_overflow: DecimalOverflowPolicy::default(),
            clamped_decimal_scale: default_clamped_decimal_scale(),
            ignore_unknown_columns: true,
            builder_capacity: default_builder_capacity(),
            container: ContainerConfig::default(),
        }
    }
}

impl ConvConfig {
    /// Parses a JSON document into a validated config.
    pub fn from_json_str(json: &str) -> Result<Self, ConvError> {
        let config: ConvConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects settings no handler can honour.
    pub fn validate(&self) -> Result<(), ConvError> {
        let max = arrow::datatypes::DECIMAL128_MAX_PRECISION;
        if self.default_decimal_precision == 0 || self.default_decimal_precision > max {
            return Err(ConvError::InvalidConfig(format!(
                "default_decimal_precision must be in 1..={}, got {}",
                max, self.default_decimal_precision
            )));
        }
        if self.default_decimal_scale < 0
            || self.default_decimal_scale as u8 > self.default_decimal_precision
        {
            return Err(ConvError::InvalidConfig(format!(
                "default_decimal_scale must be in 0..={}, got {}",
                self.default_decimal_precision, self.default_decimal_scale
            )));
        }
        if self.clamped_decimal_scale < 0 || self.clamped_decimal_scale as u8 > max {
            return Err(ConvError::InvalidConfig(format!(
                "clamped_decimal_scale must be in 0..={}, got {}",
                max, self.clamped_decimal_scale
            )));
        }
        if self.container.max_row_group_size == 0 || self.container.read_batch_size == 0 {
            return Err(ConvError::InvalidConfig(
                "container row group and read batch sizes must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_timestamp_unit() -> TimeUnit {
    TimeUnit::Microsecond
}

fn default_decimal_precision() -> u8 {
    38
}

fn default_decimal_scale() -> i8 {
    10
}

fn default_clamped_decimal_scale() -> i8 {
    8
}

/// Helper for `serde` to default a boolean field to true.
fn default_true() -> bool {
    true
}

fn default_builder_capacity() -> usize {
    1024
}

fn default_max_row_group_size() -> usize {
    128 * 1024
}

fn default_read_batch_size() -> usize {
    8192
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_yields_defaults() {
        let config = ConvConfig::from_json_str("{}").unwrap();
        assert_eq!(config, ConvConfig::default());
        assert_eq!(config.sql_timestamp_unit, TimeUnit::Microsecond);
        assert_eq!(config.decimal_overflow, DecimalOverflowPolicy::Clamp);
    }

    #[test]
    fn test_partial_json_overrides() {
        let json = r#"{
            "decimal_overflow": "reject",
            "sql_timestamp_unit": "Millisecond",
            "container": { "compression": "zstd", "read_batch_size": 2 }
        }"#;
        let config = ConvConfig::from_json_str(json).unwrap();
        assert_eq!(config.decimal_overflow, DecimalOverflowPolicy::Reject);
        assert_eq!(config.sql_timestamp_unit, TimeUnit::Millisecond);
        assert_eq!(config.container.compression, ContainerCompression::Zstd);
        assert_eq!(config.container.read_batch_size, 2);
        assert_eq!(config.container.max_row_group_size, 128 * 1024);
    }

    #[test]
    fn test_zero_batch_size_is_rejected() {
        let result = ConvConfig::from_json_str(r#"{ "container": { "read_batch_size": 0 } }"#);
        assert!(matches!(result, Err(ConvError::InvalidConfig(_))));
    }

    #[test]
    fn test_bad_default_scale_is_rejected() {
        let result = ConvConfig::from_json_str(
            r#"{ "default_decimal_precision": 5, "default_decimal_scale": 6 }"#,
        );
        assert!(matches!(result, Err(ConvError::InvalidConfig(_))));
    }

    #[test]
    fn test_malformed_json_surfaces_serde_error() {
        let result = ConvConfig::from_json_str("{ not json");
        assert!(matches!(result, Err(ConvError::SerdeJson(_))));
    }
}
