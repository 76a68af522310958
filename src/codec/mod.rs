//! Value codecs shared by the handler family.
//!
//! These are pure, stateless conversions between the native Rust forms that
//! callers hand to `add` and the scaled integers stored in Arrow buffers. They
//! run only at ingestion and extraction boundaries, never mid-buffer.

/// Fixed-point decimal ⇄ scaled `i128` coefficient.
pub mod decimal;
/// Wall-clock instant ⇄ unit-scaled `i64` ticks, and calendar date ⇄ days.
pub mod temporal;

pub use decimal::{DecimalValue, MAX_DECIMAL_PRECISION};
