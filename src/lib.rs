//! This file is the root of the `arrowconv` Rust crate.
//!
//! arrowconv moves rows between SQL result sets, tagged Rust records, Arrow
//! record batches and Parquet files through one family of typed column
//! handlers. Its responsibilities here are limited to declaring the modules
//! and re-exporting the types most callers need.

//==================================================================================
// 0. Constants
//==================================================================================
/// The crate version, automatically set from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
//==================================================================================
// 1. Module Declarations
//==================================================================================
#[macro_use]
pub mod observability; // Make macros available throughout the crate

pub mod bridge;
pub mod codec;
pub mod column;
pub mod config;
pub mod error;
pub mod manager;
pub mod mapper;
pub mod record;
pub mod types;
pub mod value;


//==================================================================================
// 2. Public Re-exports
//==================================================================================
pub use codec::DecimalValue;
pub use column::{ChunkedColumn, ChunkedTable, ReadHandler, RecordBuilder, WriteHandler};
pub use config::{ContainerCompression, ContainerConfig, ConvConfig, DecimalOverflowPolicy};
pub use error::ConvError;
pub use manager::{HandlerManager, ReadManager, WriteManager};
pub use mapper::{DeclaredType, SqlColumn, SqlDialect, TypeMapper};
pub use observability::{init_logging, LogObserver, ValueObserver};
pub use record::{ArrowNative, RecordLayout, TaggedRecord};
pub use types::{FieldDescriptor, LogicalType};
pub use value::Value;
