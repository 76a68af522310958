//! This module defines the core, strongly-typed schema representations used
//! throughout arrowconv.
//!
//! It includes the closed `LogicalType` enum, which every handler is fixed to at
//! construction, and `FieldDescriptor`, the name/type/nullability triple that
//! derives one Arrow field of the output schema.

pub mod field;
pub mod logical_type;

// Re-export the main types for easier access.
pub use field::FieldDescriptor;
pub use logical_type::LogicalType;
