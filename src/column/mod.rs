// In: src/column/mod.rs

//! The TypeHandler family.
//!
//! A handler owns one `FieldDescriptor` and one ordinal index that must equal
//! its column's position in the schema, the `RecordBuilder` and the bound
//! table. It is oriented either for writing (`WriteHandler`: value buffer plus
//! validity track) or for reading (`ReadHandler`: a `ChunkCursor` over a bound
//! column), never both at once.
//!
//! Every logical type is served by the same two generic implementations,
//! `ColumnWriter<K>` and `ColumnReader<K>`; the per-type differences live in
//! the `ColumnKind` impls of `kinds`.

pub mod builder;
pub mod cursor;
pub mod kinds;
pub mod reader;
pub mod table;
pub mod writer;

pub use builder::RecordBuilder;
pub use cursor::ChunkCursor;
pub use reader::ColumnReader;
pub use table::{ChunkedColumn, ChunkedTable};
pub use writer::ColumnWriter;

use crate::error::ConvError;
use crate::types::FieldDescriptor;
use crate::value::Value;

/// Permission to reposition a handler. Only this crate can mint one, so a
/// handler's index cannot be changed from outside once a manager owns it.
///
/// ```compile_fail
/// let _ = arrowconv::column::IndexToken(());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct IndexToken(());

impl IndexToken {
    pub(crate) fn new() -> Self {
        Self(())
    }
}

/// Identity shared by both orientations.
pub trait Handler: Send {
    fn descriptor(&self) -> &FieldDescriptor;

    /// Column position. Assigned by `HandlerManager::add_handler`.
    fn index(&self) -> usize;

    fn set_index(&mut self, index: usize, token: IndexToken);
}

/// The write accumulator.
pub trait WriteHandler: Handler {
    /// Appends one value. `Value::Null` always succeeds and records a `false`
    /// validity slot; anything outside the column's convertible set fails with
    /// `TypeMismatch` and leaves the buffers untouched.
    fn add(&mut self, value: Value) -> Result<(), ConvError>;

    /// Bulk-flushes buffer and validity into the builder at `self.index()`.
    /// Single-shot: the buffers are drained.
    fn build(&mut self, builder: &mut RecordBuilder) -> Result<(), ConvError>;

    /// Values accumulated since construction or the last `build`.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The read cursor.
pub trait ReadHandler: Handler {
    /// Attaches the handler to a column and resets its cursor before row 0.
    fn bind(&mut self, column: &ChunkedColumn) -> Result<(), ConvError>;

    /// Moves to the next logical row. `false` once the column is exhausted.
    fn advance(&mut self) -> bool;

    /// The current row's value, `Value::Null` for an invalid slot.
    fn decode(&self) -> Result<Value, ConvError>;

    fn reset(&mut self);

    /// Rows in the bound column.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
