// In: src/manager.rs

//! The HandlerManager.
//!
//! Owns an ordered handler collection. Handler order, column order and schema
//! field order are the same thing: fixed once by `add_handler` and never
//! changed afterwards.
//!
//! The write orientation routes row values into handlers and flushes them
//! into a `RecordBuilder`. The read orientation binds handlers to a
//! `ChunkedTable` and walks every handler in lockstep, one logical row at a
//! time.

use std::sync::Arc;

use arrow::datatypes::{Schema, SchemaRef};
use arrow::record_batch::RecordBatch;

use crate::column::{ChunkedTable, Handler, IndexToken, ReadHandler, RecordBuilder, WriteHandler};
use crate::error::ConvError;
use crate::mapper::TypeMapper;
use crate::observability::ValueObserver;
use crate::types::FieldDescriptor;
use crate::value::Value;

pub struct HandlerManager<H: ?Sized> {
    handlers: Vec<Box<H>>,
    observer: Option<Arc<dyn ValueObserver>>,
}

/// A manager of write accumulators.
pub type WriteManager = HandlerManager<dyn WriteHandler>;
/// A manager of read cursors.
pub type ReadManager = HandlerManager<dyn ReadHandler>;

impl<H: Handler + ?Sized> Default for HandlerManager<H> {
    fn default() -> Self {
        Self {
            handlers: Vec::new(),
            observer: None,
        }
    }
}

impl<H: Handler + ?Sized> HandlerManager<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a per-value observer. Without one, the row loops do no
    /// per-value work beyond the conversion itself.
    pub fn with_observer(mut self, observer: Arc<dyn ValueObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Appends a handler and assigns it the next position.
    pub fn add_handler(&mut self, mut handler: Box<H>) {
        handler.set_index(self.handlers.len(), IndexToken::new());
        self.handlers.push(handler);
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    pub fn handlers(&self) -> &[Box<H>] {
        &self.handlers
    }

    /// Mutable access to one handler. Its position stays fixed: repositioning
    /// takes an `IndexToken`, which only this crate can create.
    pub fn handler_mut(&mut self, index: usize) -> Option<&mut H> {
        self.handlers.get_mut(index).map(|h| h.as_mut())
    }

    pub fn descriptors(&self) -> Vec<FieldDescriptor> {
        self.handlers.iter().map(|h| h.descriptor().clone()).collect()
    }

    /// The ordered schema derived from every handler's descriptor.
    pub fn schema(&self) -> SchemaRef {
        let fields: Vec<_> = self
            .handlers
            .iter()
            .map(|h| h.descriptor().to_arrow_field())
            .collect();
        Arc::new(Schema::new(fields))
    }
}

//==================================================================================
// 1. Write Orientation
//==================================================================================

impl HandlerManager<dyn WriteHandler> {
    /// One write handler per descriptor, in order.
    pub fn from_descriptors(descriptors: Vec<FieldDescriptor>, mapper: &TypeMapper) -> Self {
        let mut manager = Self::new();
        for descriptor in descriptors {
            manager.add_handler(mapper.writer_for(descriptor));
        }
        manager
    }

    /// Rows accumulated so far.
    pub fn num_rows(&self) -> usize {
        self.handlers.first().map_or(0, |h| h.len())
    }

    /// Routes one row's values to the handlers by position.
    ///
    /// On error some handlers may already hold this row's value; the caller
    /// must discard the whole batch.
    pub fn add_row(&mut self, row: Vec<Value>) -> Result<(), ConvError> {
        if row.len() != self.handlers.len() {
            return Err(ConvError::SchemaCardinalityError(format!(
                "row has {} values but {} columns are registered",
                row.len(),
                self.handlers.len()
            )));
        }
        let row_index = self.num_rows();
        for (handler, value) in self.handlers.iter_mut().zip(row) {
            match &self.observer {
                Some(observer) => {
                    let seen = value.clone();
                    handler.add(value)?;
                    observer.on_add(handler.descriptor(), row_index, &seen);
                }
                None => handler.add(value)?,
            }
        }
        Ok(())
    }

    /// Flushes every handler into `builder`, strictly in index order.
    pub fn build_record(&mut self, builder: &mut RecordBuilder) -> Result<(), ConvError> {
        if builder.num_fields() != self.handlers.len() {
            return Err(ConvError::SchemaCardinalityError(format!(
                "builder has {} fields but {} handlers are registered",
                builder.num_fields(),
                self.handlers.len()
            )));
        }
        for handler in self.handlers.iter_mut() {
            handler.build(builder)?;
        }
        Ok(())
    }

    /// Builds the accumulated rows into one `RecordBatch`.
    pub fn finish(&mut self) -> Result<RecordBatch, ConvError> {
        let rows = self.num_rows();
        let mut builder = RecordBuilder::new(self.schema(), rows);
        self.build_record(&mut builder)?;
        let batch = builder.finish()?;
        log_metric!("event" = "build_record", "columns" = batch.num_columns(), "rows" = batch.num_rows());
        Ok(batch)
    }
}

//==================================================================================
// 2. Read Orientation
//==================================================================================

impl HandlerManager<dyn ReadHandler> {
    /// One read handler per table column, in table order, already bound.
    ///
    /// Handler `i` is bound to column `i`, so tables with repeated column
    /// names (e.g. `SELECT a.id, b.id`) read every column.
    pub fn for_table(table: &ChunkedTable, mapper: &TypeMapper) -> Result<Self, ConvError> {
        let mut manager = Self::new();
        for column in table.columns() {
            let mut handler = mapper.reader_for(mapper.map_arrow_field(column.field())?);
            handler.bind(column)?;
            manager.add_handler(handler);
        }
        Ok(manager)
    }

    /// Binds each handler to the table column with its descriptor's name.
    ///
    /// A name missing from the table, or shared by more than one of its
    /// columns, is a `FieldNotFound`.
    pub fn bind_table(&mut self, table: &ChunkedTable) -> Result<(), ConvError> {
        for handler in self.handlers.iter_mut() {
            let (_, column) = table.unique_column(&handler.descriptor().name)?;
            handler.bind(column)?;
        }
        Ok(())
    }

    /// Fails when the bound columns do not all have the same length.
    ///
    /// Callers that stream rows to an external sink run this first, so a
    /// ragged table is refused before any row leaves the manager.
    pub fn check_cardinality(&self) -> Result<(), ConvError> {
        let mut lengths = self.handlers.iter().map(|h| (h.descriptor().name.as_str(), h.len()));
        let Some((first_name, first_len)) = lengths.next() else {
            return Ok(());
        };
        for (name, len) in lengths {
            if len != first_len {
                return Err(ConvError::SchemaCardinalityError(format!(
                    "column '{}' has {} rows but column '{}' has {}",
                    name, len, first_name, first_len
                )));
            }
        }
        Ok(())
    }

    /// Rewinds every handler before its first row.
    pub fn reset(&mut self) {
        for handler in self.handlers.iter_mut() {
            handler.reset();
        }
    }

    /// Advances every handler one row and decodes it into `row`.
    ///
    /// Returns `Ok(false)` once all handlers are exhausted together. If only
    /// some are, the table is ragged and the result is a
    /// `SchemaCardinalityError`; nothing is decoded for that row.
    pub fn next_row(&mut self, row_index: usize, row: &mut Vec<Value>) -> Result<bool, ConvError> {
        let mut exhausted = Vec::new();
        for handler in self.handlers.iter_mut() {
            if !handler.advance() {
                exhausted.push(handler.descriptor().name.clone());
            }
        }
        if exhausted.len() == self.handlers.len() {
            return Ok(false);
        }
        if !exhausted.is_empty() {
            return Err(ConvError::SchemaCardinalityError(format!(
                "column(s) {} ended at row {} while others still have rows",
                exhausted.join(", "),
                row_index
            )));
        }

        row.clear();
        for handler in self.handlers.iter() {
            let value = handler.decode()?;
            if let Some(observer) = &self.observer {
                observer.on_decode(handler.descriptor(), row_index, &value);
            }
            row.push(value);
        }
        Ok(true)
    }

    /// Calls `f` with every reconstructed row, from the first.
    /// Returns the number of rows visited.
    ///
    /// Column lengths are checked up front: a ragged table fails before `f`
    /// sees any row.
    pub fn for_each_row<F>(&mut self, mut f: F) -> Result<usize, ConvError>
    where
        F: FnMut(&[Value]) -> Result<(), ConvError>,
    {
        self.check_cardinality()?;
        self.reset();
        let mut row = Vec::with_capacity(self.handlers.len());
        let mut rows = 0;
        while self.next_row(rows, &mut row)? {
            f(&row)?;
            rows += 1;
        }
        log_metric!("event" = "extract_rows", "columns" = self.handlers.len(), "rows" = rows);
        Ok(rows)
    }

    /// Reconstructs every row. A ragged table yields an error, never a
    /// truncated or padded result.
    pub fn extract_rows(&mut self) -> Result<Vec<Vec<Value>>, ConvError> {
        let mut rows = Vec::new();
        self.for_each_row(|row| {
            rows.push(row.to_vec());
            Ok(())
        })?;
        Ok(rows)
    }
}
