// In: src/bridge/records.rs

//! Tagged records to and from tables.
//!
//! A `RecordCodec<T>` compiles the layout of `T` once and reuses it for every
//! batch. Encoding routes each record's getters through a write manager.
//! Decoding binds one read handler per layout entry, then assigns each
//! decoded row to a fresh `T::default()` through the setters, by position.

use std::io::Write;
use std::marker::PhantomData;

use arrow::record_batch::RecordBatch;
use bytes::Bytes;
use hashbrown::HashSet;

use crate::bridge::container::{read_parquet_from_memory, write_parquet};
use crate::column::{ChunkedColumn, ChunkedTable};
use crate::error::ConvError;
use crate::manager::{ReadManager, WriteManager};
use crate::mapper::TypeMapper;
use crate::record::{ColumnSelector, LayoutEntry, RecordLayout, TaggedRecord};

pub struct RecordCodec<T> {
    layout: RecordLayout<T>,
    mapper: TypeMapper,
    _record: PhantomData<fn() -> T>,
}

impl<T: TaggedRecord> RecordCodec<T> {
    pub fn new(mapper: TypeMapper) -> Result<Self, ConvError> {
        let layout = RecordLayout::compile(&mapper)?;
        Ok(Self {
            layout,
            mapper,
            _record: PhantomData,
        })
    }

    pub fn layout(&self) -> &RecordLayout<T> {
        &self.layout
    }

    /// Builds one batch holding `records` in order.
    pub fn encode(&self, records: &[T]) -> Result<RecordBatch, ConvError> {
        let mut manager = WriteManager::from_descriptors(self.layout.descriptors(), &self.mapper);
        for record in records {
            manager.add_row(self.layout.row_of(record))?;
        }
        manager.finish()
    }

    /// Reconstructs one record per table row.
    ///
    /// Every layout entry must find its column. Table columns that no entry
    /// claims are skipped, or rejected with `FieldNotFound` when the mapper's
    /// config has `ignore_unknown_columns` off.
    pub fn decode(&self, table: &ChunkedTable) -> Result<Vec<T>, ConvError> {
        let mut manager = ReadManager::new();
        let mut claimed = HashSet::with_capacity(self.layout.len());

        for entry in self.layout.entries() {
            let (position, column) = locate(table, entry)?;
            if !claimed.insert(position) {
                return Err(ConvError::InvalidTag(format!(
                    "field `{}` maps to column '{}', which another field already reads",
                    entry.field_name,
                    column.name()
                )));
            }
            let mut reader = self.mapper.reader_for(self.mapper.map_arrow_field(column.field())?);
            reader.bind(column)?;
            manager.add_handler(reader);
        }

        if !self.mapper.config().ignore_unknown_columns {
            if let Some(unknown) = table
                .columns()
                .iter()
                .enumerate()
                .find(|(i, _)| !claimed.contains(i))
            {
                return Err(ConvError::FieldNotFound(format!(
                    "column '{}' has no field in {}",
                    unknown.1.name(),
                    std::any::type_name::<T>()
                )));
            }
        }

        let entries = self.layout.entries();
        let mut records = Vec::with_capacity(table.num_rows());
        manager.for_each_row(|row| {
            let mut record = T::default();
            for (entry, value) in entries.iter().zip(row) {
                (entry.setter)(&mut record, value.clone()).map_err(|e| e.in_column(&entry.descriptor.name))?;
            }
            records.push(record);
            Ok(())
        })?;
        Ok(records)
    }
}

fn locate<'a, T>(table: &'a ChunkedTable, entry: &LayoutEntry<T>) -> Result<(usize, &'a ChunkedColumn), ConvError> {
    match &entry.selector {
        ColumnSelector::Name(name) => table.unique_column(name).map_err(|e| match e {
            ConvError::FieldNotFound(msg) => {
                ConvError::FieldNotFound(format!("field `{}`: {}", entry.field_name, msg))
            }
            other => other,
        }),
        ColumnSelector::Position(position) => table
            .column(*position)
            .map(|column| (*position, column))
            .ok_or_else(|| {
                ConvError::FieldNotFound(format!(
                    "no column at position {} for field `{}` (table has {})",
                    position,
                    entry.field_name,
                    table.num_columns()
                ))
            }),
    }
}

//==================================================================================
// One-shot helpers
//==================================================================================

pub fn encode_records<T: TaggedRecord>(records: &[T], mapper: &TypeMapper) -> Result<RecordBatch, ConvError> {
    RecordCodec::<T>::new(mapper.clone())?.encode(records)
}

pub fn decode_records<T: TaggedRecord>(table: &ChunkedTable, mapper: &TypeMapper) -> Result<Vec<T>, ConvError> {
    RecordCodec::<T>::new(mapper.clone())?.decode(table)
}

/// Encodes `records` and writes them as one Parquet file into `writer`.
pub fn write_records_parquet<T: TaggedRecord, W: Write + Send>(
    records: &[T],
    writer: W,
    mapper: &TypeMapper,
) -> Result<(), ConvError> {
    let batch = encode_records(records, mapper)?;
    write_parquet(writer, batch.schema(), &[batch], &mapper.config().container)
}

pub fn read_records_parquet<T: TaggedRecord>(data: Bytes, mapper: &TypeMapper) -> Result<Vec<T>, ConvError> {
    let table = read_parquet_from_memory(data, &mapper.config().container)?;
    decode_records(&table, mapper)
}
