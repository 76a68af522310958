// In: src/bridge/mod.rs

// ====================================================================================
// ARCHITECTURAL OVERVIEW: The Bridge Layer
// ====================================================================================
//
// The `bridge` connects the handler layer to the outside world. Three kinds of
// data cross it: SQL result sets, tagged Rust records and Parquet files. None
// of them is converted here value by value; every conversion is delegated to
// the handlers built by the `TypeMapper` and driven by a `HandlerManager`.
//
// Data Flow (into the container):
//
//   1. [Row Source (sql::RowSource) | Records (records::RecordCodec)]
//         |
//         `-> column metadata or record layout -> TypeMapper -> one WriteHandler per column
//         |
//   2. [WriteManager::add_row]              -> each value routed to its handler by position
//         |
//   3. [WriteManager::finish]               -> RecordBuilder -> `RecordBatch`
//         |
//   4. [container::write_parquet]           -> Parquet bytes (encoding owned by the writer)
//
//
// Data Flow (out of the container):
//
//   1. [container::read_parquet_*]          -> `ChunkedTable` (one chunk per decoded batch)
//         |
//   2. [ReadManager]                        -> one bound ReadHandler per column
//         |
//         `-> rows reconstructed in lockstep across every column
//         |
//   3. [sql::RowSink | records::RecordCodec::decode] -> rows or records
//
// ====================================================================================
pub mod container;
pub mod records;
pub mod sql;

// --- Container I/O ---
pub use container::{
    read_parquet_file, read_parquet_from_memory, write_parquet, write_parquet_file,
    write_parquet_to_memory,
};

// --- Records ---
pub use records::{decode_records, encode_records, read_records_parquet, write_records_parquet, RecordCodec};

// --- SQL ---
pub use sql::{drain_table_into, MemoryRowSource, RowSink, RowSource, SqlConverter};
