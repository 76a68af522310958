// In: src/bridge/container.rs

//! The container boundary: Parquet files through the `parquet` crate's Arrow
//! integration. The physical encoding is entirely the writer's business; this
//! module only selects writer settings and shapes what the reader yields into
//! a `ChunkedTable`.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use arrow::datatypes::SchemaRef;
use arrow::error::ArrowError;
use arrow::record_batch::RecordBatch;
use bytes::Bytes;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ArrowWriter;
use parquet::basic::{Compression, ZstdLevel};
use parquet::file::properties::WriterProperties;
use parquet::file::reader::ChunkReader;

use crate::column::ChunkedTable;
use crate::config::{ContainerCompression, ContainerConfig};
use crate::error::ConvError;

fn writer_properties(config: &ContainerConfig) -> WriterProperties {
    let compression = match config.compression {
        ContainerCompression::Uncompressed => Compression::UNCOMPRESSED,
        ContainerCompression::Snappy => Compression::SNAPPY,
        ContainerCompression::Zstd => Compression::ZSTD(ZstdLevel::default()),
    };
    WriterProperties::builder()
        .set_compression(compression)
        .set_max_row_group_size(config.max_row_group_size)
        .build()
}

/// Writes `batches` as one Parquet file into `writer`.
pub fn write_parquet<W: Write + Send>(
    writer: W,
    schema: SchemaRef,
    batches: &[RecordBatch],
    config: &ContainerConfig,
) -> Result<(), ConvError> {
    let mut arrow_writer = ArrowWriter::try_new(writer, schema, Some(writer_properties(config)))?;
    for batch in batches {
        arrow_writer.write(batch)?;
    }
    arrow_writer.close()?;
    log_metric!(
        "event" = "write_parquet",
        "batches" = batches.len(),
        "rows" = batches.iter().map(|b| b.num_rows()).sum::<usize>()
    );
    Ok(())
}

pub fn write_parquet_to_memory(
    schema: SchemaRef,
    batches: &[RecordBatch],
    config: &ContainerConfig,
) -> Result<Bytes, ConvError> {
    let mut buffer = Vec::new();
    write_parquet(&mut buffer, schema, batches, config)?;
    Ok(Bytes::from(buffer))
}

pub fn write_parquet_file(
    path: impl AsRef<Path>,
    schema: SchemaRef,
    batches: &[RecordBatch],
    config: &ContainerConfig,
) -> Result<(), ConvError> {
    let file = File::create(path)?;
    write_parquet(file, schema, batches, config)
}

/// Reads Parquet bytes into a table. Each decoded batch of at most
/// `read_batch_size` rows becomes one chunk of every column.
pub fn read_parquet_from_memory(data: Bytes, config: &ContainerConfig) -> Result<ChunkedTable, ConvError> {
    read_chunked(data, config)
}

pub fn read_parquet_file(path: impl AsRef<Path>, config: &ContainerConfig) -> Result<ChunkedTable, ConvError> {
    read_chunked(File::open(path)?, config)
}

fn read_chunked<R: ChunkReader + 'static>(source: R, config: &ContainerConfig) -> Result<ChunkedTable, ConvError> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(source)?.with_batch_size(config.read_batch_size);
    let schema = builder.schema().clone();
    let reader = builder.build()?;
    let batches = reader.collect::<Result<Vec<_>, ArrowError>>()?;
    log_metric!("event" = "read_parquet", "chunks" = batches.len());
    ChunkedTable::from_batches(schema, &batches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{Int32Array, StringArray};
    use arrow::datatypes::{DataType, Field, Schema};
    use std::sync::Arc;

    fn batch(start: i32, len: i32) -> RecordBatch {
        let schema = Arc::new(Schema::new(vec![
            Field::new("id", DataType::Int32, false),
            Field::new("name", DataType::Utf8, true),
        ]));
        let ids: Vec<i32> = (start..start + len).collect();
        let names: Vec<Option<String>> = ids
            .iter()
            .map(|i| if i % 2 == 0 { Some(format!("n{}", i)) } else { None })
            .collect();
        RecordBatch::try_new(
            schema,
            vec![Arc::new(Int32Array::from(ids)), Arc::new(StringArray::from(names))],
        )
        .unwrap()
    }

    #[test]
    fn test_memory_roundtrip_respects_read_batch_size() {
        let batches = vec![batch(0, 5), batch(5, 5)];
        let schema = batches[0].schema();
        for compression in [
            ContainerCompression::Uncompressed,
            ContainerCompression::Snappy,
            ContainerCompression::Zstd,
        ] {
            let config = ContainerConfig {
                compression,
                read_batch_size: 3,
                ..ContainerConfig::default()
            };
            let bytes = write_parquet_to_memory(schema.clone(), &batches, &config).unwrap();
            let table = read_parquet_from_memory(bytes, &config).unwrap();
            assert_eq!(table.num_rows(), 10);
            let (_, ids) = table.column_by_name("id").unwrap();
            assert!(ids.chunks().len() >= 4, "{} chunks", ids.chunks().len());
            assert!(ids.chunks().iter().all(|c| c.len() <= 3));
        }
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = read_parquet_file("/definitely/not/here.parquet", &ContainerConfig::default());
        assert!(matches!(result, Err(ConvError::Io(_))));
    }

    #[test]
    fn test_garbage_bytes_are_a_parquet_error() {
        let result = read_parquet_from_memory(Bytes::from_static(b"not parquet"), &ContainerConfig::default());
        assert!(matches!(result, Err(ConvError::Parquet(_))));
    }
}
