// In benches/roundtrip_bench.rs

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

use arrowconv::{ChunkedTable, FieldDescriptor, LogicalType, ReadManager, TypeMapper, Value, WriteManager};

// --- Mock Data Generation ---

fn descriptors() -> Vec<FieldDescriptor> {
    vec![
        FieldDescriptor::new("id", LogicalType::Int64, false),
        FieldDescriptor::new("label", LogicalType::String, true),
        FieldDescriptor::new(
            "amount",
            LogicalType::Decimal {
                precision: 18,
                scale: 4,
            },
            true,
        ),
    ]
}

/// Rows with a null label every seventh row and decimal text to parse.
fn generate_rows(count: usize) -> Vec<Vec<Value>> {
    (0..count)
        .map(|i| {
            let label = if i % 7 == 0 {
                Value::Null
            } else {
                Value::Utf8(format!("row-{}", i))
            };
            vec![
                Value::Int64(i as i64),
                label,
                Value::Utf8(format!("{}.{:04}", i, i % 10_000)),
            ]
        })
        .collect()
}

// --- Benchmark Suite ---

const BENCH_ROWS: usize = 50_000;

fn bench_roundtrip(c: &mut Criterion) {
    let mapper = TypeMapper::default();
    let rows = generate_rows(BENCH_ROWS);

    let batch = {
        let mut manager = WriteManager::from_descriptors(descriptors(), &mapper);
        for row in rows.iter().cloned() {
            manager.add_row(row).unwrap();
        }
        manager.finish().unwrap()
    };
    let table = ChunkedTable::from_batches(batch.schema(), &[batch]).unwrap();

    let mut group = c.benchmark_group("Handler Roundtrip");
    group.throughput(Throughput::Elements(BENCH_ROWS as u64));

    group.bench_function("Accumulate + Build", |b| {
        b.iter(|| {
            let mut manager = WriteManager::from_descriptors(descriptors(), &mapper);
            for row in rows.iter().cloned() {
                manager.add_row(black_box(row)).unwrap();
            }
            black_box(manager.finish().unwrap())
        })
    });

    group.bench_function("Bind + Extract", |b| {
        b.iter(|| {
            let mut manager = ReadManager::for_table(black_box(&table), &mapper).unwrap();
            black_box(manager.extract_rows().unwrap())
        })
    });

    group.finish();
}

criterion_group!(benches, bench_roundtrip);
criterion_main!(benches);
