//! Performance benchmarks for accumulators and the manager
//!
//! Measures the resumable accumulators against plain one-shot hashing and
//! the cost of a full manager round trip on a temporary file.

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use filehashes_core::{AlgorithmId, AlgorithmRegistry, EngineConfig, Event, Manager, WorkRequest};
use std::hint::black_box;
use std::sync::Arc;
use tokio::runtime::Runtime;

/// Benchmark every built-in algorithm with different input sizes
fn benchmark_accumulators(c: &mut Criterion) {
    let mut group = c.benchmark_group("accumulators");
    let registry = AlgorithmRegistry::builtin();

    let sizes = vec![
        1_024,      // 1KB
        102_400,    // 100KB
        1_048_576,  // 1MB
        10_485_760, // 10MB
    ];

    for size in sizes {
        let data = generate_test_data(size);
        group.throughput(Throughput::Bytes(size as u64));

        for id in registry.list() {
            let algorithm = registry.get(&id).unwrap();
            group.bench_with_input(
                BenchmarkId::new(id.as_str(), format_size(size)),
                &data,
                |b, data| {
                    b.iter(|| {
                        let mut accumulator = algorithm.create_accumulator();
                        for chunk in black_box(data).chunks(64 * 1024) {
                            accumulator.write(chunk).unwrap();
                        }
                        black_box(accumulator.final_checksum());
                    })
                },
            );
        }
    }

    group.finish();
}

/// Cost of exporting and importing state, paid once per stop/resume
fn benchmark_state_round_trip(c: &mut Criterion) {
    let mut group = c.benchmark_group("state_round_trip");
    let registry = AlgorithmRegistry::builtin();
    let data = generate_test_data(1_000);

    for id in [AlgorithmId::CRC32, AlgorithmId::SHA1, AlgorithmId::SHA256, AlgorithmId::SHA512] {
        let algorithm = registry.get(&id).unwrap();
        let mut accumulator = algorithm.create_accumulator();
        accumulator.write(&data).unwrap();

        group.bench_function(id.as_str(), |b| {
            b.iter(|| {
                let state = accumulator.export_state().unwrap();
                let mut restored = algorithm.create_accumulator();
                restored.import_state(black_box(&state)).unwrap();
                black_box(restored);
            })
        });
    }

    group.finish();
}

/// Full manager round trip: submit, hash from disk, drain the stream
fn benchmark_manager(c: &mut Criterion) {
    let mut group = c.benchmark_group("manager");
    let rt = Runtime::new().unwrap();
    let registry = Arc::new(AlgorithmRegistry::builtin());

    let size = 10_485_760;
    let temp_dir = tempfile::tempdir().unwrap();
    let file_path = temp_dir.path().join("bench_10mb.bin");
    std::fs::write(&file_path, generate_test_data(size)).unwrap();
    group.throughput(Throughput::Bytes(size as u64));

    for buffer_size in [64 * 1024, 1024 * 1024, 8 * 1024 * 1024] {
        group.bench_with_input(
            BenchmarkId::new("sha1_sha256", format_size(buffer_size)),
            &buffer_size,
            |b, &buffer_size| {
                b.iter(|| {
                    rt.block_on(async {
                        let config = EngineConfig {
                            buffer_size,
                            ..EngineConfig::default()
                        };
                        let (manager, mut stream) = Manager::new(config, Arc::clone(&registry));
                        manager.submit_one(WorkRequest::new(
                            &file_path,
                            [AlgorithmId::SHA1, AlgorithmId::SHA256],
                        ));
                        drop(manager);

                        while let Some(message) = stream.recv().await {
                            if let Event::Done(checksums) = message.event {
                                black_box(checksums);
                            }
                        }
                    });
                })
            },
        );
    }

    group.finish();
}

// Helper functions

fn generate_test_data(size: usize) -> Vec<u8> {
    // Generate deterministic test data for reproducible benchmarks
    let mut data = Vec::with_capacity(size);
    let mut seed = 0x12345678u32;

    for _ in 0..size {
        data.push((seed & 0xFF) as u8);
        seed = seed.wrapping_mul(1664525).wrapping_add(1013904223);
    }

    data
}

fn format_size(size: usize) -> String {
    if size >= 1_048_576 {
        format!("{}MB", size / 1_048_576)
    } else if size >= 1_024 {
        format!("{}KB", size / 1_024)
    } else {
        format!("{size}B")
    }
}

criterion_group!(
    benches,
    benchmark_accumulators,
    benchmark_state_round_trip,
    benchmark_manager
);

criterion_main!(benches);
