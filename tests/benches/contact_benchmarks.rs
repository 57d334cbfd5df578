//! # Contact Index Benchmarks
//!
//! | Operation | Expected cost |
//! |-----------|---------------|
//! | `build` | linear in total phone numbers |
//! | `search` | linear in contacts |
//! | `basic_data_for_number` | bucket size |

use contacts_tests::fixtures::synthetic_snapshot;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use dc_02_contact_index::{basic_data_for_number, build, search};
use shared_types::NormalizedPhoneNumber;
use std::time::Duration;

const SIZES: [usize; 3] = [100, 1_000, 10_000];

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("dc-02-build");
    group.measurement_time(Duration::from_secs(5));

    for size in SIZES {
        let snapshot = synthetic_snapshot(size, 7);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("build", size), &snapshot, |b, snapshot| {
            b.iter(|| black_box(build(snapshot)))
        });
    }

    group.finish();
}

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("dc-02-search");

    for size in SIZES {
        let snapshot = synthetic_snapshot(size, 11);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("name", size), &snapshot, |b, snapshot| {
            b.iter(|| black_box(search(snapshot, "ada")))
        });
        group.bench_with_input(BenchmarkId::new("no_match", size), &snapshot, |b, snapshot| {
            b.iter(|| black_box(search(snapshot, "zz")))
        });
    }

    group.finish();
}

fn bench_number_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("dc-02-number-lookup");

    for size in SIZES {
        let snapshot = synthetic_snapshot(size, 13);
        let indices = build(&snapshot);
        let numbers: Vec<NormalizedPhoneNumber> = indices.number_index.keys().cloned().collect();
        if numbers.is_empty() {
            continue;
        }

        group.bench_with_input(
            BenchmarkId::new("basic_data_for_number", size),
            &(snapshot, indices, numbers),
            |b, (snapshot, indices, numbers)| {
                let mut i = 0;
                b.iter(|| {
                    let number = &numbers[i % numbers.len()];
                    i += 1;
                    black_box(basic_data_for_number(snapshot, indices, number))
                })
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_build, bench_search, bench_number_lookup);
criterion_main!(benches);
