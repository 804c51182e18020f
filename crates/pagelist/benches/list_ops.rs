use std::sync::Arc;

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput};
use pagelist::PagedList;
use pagelist_store::InMemoryStateStore;

const ITEMS: u64 = 10_000;
const SAMPLE_POINTS: u64 = 100;
const PAGE_SIZES: [u64; 2] = [10, 1000];

fn prepared(page_size: u64, items: u64) -> PagedList {
    let list = PagedList::new("bench", page_size, Arc::new(InMemoryStateStore::new()));
    for n in 0..items {
        list.append(format!("data-{n}")).expect("append");
    }
    list
}

fn append(c: &mut Criterion) {
    let mut group = c.benchmark_group("list/append");
    group.sample_size(10);
    group.throughput(Throughput::Elements(1_000));
    for page_size in PAGE_SIZES {
        group.bench_with_input(BenchmarkId::from_parameter(page_size), &page_size, |b, &ps| {
            b.iter_batched(
                || PagedList::new("bench", ps, Arc::new(InMemoryStateStore::new())),
                |list| {
                    for n in 0..1_000u64 {
                        list.append(n.to_string()).expect("append");
                    }
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn point_get(c: &mut Criterion) {
    let mut group = c.benchmark_group("list/get");
    group.throughput(Throughput::Elements(SAMPLE_POINTS));
    for page_size in PAGE_SIZES {
        let list = prepared(page_size, ITEMS);
        group.bench_with_input(BenchmarkId::from_parameter(page_size), &list, |b, list| {
            b.iter(|| {
                for n in 0..SAMPLE_POINTS {
                    list.get(n * (ITEMS / SAMPLE_POINTS)).expect("get");
                }
            });
        });
    }
    group.finish();
}

fn full_range(c: &mut Criterion) {
    let mut group = c.benchmark_group("list/range");
    group.sample_size(20);
    group.throughput(Throughput::Elements(ITEMS));
    for page_size in PAGE_SIZES {
        let list = prepared(page_size, ITEMS);
        group.bench_with_input(BenchmarkId::from_parameter(page_size), &list, |b, list| {
            b.iter(|| {
                list.range(0, None, |_, _| Ok::<_, pagelist::ListError>(()))
                    .expect("range");
            });
        });
    }
    group.finish();
}

criterion_group!(benches, append, point_get, full_range);
criterion_main!(benches);
