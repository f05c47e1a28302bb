use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use chrono::{TimeZone, Utc};
use homestock_core::{Document, FieldValue, Fields, Snapshot};
use homestock_infra::document_store::SnapshotEvent;
use homestock_infra::sync::{parse_snapshot, InventorySyncStore};
use homestock_inventory::{field, Filter, FilterSet};

fn snapshot_of(size: usize) -> Snapshot {
    let acquired = Utc.with_ymd_and_hms(2021, 5, 17, 0, 0, 0).unwrap();
    let documents = (0..size)
        .map(|i| {
            let fields = Fields::from([
                (field::DESCRIPTION.to_string(), FieldValue::from(format!("Item number {i}"))),
                (field::ACQUISITION_DATE.to_string(), FieldValue::from(acquired)),
                (field::COST.to_string(), FieldValue::from(format!("{}.{:02}", i % 1000, i % 100))),
                (field::MAKE.to_string(), FieldValue::from(if i % 2 == 0 { "Acme" } else { "Globex" })),
            ]);
            Document::new(format!("item-{i:06}"), fields)
        })
        .collect();
    Snapshot {
        collection: "items".to_string(),
        documents,
    }
}

fn bench_snapshot_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("snapshot_parse");

    for size in [10, 100, 1000, 10_000].iter() {
        let snapshot = snapshot_of(*size);
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::new("parse_all", size), &snapshot, |b, snapshot| {
            b.iter(|| black_box(parse_snapshot(snapshot).unwrap()));
        });
    }

    group.finish();
}

fn bench_snapshot_replacement(c: &mut Criterion) {
    let mut group = c.benchmark_group("snapshot_replacement");

    for size in [10, 100, 1000, 10_000].iter() {
        let snapshot = snapshot_of(*size);
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::new("apply", size), &snapshot, |b, snapshot| {
            let mut sync = InventorySyncStore::new("items");
            b.iter(|| {
                black_box(
                    sync.apply(SnapshotEvent::Snapshot(snapshot.clone()))
                        .unwrap(),
                )
            });
        });
    }

    group.finish();
}

fn bench_filtering(c: &mut Criterion) {
    let mut group = c.benchmark_group("filtering");
    let snapshot = snapshot_of(10_000);
    let items = parse_snapshot(&snapshot).unwrap();

    let mut filters = FilterSet::new();
    filters.set(Filter::Make(vec!["Acme".to_string()]));
    filters.set(Filter::Keywords(vec!["number 9".to_string()]));

    group.throughput(Throughput::Elements(items.len() as u64));
    group.bench_function("make_and_keywords_10k", |b| {
        b.iter(|| black_box(filters.apply(&items).len()));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_snapshot_parse,
    bench_snapshot_replacement,
    bench_filtering
);
criterion_main!(benches);
