use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use zonium_core::{StaticProvider, TimeZoneIndex, TimeZoneRecord};

/// Roughly the size of the upstream dataset.
fn synthetic_dataset(n: usize) -> Vec<TimeZoneRecord> {
    (0..n)
        .map(|i| TimeZoneRecord {
            name: Some(format!("Region{}/City_{i}", i % 12)),
            alternative_name: Some(format!("Zone {i} Time")),
            country_name: Some(format!("Country {}", i % 250)),
            country_code: Some(format!("C{}", i % 250)),
            continent_name: Some("Somewhere".into()),
            abbreviation: Some(format!("Z{}", i % 40)),
            main_cities: (0..4).map(|c| format!("Town {i}-{c}")).collect(),
            raw_offset_in_minutes: (i as i32 % 24 - 12) * 60,
            ..Default::default()
        })
        .collect()
}

fn bench_search(c: &mut Criterion) {
    let rt = tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("runtime");
    let index = TimeZoneIndex::new(StaticProvider::new(synthetic_dataset(600)));
    rt.block_on(index.records()).expect("build index");

    c.bench_function("search_common_prefix", |b| {
        b.iter(|| rt.block_on(index.search(black_box("region1"))).unwrap().len())
    });
    c.bench_function("search_no_match", |b| {
        b.iter(|| rt.block_on(index.search(black_box("zzz-no-match"))).unwrap().len())
    });
    c.bench_function("search_names_city", |b| {
        b.iter(|| rt.block_on(index.search_names(black_box("town 42-"))).unwrap().len())
    });
}

criterion_group!(benches, bench_search);
criterion_main!(benches);
