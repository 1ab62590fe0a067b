/// Validation Benchmarks
///
/// Measures extraction of metrics documents and validation of capture pairs.
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::time::Duration;

use xgotop_validate::event_counts::extract_str;
use xgotop_validate::{validate, EventCounts, EventType, SamplingRateSpec};

fn capture(scale: u64) -> EventCounts {
    EventType::ALL
        .iter()
        .enumerate()
        .map(|(i, ty)| (*ty, scale * (i as u64 + 1)))
        .collect()
}

fn metrics_document(scale: u64) -> String {
    let counts: Vec<String> = (0..8)
        .map(|id| format!("\"{}\": {}", id, scale * (id + 1)))
        .collect();
    let series: Vec<String> = (0..1_000).map(|i| format!("{}.0", i)).collect();
    format!(
        "{{\"event_counts\": {{{}}}, \"rps\": [{}], \"lat\": [{}]}}",
        counts.join(", "),
        series.join(", "),
        series.join(", ")
    )
}

fn bench_validate(c: &mut Criterion) {
    let mut group = c.benchmark_group("validate");
    group.measurement_time(Duration::from_secs(5));
    group.throughput(Throughput::Elements(EventType::ALL.len() as u64));

    let rates = SamplingRateSpec::parse(
        "casgstatus:0.5,makeslice:0.1,makemap:0.2,newobject:0.5,newgoroutine:0.1,goexit:0.1",
    )
    .unwrap();

    for scale in [1_000u64, 1_000_000] {
        let baseline = capture(scale);
        let sampled = capture(scale / 10);
        group.bench_with_input(BenchmarkId::new("six_types", scale), &scale, |b, _| {
            b.iter(|| {
                validate(
                    black_box(&baseline),
                    black_box(&sampled),
                    black_box(&rates),
                    0.1,
                )
                .unwrap()
            });
        });
    }

    group.finish();
}

fn bench_extract(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract");
    group.measurement_time(Duration::from_secs(5));
    group.throughput(Throughput::Elements(1));

    let document = metrics_document(10_000);
    group.bench_function("metrics_document_1000_samples", |b| {
        b.iter(|| extract_str(black_box(&document)).unwrap());
    });

    group.finish();
}

criterion_group!(benches, bench_validate, bench_extract);
criterion_main!(benches);
