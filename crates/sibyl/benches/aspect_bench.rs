use criterion::{black_box, criterion_group, criterion_main, Criterion};
use sibyl::ephemeris::RawBodyRecord;
use sibyl::{AspectCalculator, Body, BodyPosition, PositionSource};
use std::collections::BTreeMap;

fn position(body: Body, longitude: f64) -> BodyPosition {
    BodyPosition::decode(
        body,
        PositionSource::Primary,
        RawBodyRecord::longitude_only(longitude),
    )
    .unwrap()
}

fn bench_calculate_aspect(c: &mut Criterion) {
    let calculator = AspectCalculator::new();
    let sun = position(Body::Sun, 100.0);
    let moon = position(Body::Moon, 102.0);

    c.bench_function("calculate_aspect", |b| {
        b.iter(|| calculator.calculate_aspect(black_box(&sun), black_box(&moon)))
    });
}

fn bench_compute_aspects(c: &mut Criterion) {
    let calculator = AspectCalculator::new();
    let positions: BTreeMap<Body, BodyPosition> = Body::ALL
        .iter()
        .enumerate()
        .map(|(i, body)| (*body, position(*body, i as f64 * 30.0)))
        .collect();

    c.bench_function("compute_aspects", |b| {
        b.iter(|| calculator.compute_aspects(black_box(&positions)))
    });
}

criterion_group!(benches, bench_calculate_aspect, bench_compute_aspects);
criterion_main!(benches);
