use criterion::{black_box, criterion_group, criterion_main, Criterion};
use sibyl::time::JulianMoment;
use sibyl::{
    AnalyticEphemeris, BirthMoment, Body, ChartEngine, EphemerisConfig, SecondaryProvider,
    SwissEphemeris,
};

fn bench_analytic_positions(c: &mut Criterion) {
    let analytic = AnalyticEphemeris::new();
    let moment = JulianMoment::from_ut(2_451_545.0).unwrap();

    c.bench_function("analytic_positions", |b| {
        b.iter(|| {
            for body in Body::ALL.iter().copied().filter(|b| b.is_secondary_capable()) {
                let _ = analytic.compute_longitude(black_box(body), black_box(&moment));
            }
        })
    });
}

fn bench_natal_chart(c: &mut Criterion) {
    let primary = SwissEphemeris::initialize(&EphemerisConfig::default()).unwrap();
    let engine = ChartEngine::new(primary, &AnalyticEphemeris);
    let moment = BirthMoment::new(1985, 11, 2, 14, 30, 0, -5.0).at(40.7128, -74.0060);

    c.bench_function("natal_chart", |b| {
        b.iter(|| engine.natal_chart(black_box(&moment), black_box(None)))
    });
}

criterion_group!(benches, bench_analytic_positions, bench_natal_chart);
criterion_main!(benches);
