//! Propagation benchmarks
//!
//! Run with: cargo bench --bench propagation

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use nalgebra::Vector3;
use skytrack::groundtrack::recommended_sample_count;
use skytrack::{
    JulianDate, PropagationDirection, PropagationSettings, PropagationWindow, Propagator,
    StateVector,
};

fn leo() -> StateVector {
    let i = 51.6_f64.to_radians();
    StateVector::new(
        Vector3::new(6778.0, 0.0, 0.0),
        Vector3::new(0.0, 7.669 * i.cos(), 7.669 * i.sin()),
    )
}

fn bench_one_period(c: &mut Criterion) {
    let mut group = c.benchmark_group("one_period");
    let state = leo();
    let period = state.period().unwrap();

    for (name, settings) in [
        ("two_body", PropagationSettings::two_body()),
        ("j2", PropagationSettings::default()),
    ] {
        let propagator = Propagator::new(settings).unwrap();
        group.bench_with_input(BenchmarkId::new("propagate", name), &propagator, |b, p| {
            b.iter(|| p.propagate(black_box(&state), period, 100).unwrap())
        });
    }

    group.finish();
}

fn bench_ground_track(c: &mut Criterion) {
    let mut group = c.benchmark_group("ground_track");
    let state = leo();
    let epoch = JulianDate::from_calendar(2024, 6, 1, 0, 0, 0.0);
    let propagator = Propagator::default();

    for days in [0.1, 1.0, 3.0] {
        let window = PropagationWindow::from_periods(
            epoch,
            epoch + 0.5,
            86_400.0,
            days,
            PropagationDirection::Centered,
        )
        .unwrap();
        let samples = recommended_sample_count(state.mean_altitude(), days);

        group.bench_with_input(BenchmarkId::new("centered_days", days), &window, |b, w| {
            b.iter(|| {
                propagator
                    .ground_track(black_box(&state), epoch, w, samples)
                    .unwrap()
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_one_period, bench_ground_track);
criterion_main!(benches);
