//! Kinetic tick loop benchmarks

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rebound_core::{Axis, Vec2};
use rebound_scroll::{KineticEngine, PhysicsConfig, ScrollStore};

const FRAME: f64 = 1000.0 / 60.0;

fn store() -> ScrollStore {
    let mut store = ScrollStore::new(50.0);
    store.set_bounds(Axis::Horizontal, 0.0, 4000.0, 300.0);
    store.set_bounds(Axis::Vertical, 0.0, 100_000.0, 400.0);
    store.set_value(Axis::Vertical, 50_000.0, false, false);
    store
}

/// Run a session to rest, returning the tick count
fn run(engine: &mut KineticEngine, store: &mut ScrollStore) -> usize {
    let mut now = 0.0;
    let mut ticks = 0;
    while engine.is_active() {
        now += FRAME;
        engine.tick(store, now);
        ticks += 1;
    }
    ticks
}

fn bench_deceleration(c: &mut Criterion) {
    c.bench_function("decelerate_to_rest", |b| {
        b.iter(|| {
            let mut store = store();
            let mut engine = KineticEngine::new(PhysicsConfig::default(), true, true);
            engine.start(&store, black_box(Vec2::new(1.5, 4.0)), 0.0);
            black_box(run(&mut engine, &mut store))
        })
    });
}

fn bench_snap_back(c: &mut Criterion) {
    c.bench_function("snap_back_to_rest", |b| {
        b.iter(|| {
            let mut store = store();
            store.set_value(Axis::Vertical, black_box(-50.0), true, false);
            let mut engine = KineticEngine::new(PhysicsConfig::default(), true, true);
            engine.start(&store, Vec2::ZERO, 0.0);
            black_box(run(&mut engine, &mut store))
        })
    });
}

fn bench_bounce(c: &mut Criterion) {
    c.bench_function("flick_into_border", |b| {
        b.iter(|| {
            let mut store = store();
            store.set_value(Axis::Vertical, 99_500.0, false, false);
            let mut engine = KineticEngine::new(PhysicsConfig::default(), true, true);
            engine.start(&store, black_box(Vec2::new(0.0, 6.0)), 0.0);
            black_box(run(&mut engine, &mut store))
        })
    });
}

criterion_group!(benches, bench_deceleration, bench_snap_back, bench_bounce);
criterion_main!(benches);
