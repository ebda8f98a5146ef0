//! # Control Loop Benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use nalgebra::Vector3;
use std::time::{Duration, Instant};

use quad_lib::{
    control_loop::ControlLoop,
    leg_model::{LegId, LegModel},
    params::QuadParams,
};

fn tick_benchmark(c: &mut Criterion) {
    let params = QuadParams::builtin().unwrap();
    let model = LegModel::new(params.leg_model.clone());

    // Walk diagonally so every tick runs the gait, the transform and the IK
    let mut cl = ControlLoop::new(params).unwrap();
    cl.set_direction(Some(45.0)).unwrap();
    let mut now = Instant::now();

    c.bench_function("control_loop_tick", |b| b.iter(|| {
        now += Duration::from_millis(100);
        black_box(cl.tick(now))
    }));

    let leg = LegId::ALL[0];
    let target = Vector3::new(20.0, 130.0, 10.0);

    c.bench_function("leg_model_solve", |b| b.iter(|| {
        model.solve(black_box(leg), black_box(&target))
    }));
}

criterion_group!(benches, tick_benchmark);
criterion_main!(benches);
