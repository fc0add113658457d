//! Benchmarks for rope physics, mesh generation and scheduling.

use capsule_rope::*;
use criterion::{criterion_group, criterion_main, Criterion};
use parking_lot::Mutex;
use std::sync::Arc;

fn params() -> MeshParams<f32> {
    MeshParams {
        start: Anchor::at(Vec3::new(0.0, 5.0, 0.0)),
        end: Anchor::at(Vec3::new(10.0, 5.0, 0.0)),
        rope_radius: 0.2,
        capsule_radius: 2.0,
        rope_resolution: 8,
        spherical_resolution: 16,
        linear_resolution: 20,
        min_height: 0.2,
    }
}

fn bench_physics_step(c: &mut Criterion) {
    c.bench_function("chain_20_segments_60_steps", |b| {
        let p = params();
        b.iter(|| {
            let settings = PhysicsSettings::new().with_gravity(Vec3::new(0.0, -9.81, 0.0));
            let mut state = PhysicsState::new(p.start.position, p.end.position, 20, settings);
            for _ in 0..60 {
                state.step(p.start.position, p.end.position, 1.0 / 50.0, &mut NoOpStepObserver);
            }
            state.positions()
        });
    });
}

fn bench_mesh_generate(c: &mut Criterion) {
    let p = params();
    let offsets: Vec<Vec3<f32>> = (0..20).map(|i| Vec3::new(0.0, -0.1 * i as f32, 0.0)).collect();
    c.bench_function("capsule_mesh_16x20x8", |b| b.iter(|| generate(&p, &offsets)));
}

fn bench_scheduler(c: &mut Criterion) {
    let scheduler = WorkScheduler::<f32>::new(SchedulerConfig::new()).unwrap();
    let p = params();
    let physics: Vec<SharedPhysics<f32>> = (0..32)
        .map(|_| {
            Arc::new(Mutex::new(PhysicsState::new(
                p.start.position,
                p.end.position,
                20,
                PhysicsSettings::new(),
            )))
        })
        .collect();

    c.bench_function("scheduler_32_builds", |b| {
        b.iter(|| {
            for chain in &physics {
                scheduler.submit(MeshBuildRequest::new(p, Arc::clone(chain), |mesh| {
                    criterion::black_box(mesh);
                }));
            }
            scheduler.wait_idle();
        });
    });
}

criterion_group!(benches, bench_physics_step, bench_mesh_generate, bench_scheduler);
criterion_main!(benches);
