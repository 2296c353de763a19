//! Benchmarks for one frame update of the default 2000-particle scene.
//!
//! Run:
//! - cargo bench -p particle-field

use criterion::{criterion_group, criterion_main, Criterion};
use particle_field::frame::update_frame;
use particle_field::{FrameInput, SurfaceSize, VisualizerConfig, VisualizerState};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::hint::black_box;

fn scene() -> VisualizerState {
    let mut rng = StdRng::seed_from_u64(7);
    let config = VisualizerConfig::default();
    VisualizerState::new(config, SurfaceSize::new(1280.0, 720.0), &mut rng).expect("default scene")
}

fn bench_frame_update(c: &mut Criterion) {
    let spectrum: Vec<u8> = (0..128).map(|i| (255 - i * 2) as u8).collect();

    let mut idle = scene();
    c.bench_function("frame_update/idle", |b| {
        b.iter(|| update_frame(black_box(&mut idle), FrameInput::idle()));
    });

    let mut playing = scene();
    c.bench_function("frame_update/playing", |b| {
        b.iter(|| update_frame(black_box(&mut playing), FrameInput::playing(black_box(&spectrum))));
    });
}

criterion_group!(benches, bench_frame_update);
criterion_main!(benches);
