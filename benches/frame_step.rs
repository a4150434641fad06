//! Benchmarks for the per-frame CPU work.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

use neural_backdrop::{
    BackdropConfig, ClusterConfig, PixelCanvas, RecordingCanvas, Scene, Viewport,
};

const VIEWPORT: Viewport = Viewport::new(1280, 720);

fn build(config: &BackdropConfig) -> Scene {
    let mut rng = StdRng::seed_from_u64(42);
    Scene::build(config, VIEWPORT, &mut rng).expect("bench config is valid")
}

fn bench_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("scene_step");

    for count in [3usize, 7, 15] {
        let config = BackdropConfig {
            clusters: ClusterConfig {
                count,
                ..Default::default()
            },
            ..Default::default()
        };
        group.bench_with_input(BenchmarkId::from_parameter(count), &config, |b, config| {
            let mut scene = build(config);
            b.iter(|| {
                scene.step(VIEWPORT, config);
                black_box(scene.connections().len())
            })
        });
    }

    group.finish();
}

fn bench_paint(c: &mut Criterion) {
    let mut group = c.benchmark_group("scene_frame");
    let config = BackdropConfig::default();

    group.bench_function("recording", |b| {
        let mut scene = build(&config);
        let mut canvas = RecordingCanvas::new(VIEWPORT.width, VIEWPORT.height);
        b.iter(|| {
            scene.frame(VIEWPORT, &config, Some(&mut canvas));
            black_box(canvas.commands().len())
        })
    });

    group.sample_size(20);
    group.bench_function("pixel", |b| {
        let mut scene = build(&config);
        let mut canvas = PixelCanvas::new(VIEWPORT.width, VIEWPORT.height);
        b.iter(|| {
            scene.frame(VIEWPORT, &config, Some(&mut canvas));
            black_box(canvas.pixel(640, 360))
        })
    });

    group.finish();
}

criterion_group!(benches, bench_step, bench_paint);
criterion_main!(benches);
