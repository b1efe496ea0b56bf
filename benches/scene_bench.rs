//! Benchmarks for CPU-side scene work.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use hero_graphics::geometry::{ring_geometry, sphere_geometry, RingParams, SphereParams};
use hero_graphics::scene::{
    connect_nodes, LineBuffer, MeshParams, MeshScene, Scene, SceneDeps, Viewport,
};
use hero_graphics::{RenderTier, Theme};

fn deps(mobile: bool) -> SceneDeps {
    SceneDeps {
        tier: RenderTier::Full,
        theme: Theme::Dark,
        mobile,
        viewport: Viewport::new(1920, 1080, 1.0),
        seed: 1,
    }
}

fn bench_connections(c: &mut Criterion) {
    let mut group = c.benchmark_group("Connection Pass");

    for (name, mobile) in [("mobile_80", true), ("desktop_200", false)] {
        let scene = MeshScene::build(&deps(mobile)).unwrap();
        let params = MeshParams::for_class(mobile);
        let positions = scene.positions().to_vec();
        let mut lines = LineBuffer::new(params.max_lines());

        group.bench_with_input(BenchmarkId::new("connect_nodes", name), &positions, |b, p| {
            b.iter(|| black_box(connect_nodes(p, params.connection_distance, &mut lines)));
        });
    }

    group.finish();
}

fn bench_mesh_frame(c: &mut Criterion) {
    let mut scene = MeshScene::build(&deps(false)).unwrap();
    let mut elapsed = 0.0;

    c.bench_function("mesh_update_frame", |b| {
        b.iter(|| {
            elapsed += 1.0 / 60.0;
            scene.update(black_box(elapsed), 1.0 / 60.0);
        });
    });
}

fn bench_geometry(c: &mut Criterion) {
    let mut group = c.benchmark_group("Geometry");

    for segments in [64, 128, 256] {
        group.bench_with_input(BenchmarkId::new("ring", segments), &segments, |b, &s| {
            b.iter(|| {
                black_box(ring_geometry(&RingParams {
                    segments: s,
                    ..Default::default()
                }))
            });
        });
        group.bench_with_input(BenchmarkId::new("sphere", segments), &segments, |b, &s| {
            b.iter(|| {
                black_box(sphere_geometry(&SphereParams {
                    radius: 7.0,
                    width_segments: s,
                    height_segments: s,
                }))
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_connections, bench_mesh_frame, bench_geometry);
criterion_main!(benches);
