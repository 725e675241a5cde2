//! Benchmarks for per-cycle mesh operations.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use nalgebra::{Matrix4, Point2, Point3, Vector3};
use scanmesh::algo::{denoise, laplacian_smooth, DenoiseOptions, SmoothOptions};
use scanmesh::ingest::{aggregate, ingest_all, Fragment};
use scanmesh::mesh::TriangleMesh;
use scanmesh::surface::hull::convex_hull;

/// `n` x `n` grid of quads in the horizontal plane at height `y`.
fn grid(n: u32, y: f32) -> (Vec<Point3<f32>>, Vec<u32>) {
    let mut vertices = Vec::with_capacity(((n + 1) * (n + 1)) as usize);
    let mut indices = Vec::with_capacity((n * n * 6) as usize);

    for j in 0..=n {
        for i in 0..=n {
            // Small height ripple so smoothing has work to do.
            let ripple = 0.01 * ((i + j) % 3) as f32;
            vertices.push(Point3::new(i as f32 * 0.1, y + ripple, j as f32 * 0.1));
        }
    }

    for j in 0..n {
        for i in 0..n {
            let v00 = j * (n + 1) + i;
            let v10 = v00 + 1;
            let v01 = v00 + (n + 1);
            let v11 = v01 + 1;

            indices.extend_from_slice(&[v00, v10, v11]);
            indices.extend_from_slice(&[v00, v11, v01]);
        }
    }

    (vertices, indices)
}

fn grid_mesh(n: u32) -> TriangleMesh {
    let (vertices, indices) = grid(n, 0.0);
    TriangleMesh::new(vertices, indices).unwrap()
}

fn bench_aggregate(c: &mut Criterion) {
    let (vertices, indices) = grid(20, 2.5);
    let fragments: Vec<Fragment> = (0..16)
        .map(|k| {
            let offset = Vector3::new((k % 4) as f32 * 2.0, 0.0, (k / 4) as f32 * 2.0);
            Fragment::triangles(vertices.clone(), indices.clone(), Matrix4::new_translation(&offset))
        })
        .collect();

    c.bench_function("ingest_aggregate_16x20x20", |b| {
        b.iter(|| aggregate(&ingest_all(black_box(&fragments))).unwrap());
    });
}

fn bench_denoise(c: &mut Criterion) {
    let mesh = grid_mesh(50);

    c.bench_function("denoise_grid_50x50", |b| {
        b.iter(|| denoise(black_box(&mesh), &DenoiseOptions::default()));
    });

    c.bench_function("denoise_grid_50x50_sequential", |b| {
        let options = DenoiseOptions::default().sequential();
        b.iter(|| denoise(black_box(&mesh), &options));
    });
}

fn bench_smooth(c: &mut Criterion) {
    let mesh = grid_mesh(50);
    let parallel = SmoothOptions::default().with_iterations(5);
    let sequential = parallel.clone().sequential();

    c.bench_function("smooth_grid_50x50_x5", |b| {
        b.iter(|| laplacian_smooth(black_box(&mesh), &parallel));
    });

    c.bench_function("smooth_grid_50x50_x5_sequential", |b| {
        b.iter(|| laplacian_smooth(black_box(&mesh), &sequential));
    });
}

fn bench_hull(c: &mut Criterion) {
    let points: Vec<Point2<f32>> = grid_mesh(100)
        .vertices()
        .iter()
        .map(|p| Point2::new(p.x, p.z))
        .collect();

    c.bench_function("convex_hull_101x101", |b| {
        b.iter(|| convex_hull(black_box(&points)));
    });
}

criterion_group!(benches, bench_aggregate, bench_denoise, bench_smooth, bench_hull);
criterion_main!(benches);
