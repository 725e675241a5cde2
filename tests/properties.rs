//! Property-based tests for the per-cycle geometry operations.
//!
//! Run with: cargo test --test properties

use nalgebra::{Point2, Point3};
use proptest::prelude::*;
use scanmesh::algo::{denoise, laplacian_smooth, DenoiseOptions, SmoothOptions};
use scanmesh::ingest::{aggregate, fragment_offsets, IngestedFragment};
use scanmesh::mesh::TriangleMesh;
use scanmesh::surface::hull::{convex_hull, cross, dedup_by_distance, simplify_short_edges};

// =============================================================================
// Strategies
// =============================================================================

fn arb_position() -> impl Strategy<Value = Point3<f32>> {
    prop::array::uniform3(-10.0..10.0f32).prop_map(|[x, y, z]| Point3::new(x, y, z))
}

/// A fragment whose local indices are all valid.
fn arb_fragment() -> impl Strategy<Value = IngestedFragment> {
    prop::collection::vec(arb_position(), 1..20).prop_flat_map(|vertices| {
        let n = vertices.len() as u32;
        let triangle = prop::array::uniform3(0..n);
        prop::collection::vec(triangle, 0..15).prop_map(move |triangles| IngestedFragment {
            vertices: vertices.clone(),
            indices: triangles.into_iter().flatten().collect(),
        })
    })
}

fn arb_mesh() -> impl Strategy<Value = TriangleMesh> {
    prop::collection::vec(arb_fragment(), 1..4)
        .prop_map(|fragments| aggregate(&fragments).unwrap())
}

/// Points on an integer lattice, so orientation tests are exact.
fn arb_lattice_points() -> impl Strategy<Value = Vec<Point2<f32>>> {
    prop::collection::vec((-50i32..50, -50i32..50), 0..60).prop_map(|coords| {
        coords
            .into_iter()
            .map(|(x, y)| Point2::new(x as f32, y as f32))
            .collect()
    })
}

// =============================================================================
// Aggregation
// =============================================================================

proptest! {
    #[test]
    fn aggregated_indices_stay_in_their_fragment(fragments in prop::collection::vec(arb_fragment(), 0..5)) {
        let mesh = aggregate(&fragments).unwrap();
        let offsets = fragment_offsets(&fragments);

        let total: usize = fragments.iter().map(|f| f.vertices.len()).sum();
        prop_assert_eq!(mesh.num_vertices(), total);

        let mut cursor = 0;
        for (fragment, offset) in fragments.iter().zip(offsets) {
            let end = offset + fragment.vertices.len() as u32;
            for (&local, &global) in fragment.indices.iter().zip(&mesh.indices()[cursor..]) {
                prop_assert_eq!(global, local + offset);
                prop_assert!(global >= offset && global < end);
            }
            cursor += fragment.indices.len();
        }
        prop_assert_eq!(cursor, mesh.indices().len());
    }
}

// =============================================================================
// Denoising
// =============================================================================

proptest! {
    #[test]
    fn denoise_is_idempotent(mesh in arb_mesh()) {
        let options = DenoiseOptions::default().sequential();
        let once = denoise(&mesh, &options);
        let twice = denoise(&once.mesh, &options);

        prop_assert_eq!(twice.removed, 0);
        prop_assert_eq!(twice.mesh.indices(), once.mesh.indices());
    }

    #[test]
    fn denoise_only_removes_triangles(mesh in arb_mesh()) {
        let result = denoise(&mesh, &DenoiseOptions::default());

        prop_assert_eq!(result.mesh.vertices(), mesh.vertices());
        prop_assert_eq!(result.mesh.num_triangles() + result.removed, mesh.num_triangles());

        // Survivors appear in their original order.
        let original: Vec<[u32; 3]> = mesh.triangles().collect();
        let mut search = original.iter();
        for tri in result.mesh.triangles() {
            prop_assert!(search.any(|t| *t == tri));
        }
    }
}

// =============================================================================
// Smoothing
// =============================================================================

proptest! {
    #[test]
    fn smoothing_keeps_connectivity_and_bounds(mesh in arb_mesh(), iterations in 0usize..4) {
        let options = SmoothOptions::default().with_iterations(iterations).sequential();
        let smoothed = laplacian_smooth(&mesh, &options);

        prop_assert_eq!(smoothed.indices(), mesh.indices());
        prop_assert_eq!(smoothed.num_vertices(), mesh.num_vertices());

        // Neighbor averages never leave the input bounding box.
        if let Some((min, max)) = mesh.bounding_box() {
            let eps = 1e-3;
            for p in smoothed.vertices() {
                for axis in 0..3 {
                    prop_assert!(p[axis] >= min[axis] - eps && p[axis] <= max[axis] + eps);
                }
            }
        }
    }
}

// =============================================================================
// Hull and simplification
// =============================================================================

proptest! {
    #[test]
    fn hull_contains_every_input_point(points in arb_lattice_points()) {
        let hull = convex_hull(&points);

        let mut distinct = points.clone();
        distinct.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
        distinct.dedup();
        prop_assert!(hull.len() <= distinct.len());

        for h in &hull {
            prop_assert!(points.contains(h));
        }

        if hull.len() >= 3 {
            let n = hull.len();
            for i in 0..n {
                let a = &hull[i];
                let b = &hull[(i + 1) % n];
                for p in &points {
                    prop_assert!(cross(a, b, p) >= 0.0, "{:?} outside edge {:?}-{:?}", p, a, b);
                }
            }
        }
    }

    #[test]
    fn simplification_never_grows(points in arb_lattice_points(), min_edge in 0.0f32..5.0) {
        let hull = convex_hull(&points);
        let simplified = simplify_short_edges(&hull, min_edge);

        prop_assert!(simplified.len() <= hull.len());
        if hull.len() < 4 {
            prop_assert_eq!(&simplified, &hull);
        } else {
            prop_assert!(simplified.len() >= 3);
        }
    }

    #[test]
    fn dedup_keeps_points_apart(
        existing in arb_lattice_points(),
        candidates in arb_lattice_points(),
        min_distance in 0.5f32..10.0,
    ) {
        let kept = dedup_by_distance(&existing, &candidates, min_distance);
        prop_assert!(kept.len() <= existing.len() + candidates.len());
        for (i, a) in kept.iter().enumerate() {
            for b in &kept[i + 1..] {
                prop_assert!((a - b).norm_squared() >= min_distance * min_distance);
            }
        }
    }
}
