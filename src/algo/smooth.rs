//! Laplacian mesh smoothing.
//!
//! Each iteration moves every vertex to the arithmetic mean of its current
//! neighbors. All vertices are updated simultaneously from the previous
//! iteration's positions, and triangle connectivity is never altered.
//!
//! # Example
//!
//! ```
//! use scanmesh::algo::smooth::{laplacian_smooth, SmoothOptions};
//! use scanmesh::mesh::TriangleMesh;
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//!     Point3::new(0.5, 0.5, 0.5),
//! ];
//! let indices = vec![0, 1, 2, 0, 2, 3, 0, 3, 1, 1, 3, 2];
//! let mesh = TriangleMesh::new(vertices, indices).unwrap();
//!
//! let smoothed = laplacian_smooth(&mesh, &SmoothOptions::default());
//! assert_eq!(smoothed.num_vertices(), mesh.num_vertices());
//! assert_eq!(smoothed.indices(), mesh.indices());
//! ```

use std::collections::HashSet;

use nalgebra::{Point3, Vector3};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::mesh::TriangleMesh;

/// Options for Laplacian smoothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothOptions {
    /// Number of smoothing iterations.
    pub iterations: usize,

    /// Whether to use parallel execution (default: true).
    pub parallel: bool,
}

impl Default for SmoothOptions {
    fn default() -> Self {
        Self {
            iterations: 1,
            parallel: true,
        }
    }
}

impl SmoothOptions {
    /// Create options with the specified number of iterations.
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Set whether to use parallel execution.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Create options for single-threaded execution.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}

/// Vertex-to-neighbors relation of a triangle mesh.
///
/// Symmetric, duplicate edges collapse, and a vertex is never its own
/// neighbor (even in degenerate triangles).
#[derive(Debug, Clone)]
pub struct VertexAdjacency {
    neighbors: Vec<HashSet<u32>>,
}

impl VertexAdjacency {
    /// Build the adjacency of every vertex of `mesh`.
    pub fn from_mesh(mesh: &TriangleMesh) -> Self {
        let mut neighbors = vec![HashSet::new(); mesh.num_vertices()];
        for tri in mesh.triangles() {
            for i in 0..3 {
                let v = tri[i];
                for &n in &[tri[(i + 1) % 3], tri[(i + 2) % 3]] {
                    if n != v {
                        neighbors[v as usize].insert(n);
                    }
                }
            }
        }
        Self { neighbors }
    }

    /// Neighbors of vertex `v`.
    #[inline]
    pub fn neighbors(&self, v: usize) -> &HashSet<u32> {
        &self.neighbors[v]
    }

    /// Number of vertices covered.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.neighbors.len()
    }

    /// Whether vertex `v` has no neighbors.
    #[inline]
    pub fn is_isolated(&self, v: usize) -> bool {
        self.neighbors[v].is_empty()
    }
}

/// Smoothed vertex positions for `mesh`.
///
/// Vertices without neighbors keep their positions. The output has exactly
/// as many positions as the mesh has vertices.
pub fn laplacian_smooth_positions(mesh: &TriangleMesh, options: &SmoothOptions) -> Vec<Point3<f32>> {
    let mut positions = mesh.vertices().to_vec();
    if options.iterations == 0 || mesh.num_triangles() == 0 {
        return positions;
    }

    let adjacency = VertexAdjacency::from_mesh(mesh);

    for _ in 0..options.iterations {
        let current = &positions;
        let step = |i: usize| compute_laplacian_step(&adjacency, current, i);
        let new_positions: Vec<Point3<f32>> = if options.parallel {
            (0..current.len()).into_par_iter().map(step).collect()
        } else {
            (0..current.len()).map(step).collect()
        };
        positions = new_positions;
    }

    positions
}

/// Laplacian-smoothed copy of `mesh` with unchanged connectivity.
pub fn laplacian_smooth(mesh: &TriangleMesh, options: &SmoothOptions) -> TriangleMesh {
    let positions = laplacian_smooth_positions(mesh, options);
    TriangleMesh::from_parts_unchecked(positions, mesh.indices().to_vec())
}

#[inline]
fn compute_laplacian_step(
    adjacency: &VertexAdjacency,
    positions: &[Point3<f32>],
    i: usize,
) -> Point3<f32> {
    if adjacency.is_isolated(i) {
        return positions[i];
    }

    let neighbors = adjacency.neighbors(i);
    let sum: Vector3<f32> = neighbors
        .iter()
        .map(|&n| positions[n as usize].coords)
        .sum();
    Point3::from(sum / neighbors.len() as f32)
}
