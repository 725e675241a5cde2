//! Coplanar duplicate removal.
//!
//! Overlapping fragments produce near-coincident triangles on the surfaces
//! they share. For every edge shared by exactly two triangles whose face
//! normals are nearly parallel, the later of the two triangles is dropped.
//!
//! # Example
//!
//! ```
//! use scanmesh::algo::denoise::{denoise, DenoiseOptions};
//! use scanmesh::mesh::TriangleMesh;
//! use nalgebra::Point3;
//!
//! // The same triangle delivered twice by two overlapping fragments.
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.0, 0.0, 1.0),
//! ];
//! let mesh = TriangleMesh::new(vertices, vec![0, 1, 2, 0, 1, 2]).unwrap();
//!
//! let result = denoise(&mesh, &DenoiseOptions::default());
//! assert_eq!(result.removed, 1);
//! assert_eq!(result.mesh.num_triangles(), 1);
//! ```

use std::collections::HashMap;

use nalgebra::Vector3;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::mesh::{EdgeKey, TriangleMesh};

/// Options for coplanar denoising.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DenoiseOptions {
    /// Maximum angle between face normals, in degrees, for two triangles
    /// sharing an edge to count as coplanar.
    pub coplanar_angle_deg: f32,

    /// Whether to compute face normals in parallel (default: true).
    pub parallel: bool,
}

impl Default for DenoiseOptions {
    fn default() -> Self {
        Self {
            coplanar_angle_deg: 10.0,
            parallel: true,
        }
    }
}

impl DenoiseOptions {
    /// Set the coplanarity angle in degrees.
    pub fn with_angle(mut self, degrees: f32) -> Self {
        self.coplanar_angle_deg = degrees.clamp(0.0, 180.0);
        self
    }

    /// Create options for single-threaded execution.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Dot-product threshold matching the angle.
    #[inline]
    pub fn cos_threshold(&self) -> f32 {
        self.coplanar_angle_deg.to_radians().cos()
    }
}

/// Output of [`denoise`].
#[derive(Debug, Clone)]
pub struct DenoiseResult {
    /// The mesh with redundant triangles removed. Vertices are unchanged.
    pub mesh: TriangleMesh,
    /// Number of triangles removed.
    pub removed: usize,
}

/// Map each edge to the triangles using it, in triangle enumeration order.
pub fn build_edge_map(mesh: &TriangleMesh) -> HashMap<EdgeKey, Vec<usize>> {
    edge_map_for(mesh, 0..mesh.num_triangles())
}

fn edge_map_for(
    mesh: &TriangleMesh,
    triangles: impl Iterator<Item = usize>,
) -> HashMap<EdgeKey, Vec<usize>> {
    let mut map: HashMap<EdgeKey, Vec<usize>> = HashMap::with_capacity(mesh.num_triangles() * 2);
    for t in triangles {
        for edge in EdgeKey::of_triangle(mesh.triangle(t)) {
            map.entry(edge).or_default().push(t);
        }
    }
    map
}

/// Remove redundant near-coplanar triangles.
///
/// Passes are repeated over the surviving triangles until one removes
/// nothing, so the result is a fixed point: denoising it again removes zero
/// triangles. Edges shared by one or by more than two triangles are ignored.
/// Zero-area triangles have no normal and never pair up.
pub fn denoise(mesh: &TriangleMesh, options: &DenoiseOptions) -> DenoiseResult {
    let num_triangles = mesh.num_triangles();
    if num_triangles < 2 {
        return DenoiseResult {
            mesh: mesh.clone(),
            removed: 0,
        };
    }

    let normals = unit_normals(mesh, options.parallel);
    let cos_threshold = options.cos_threshold();

    let mut alive: Vec<usize> = (0..num_triangles).collect();
    let mut marked = vec![false; num_triangles];

    loop {
        let edge_map = edge_map_for(mesh, alive.iter().copied());

        let mut newly_marked = 0usize;
        for tris in edge_map.values() {
            let &[first, second] = tris.as_slice() else {
                continue;
            };
            if first == second || marked[second] {
                continue;
            }
            if let (Some(n0), Some(n1)) = (normals[first], normals[second]) {
                if n0.dot(&n1) > cos_threshold {
                    marked[second] = true;
                    newly_marked += 1;
                }
            }
        }

        if newly_marked == 0 {
            break;
        }
        alive.retain(|&t| !marked[t]);
    }

    let removed = num_triangles - alive.len();
    log::debug!(
        "denoise: removed {} of {} triangles",
        removed,
        num_triangles
    );

    let mut indices = Vec::with_capacity(alive.len() * 3);
    for &t in &alive {
        indices.extend_from_slice(&mesh.triangle(t));
    }

    DenoiseResult {
        mesh: TriangleMesh::from_parts_unchecked(mesh.vertices().to_vec(), indices),
        removed,
    }
}

fn unit_normals(mesh: &TriangleMesh, parallel: bool) -> Vec<Option<Vector3<f32>>> {
    let normal = |t: usize| mesh.face_normal(t).try_normalize(f32::EPSILON);
    if parallel {
        (0..mesh.num_triangles()).into_par_iter().map(normal).collect()
    } else {
        (0..mesh.num_triangles()).map(normal).collect()
    }
}
