//! Indexed triangle mesh.

use nalgebra::{Point3, Vector3};

use crate::error::GeometryError;

/// A world-space triangle soup: a vertex array plus a flat index array.
///
/// Every index is guaranteed to be smaller than the vertex count and the index
/// array always describes whole triangles. An empty mesh ([`TriangleMesh::empty`])
/// is a valid, renderable mesh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriangleMesh {
    vertices: Vec<Point3<f32>>,
    indices: Vec<u32>,
}

impl TriangleMesh {
    /// Build a mesh, validating the index buffer against the vertices.
    ///
    /// # Example
    ///
    /// ```
    /// use scanmesh::mesh::TriangleMesh;
    /// use nalgebra::Point3;
    ///
    /// let mesh = TriangleMesh::new(
    ///     vec![
    ///         Point3::new(0.0, 0.0, 0.0),
    ///         Point3::new(1.0, 0.0, 0.0),
    ///         Point3::new(0.0, 1.0, 0.0),
    ///     ],
    ///     vec![0, 1, 2],
    /// )
    /// .unwrap();
    /// assert_eq!(mesh.num_triangles(), 1);
    /// ```
    pub fn new(vertices: Vec<Point3<f32>>, indices: Vec<u32>) -> Result<Self, GeometryError> {
        if indices.len() % 3 != 0 {
            return Err(GeometryError::IndexCount { len: indices.len() });
        }
        for (i, &index) in indices.iter().enumerate() {
            if index as usize >= vertices.len() {
                return Err(GeometryError::IndexOutOfRange {
                    triangle: i / 3,
                    index: index as usize,
                    vertex_count: vertices.len(),
                });
            }
        }
        Ok(Self { vertices, indices })
    }

    /// Build a mesh whose indices are already known to be valid.
    pub(crate) fn from_parts_unchecked(vertices: Vec<Point3<f32>>, indices: Vec<u32>) -> Self {
        debug_assert!(indices.len() % 3 == 0);
        debug_assert!(indices.iter().all(|&i| (i as usize) < vertices.len()));
        Self { vertices, indices }
    }

    /// The empty-mesh sentinel.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether the mesh has no vertices and no triangles.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() && self.indices.is_empty()
    }

    /// Vertex positions.
    #[inline]
    pub fn vertices(&self) -> &[Point3<f32>] {
        &self.vertices
    }

    /// Flat triangle index array.
    #[inline]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Number of vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Number of triangles.
    #[inline]
    pub fn num_triangles(&self) -> usize {
        self.indices.len() / 3
    }

    /// Vertex indices of triangle `t`.
    #[inline]
    pub fn triangle(&self, t: usize) -> [u32; 3] {
        let base = t * 3;
        [self.indices[base], self.indices[base + 1], self.indices[base + 2]]
    }

    /// Iterate over all triangles in enumeration order.
    pub fn triangles(&self) -> impl ExactSizeIterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|c| [c[0], c[1], c[2]])
    }

    /// Corner positions of triangle `t`.
    #[inline]
    pub fn triangle_positions(&self, t: usize) -> [Point3<f32>; 3] {
        let [a, b, c] = self.triangle(t);
        [
            self.vertices[a as usize],
            self.vertices[b as usize],
            self.vertices[c as usize],
        ]
    }

    /// Non-normalized face normal `(p1 - p0) × (p2 - p0)`.
    pub fn face_normal(&self, t: usize) -> Vector3<f32> {
        let [p0, p1, p2] = self.triangle_positions(t);
        (p1 - p0).cross(&(p2 - p0))
    }

    /// Centroid of triangle `t`.
    pub fn triangle_centroid(&self, t: usize) -> Point3<f32> {
        let [p0, p1, p2] = self.triangle_positions(t);
        Point3::from((p0.coords + p1.coords + p2.coords) / 3.0)
    }

    /// Number of distinct vertices referenced by at least one triangle.
    pub fn referenced_vertex_count(&self) -> usize {
        let mut used = vec![false; self.vertices.len()];
        for &i in &self.indices {
            used[i as usize] = true;
        }
        used.into_iter().filter(|&u| u).count()
    }

    /// Axis-aligned bounding box, or `None` for a mesh without vertices.
    pub fn bounding_box(&self) -> Option<(Point3<f32>, Point3<f32>)> {
        let first = *self.vertices.first()?;
        Some(self.vertices.iter().fold((first, first), |(lo, hi), p| {
            (lo.inf(p), hi.sup(p))
        }))
    }

    /// Same connectivity, new positions.
    pub fn with_vertices(&self, vertices: Vec<Point3<f32>>) -> Result<Self, GeometryError> {
        if vertices.len() != self.vertices.len() {
            return Err(GeometryError::VertexCountMismatch {
                expected: self.vertices.len(),
                actual: vertices.len(),
            });
        }
        Ok(Self {
            vertices,
            indices: self.indices.clone(),
        })
    }

    /// Consume the mesh, returning its vertex and index buffers.
    pub fn into_parts(self) -> (Vec<Point3<f32>>, Vec<u32>) {
        (self.vertices, self.indices)
    }
}

/// Unordered pair of vertex indices, stored as `(min, max)`.
///
/// Only used as a lookup key in edge maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeKey {
    a: u32,
    b: u32,
}

impl EdgeKey {
    /// Canonical key for the edge between `v0` and `v1`.
    #[inline]
    pub fn new(v0: u32, v1: u32) -> Self {
        if v0 <= v1 {
            Self { a: v0, b: v1 }
        } else {
            Self { a: v1, b: v0 }
        }
    }

    /// The smaller vertex index.
    #[inline]
    pub fn a(self) -> u32 {
        self.a
    }

    /// The larger vertex index.
    #[inline]
    pub fn b(self) -> u32 {
        self.b
    }

    /// The three edges of a triangle.
    #[inline]
    pub fn of_triangle([v0, v1, v2]: [u32; 3]) -> [EdgeKey; 3] {
        [EdgeKey::new(v0, v1), EdgeKey::new(v1, v2), EdgeKey::new(v2, v0)]
    }
}
