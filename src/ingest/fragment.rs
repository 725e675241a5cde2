//! Fragment ingest: local geometry plus pose to world-space triangle data.

use nalgebra::{Matrix4, Point3};

use crate::error::GeometryError;
use crate::mesh::{IndexBuffer, IndexWidth};

/// Primitive type of a fragment's index buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrimitiveType {
    /// Three indices per primitive.
    #[default]
    Triangle,
    /// Two indices per primitive. Not ingested.
    Line,
}

/// One unit of incoming local mesh geometry and its world pose.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    /// Vertex positions in the fragment's local frame.
    pub vertices: Vec<Point3<f32>>,
    /// Local primitive indices.
    pub indices: IndexBuffer,
    /// Primitive type of `indices`.
    pub primitive: PrimitiveType,
    /// Local-to-world transform (homogeneous, applied with w = 1).
    pub transform: Matrix4<f32>,
}

impl Fragment {
    /// A triangle fragment.
    pub fn triangles<I: Into<IndexBuffer>>(
        vertices: Vec<Point3<f32>>,
        indices: I,
        transform: Matrix4<f32>,
    ) -> Self {
        Self {
            vertices,
            indices: indices.into(),
            primitive: PrimitiveType::Triangle,
            transform,
        }
    }

    /// A triangle fragment from raw little-endian index bytes.
    ///
    /// `bytes_per_index` must be 1, 2 or 4 and divide `bytes.len()`.
    ///
    /// # Example
    ///
    /// ```
    /// use scanmesh::ingest::Fragment;
    /// use nalgebra::{Matrix4, Point3};
    ///
    /// let vertices = vec![Point3::origin(); 3];
    /// let fragment = Fragment::from_index_bytes(vertices, &[0, 0, 1, 0, 2, 0], 2, Matrix4::identity()).unwrap();
    /// assert_eq!(fragment.indices.to_u32(), vec![0, 1, 2]);
    /// ```
    pub fn from_index_bytes(
        vertices: Vec<Point3<f32>>,
        bytes: &[u8],
        bytes_per_index: usize,
        transform: Matrix4<f32>,
    ) -> Result<Self, GeometryError> {
        let width = IndexWidth::from_bytes(bytes_per_index).ok_or(GeometryError::InvalidIndexBytes {
            len: bytes.len(),
            width: bytes_per_index,
        })?;
        let indices = IndexBuffer::from_le_bytes(width, bytes)?;
        Ok(Self::triangles(vertices, indices, transform))
    }
}

/// A fragment transformed to world space.
///
/// Indices are still local to the fragment; the aggregator offsets them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IngestedFragment {
    /// World-space vertex positions.
    pub vertices: Vec<Point3<f32>>,
    /// Local triangle indices, widened to `u32`.
    pub indices: Vec<u32>,
}

impl IngestedFragment {
    /// Number of triangles described by the index buffer.
    pub fn num_triangles(&self) -> usize {
        self.indices.len() / 3
    }
}

/// The fragments processed together in one update cycle.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Snapshot {
    /// Fragments in delivery order.
    pub fragments: Vec<Fragment>,
}

impl Snapshot {
    /// Wrap an ordered list of fragments.
    pub fn new(fragments: Vec<Fragment>) -> Self {
        Self { fragments }
    }

    /// Total vertex count over all fragments.
    pub fn num_vertices(&self) -> usize {
        self.fragments.iter().map(|f| f.vertices.len()).sum()
    }
}

/// Transform one fragment to world space.
///
/// Returns `None` for fragments without vertices or with non-triangle
/// primitives; such fragments are skipped rather than treated as errors.
///
/// # Example
///
/// ```
/// use scanmesh::ingest::{ingest, Fragment};
/// use nalgebra::{Matrix4, Point3, Vector3};
///
/// let fragment = Fragment::triangles(
///     vec![Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0), Point3::new(0.0, 1.0, 0.0)],
///     vec![0u32, 1, 2],
///     Matrix4::new_translation(&Vector3::new(0.0, 2.0, 0.0)),
/// );
/// let ingested = ingest(&fragment).unwrap();
/// assert_eq!(ingested.vertices[0], Point3::new(0.0, 2.0, 0.0));
/// ```
pub fn ingest(fragment: &Fragment) -> Option<IngestedFragment> {
    if fragment.vertices.is_empty() || fragment.primitive != PrimitiveType::Triangle {
        return None;
    }

    let vertices = fragment
        .vertices
        .iter()
        .map(|p| fragment.transform.transform_point(p))
        .collect();

    Some(IngestedFragment {
        vertices,
        indices: fragment.indices.to_u32(),
    })
}

/// Ingest every usable fragment, preserving order.
pub fn ingest_all(fragments: &[Fragment]) -> Vec<IngestedFragment> {
    fragments.iter().filter_map(ingest).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::{Rotation3, Vector3};

    fn quad() -> Vec<Point3<f32>> {
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 1.0),
            Point3::new(0.0, 0.0, 1.0),
        ]
    }

    #[test]
    fn test_from_index_bytes_widths() {
        let bytes: Vec<u8> = [0u32, 1, 2, 0, 2, 3].iter().flat_map(|i| i.to_le_bytes()).collect();
        let fragment = Fragment::from_index_bytes(quad(), &bytes, 4, Matrix4::identity()).unwrap();
        assert_eq!(fragment.indices.width(), IndexWidth::U32);
        assert_eq!(fragment.indices.to_u32(), vec![0, 1, 2, 0, 2, 3]);

        let narrow = Fragment::from_index_bytes(quad(), &[0, 1, 2], 1, Matrix4::identity()).unwrap();
        assert_eq!(narrow.indices, IndexBuffer::U8(vec![0, 1, 2]));
        assert_eq!(ingest(&narrow).unwrap().num_triangles(), 1);
    }

    #[test]
    fn test_from_index_bytes_rejects_bad_input() {
        assert_eq!(
            Fragment::from_index_bytes(quad(), &[0, 0, 0, 1, 0, 0], 3, Matrix4::identity()),
            Err(GeometryError::InvalidIndexBytes { len: 6, width: 3 })
        );
        assert_eq!(
            Fragment::from_index_bytes(quad(), &[0, 0, 1], 2, Matrix4::identity()),
            Err(GeometryError::InvalidIndexBytes { len: 3, width: 2 })
        );
    }

    #[test]
    fn test_translation_applied_with_unit_w() {
        let fragment = Fragment::triangles(
            quad(),
            vec![0u16, 1, 2],
            Matrix4::new_translation(&Vector3::new(1.0, 2.0, 3.0)),
        );
        let ingested = ingest(&fragment).unwrap();
        assert_eq!(ingested.vertices[2], Point3::new(2.0, 2.0, 4.0));
        assert_eq!(ingested.indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_rotation_applied() {
        let rotation = Rotation3::from_axis_angle(&Vector3::y_axis(), std::f32::consts::FRAC_PI_2);
        let fragment =
            Fragment::triangles(quad(), vec![0u32, 1, 2], rotation.to_homogeneous());
        let ingested = ingest(&fragment).unwrap();
        // (1, 0, 0) rotated a quarter turn about +Y lands on (0, 0, -1).
        assert_relative_eq!(ingested.vertices[1].x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(ingested.vertices[1].z, -1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_empty_fragment_skipped() {
        let fragment = Fragment::triangles(Vec::new(), Vec::<u32>::new(), Matrix4::identity());
        assert!(ingest(&fragment).is_none());
    }

    #[test]
    fn test_line_fragment_skipped() {
        let mut fragment = Fragment::triangles(quad(), vec![0u32, 1], Matrix4::identity());
        fragment.primitive = PrimitiveType::Line;
        assert!(ingest(&fragment).is_none());
    }

    #[test]
    fn test_ingest_all_preserves_order() {
        let a = Fragment::triangles(quad(), vec![0u8, 1, 2], Matrix4::identity());
        let empty = Fragment::triangles(Vec::new(), Vec::<u8>::new(), Matrix4::identity());
        let b = Fragment::triangles(
            quad(),
            vec![1u8, 2, 3],
            Matrix4::new_translation(&Vector3::new(5.0, 0.0, 0.0)),
        );
        let ingested = ingest_all(&[a, empty, b]);
        assert_eq!(ingested.len(), 2);
        assert_eq!(ingested[1].indices, vec![1, 2, 3]);
        assert_eq!(ingested[1].vertices[0].x, 5.0);
    }
}
