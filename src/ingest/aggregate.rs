//! Concatenation of ingested fragments into one global mesh.

use crate::error::GeometryError;
use crate::mesh::TriangleMesh;

use super::IngestedFragment;

/// Running vertex offset of each fragment: the sum of the vertex counts of
/// all fragments before it.
pub fn fragment_offsets(fragments: &[IngestedFragment]) -> Vec<u32> {
    let mut offset = 0u32;
    fragments
        .iter()
        .map(|fragment| {
            let start = offset;
            offset += fragment.vertices.len() as u32;
            start
        })
        .collect()
}

/// Concatenate fragments into one vertex buffer and one index buffer.
///
/// Fragment `k`'s indices are offset by the total vertex count of fragments
/// `0..k`, so its triangles only ever reference its own vertices. Fragments
/// keep their order. An empty input yields [`TriangleMesh::empty`].
///
/// # Errors
///
/// Returns an error if a fragment's index count is not a multiple of 3 or a
/// local index points past that fragment's vertices.
///
/// # Example
///
/// ```
/// use scanmesh::ingest::{aggregate, IngestedFragment};
/// use nalgebra::Point3;
///
/// let a = IngestedFragment { vertices: vec![Point3::origin(); 3], indices: vec![0, 1, 2] };
/// let b = IngestedFragment { vertices: vec![Point3::origin(); 3], indices: vec![2, 1, 0] };
/// let mesh = aggregate(&[a, b]).unwrap();
/// assert_eq!(mesh.indices(), &[0, 1, 2, 5, 4, 3]);
/// ```
pub fn aggregate(fragments: &[IngestedFragment]) -> Result<TriangleMesh, GeometryError> {
    let total_vertices: usize = fragments.iter().map(|f| f.vertices.len()).sum();
    let total_indices: usize = fragments.iter().map(|f| f.indices.len()).sum();
    if total_vertices == 0 && total_indices == 0 {
        return Ok(TriangleMesh::empty());
    }

    let mut vertices = Vec::with_capacity(total_vertices);
    let mut indices = Vec::with_capacity(total_indices);

    for (k, (fragment, offset)) in fragments
        .iter()
        .zip(fragment_offsets(fragments))
        .enumerate()
    {
        if fragment.indices.len() % 3 != 0 {
            return Err(GeometryError::IndexCount {
                len: fragment.indices.len(),
            });
        }
        let vertex_count = fragment.vertices.len();
        for &local in &fragment.indices {
            if local as usize >= vertex_count {
                return Err(GeometryError::FragmentIndexOutOfRange {
                    fragment: k,
                    index: local as usize,
                    vertex_count,
                });
            }
            indices.push(local + offset);
        }
        vertices.extend_from_slice(&fragment.vertices);
    }

    Ok(TriangleMesh::from_parts_unchecked(vertices, indices))
}

/// Per-cycle aggregation: never fails.
///
/// Geometry errors are logged and replaced by the empty-mesh sentinel, since a
/// dropped frame is preferable to stalling a live visualization.
pub fn aggregate_or_empty(fragments: &[IngestedFragment]) -> TriangleMesh {
    match aggregate(fragments) {
        Ok(mesh) => mesh,
        Err(e) => {
            log::warn!("mesh aggregation failed, substituting empty mesh: {}", e);
            TriangleMesh::empty()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::{ingest_all, Fragment};
    use nalgebra::{Matrix4, Point3, Vector3};

    fn four_vertex_fragment(transform: Matrix4<f32>) -> Fragment {
        Fragment::triangles(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 1.0),
                Point3::new(0.0, 0.0, 1.0),
            ],
            vec![0u32, 2, 3],
            transform,
        )
    }

    #[test]
    fn test_two_fragments_offset_by_first_vertex_count() {
        let a = four_vertex_fragment(Matrix4::identity());
        let b = four_vertex_fragment(Matrix4::new_translation(&Vector3::new(1.0, 0.0, 0.0)));
        let ingested = ingest_all(&[a, b]);
        let mesh = aggregate(&ingested).unwrap();

        assert_eq!(mesh.num_vertices(), 8);
        assert_eq!(mesh.num_triangles(), 2);
        let first = mesh.triangle(0);
        let second = mesh.triangle(1);
        for (x, y) in first.iter().zip(second.iter()) {
            assert_eq!(*y, *x + 4);
        }
        assert_eq!(mesh.vertices()[4], Point3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_empty_input_is_sentinel() {
        let mesh = aggregate(&[]).unwrap();
        assert!(mesh.is_empty());
    }

    #[test]
    fn test_vertices_without_triangles() {
        let fragment = IngestedFragment {
            vertices: vec![Point3::origin(); 2],
            indices: Vec::new(),
        };
        let mesh = aggregate(&[fragment]).unwrap();
        assert_eq!(mesh.num_vertices(), 2);
        assert_eq!(mesh.num_triangles(), 0);
    }

    #[test]
    fn test_index_into_other_fragment_rejected() {
        let a = IngestedFragment {
            vertices: vec![Point3::origin(); 3],
            indices: vec![0, 1, 2],
        };
        // Index 3 would land in fragment a's range after offsetting; it must be caught first.
        let b = IngestedFragment {
            vertices: vec![Point3::origin(); 3],
            indices: vec![0, 1, 3],
        };
        let err = aggregate(&[a, b]).unwrap_err();
        assert_eq!(
            err,
            GeometryError::FragmentIndexOutOfRange {
                fragment: 1,
                index: 3,
                vertex_count: 3
            }
        );
    }

    #[test]
    fn test_partial_triangle_rejected() {
        let a = IngestedFragment {
            vertices: vec![Point3::origin(); 3],
            indices: vec![0, 1],
        };
        assert!(matches!(aggregate(&[a]), Err(GeometryError::IndexCount { len: 2 })));
    }

    #[test]
    fn test_aggregate_or_empty_substitutes_sentinel() {
        let bad = IngestedFragment {
            vertices: vec![Point3::origin(); 1],
            indices: vec![0, 0, 5],
        };
        assert!(aggregate_or_empty(&[bad]).is_empty());
    }

    #[test]
    fn test_fragment_offsets() {
        let f = |n| IngestedFragment {
            vertices: vec![Point3::origin(); n],
            indices: Vec::new(),
        };
        assert_eq!(fragment_offsets(&[f(3), f(0), f(5), f(2)]), vec![0, 3, 3, 8]);
    }
}
