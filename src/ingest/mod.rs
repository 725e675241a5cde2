//! Fragment ingest and aggregation.
//!
//! A [`Snapshot`] holds the fragments delivered for one update cycle. Each
//! [`Fragment`] is transformed to world space by [`ingest`], then the
//! ingested fragments are concatenated by [`aggregate`] into a single
//! [`TriangleMesh`](crate::mesh::TriangleMesh) with consistent index offsets.
//!
//! ```
//! use scanmesh::ingest::{aggregate, ingest_all, Fragment, Snapshot};
//! use nalgebra::{Matrix4, Point3};
//!
//! let fragment = Fragment::triangles(
//!     vec![Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0), Point3::new(0.0, 0.0, 1.0)],
//!     vec![0u16, 1, 2],
//!     Matrix4::identity(),
//! );
//! let snapshot = Snapshot::new(vec![fragment.clone(), fragment]);
//! let mesh = aggregate(&ingest_all(&snapshot.fragments)).unwrap();
//! assert_eq!(mesh.num_vertices(), 6);
//! ```

mod aggregate;
mod fragment;

pub use aggregate::{aggregate, aggregate_or_empty, fragment_offsets};
pub use fragment::{ingest, ingest_all, Fragment, IngestedFragment, PrimitiveType, Snapshot};
