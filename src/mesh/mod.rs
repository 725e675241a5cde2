//! Core mesh data structures.
//!
//! This module provides the indexed triangle mesh that flows through the
//! reconstruction pipeline, and the index buffers fragments arrive with.
//!
//! # Overview
//!
//! The primary type is [`TriangleMesh`]: a flat vertex array and a flat
//! triangle-index array. Meshes are rebuilt wholesale every update cycle, so
//! there is no incremental connectivity structure. Adjacency (edges, vertex
//! neighbors) is derived on demand with explicit maps keyed by [`EdgeKey`] or
//! vertex index.
//!
//! # Construction
//!
//! ```
//! use scanmesh::mesh::TriangleMesh;
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//! ];
//!
//! let mesh = TriangleMesh::new(vertices, vec![0, 1, 2]).unwrap();
//! assert_eq!(mesh.num_vertices(), 3);
//! ```

mod index;
mod triangle;

pub use index::{IndexBuffer, IndexWidth};
pub use triangle::{EdgeKey, TriangleMesh};
