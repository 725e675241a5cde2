//! # scanmesh
//!
//! Incremental mesh reconstruction from streamed depth-scan fragments.
//!
//! A capture session delivers, once per update cycle, a [`Snapshot`](ingest::Snapshot)
//! of mesh fragments, each with local vertices, a local index buffer and a
//! world pose. scanmesh turns every snapshot into a single world-space
//! triangle mesh, cleans and smooths it, and tracks the boundary of the
//! room ceiling across cycles.
//!
//! ## Features
//!
//! - **Aggregation**: fragments to one indexed mesh with consistent offsets
//! - **Denoising**: removal of near-coplanar duplicates along shared edges
//! - **Smoothing**: uniform Laplacian relaxation, optionally parallel
//! - **Ceiling extraction**: convex-hull or concave-insertion boundary tracking
//! - **Export**: OBJ files with JSON pose companions
//! - **Worker**: one background thread that serializes all cycles
//!
//! ## Quick Start
//!
//! ```
//! use scanmesh::prelude::*;
//! use nalgebra::{Matrix4, Point3};
//!
//! let fragment = Fragment::triangles(
//!     vec![
//!         Point3::new(0.0, 2.4, 0.0),
//!         Point3::new(4.0, 2.4, 0.0),
//!         Point3::new(4.0, 2.4, 3.0),
//!         Point3::new(0.0, 2.4, 3.0),
//!     ],
//!     vec![0u16, 1, 2, 0, 2, 3],
//!     Matrix4::identity(),
//! );
//!
//! let mut state = SurfaceState::new(PipelineConfig::default());
//! let result = state.ingest_snapshot(&Snapshot::new(vec![fragment]));
//!
//! let ceiling = state.current_polygon().unwrap();
//! assert_eq!(ceiling.len(), 4);
//! assert!((ceiling.signed_area() - 12.0).abs() < 1e-4);
//! assert!(result.smoothed.is_some());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod config;
pub mod error;
pub mod ingest;
pub mod io;
pub mod mesh;
pub mod pipeline;
pub mod surface;

/// Prelude module for convenient imports.
///
/// ```
/// use scanmesh::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::PipelineConfig;
    pub use crate::error::{GeometryError, Result, ScanError};
    pub use crate::ingest::{aggregate, ingest, Fragment, IngestedFragment, Snapshot};
    pub use crate::mesh::{EdgeKey, IndexBuffer, TriangleMesh};
    pub use crate::pipeline::{CycleResult, ReconstructionWorker, RenderState, SurfaceState};
    pub use crate::surface::{BoundaryPolygon, PlanarSurfaceExtractor, SurfaceStrategy};
}

// Re-export nalgebra types for convenience
pub use nalgebra;
