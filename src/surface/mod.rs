//! Planar surface extraction.
//!
//! Detects a dominant horizontal surface (a room ceiling) in the aggregated
//! mesh and maintains its boundary as a [`BoundaryPolygon`] across update
//! cycles. Two strategies are available, selected by [`SurfaceStrategy`]:
//!
//! | Strategy | Detection | Boundary | Guarantees |
//! |----------|-----------|----------|------------|
//! | [`ThresholdHull`](SurfaceStrategy::ThresholdHull) | top-decile height band | convex hull, recomputed | convex, CCW |
//! | [`ConcaveInsertion`](SurfaceStrategy::ConcaveInsertion) | downward face normals | incremental insertion | none (may self-intersect) |
//!
//! The threshold/hull strategy is the default.
//!
//! # Example
//!
//! ```
//! use scanmesh::mesh::TriangleMesh;
//! use scanmesh::surface::{PlanarSurfaceExtractor, SurfaceStrategy};
//! use nalgebra::Point3;
//!
//! let ceiling = TriangleMesh::new(
//!     vec![
//!         Point3::new(0.0, 2.5, 0.0),
//!         Point3::new(3.0, 2.5, 0.0),
//!         Point3::new(3.0, 2.5, 3.0),
//!         Point3::new(0.0, 2.5, 3.0),
//!     ],
//!     vec![0, 1, 2, 0, 2, 3],
//! )
//! .unwrap();
//!
//! let mut extractor = PlanarSurfaceExtractor::new(&SurfaceStrategy::default());
//! let update = extractor.update(&ceiling).unwrap();
//! assert_eq!(update.polygon.len(), 4);
//! assert_eq!(update.mesh.num_triangles(), 2);
//! ```

pub mod concave;
pub mod hull;
pub mod polygon;
pub mod threshold;

use serde::{Deserialize, Serialize};

use crate::mesh::TriangleMesh;

pub use concave::{ConcaveInsertionExtractor, ConcaveOptions};
pub use polygon::{project_horizontal, BoundaryPolygon};
pub use threshold::{ThresholdHullExtractor, ThresholdHullOptions};

/// Which ceiling-detection strategy to run, with its options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SurfaceStrategy {
    /// Height band around the top-decile mean, convex hull every cycle.
    ThresholdHull(ThresholdHullOptions),
    /// Downward-normal faces, incremental nearest-edge insertion.
    ConcaveInsertion(ConcaveOptions),
}

impl Default for SurfaceStrategy {
    fn default() -> Self {
        SurfaceStrategy::ThresholdHull(ThresholdHullOptions::default())
    }
}

/// A changed boundary, ready for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonUpdate {
    /// The boundary after this cycle.
    pub polygon: BoundaryPolygon,
    /// Fan triangulation of the boundary at its reference height.
    pub mesh: TriangleMesh,
}

impl PolygonUpdate {
    fn from_polygon(polygon: &BoundaryPolygon) -> Self {
        Self {
            polygon: polygon.clone(),
            mesh: polygon.fan_triangulate(),
        }
    }
}

/// Session-long planar surface state.
#[derive(Debug, Clone)]
pub enum PlanarSurfaceExtractor {
    /// See [`ThresholdHullExtractor`].
    ThresholdHull(ThresholdHullExtractor),
    /// See [`ConcaveInsertionExtractor`].
    ConcaveInsertion(ConcaveInsertionExtractor),
}

impl PlanarSurfaceExtractor {
    /// Create an extractor for the given strategy, with no surface detected yet.
    pub fn new(strategy: &SurfaceStrategy) -> Self {
        match strategy {
            SurfaceStrategy::ThresholdHull(options) => {
                PlanarSurfaceExtractor::ThresholdHull(ThresholdHullExtractor::new(options.clone()))
            }
            SurfaceStrategy::ConcaveInsertion(options) => PlanarSurfaceExtractor::ConcaveInsertion(
                ConcaveInsertionExtractor::new(options.clone()),
            ),
        }
    }

    /// Fold one cycle's aggregated mesh into the boundary.
    ///
    /// Returns the new boundary when it changed.
    pub fn update(&mut self, mesh: &TriangleMesh) -> Option<PolygonUpdate> {
        let changed = match self {
            PlanarSurfaceExtractor::ThresholdHull(e) => e.update(mesh),
            PlanarSurfaceExtractor::ConcaveInsertion(e) => e.update(mesh),
        };
        if !changed {
            return None;
        }
        self.polygon().map(PolygonUpdate::from_polygon)
    }

    /// The current boundary, if a surface has been detected.
    pub fn polygon(&self) -> Option<&BoundaryPolygon> {
        match self {
            PlanarSurfaceExtractor::ThresholdHull(e) => e.polygon(),
            PlanarSurfaceExtractor::ConcaveInsertion(e) => e.polygon(),
        }
    }

    /// Reference height of the detected surface.
    pub fn reference_height(&self) -> Option<f32> {
        self.polygon().map(BoundaryPolygon::height)
    }
}
