//! Display-side view of the latest cycle.

use std::sync::Arc;

use crate::mesh::TriangleMesh;
use crate::surface::PolygonUpdate;

use super::cycle::CycleResult;

/// What the renderer draws, swapped in whole from finished cycles.
///
/// The buffers are shared snapshots: applying a result replaces the `Arc`s
/// and never mutates a buffer a reader may still hold.
#[derive(Debug, Clone)]
pub struct RenderState {
    /// The latest denoised mesh.
    pub mesh: Arc<TriangleMesh>,
    /// The latest smoothed mesh, if smoothing is enabled.
    pub smoothed: Option<Arc<TriangleMesh>>,
    /// The latest ceiling boundary and its fan mesh.
    pub polygon: Option<Arc<PolygonUpdate>>,
    sequence: u64,
}

impl Default for RenderState {
    fn default() -> Self {
        Self {
            mesh: Arc::new(TriangleMesh::empty()),
            smoothed: None,
            polygon: None,
            sequence: 0,
        }
    }
}

impl RenderState {
    /// Nothing to draw yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Swap in a finished cycle.
    ///
    /// The ceiling is only replaced when the cycle changed it.
    pub fn apply(&mut self, result: CycleResult) {
        self.mesh = result.mesh;
        self.smoothed = result.smoothed;
        if let Some(polygon) = result.polygon {
            self.polygon = Some(polygon);
        }
        self.sequence = result.sequence;
    }

    /// The mesh buffer to draw.
    pub fn display_mesh(&self, prefer_smoothed: bool) -> &Arc<TriangleMesh> {
        match &self.smoothed {
            Some(smoothed) if prefer_smoothed => smoothed,
            _ => &self.mesh,
        }
    }

    /// Number of ceiling boundary points currently drawn.
    pub fn ceiling_point_count(&self) -> usize {
        self.polygon.as_ref().map_or(0, |update| update.polygon.len())
    }

    /// Sequence number of the last applied cycle, 0 before any.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }
}
