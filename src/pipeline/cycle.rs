//! One update cycle, from raw fragments to render-ready buffers.

use std::sync::Arc;

use crate::algo::{denoise, laplacian_smooth};
use crate::config::PipelineConfig;
use crate::ingest::{aggregate_or_empty, ingest_all, Snapshot};
use crate::mesh::TriangleMesh;
use crate::surface::{PlanarSurfaceExtractor, PolygonUpdate};

/// Output of one update cycle. Never mutated after it is produced.
#[derive(Debug, Clone)]
pub struct CycleResult {
    /// Position of the cycle in submission order, starting at 1.
    pub sequence: u64,
    /// The aggregated mesh after denoising.
    pub mesh: Arc<TriangleMesh>,
    /// The smoothed mesh, when smoothing is enabled.
    pub smoothed: Option<Arc<TriangleMesh>>,
    /// The new ceiling boundary, when it changed this cycle.
    pub polygon: Option<Arc<PolygonUpdate>>,
    /// Triangles dropped by the denoiser.
    pub removed_triangles: usize,
}

/// Run one cycle over `snapshot`.
///
/// Ingest, aggregation, ceiling update on the aggregated mesh, then
/// denoising and smoothing as configured. Geometry failures degrade to the
/// empty mesh, so this never fails. The returned `sequence` is 0; callers
/// that count cycles stamp their own.
pub fn process_snapshot(
    snapshot: &Snapshot,
    config: &PipelineConfig,
    extractor: &mut PlanarSurfaceExtractor,
) -> CycleResult {
    let fragments = ingest_all(&snapshot.fragments);
    let aggregated = aggregate_or_empty(&fragments);
    log::debug!(
        "cycle: {} fragments, {} vertices, {} triangles",
        fragments.len(),
        aggregated.num_vertices(),
        aggregated.num_triangles()
    );

    let polygon = extractor.update(&aggregated).map(Arc::new);

    let (mesh, removed_triangles) = match &config.denoise {
        Some(options) => {
            let result = denoise(&aggregated, options);
            (result.mesh, result.removed)
        }
        None => (aggregated, 0),
    };

    let smoothed = config
        .smooth
        .as_ref()
        .map(|options| Arc::new(laplacian_smooth(&mesh, options)));

    CycleResult {
        sequence: 0,
        mesh: Arc::new(mesh),
        smoothed,
        polygon,
        removed_triangles,
    }
}
