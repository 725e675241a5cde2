//! Session state owned by the reconstruction worker.
//!
//! [`SurfaceState`] runs one cycle per snapshot and keeps the ceiling
//! extractor alive between cycles.

use crate::config::PipelineConfig;
use crate::ingest::Snapshot;
use crate::surface::{BoundaryPolygon, PlanarSurfaceExtractor};

use super::cycle::{process_snapshot, CycleResult};

/// Session-long reconstruction state.
///
/// Owns the ceiling extractor, so every mutation goes through
/// [`ingest_snapshot`](Self::ingest_snapshot). Deliberately not `Clone`.
#[derive(Debug)]
pub struct SurfaceState {
    config: PipelineConfig,
    extractor: PlanarSurfaceExtractor,
    sequence: u64,
}

impl SurfaceState {
    /// Start a session with no surface detected.
    pub fn new(config: PipelineConfig) -> Self {
        let extractor = PlanarSurfaceExtractor::new(&config.surface);
        Self {
            config,
            extractor,
            sequence: 0,
        }
    }

    /// The session configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Process the next snapshot.
    pub fn ingest_snapshot(&mut self, snapshot: &Snapshot) -> CycleResult {
        self.sequence += 1;
        CycleResult {
            sequence: self.sequence,
            ..process_snapshot(snapshot, &self.config, &mut self.extractor)
        }
    }

    /// The current ceiling boundary.
    pub fn current_polygon(&self) -> Option<&BoundaryPolygon> {
        self.extractor.polygon()
    }

    /// Number of snapshots processed.
    pub fn cycles(&self) -> u64 {
        self.sequence
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::Fragment;
    use nalgebra::{Matrix4, Point3};

    #[test]
    fn test_sequence_increments() {
        let mut state = SurfaceState::new(PipelineConfig::default());
        assert_eq!(state.ingest_snapshot(&Snapshot::default()).sequence, 1);
        assert_eq!(state.ingest_snapshot(&Snapshot::default()).sequence, 2);
        assert_eq!(state.cycles(), 2);
    }

    #[test]
    fn test_polygon_persists_across_empty_cycles() {
        let mut state = SurfaceState::new(PipelineConfig::default());
        let fragment = Fragment::triangles(
            vec![
                Point3::new(0.0, 3.0, 0.0),
                Point3::new(1.0, 3.0, 0.0),
                Point3::new(1.0, 3.0, 1.0),
            ],
            vec![0u32, 1, 2],
            Matrix4::identity(),
        );
        state.ingest_snapshot(&Snapshot::new(vec![fragment]));
        let before = state.current_polygon().cloned().unwrap();

        let result = state.ingest_snapshot(&Snapshot::default());
        assert!(result.polygon.is_none());
        assert!(result.mesh.is_empty());
        assert_eq!(state.current_polygon(), Some(&before));
    }
}
