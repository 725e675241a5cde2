//! Pipeline configuration.
//!
//! Every field has a default, so a configuration file only needs the values
//! it changes:
//!
//! ```
//! use scanmesh::config::PipelineConfig;
//! use scanmesh::surface::SurfaceStrategy;
//!
//! let config = PipelineConfig::from_json_str(
//!     r#"{ "smooth": null, "surface": { "kind": "concave_insertion" } }"#,
//! )
//! .unwrap();
//! assert!(config.smooth.is_none());
//! assert!(config.denoise.is_some());
//! assert!(matches!(config.surface, SurfaceStrategy::ConcaveInsertion(_)));
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::algo::{DenoiseOptions, SmoothOptions};
use crate::error::{Result, ScanError};
use crate::surface::SurfaceStrategy;

/// Default number of snapshots the worker queues before rejecting new ones.
pub const DEFAULT_QUEUE_CAPACITY: usize = 4;

/// Settings for one reconstruction session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Coplanar duplicate removal, or `None` to skip it.
    pub denoise: Option<DenoiseOptions>,

    /// Laplacian smoothing of the denoised mesh, or `None` to skip it.
    pub smooth: Option<SmoothOptions>,

    /// Ceiling detection strategy.
    pub surface: SurfaceStrategy,

    /// Pending snapshots the worker accepts; `None` for an unbounded queue.
    pub queue_capacity: Option<usize>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            denoise: Some(DenoiseOptions::default()),
            smooth: Some(SmoothOptions::default()),
            surface: SurfaceStrategy::default(),
            queue_capacity: Some(DEFAULT_QUEUE_CAPACITY),
        }
    }
}

impl PipelineConfig {
    /// Parse a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Self::parse(json, PathBuf::from("<memory>"))
    }

    /// Load a JSON configuration file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| ScanError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::parse(&text, path.to_path_buf())
    }

    /// Set the surface strategy.
    pub fn with_surface(mut self, surface: SurfaceStrategy) -> Self {
        self.surface = surface;
        self
    }

    /// Disable denoising and smoothing.
    pub fn without_postprocessing(mut self) -> Self {
        self.denoise = None;
        self.smooth = None;
        self
    }

    fn parse(json: &str, path: PathBuf) -> Result<Self> {
        let config: Self = serde_json::from_str(json).map_err(|e| ScanError::Config {
            path: path.clone(),
            message: e.to_string(),
        })?;
        if config.queue_capacity == Some(0) {
            return Err(ScanError::Config {
                path,
                message: "queue_capacity must be at least 1".to_string(),
            });
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::ThresholdHullOptions;

    #[test]
    fn test_empty_object_is_default() {
        let config = PipelineConfig::from_json_str("{}").unwrap();
        assert_eq!(config, PipelineConfig::default());
        assert_eq!(config.queue_capacity, Some(4));
    }

    #[test]
    fn test_partial_options() {
        let json = r#"{
            "denoise": { "coplanar_angle_deg": 5.0 },
            "smooth": { "iterations": 3 },
            "surface": { "kind": "threshold_hull", "height_threshold": 0.2 },
            "queue_capacity": null
        }"#;
        let config = PipelineConfig::from_json_str(json).unwrap();
        assert_eq!(config.denoise.unwrap().coplanar_angle_deg, 5.0);
        let smooth = config.smooth.unwrap();
        assert_eq!(smooth.iterations, 3);
        assert!(smooth.parallel);
        assert_eq!(
            config.surface,
            SurfaceStrategy::ThresholdHull(ThresholdHullOptions {
                height_threshold: 0.2,
                ..ThresholdHullOptions::default()
            })
        );
        assert!(config.queue_capacity.is_none());
    }

    #[test]
    fn test_invalid_json_is_config_error() {
        let err = PipelineConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ScanError::Config { .. }));
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let err = PipelineConfig::from_json_str(r#"{ "queue_capacity": 0 }"#).unwrap_err();
        assert!(matches!(err, ScanError::Config { .. }));
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let err = PipelineConfig::from_json_file("/nonexistent/scanmesh.json").unwrap_err();
        match err {
            ScanError::Config { path, .. } => {
                assert_eq!(path, PathBuf::from("/nonexistent/scanmesh.json"))
            }
            other => panic!("unexpected error {:?}", other),
        }
    }
}
