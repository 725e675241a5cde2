//! Height-threshold ceiling extraction with a full convex hull each cycle.

use serde::{Deserialize, Serialize};

use crate::mesh::TriangleMesh;

use super::hull::{convex_hull, dedup_by_distance, simplify_short_edges};
use super::polygon::{project_horizontal, BoundaryPolygon};

/// Options for [`ThresholdHullExtractor`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdHullOptions {
    /// Vertices within this vertical distance of the reference height are
    /// surface candidates.
    pub height_threshold: f32,

    /// Candidates closer than this to an already kept point are discarded.
    pub min_point_distance: f32,

    /// Hull edges shorter than this are merged away.
    pub min_edge_length: f32,

    /// Fraction of the highest vertices averaged to find the reference height.
    pub top_fraction: f32,
}

impl Default for ThresholdHullOptions {
    fn default() -> Self {
        Self {
            height_threshold: 0.10,
            min_point_distance: 0.05,
            min_edge_length: 0.20,
            top_fraction: 0.10,
        }
    }
}

impl ThresholdHullOptions {
    /// Set the candidate height band.
    pub fn with_height_threshold(mut self, threshold: f32) -> Self {
        self.height_threshold = threshold.max(0.0);
        self
    }

    /// Set the minimum separation between kept points.
    pub fn with_min_point_distance(mut self, distance: f32) -> Self {
        self.min_point_distance = distance.max(0.0);
        self
    }

    /// Set the short-edge threshold.
    pub fn with_min_edge_length(mut self, length: f32) -> Self {
        self.min_edge_length = length.max(0.0);
        self
    }

    /// Set the fraction of highest vertices used for the reference height.
    pub fn with_top_fraction(mut self, fraction: f32) -> Self {
        self.top_fraction = fraction.clamp(0.0, 1.0);
        self
    }
}

/// Mean height of the highest `fraction` of `mesh`'s vertices (at least one).
///
/// Non-finite heights are ignored; `None` if no finite height remains.
pub fn top_fraction_height(mesh: &TriangleMesh, fraction: f32) -> Option<f32> {
    let mut heights: Vec<f32> = mesh
        .vertices()
        .iter()
        .map(|p| p.y)
        .filter(|y| y.is_finite())
        .collect();
    if heights.is_empty() {
        return None;
    }
    heights.sort_unstable_by(|a, b| b.total_cmp(a));

    let count = ((heights.len() as f64 * f64::from(fraction)) as usize).clamp(1, heights.len());
    let sum: f32 = heights[..count].iter().sum();
    Some(sum / count as f32)
}

/// Ceiling extraction by height threshold and convex hull.
///
/// The reference height is fixed the first time vertices are seen. After
/// that, each cycle gathers the vertices near that height, merges them into
/// the current boundary, and replaces the boundary with the simplified
/// convex hull of the merged set.
#[derive(Debug, Clone)]
pub struct ThresholdHullExtractor {
    options: ThresholdHullOptions,
    polygon: Option<BoundaryPolygon>,
}

impl ThresholdHullExtractor {
    /// Create an extractor with no reference height yet.
    pub fn new(options: ThresholdHullOptions) -> Self {
        Self {
            options,
            polygon: None,
        }
    }

    /// The options in use.
    pub fn options(&self) -> &ThresholdHullOptions {
        &self.options
    }

    /// The current boundary, once a reference height exists.
    pub fn polygon(&self) -> Option<&BoundaryPolygon> {
        self.polygon.as_ref()
    }

    /// Fold one cycle's mesh into the boundary.
    ///
    /// Returns `true` when the boundary was recomputed.
    pub fn update(&mut self, mesh: &TriangleMesh) -> bool {
        if self.polygon.is_none() {
            let Some(height) = top_fraction_height(mesh, self.options.top_fraction) else {
                return false;
            };
            log::info!("ceiling reference height established at {:.3}", height);
            self.polygon = Some(BoundaryPolygon::new(height));
        }
        let Some(polygon) = self.polygon.as_mut() else {
            return false;
        };

        let height = polygon.height();
        let candidates: Vec<_> = mesh
            .vertices()
            .iter()
            .filter(|p| p.coords.iter().all(|c| c.is_finite()))
            .filter(|p| (p.y - height).abs() < self.options.height_threshold)
            .map(project_horizontal)
            .collect();
        if candidates.is_empty() {
            return false;
        }

        let merged = dedup_by_distance(polygon.points(), &candidates, self.options.min_point_distance);
        let hull = convex_hull(&merged);
        let simplified = simplify_short_edges(&hull, self.options.min_edge_length);
        log::debug!(
            "ceiling: {} candidates, {} merged, hull {} -> {} after simplification",
            candidates.len(),
            merged.len(),
            hull.len(),
            simplified.len()
        );

        polygon.set_points(simplified);
        true
    }
}
