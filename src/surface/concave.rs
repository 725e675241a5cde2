//! Downward-normal ceiling extraction with incremental concave insertion.
//!
//! Faces whose unit normal points steeply down are treated as the underside
//! of a horizontal surface. Their vertices are inserted one by one into a
//! growing, possibly non-convex boundary. The heuristic does not prevent
//! self-intersections under unfavorable insertion orders.

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::mesh::TriangleMesh;

use super::polygon::{project_horizontal, BoundaryPolygon};

/// Options for [`ConcaveInsertionExtractor`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConcaveOptions {
    /// Faces whose unit normal has a vertical component below this are
    /// ceiling candidates.
    pub normal_threshold: f32,

    /// Accepted faces have a centroid within this vertical distance of the
    /// reference height.
    pub height_tolerance: f32,

    /// Points closer than this to the boundary are not inserted.
    pub min_point_distance: f32,
}

impl Default for ConcaveOptions {
    fn default() -> Self {
        Self {
            normal_threshold: -0.5,
            height_tolerance: 0.3,
            min_point_distance: 0.1,
        }
    }
}

impl ConcaveOptions {
    /// Set the vertical normal threshold.
    pub fn with_normal_threshold(mut self, threshold: f32) -> Self {
        self.normal_threshold = threshold.clamp(-1.0, 1.0);
        self
    }

    /// Set the accepted height band.
    pub fn with_height_tolerance(mut self, tolerance: f32) -> Self {
        self.height_tolerance = tolerance.max(0.0);
        self
    }

    /// Set the insertion tolerance.
    pub fn with_min_point_distance(mut self, distance: f32) -> Self {
        self.min_point_distance = distance.max(0.0);
        self
    }
}

/// Ceiling extraction by downward normals and nearest-edge insertion.
#[derive(Debug, Clone)]
pub struct ConcaveInsertionExtractor {
    options: ConcaveOptions,
    polygon: Option<BoundaryPolygon>,
}

impl ConcaveInsertionExtractor {
    /// Create an extractor with no reference height yet.
    pub fn new(options: ConcaveOptions) -> Self {
        Self {
            options,
            polygon: None,
        }
    }

    /// The options in use.
    pub fn options(&self) -> &ConcaveOptions {
        &self.options
    }

    /// The current boundary, once a candidate face has been seen.
    pub fn polygon(&self) -> Option<&BoundaryPolygon> {
        self.polygon.as_ref()
    }

    /// Fold one cycle's mesh into the boundary.
    ///
    /// Returns `true` when at least one point was added.
    pub fn update(&mut self, mesh: &TriangleMesh) -> bool {
        let mut changed = false;

        for t in 0..mesh.num_triangles() {
            let Some(normal) = mesh.face_normal(t).try_normalize(f32::EPSILON) else {
                continue;
            };
            if normal.y >= self.options.normal_threshold {
                continue;
            }

            let corners = mesh.triangle_positions(t);
            if !corners.iter().all(|p| p.coords.iter().all(|c| c.is_finite())) {
                continue;
            }
            match self.polygon.as_mut() {
                None => {
                    let height = corners.iter().map(|p| p.y).sum::<f32>() / 3.0;
                    log::info!("ceiling reference height established at {:.3}", height);
                    let mut polygon = BoundaryPolygon::new(height);
                    for p in &corners {
                        push_if_separated(&mut polygon, project_horizontal(p), self.options.min_point_distance);
                    }
                    self.polygon = Some(polygon);
                    changed = true;
                }
                Some(polygon) => {
                    let centroid_y = mesh.triangle_centroid(t).y;
                    if (centroid_y - polygon.height()).abs() >= self.options.height_tolerance {
                        continue;
                    }
                    for p in &corners {
                        changed |= insert_point(polygon, project_horizontal(p), self.options.min_point_distance);
                    }
                }
            }
        }

        changed
    }
}

fn push_if_separated(polygon: &mut BoundaryPolygon, p: Point2<f32>, min_distance: f32) -> bool {
    if polygon.points().iter().any(|q| (q - p).norm() < min_distance) {
        return false;
    }
    polygon.push(p);
    true
}

/// Insert `p` after the edge with the nearest midpoint, unless it is inside
/// the polygon or within `min_distance` of the boundary.
fn insert_point(polygon: &mut BoundaryPolygon, p: Point2<f32>, min_distance: f32) -> bool {
    if polygon.len() < 2 {
        return push_if_separated(polygon, p, min_distance);
    }
    if polygon.contains(&p) {
        return false;
    }
    if polygon
        .distance_to_boundary(&p)
        .is_some_and(|d| d < min_distance)
    {
        return false;
    }

    match polygon.nearest_edge_by_midpoint(&p) {
        Some(edge) => {
            polygon.insert_after(edge, p);
            true
        }
        None => false,
    }
}
