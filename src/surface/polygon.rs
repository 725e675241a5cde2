//! Boundary polygon of the dominant horizontal surface.

use nalgebra::{Point2, Point3};

use crate::mesh::TriangleMesh;

/// Ordered 2D boundary points in the horizontal plane plus the surface height.
///
/// The polygon lives for a whole capture session and is mutated in place by
/// its extractor. Points are `(x, z)` world coordinates; [`BoundaryPolygon::lift`]
/// maps them back to 3D at the reference height.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryPolygon {
    points: Vec<Point2<f32>>,
    height: f32,
}

impl BoundaryPolygon {
    /// An empty polygon at the given reference height.
    pub fn new(height: f32) -> Self {
        Self {
            points: Vec::new(),
            height,
        }
    }

    /// A polygon with the given points.
    pub fn from_points(points: Vec<Point2<f32>>, height: f32) -> Self {
        Self { points, height }
    }

    /// Boundary points in order.
    #[inline]
    pub fn points(&self) -> &[Point2<f32>] {
        &self.points
    }

    /// Reference height of the surface.
    #[inline]
    pub fn height(&self) -> f32 {
        self.height
    }

    /// Number of boundary points.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the polygon has no points.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub(crate) fn set_points(&mut self, points: Vec<Point2<f32>>) {
        self.points = points;
    }

    pub(crate) fn push(&mut self, p: Point2<f32>) {
        self.points.push(p);
    }

    /// Insert `p` immediately after the start of edge `edge` (between points
    /// `edge` and `edge + 1`).
    pub(crate) fn insert_after(&mut self, edge: usize, p: Point2<f32>) {
        self.points.insert(edge + 1, p);
    }

    /// Iterate over closed-polygon edges `(points[i], points[i + 1])`.
    pub fn edges(&self) -> impl Iterator<Item = (Point2<f32>, Point2<f32>)> + '_ {
        let n = self.points.len();
        let count = if n >= 2 { n } else { 0 };
        (0..count).map(move |i| (self.points[i], self.points[(i + 1) % n]))
    }

    /// Ray-casting parity test. Always `false` with fewer than 3 points.
    pub fn contains(&self, p: &Point2<f32>) -> bool {
        if self.points.len() < 3 {
            return false;
        }

        let mut inside = false;
        for (a, b) in self.edges() {
            if (a.y > p.y) != (b.y > p.y) {
                let x_cross = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);
                if p.x < x_cross {
                    inside = !inside;
                }
            }
        }
        inside
    }

    /// Distance from `p` to the nearest point on the boundary.
    ///
    /// With a single point this is the distance to that point; `None` for an
    /// empty polygon.
    pub fn distance_to_boundary(&self, p: &Point2<f32>) -> Option<f32> {
        match self.points.len() {
            0 => None,
            1 => Some((p - self.points[0]).norm()),
            _ => self
                .edges()
                .map(|(a, b)| point_segment_distance(p, &a, &b))
                .reduce(f32::min),
        }
    }

    /// Index of the edge whose midpoint is nearest to `p`.
    pub fn nearest_edge_by_midpoint(&self, p: &Point2<f32>) -> Option<usize> {
        self.edges()
            .enumerate()
            .map(|(i, (a, b))| (i, (nalgebra::center(&a, &b) - p).norm_squared()))
            .min_by(|x, y| x.1.total_cmp(&y.1))
            .map(|(i, _)| i)
    }

    /// Shoelace signed area: positive for counter-clockwise points.
    pub fn signed_area(&self) -> f32 {
        0.5 * self
            .edges()
            .map(|(a, b)| a.x * b.y - b.x * a.y)
            .sum::<f32>()
    }

    /// Length of the closed boundary.
    pub fn perimeter(&self) -> f32 {
        self.edges().map(|(a, b)| (b - a).norm()).sum()
    }

    /// Map a boundary point to world space at the reference height.
    #[inline]
    pub fn lift(&self, p: &Point2<f32>) -> Point3<f32> {
        Point3::new(p.x, self.height, p.y)
    }

    /// Fan triangulation from vertex 0, lifted to the reference height.
    ///
    /// Returns the empty mesh for fewer than 3 points. Only correct for
    /// polygons that are star-shaped around vertex 0.
    pub fn fan_triangulate(&self) -> TriangleMesh {
        let n = self.points.len();
        if n < 3 {
            return TriangleMesh::empty();
        }

        let vertices = self.points.iter().map(|p| self.lift(p)).collect();
        let mut indices = Vec::with_capacity((n - 2) * 3);
        for i in 1..(n as u32 - 1) {
            indices.extend_from_slice(&[0, i, i + 1]);
        }
        TriangleMesh::from_parts_unchecked(vertices, indices)
    }
}

/// Horizontal-plane projection of a Y-up world point.
#[inline]
pub fn project_horizontal(p: &Point3<f32>) -> Point2<f32> {
    Point2::new(p.x, p.z)
}

/// Distance from `p` to the segment `a`–`b`.
pub fn point_segment_distance(p: &Point2<f32>, a: &Point2<f32>, b: &Point2<f32>) -> f32 {
    let ab = b - a;
    let len_sq = ab.norm_squared();
    if len_sq <= f32::EPSILON {
        return (p - a).norm();
    }
    let t = ((p - a).dot(&ab) / len_sq).clamp(0.0, 1.0);
    (p - (a + ab * t)).norm()
}
