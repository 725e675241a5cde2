//! 2D convex hull and short-edge simplification.

use nalgebra::Point2;

/// Lines closer to parallel than this are treated as non-intersecting.
const PARALLEL_EPSILON: f32 = 1e-6;

/// Intersections further than this many segment lengths along the first
/// line are rejected.
const MAX_INTERSECTION_PARAM: f32 = 10.0;

/// Z component of `(a - o) × (b - o)`: positive for a left turn.
#[inline]
pub fn cross(o: &Point2<f32>, a: &Point2<f32>, b: &Point2<f32>) -> f32 {
    (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
}

/// Convex hull by Andrew's monotone chain.
///
/// Points are sorted by `(x, y)`; both chains drop their last point while the
/// last three make a non-left turn, so collinear points are excluded. The
/// hull is counter-clockwise and never longer than the input. Inputs with at
/// most two distinct points are returned deduplicated, as is.
///
/// # Example
///
/// ```
/// use scanmesh::surface::hull::convex_hull;
/// use nalgebra::Point2;
///
/// let points = vec![
///     Point2::new(0.0, 0.0),
///     Point2::new(2.0, 0.0),
///     Point2::new(1.0, 0.5),
///     Point2::new(2.0, 2.0),
///     Point2::new(0.0, 2.0),
/// ];
/// let hull = convex_hull(&points);
/// assert_eq!(hull.len(), 4);
/// ```
pub fn convex_hull(points: &[Point2<f32>]) -> Vec<Point2<f32>> {
    let mut sorted = points.to_vec();
    sorted.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
    sorted.dedup();

    if sorted.len() <= 2 {
        return sorted;
    }

    let mut lower: Vec<Point2<f32>> = Vec::with_capacity(sorted.len());
    for p in &sorted {
        while lower.len() >= 2 && cross(&lower[lower.len() - 2], &lower[lower.len() - 1], p) <= 0.0 {
            lower.pop();
        }
        lower.push(*p);
    }

    let mut upper: Vec<Point2<f32>> = Vec::with_capacity(sorted.len());
    for p in sorted.iter().rev() {
        while upper.len() >= 2 && cross(&upper[upper.len() - 2], &upper[upper.len() - 1], p) <= 0.0 {
            upper.pop();
        }
        upper.push(*p);
    }

    // Each chain ends where the other begins.
    lower.pop();
    upper.pop();
    lower.extend(upper);
    lower
}

/// Intersection of the infinite lines through `p1`–`p2` and `p3`–`p4`.
///
/// `None` when the lines are nearly parallel or the intersection lies too far
/// along the first line.
pub fn line_intersection(
    p1: &Point2<f32>,
    p2: &Point2<f32>,
    p3: &Point2<f32>,
    p4: &Point2<f32>,
) -> Option<Point2<f32>> {
    let det = (p1.x - p2.x) * (p3.y - p4.y) - (p1.y - p2.y) * (p3.x - p4.x);
    if det.abs() < PARALLEL_EPSILON {
        return None;
    }

    let t = ((p1.x - p3.x) * (p3.y - p4.y) - (p1.y - p3.y) * (p3.x - p4.x)) / det;
    if !(-MAX_INTERSECTION_PARAM..=MAX_INTERSECTION_PARAM).contains(&t) {
        return None;
    }

    Some(Point2::new(p1.x + t * (p2.x - p1.x), p1.y + t * (p2.y - p1.y)))
}

/// Remove polygon edges shorter than `min_edge_length`.
///
/// A short edge's two endpoints are replaced by the intersection of the two
/// neighboring edges extended as lines. The scan restarts after every merge
/// and stops once no edge qualifies or fewer than 4 vertices remain, so at
/// most `len - 3` merges happen.
pub fn simplify_short_edges(polygon: &[Point2<f32>], min_edge_length: f32) -> Vec<Point2<f32>> {
    let mut result = polygon.to_vec();

    'scan: while result.len() >= 4 {
        let n = result.len();
        for i in 0..n {
            let current = result[i];
            let next = result[(i + 1) % n];
            if (next - current).norm() >= min_edge_length {
                continue;
            }

            let prev = result[(i + n - 1) % n];
            let next_next = result[(i + 2) % n];
            if let Some(intersection) = line_intersection(&prev, &current, &next, &next_next) {
                result[i] = intersection;
                result.remove((i + 1) % n);
                continue 'scan;
            }
        }
        break;
    }

    result
}

/// Merge `candidates` into `existing`, discarding any candidate closer than
/// `min_distance` to a point already kept.
///
/// Existing points are themselves filtered the same way, in order, so the
/// result never holds two points closer than `min_distance`.
pub fn dedup_by_distance(
    existing: &[Point2<f32>],
    candidates: &[Point2<f32>],
    min_distance: f32,
) -> Vec<Point2<f32>> {
    let min_sq = min_distance * min_distance;
    let mut kept: Vec<Point2<f32>> = Vec::with_capacity(existing.len() + candidates.len());
    for p in existing.iter().chain(candidates) {
        if !kept.iter().any(|q| (q - p).norm_squared() < min_sq) {
            kept.push(*p);
        }
    }
    kept
}
