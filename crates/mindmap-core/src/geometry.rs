//! Geometric helpers for hit-testing edges.

use kurbo::{Point, Vec2};

/// Default distance (content-local units) within which a click hits an edge.
pub const EDGE_HIT_THRESHOLD: f64 = 5.0;

/// Squared distance from a point to the line segment `a`→`b`.
///
/// The projection parameter is clamped to `[0, 1]`, so points beyond either
/// end measure against the nearest endpoint. A degenerate segment measures
/// against `a`.
pub fn point_to_segment_distance_squared(point: Point, a: Point, b: Point) -> f64 {
    let seg = b - a;
    let pv = point - a;
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot2();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    let proj = a + seg * t;
    (point - proj).hypot2()
}

/// Distance from a point to the line segment `a`→`b`.
pub fn point_to_segment_distance(point: Point, a: Point, b: Point) -> f64 {
    point_to_segment_distance_squared(point, a, b).sqrt()
}

/// Check whether `point` lies within `threshold` of the segment `a`→`b`.
///
/// Compares squared distances so the hot path never takes a square root.
pub fn within_distance(point: Point, a: Point, b: Point, threshold: f64) -> bool {
    point_to_segment_distance_squared(point, a, b) <= threshold * threshold
}

/// Squared distance between two points.
pub fn distance_squared(a: Point, b: Point) -> f64 {
    Vec2::new(a.x - b.x, a.y - b.y).hypot2()
}
