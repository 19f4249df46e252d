// src/geometry.rs
//
// Plane-geometry primitives shared by edge extraction and lane
// containment. Sign conventions follow the ground frame: x forward,
// y left, so "left of a segment" means a positive cross product with
// the segment direction.

use crate::types::Point2f;

/// Distance from `point` to the segment `start`..`end`, clamped to the
/// endpoints. Returns `None` for a zero-length segment.
pub fn point_to_segment_distance(
    point: Point2f,
    start: Point2f,
    end: Point2f,
    epsilon: f32,
) -> Option<f32> {
    let direction = end - start;
    let length_sq = direction.norm_squared();
    if length_sq <= epsilon {
        return None;
    }
    let t = ((point - start).dot(&direction) / length_sq).clamp(0.0, 1.0);
    let projection = start + direction * t;
    Some((point - projection).norm())
}

/// Whether `point` lies strictly left of the directed segment
/// `start`..`end`.
pub fn is_point_left_of(point: Point2f, start: Point2f, end: Point2f) -> bool {
    let cross = (end.x - start.x) * (point.y - start.y) - (end.y - start.y) * (point.x - start.x);
    cross > 0.0
}
