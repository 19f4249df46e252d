//! Shared data types for the CIPV determination pipeline.
//!
//! Ground coordinates are vehicle-relative: x points forward from the ego
//! origin, y points left. Image coordinates are raw camera pixels.

use nalgebra::{Matrix4, Vector2, Vector3};

/// A 2D point in either image or ground coordinates.
pub type Point2f = Vector2<f32>;

/// Ordered pair of endpoints; degenerate when start and end coincide.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment2f {
    pub start: Point2f,
    pub end: Point2f,
}

/// One lane boundary as an ordered point sequence, near-to-far.
///
/// Rebuilt every frame. Segment-based tests require at least two points;
/// callers check [`LaneLineSimple::is_usable`] first.
#[derive(Debug, Clone, Default)]
pub struct LaneLineSimple {
    pub points: Vec<Point2f>,
}

impl LaneLineSimple {
    pub fn is_usable(&self) -> bool {
        self.points.len() >= 2
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }
}

/// Left and right boundary of the ego corridor in one coordinate frame.
#[derive(Debug, Clone, Default)]
pub struct EgoLane {
    pub left: LaneLineSimple,
    pub right: LaneLineSimple,
}

/// Position tag assigned to a raw lane-line detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanePosition {
    EgoLeft,
    EgoRight,
    Other,
}

/// Raw lane-line detection with parallel image/ground point sequences.
///
/// The two sequences describe the same physical samples and must have
/// matching lengths; a mismatch is an upstream bug.
#[derive(Debug, Clone)]
pub struct DetectedLaneLine {
    pub position: LanePosition,
    pub image_points: Vec<Point2f>,
    pub ground_points: Vec<Point2f>,
}

/// Axis-aligned image bounding box in pixels.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoundingBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl BoundingBox {
    /// Bottom-center of the box, the image footprint of the object.
    pub fn bottom_center(&self) -> (f32, f32) {
        (self.x + self.width * 0.5, self.y + self.height)
    }
}

/// A camera-tracked object as delivered by the upstream tracker.
///
/// `track_id` is stable across frames and unique among currently-tracked
/// objects. `is_cipv` and `drops` are owned by this pipeline and
/// overwritten each frame; everything else is read-only input.
#[derive(Debug, Clone)]
pub struct TrackedObject {
    pub track_id: i32,
    /// Object dimensions (length, width, height)
    pub size: Vector3<f32>,
    /// Object center on the ground plane, ego coordinates
    pub ground_center: Point2f,
    /// Heading direction on the ground plane; consumed by the image-based
    /// classification path once that extension lands
    pub direction: Vector2<f32>,
    /// Object center in the camera frame
    pub local_center: Vector3<f32>,
    /// Observation angle from the detector
    pub alpha: f32,
    pub image_box: BoundingBox,
    /// Set by the selector; at most one object per frame carries it
    pub is_cipv: bool,
    /// Motion-compensated trail of past ground positions, newest first
    pub drops: Vec<Point2f>,
}

/// Per-frame ego-motion inputs supplied by the caller.
#[derive(Debug, Clone, Copy, Default)]
pub struct CipvOptions {
    pub yaw_rate: f32,
    pub velocity: f32,
}

/// One accumulated ego-motion transform, ground coordinates.
#[derive(Debug, Clone)]
pub struct MotionFrame {
    pub motion: Matrix4<f32>,
}
