// src/lib.rs
//
// Closest-in-path vehicle (CIPV) determination for a camera perception
// pipeline. Per frame, the crate builds the ego lane corridor from raw
// lane-line detections (synthesizing missing boundaries), classifies
// every tracked object against it, selects the longitudinally nearest
// in-lane vehicle with frame-to-frame hysteresis, and maintains bounded
// motion-compensated trajectory histories per track.
//
// The [`pipeline::Cipv`] struct is the per-camera entry point; the
// remaining modules are its stages and are usable on their own.

pub mod config;
pub mod containment;
pub mod ego_lane;
pub mod error;
pub mod geometry;
pub mod homography;
pub mod object_edge;
pub mod pipeline;
pub mod selector;
pub mod trajectory;
pub mod types;
pub mod virtual_lane;

// Re-exports for ergonomic access from the host pipeline
pub use config::CipvConfig;
pub use ego_lane::{extract_ego_lane, EgoLaneObservation};
pub use error::{CipvError, CipvResult};
pub use homography::HomographyMapper;
pub use pipeline::Cipv;
pub use selector::{apply_selection, CipvSelector, Selection};
pub use trajectory::TrajectoryTracker;
pub use types::{
    BoundingBox, CipvOptions, DetectedLaneLine, EgoLane, LanePosition, LaneLineSimple,
    LineSegment2f, MotionFrame, Point2f, TrackedObject,
};
pub use virtual_lane::synthesize_virtual_lanes;
