// src/ego_lane.rs
//
// Extracts the ego-adjacent lane boundaries from the raw lane-line
// detections, in image and ground coordinates at once. A side whose
// detection is too short is flagged invalid and left empty for the
// synthesizer to fill in.

use tracing::debug;

use crate::types::{DetectedLaneLine, EgoLane, LanePosition};

/// Per-frame ego-lane extraction result.
#[derive(Debug, Clone, Default)]
pub struct EgoLaneObservation {
    pub image: EgoLane,
    pub ground: EgoLane,
    pub left_valid: bool,
    pub right_valid: bool,
}

/// Build the ego lane from the detected lane lines.
///
/// Each side is taken from the detection tagged for it; when several
/// detections carry the same tag the last one encountered wins outright.
/// Pure function of its inputs.
pub fn extract_ego_lane(lane_lines: &[DetectedLaneLine], min_points: usize) -> EgoLaneObservation {
    let mut observation = EgoLaneObservation::default();

    for line in lane_lines {
        debug_assert_eq!(
            line.image_points.len(),
            line.ground_points.len(),
            "image/ground point sequences must be parallel"
        );
        match line.position {
            LanePosition::EgoLeft => {
                observation.image.left.clear();
                observation.ground.left.clear();
                if line.image_points.len() < min_points {
                    debug!(
                        "left ego line too short ({} of {} points)",
                        line.image_points.len(),
                        min_points
                    );
                    observation.left_valid = false;
                } else {
                    observation.left_valid = true;
                    observation
                        .image
                        .left
                        .points
                        .extend_from_slice(&line.image_points);
                    observation
                        .ground
                        .left
                        .points
                        .extend_from_slice(&line.ground_points);
                }
            }
            LanePosition::EgoRight => {
                observation.image.right.clear();
                observation.ground.right.clear();
                if line.image_points.len() < min_points {
                    debug!(
                        "right ego line too short ({} of {} points)",
                        line.image_points.len(),
                        min_points
                    );
                    observation.right_valid = false;
                } else {
                    observation.right_valid = true;
                    observation
                        .image
                        .right
                        .points
                        .extend_from_slice(&line.image_points);
                    observation
                        .ground
                        .right
                        .points
                        .extend_from_slice(&line.ground_points);
                }
            }
            LanePosition::Other => {}
        }
    }

    observation
}
