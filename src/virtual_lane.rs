// src/virtual_lane.rs
//
// Fills in missing ego-lane boundaries. With one real boundary the other
// side is a laterally-offset copy; with none, both sides come from a
// constant-velocity kinematic extrapolation. Synthesis runs on ground
// coordinates only; the image-based variant would require reprojecting
// the virtual points and is not implemented.

use tracing::debug;

use crate::config::CipvConfig;
use crate::ego_lane::EgoLaneObservation;
use crate::types::{CipvOptions, LaneLineSimple, Point2f};

/// Ego displacement after `tick` ticks of the straight-line motion model.
///
/// The yaw-rate parameter is the hook for a curved (constant yaw rate)
/// model; the active model is straight, so lateral displacement is zero.
fn vehicle_dynamics(tick: u32, _yaw_rate: f32, velocity: f32, time_unit: f32) -> (f32, f32) {
    (velocity * tick as f32 * time_unit, 0.0)
}

/// Copy `reference` shifted so its near point lands at `near_target_y`,
/// preserving the boundary's shape. Longitudinal coordinates are kept.
fn make_virtual_lane(reference: &LaneLineSimple, near_target_y: f32, target: &mut LaneLineSimple) {
    target.clear();
    let offset = near_target_y - reference.points[0].y;
    for point in &reference.points {
        target.points.push(Point2f::new(point.x, point.y + offset));
    }
}

/// Both boundaries from the kinematic model, half a lane width to each
/// side of the predicted ego path.
fn make_virtual_ego_lane_from_motion(
    options: &CipvOptions,
    config: &CipvConfig,
    left: &mut LaneLineSimple,
    right: &mut LaneLineSimple,
) {
    left.clear();
    right.clear();
    for tick in (0..config.virtual_lane_horizon).step_by(config.virtual_lane_step as usize) {
        let (x, y) = vehicle_dynamics(tick, options.yaw_rate, options.velocity, config.time_unit);
        left.points.push(Point2f::new(x, y + config.half_lane_width));
        right.points.push(Point2f::new(x, y - config.half_lane_width));
    }
}

/// Ensure the ground ego lane has both boundaries, synthesizing whatever
/// the detector could not provide. Target lines are fully rebuilt, never
/// appended to.
pub fn synthesize_virtual_lanes(
    observation: &mut EgoLaneObservation,
    options: &CipvOptions,
    config: &CipvConfig,
) {
    let lane = &mut observation.ground;
    match (observation.left_valid, observation.right_valid) {
        (true, true) => {
            debug!("both ego boundaries detected, no synthesis");
        }
        (false, true) => {
            // Left boundary mirrored from the right one, one inferred
            // lane width across the ego origin
            let near_y = lane.right.points[0].y.abs() + config.half_lane_width;
            make_virtual_lane(&lane.right, near_y, &mut lane.left);
            debug!("synthesized left boundary at y = {near_y}");
        }
        (true, false) => {
            let near_y = -(lane.left.points[0].y.abs() + config.half_lane_width);
            make_virtual_lane(&lane.left, near_y, &mut lane.right);
            debug!("synthesized right boundary at y = {near_y}");
        }
        (false, false) => {
            make_virtual_ego_lane_from_motion(options, config, &mut lane.left, &mut lane.right);
            debug!("synthesized both boundaries from ego motion");
        }
    }
}
