// src/containment.rs
//
// Decides whether an object's ego-facing edge lies inside the ego lane
// corridor. Each edge endpoint is tested against the nearest segment of
// the boundary it can cross first: the end point (rightmost) against the
// left boundary, the start point (leftmost) against the right boundary.
// A plausibility gate on the measured lane distances rejects objects
// whose association with the lane geometry makes no physical sense.
//
//  |           |
//  | *------*  |
//  |         *-+-----*
//  |           |  *--------* <- closest edge of object
// *+------*    |
//  |           |
// left        right

use tracing::debug;

use crate::config::CipvConfig;
use crate::error::{CipvError, CipvResult};
use crate::geometry::{is_point_left_of, point_to_segment_distance};
use crate::homography::HomographyMapper;
use crate::object_edge::{closest_edge_ground, closest_edge_image};
use crate::types::{EgoLane, LaneLineSimple, Point2f, TrackedObject};

/// Shortest distance from `point` to any segment of `line`, with the
/// index of the nearest segment. Degenerate segments are skipped.
fn nearest_segment(line: &LaneLineSimple, point: Point2f, epsilon: f32) -> (f32, Option<usize>) {
    let mut shortest = f32::MAX;
    let mut nearest = None;
    for i in 0..line.points.len() - 1 {
        if let Some(distance) =
            point_to_segment_distance(point, line.points[i], line.points[i + 1], epsilon)
        {
            if distance < shortest {
                shortest = distance;
                nearest = Some(i);
            }
        }
    }
    (shortest, nearest)
}

/// Plausibility gate on the four edge-point-to-boundary distances.
fn distances_plausible(
    start_to_right: f32,
    start_to_left: f32,
    end_to_right: f32,
    end_to_left: f32,
    config: &CipvConfig,
) -> bool {
    for distance in [start_to_right, start_to_left, end_to_right, end_to_left] {
        if distance > config.max_object_to_lane_distance {
            debug!("edge point too far from lane ({distance} ground units)");
            return false;
        }
    }
    let implied_width = (start_to_right - end_to_right).abs();
    if implied_width > config.max_vehicle_width {
        debug!("implied vehicle width {implied_width} exceeds bound (right boundary)");
        return false;
    }
    let implied_width = (end_to_left - start_to_left).abs();
    if implied_width > config.max_vehicle_width {
        debug!("implied vehicle width {implied_width} exceeds bound (left boundary)");
        return false;
    }
    true
}

/// Ground-coordinate containment test.
///
/// Edge-extraction failures propagate so the caller can log why the
/// object was skipped; an implausible lane association is an ordinary
/// `Ok(false)`.
pub fn is_object_in_lane_ground(
    object: &TrackedObject,
    egolane_ground: &EgoLane,
    mapper: &HomographyMapper,
    config: &CipvConfig,
) -> CipvResult<bool> {
    let edge = closest_edge_ground(object, mapper, config)?;

    let left = &egolane_ground.left;
    let right = &egolane_ground.right;
    if !left.is_usable() || !right.is_usable() {
        return Err(CipvError::InsufficientLaneData);
    }

    // Left boundary: the edge's end point must not cross it
    let (end_to_left, nearest_left) = nearest_segment(left, edge.end, config.epsilon);
    let (start_to_left, _) = nearest_segment(left, edge.start, config.epsilon);
    let left_clear = match nearest_left {
        Some(i) => !is_point_left_of(edge.end, left.points[i], left.points[i + 1]),
        None => false,
    };

    // Right boundary: the edge's start point must stay left of it
    let (start_to_right, nearest_right) = nearest_segment(right, edge.start, config.epsilon);
    let (end_to_right, _) = nearest_segment(right, edge.end, config.epsilon);
    let right_clear = match nearest_right {
        Some(i) => is_point_left_of(edge.start, right.points[i], right.points[i + 1]),
        None => false,
    };

    if !distances_plausible(
        start_to_right,
        start_to_left,
        end_to_right,
        end_to_left,
        config,
    ) {
        return Ok(false);
    }

    Ok(left_clear && right_clear)
}

/// Image-coordinate containment test, dispatched when the image-based
/// mode flag is set. Not yet supported; every object fails with a typed
/// error rather than silently passing.
pub fn is_object_in_lane_image(
    object: &TrackedObject,
    egolane_image: &EgoLane,
) -> CipvResult<bool> {
    closest_edge_image(object, egolane_image).map(|_| true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object_edge::tests::{identity_mapper, object_at};

    fn straight_lane(left_y: f32, right_y: f32) -> EgoLane {
        let line = |y: f32| LaneLineSimple {
            points: (0..11).map(|i| Point2f::new(i as f32 * 5.0, y)).collect(),
        };
        EgoLane {
            left: line(left_y),
            right: line(right_y),
        }
    }

    #[test]
    fn test_centered_object_is_in_lane() {
        let lane = straight_lane(1.75, -1.75);
        let object = object_at(1, 20.0, 0.0);
        let in_lane =
            is_object_in_lane_ground(&object, &lane, &identity_mapper(), &CipvConfig::default())
                .unwrap();
        assert!(in_lane);
    }

    #[test]
    fn test_lateral_object_is_outside() {
        let lane = straight_lane(1.75, -1.75);
        // Fully left of the corridor
        let object = object_at(2, 20.0, 5.0);
        let in_lane =
            is_object_in_lane_ground(&object, &lane, &identity_mapper(), &CipvConfig::default())
                .unwrap();
        assert!(!in_lane);
    }

    #[test]
    fn test_object_right_of_corridor_is_outside() {
        let lane = straight_lane(1.75, -1.75);
        let object = object_at(6, 20.0, -5.0);
        let in_lane =
            is_object_in_lane_ground(&object, &lane, &identity_mapper(), &CipvConfig::default())
                .unwrap();
        assert!(!in_lane);
    }

    #[test]
    fn test_short_lane_is_an_error() {
        let mut lane = straight_lane(1.75, -1.75);
        lane.left.points.truncate(1);
        let object = object_at(3, 20.0, 0.0);
        assert_eq!(
            is_object_in_lane_ground(&object, &lane, &identity_mapper(), &CipvConfig::default())
                .unwrap_err(),
            CipvError::InsufficientLaneData
        );
    }

    #[test]
    fn test_behind_ego_failure_propagates() {
        let lane = straight_lane(1.75, -1.75);
        let object = object_at(4, 1.0, 0.0);
        assert_eq!(
            is_object_in_lane_ground(&object, &lane, &identity_mapper(), &CipvConfig::default())
                .unwrap_err(),
            CipvError::ObjectBehindEgo { track_id: 4 }
        );
    }

    #[test]
    fn test_sanity_gate_rejects_implausible_width() {
        let lane = straight_lane(1.75, -1.75);
        // Diagonal heading spreads the edge endpoints laterally, so the
        // two distances to the same boundary disagree
        let mut object = object_at(5, 15.0, 0.0);
        object.size = nalgebra::Vector3::new(3.0, 1.0, 1.5);
        object.alpha = std::f32::consts::FRAC_PI_4;

        let permissive = CipvConfig::default();
        assert!(
            is_object_in_lane_ground(&object, &lane, &identity_mapper(), &permissive).unwrap(),
            "object should be accepted under the default width bound"
        );

        let strict = CipvConfig {
            max_vehicle_width: 0.5,
            ..CipvConfig::default()
        };
        assert!(
            !is_object_in_lane_ground(&object, &lane, &identity_mapper(), &strict).unwrap(),
            "same object must fail the tightened plausibility gate"
        );
    }

    #[test]
    fn test_distance_gate_rejects_far_lane() {
        let strict = CipvConfig {
            max_object_to_lane_distance: 1.0,
            ..CipvConfig::default()
        };
        let lane = straight_lane(1.75, -1.75);
        let object = object_at(9, 20.0, 0.0);
        // Distances from the edge to both boundaries are around 1-2.7
        // units, beyond the tightened bound
        assert!(!is_object_in_lane_ground(&object, &lane, &identity_mapper(), &strict).unwrap());
    }
}
