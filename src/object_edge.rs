// src/object_edge.rs
//
// Computes the single object edge facing the ego vehicle. The object's
// image footprint anchors its ground rectangle; the two corners nearest
// the ego origin in forward distance form the edge, ordered so the start
// point is the leftmost (higher y) of the pair. Objects whose nearest
// corner is behind the ego origin are rejected here rather than in the
// containment tests.

use std::f32::consts::FRAC_PI_2;

use tracing::debug;

use crate::config::CipvConfig;
use crate::error::{CipvError, CipvResult};
use crate::homography::HomographyMapper;
use crate::types::{EgoLane, LineSegment2f, Point2f, TrackedObject};

/// Ego-facing edge of the object's ground footprint.
pub fn closest_edge_ground(
    object: &TrackedObject,
    mapper: &HomographyMapper,
    config: &CipvConfig,
) -> CipvResult<LineSegment2f> {
    let size = object.size;
    if size.x < config.min_object_size
        && size.y < config.min_object_size
        && size.z < config.min_object_size
    {
        return Err(CipvError::ObjectTooSmall {
            track_id: object.track_id,
        });
    }

    // Ground anchor from the image footprint, the bottom-center of the
    // detection box
    let (footprint_x, footprint_y) = object.image_box.bottom_center();
    let (center_x, center_y) = mapper.image_to_ground(footprint_x, footprint_y)?;

    // Heading combines the observation angle with the ray from the ego
    // camera to the object, wrapped into a quarter turn
    let theta_ray = object.local_center.x.atan2(object.local_center.z);
    let mut theta = object.alpha + theta_ray;
    if theta > FRAC_PI_2 {
        theta -= FRAC_PI_2;
    }

    let x1 = size.x * 0.5;
    let x2 = -x1;
    let y1 = size.y * 0.5;
    let y2 = -y1;
    let (sin_theta, cos_theta) = theta.sin_cos();

    let corner = |a: f32, b: f32| {
        Point2f::new(
            a * cos_theta + b * sin_theta + center_x,
            b * cos_theta - a * sin_theta + center_y,
        )
    };
    let corners = [
        corner(x2, y1),
        corner(x2, y2),
        corner(x1, y1),
        corner(x1, y2),
    ];

    // Rank corners by forward distance; on equal x the later corner
    // displaces the current minimum
    let mut closest_x = f32::MAX;
    let mut second_closest_x = f32::MAX;
    let mut closest_index = 0;
    let mut second_index = 0;
    for (i, point) in corners.iter().enumerate() {
        if point.x <= closest_x {
            second_index = closest_index;
            second_closest_x = closest_x;
            closest_index = i;
            closest_x = point.x;
        } else if point.x <= second_closest_x {
            second_index = i;
            second_closest_x = point.x;
        }
    }

    let (start, end) = if corners[closest_index].y >= corners[second_index].y {
        (corners[closest_index], corners[second_index])
    } else {
        (corners[second_index], corners[closest_index])
    };

    if corners[closest_index].x < 0.0 {
        debug!(
            "track {} closest corner behind ego (x = {})",
            object.track_id, corners[closest_index].x
        );
        return Err(CipvError::ObjectBehindEgo {
            track_id: object.track_id,
        });
    }

    Ok(LineSegment2f { start, end })
}

/// Image-coordinate counterpart of [`closest_edge_ground`].
///
/// Declared extension point for an image-only operating mode; fails with
/// a typed error until the reprojection path lands.
pub fn closest_edge_image(
    _object: &TrackedObject,
    _egolane_image: &EgoLane,
) -> CipvResult<LineSegment2f> {
    Err(CipvError::ImageModeUnsupported)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use nalgebra::{Matrix3, Vector2, Vector3};

    use crate::types::BoundingBox;

    pub(crate) fn identity_mapper() -> HomographyMapper {
        HomographyMapper::new(Matrix3::identity()).unwrap()
    }

    /// Object whose image box bottom-center equals the wanted ground
    /// anchor under the identity homography.
    pub(crate) fn object_at(track_id: i32, anchor_x: f32, anchor_y: f32) -> TrackedObject {
        TrackedObject {
            track_id,
            size: Vector3::new(4.0, 1.8, 1.5),
            ground_center: Point2f::new(anchor_x, anchor_y),
            direction: Vector2::new(1.0, 0.0),
            local_center: Vector3::new(0.0, 1.2, anchor_x.max(1.0)),
            alpha: 0.0,
            image_box: BoundingBox {
                x: anchor_x - 2.0,
                y: anchor_y - 3.0,
                width: 4.0,
                height: 3.0,
            },
            is_cipv: false,
            drops: Vec::new(),
        }
    }

    #[test]
    fn test_rear_edge_of_aligned_object() {
        let mapper = identity_mapper();
        let object = object_at(1, 20.0, 0.0);
        let edge = closest_edge_ground(&object, &mapper, &CipvConfig::default()).unwrap();

        // Length 4 centered at x=20: rear edge at x=18, width 1.8 split
        // across y=0, start on the left (positive y)
        assert!((edge.start.x - 18.0).abs() < 1e-4);
        assert!((edge.end.x - 18.0).abs() < 1e-4);
        assert!((edge.start.y - 0.9).abs() < 1e-4);
        assert!((edge.end.y + 0.9).abs() < 1e-4);
    }

    #[test]
    fn test_undersized_object_rejected() {
        let mapper = identity_mapper();
        let mut object = object_at(7, 20.0, 0.0);
        object.size = Vector3::new(0.001, 0.001, 0.001);
        assert_eq!(
            closest_edge_ground(&object, &mapper, &CipvConfig::default()).unwrap_err(),
            CipvError::ObjectTooSmall { track_id: 7 }
        );
    }

    #[test]
    fn test_single_large_dimension_is_enough() {
        let mapper = identity_mapper();
        let mut object = object_at(8, 20.0, 0.0);
        object.size = Vector3::new(0.001, 0.001, 1.5);
        assert!(closest_edge_ground(&object, &mapper, &CipvConfig::default()).is_ok());
    }

    #[test]
    fn test_object_behind_ego_rejected() {
        let mapper = identity_mapper();
        // Anchor at x=1 with length 4 puts the nearest corner at x=-1
        let object = object_at(3, 1.0, 2.0);
        assert_eq!(
            closest_edge_ground(&object, &mapper, &CipvConfig::default()).unwrap_err(),
            CipvError::ObjectBehindEgo { track_id: 3 }
        );
    }

    #[test]
    fn test_heading_wraps_beyond_quarter_turn() {
        let mapper = identity_mapper();
        let mut object = object_at(4, 20.0, 0.0);
        // alpha + ray angle just over a quarter turn wraps back, so the
        // footprint stays a valid rectangle ahead of ego
        object.alpha = 1.8;
        let edge = closest_edge_ground(&object, &mapper, &CipvConfig::default()).unwrap();
        assert!(edge.start.y >= edge.end.y);
        assert!(edge.start.x >= 0.0 || edge.end.x >= 0.0);
    }

    #[test]
    fn test_image_mode_is_typed_failure() {
        let object = object_at(5, 20.0, 0.0);
        assert_eq!(
            closest_edge_image(&object, &EgoLane::default()).unwrap_err(),
            CipvError::ImageModeUnsupported
        );
    }
}
