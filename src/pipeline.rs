// src/pipeline.rs
//
// Per-frame entry points for CIPV determination.
//
// Signal flow, once per sensor frame:
//   DetectedLaneLine list → extract_ego_lane → synthesize_virtual_lanes ─┐
//   TrackedObject list    → containment per object ──────────────────────┼→ CipvSelector → is_cipv flag
//   CipvOptions           → (kinematic lane synthesis) ──────────────────┘
//   MotionFrame buffer    → TrajectoryTracker → drops
//
// Calls must arrive strictly in frame order from a single thread: the
// selector's hysteresis and the trajectory histories are order-dependent
// state. One Cipv instance per camera; instances share nothing.

use nalgebra::Matrix3;
use tracing::{debug, info};

use crate::config::CipvConfig;
use crate::containment::{is_object_in_lane_ground, is_object_in_lane_image};
use crate::ego_lane::extract_ego_lane;
use crate::error::{CipvError, CipvResult};
use crate::homography::HomographyMapper;
use crate::selector::{apply_selection, CipvSelector};
use crate::trajectory::TrajectoryTracker;
use crate::types::{CipvOptions, DetectedLaneLine, MotionFrame, TrackedObject};
use crate::virtual_lane::synthesize_virtual_lanes;

/// Closest-in-path vehicle determination for one camera.
pub struct Cipv {
    config: CipvConfig,
    mapper: Option<HomographyMapper>,
    selector: CipvSelector,
    trajectories: TrajectoryTracker,
}

impl Cipv {
    pub fn new(config: CipvConfig) -> Self {
        let trajectories = TrajectoryTracker::new(&config);
        Self {
            config,
            mapper: None,
            selector: CipvSelector::new(),
            trajectories,
        }
    }

    /// Calibrate with the image-to-ground homography. May be called again
    /// to re-calibrate; the matrix and its inverse are replaced together.
    pub fn init(&mut self, homography_image_to_ground: Matrix3<f64>) -> CipvResult<()> {
        self.mapper = Some(HomographyMapper::new(homography_image_to_ground)?);
        info!("CIPV calibration initialized");
        Ok(())
    }

    /// Primary per-frame entry point: classify every object against the
    /// ego lane and mark the winner in place.
    ///
    /// Per-object rejections are logged and skipped; they never abort the
    /// frame. At most one object carries the flag on return.
    pub fn determine_cipv(
        &mut self,
        lane_lines: &[DetectedLaneLine],
        options: &CipvOptions,
        objects: &mut [TrackedObject],
    ) -> CipvResult<()> {
        let mapper = self.mapper.as_ref().ok_or(CipvError::NotCalibrated)?;

        let mut observation = extract_ego_lane(lane_lines, self.config.min_lane_points);
        synthesize_virtual_lanes(&mut observation, options, &self.config);

        let mut candidates = Vec::with_capacity(objects.len());
        for (index, object) in objects.iter().enumerate() {
            let in_lane = if self.config.image_based {
                is_object_in_lane_image(object, &observation.image)
            } else {
                is_object_in_lane_ground(object, &observation.ground, mapper, &self.config)
            };
            match in_lane {
                Ok(true) => candidates.push((index, object.ground_center.x)),
                Ok(false) => debug!("track {} is outside the ego lane", object.track_id),
                Err(reason) => debug!("track {} skipped: {}", object.track_id, reason),
            }
        }

        let selection = self.selector.select(&candidates);
        if let Some(winner) = selection.winner {
            info!(
                "CIPV: track {} at {:.1} ground units",
                objects[winner].track_id, objects[winner].ground_center.x
            );
        }
        apply_selection(objects, &selection);
        Ok(())
    }

    /// Secondary per-frame entry point: update trajectory histories and
    /// publish motion-compensated drops onto the objects.
    pub fn collect_drops(
        &mut self,
        motion_buffer: &[MotionFrame],
        objects: &mut [TrackedObject],
    ) -> CipvResult<()> {
        self.trajectories.collect_drops(motion_buffer, objects)
    }

    /// Project an image pixel onto the ground plane.
    pub fn image_to_ground(&self, image_x: f32, image_y: f32) -> CipvResult<(f32, f32)> {
        self.mapper
            .as_ref()
            .ok_or(CipvError::NotCalibrated)?
            .image_to_ground(image_x, image_y)
    }

    /// Project a ground-plane point back into the image.
    pub fn ground_to_image(&self, ground_x: f32, ground_y: f32) -> CipvResult<(f32, f32)> {
        self.mapper
            .as_ref()
            .ok_or(CipvError::NotCalibrated)?
            .ground_to_image(ground_x, ground_y)
    }

    /// Drop all accumulated frame-to-frame state, keeping calibration.
    pub fn reset(&mut self) {
        self.selector.reset();
        self.trajectories.reset();
    }
}
