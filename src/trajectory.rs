// src/trajectory.rs
//
// Bounded per-track history of ground positions, compensated through the
// accumulated ego-motion buffer. Histories are created lazily on first
// sighting and evicted after a fixed run of consecutive misses; the map
// only ever holds recently-seen tracks.

use std::collections::{HashMap, HashSet, VecDeque};

use nalgebra::{Matrix4, Vector4};
use tracing::{debug, info};

use crate::config::CipvConfig;
use crate::error::{CipvError, CipvResult};
use crate::types::{MotionFrame, Point2f, TrackedObject};

/// Map an old ground position into the current frame through one
/// accumulated ego-motion matrix.
fn transform_point(point: Point2f, motion: &Matrix4<f32>, epsilon: f32) -> CipvResult<Point2f> {
    let moved = motion * Vector4::new(point.x, point.y, 0.0, 1.0);
    if moved[3].abs() < epsilon {
        return Err(CipvError::DegenerateTransform);
    }
    Ok(Point2f::new(moved[0] / moved[3], moved[1] / moved[3]))
}

/// Per-track trajectory bookkeeping across frames.
pub struct TrajectoryTracker {
    history_size: usize,
    max_misses: u32,
    epsilon: f32,
    trajectories: HashMap<i32, VecDeque<Point2f>>,
    miss_counts: HashMap<i32, u32>,
}

impl TrajectoryTracker {
    pub fn new(config: &CipvConfig) -> Self {
        Self {
            history_size: config.drops_history_size,
            max_misses: config.max_consecutive_misses,
            epsilon: config.epsilon,
            trajectories: HashMap::new(),
            miss_counts: HashMap::new(),
        }
    }

    /// Record this frame's ground positions and publish each object's
    /// motion-compensated trail.
    ///
    /// Fails only when `motion_buffer` is empty; the caller treats that
    /// as a skipped frame, not a fault.
    pub fn collect_drops(
        &mut self,
        motion_buffer: &[MotionFrame],
        objects: &mut [TrackedObject],
    ) -> CipvResult<()> {
        if motion_buffer.is_empty() {
            return Err(CipvError::EmptyMotionBuffer);
        }

        for object in objects.iter_mut() {
            let history = self
                .trajectories
                .entry(object.track_id)
                .or_insert_with(|| VecDeque::with_capacity(self.history_size));
            self.miss_counts.insert(object.track_id, 0);

            history.push_back(object.ground_center);
            if history.len() > self.history_size {
                history.pop_front();
            }

            // Walk past samples newest-first; the sample k frames back
            // pairs with the k-th motion matrix from the buffer's end
            object.drops.clear();
            let newest = history.len() - 1;
            for k in 1..=newest {
                if k > self.history_size || k > motion_buffer.len() {
                    break;
                }
                let sample = history[newest - k];
                match transform_point(
                    sample,
                    &motion_buffer[motion_buffer.len() - k].motion,
                    self.epsilon,
                ) {
                    Ok(compensated) => object.drops.push(compensated),
                    Err(_) => {
                        debug!(
                            "degenerate motion transform for track {}, sample skipped",
                            object.track_id
                        );
                    }
                }
            }
        }

        // Count misses for tracks absent this frame, evicting the ones
        // that have been gone long enough
        let current_ids: HashSet<i32> = objects.iter().map(|o| o.track_id).collect();
        let mut evicted = Vec::new();
        for (&track_id, misses) in self.miss_counts.iter_mut() {
            if current_ids.contains(&track_id) {
                continue;
            }
            *misses += 1;
            if *misses >= self.max_misses {
                evicted.push(track_id);
            }
        }
        for track_id in evicted {
            self.trajectories.remove(&track_id);
            self.miss_counts.remove(&track_id);
            info!("evicted stale trajectory for track {track_id}");
        }

        Ok(())
    }

    pub fn history_len(&self, track_id: i32) -> usize {
        self.trajectories
            .get(&track_id)
            .map(VecDeque::len)
            .unwrap_or(0)
    }

    pub fn is_tracked(&self, track_id: i32) -> bool {
        self.trajectories.contains_key(&track_id)
    }

    pub fn reset(&mut self) {
        self.trajectories.clear();
        self.miss_counts.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object_edge::tests::object_at;
    use nalgebra::Matrix4;

    fn identity_buffer(len: usize) -> Vec<MotionFrame> {
        (0..len)
            .map(|_| MotionFrame {
                motion: Matrix4::identity(),
            })
            .collect()
    }

    /// Pure translation by (dx, dy) on the ground plane.
    fn translation(dx: f32, dy: f32) -> MotionFrame {
        let mut motion = Matrix4::identity();
        motion[(0, 3)] = dx;
        motion[(1, 3)] = dy;
        MotionFrame { motion }
    }

    #[test]
    fn test_empty_motion_buffer_is_skipped() {
        let mut tracker = TrajectoryTracker::new(&CipvConfig::default());
        let mut objects = vec![object_at(1, 10.0, 0.0)];
        assert_eq!(
            tracker.collect_drops(&[], &mut objects).unwrap_err(),
            CipvError::EmptyMotionBuffer
        );
        assert_eq!(tracker.history_len(1), 0);
    }

    #[test]
    fn test_history_never_exceeds_capacity() {
        let config = CipvConfig {
            drops_history_size: 4,
            ..CipvConfig::default()
        };
        let mut tracker = TrajectoryTracker::new(&config);
        let buffer = identity_buffer(8);
        for frame in 0..20 {
            let mut objects = vec![object_at(1, 10.0 + frame as f32, 0.0)];
            tracker.collect_drops(&buffer, &mut objects).unwrap();
            assert!(tracker.history_len(1) <= 4);
        }
        assert_eq!(tracker.history_len(1), 4);
    }

    #[test]
    fn test_drops_are_motion_compensated() {
        let config = CipvConfig::default();
        let mut tracker = TrajectoryTracker::new(&config);
        let buffer = vec![translation(-1.0, 0.0), translation(-2.0, 0.0)];

        let mut objects = vec![object_at(1, 10.0, 0.5)];
        tracker.collect_drops(&buffer, &mut objects).unwrap();
        assert!(objects[0].drops.is_empty(), "first sighting has no trail");

        let mut objects = vec![object_at(1, 12.0, 0.5)];
        tracker.collect_drops(&buffer, &mut objects).unwrap();
        // One past sample at (10, 0.5), shifted by the newest matrix
        assert_eq!(objects[0].drops.len(), 1);
        let drop = objects[0].drops[0];
        assert!((drop.x - 8.0).abs() < 1e-5);
        assert!((drop.y - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_trail_limited_by_motion_buffer_length() {
        let config = CipvConfig::default();
        let mut tracker = TrajectoryTracker::new(&config);
        let buffer = identity_buffer(2);
        for frame in 0..5 {
            let mut objects = vec![object_at(1, 10.0 + frame as f32, 0.0)];
            tracker.collect_drops(&buffer, &mut objects).unwrap();
            if frame == 4 {
                // Four past samples exist but only two motion matrices
                assert_eq!(objects[0].drops.len(), 2);
            }
        }
    }

    #[test]
    fn test_eviction_on_exact_miss_count() {
        let config = CipvConfig {
            max_consecutive_misses: 3,
            ..CipvConfig::default()
        };
        let mut tracker = TrajectoryTracker::new(&config);
        let buffer = identity_buffer(4);

        let mut objects = vec![object_at(1, 10.0, 0.0)];
        tracker.collect_drops(&buffer, &mut objects).unwrap();
        assert!(tracker.is_tracked(1));

        let mut empty: Vec<TrackedObject> = Vec::new();
        for miss in 1..=3 {
            tracker.collect_drops(&buffer, &mut empty).unwrap();
            if miss < 3 {
                assert!(tracker.is_tracked(1), "not evicted before the threshold");
            }
        }
        assert!(!tracker.is_tracked(1), "evicted exactly at the threshold");
    }

    #[test]
    fn test_reappearance_resets_miss_count() {
        let config = CipvConfig {
            max_consecutive_misses: 3,
            ..CipvConfig::default()
        };
        let mut tracker = TrajectoryTracker::new(&config);
        let buffer = identity_buffer(4);
        let mut empty: Vec<TrackedObject> = Vec::new();

        let mut objects = vec![object_at(1, 10.0, 0.0)];
        tracker.collect_drops(&buffer, &mut objects).unwrap();
        tracker.collect_drops(&buffer, &mut empty).unwrap();
        tracker.collect_drops(&buffer, &mut empty).unwrap();

        // Reappears before the third miss, counter starts over
        let mut objects = vec![object_at(1, 14.0, 0.0)];
        tracker.collect_drops(&buffer, &mut objects).unwrap();
        tracker.collect_drops(&buffer, &mut empty).unwrap();
        tracker.collect_drops(&buffer, &mut empty).unwrap();
        assert!(tracker.is_tracked(1));
        tracker.collect_drops(&buffer, &mut empty).unwrap();
        assert!(!tracker.is_tracked(1));
    }
}
