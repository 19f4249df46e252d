use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;

/// Tunable constants for CIPV determination.
///
/// Fixed for the lifetime of a pipeline instance; not reconfigurable per
/// call. The defaults are tuned for a forward-facing camera on a passenger
/// vehicle with ground units in meters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CipvConfig {
    /// Minimum point count for a detected ego line to be usable (>= 1)
    pub min_lane_points: usize,
    /// Half width of the virtual ego lane, ground units
    pub half_lane_width: f32,
    /// Maximum plausible distance from an object edge point to a lane line
    pub max_object_to_lane_distance: f32,
    /// Maximum plausible spread between the two edge-point distances to
    /// the same lane line (an implied vehicle width)
    pub max_vehicle_width: f32,
    /// Objects with all dimensions below this are rejected outright
    pub min_object_size: f32,
    /// Ring-buffer capacity of the per-track trajectory history
    pub drops_history_size: usize,
    /// Consecutive unseen frames before a track's history is evicted
    pub max_consecutive_misses: u32,
    /// Tick horizon for kinematic lane synthesis
    pub virtual_lane_horizon: u32,
    /// Tick stride for kinematic lane synthesis
    pub virtual_lane_step: u32,
    /// Seconds per tick, the average frame interval
    pub time_unit: f32,
    /// Degeneracy threshold for segments and motion transforms
    pub epsilon: f32,
    /// Run classification on image coordinates instead of ground
    /// coordinates (declared extension point, not yet supported)
    pub image_based: bool,
}

impl Default for CipvConfig {
    fn default() -> Self {
        Self {
            min_lane_points: 2,
            half_lane_width: 1.75,
            max_object_to_lane_distance: 70.0,
            max_vehicle_width: 5.0,
            min_object_size: 0.01,
            drops_history_size: 20,
            max_consecutive_misses: 10,
            virtual_lane_horizon: 120,
            virtual_lane_step: 5,
            time_unit: 0.05,
            epsilon: 1e-6,
            image_based: false,
        }
    }
}

impl CipvConfig {
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: CipvConfig = serde_yaml::from_str(&contents)?;
        Ok(config)
    }
}
