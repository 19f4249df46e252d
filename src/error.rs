//! Error types for CIPV determination.

use thiserror::Error;

/// Result type for CIPV operations
pub type CipvResult<T> = Result<T, CipvError>;

/// Errors raised while selecting the closest-in-path vehicle.
///
/// Most variants are per-object input-quality rejections: the caller logs
/// them and moves on to the next object in the frame. Only calibration
/// problems indicate a broken caller contract.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CipvError {
    /// The image-to-ground homography has no inverse
    #[error("calibration homography is not invertible")]
    SingularHomography,

    /// A frame entry point was called before `init`
    #[error("homography calibration has not been initialized")]
    NotCalibrated,

    /// Homogeneous scale collapsed during a projective transform
    #[error("projective transform produced a near-zero homogeneous scale")]
    DegenerateProjection,

    /// All three object dimensions are below the minimal-size threshold
    #[error("object {track_id} is too small to classify")]
    ObjectTooSmall { track_id: i32 },

    /// The object's closest ground corner lies behind the ego origin
    #[error("object {track_id} is behind the ego vehicle")]
    ObjectBehindEgo { track_id: i32 },

    /// A lane boundary has fewer than two points
    #[error("ego lane has too few points for containment tests")]
    InsufficientLaneData,

    /// An ego-motion matrix produced a near-zero homogeneous scale
    #[error("ego-motion transform produced a near-zero homogeneous scale")]
    DegenerateTransform,

    /// No ego-motion data is available this frame
    #[error("motion buffer is empty")]
    EmptyMotionBuffer,

    /// Image-coordinate classification is a declared extension point
    #[error("image-based CIPV determination is not yet supported")]
    ImageModeUnsupported,
}
