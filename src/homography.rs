// src/homography.rs
//
// Bidirectional image/ground mapping through a 3x3 planar homography.
// The inverse is computed once at calibration time; both directions are
// pure lookups afterwards.

use nalgebra::{Matrix3, Vector3};

use crate::error::{CipvError, CipvResult};

/// Calibrated image-to-ground projective mapping and its inverse.
///
/// Re-calibration builds a fresh mapper, so the matrix pair is always
/// replaced atomically.
#[derive(Debug, Clone)]
pub struct HomographyMapper {
    image_to_ground: Matrix3<f64>,
    ground_to_image: Matrix3<f64>,
}

impl HomographyMapper {
    /// Build a mapper from the image-to-ground homography.
    ///
    /// Fails with [`CipvError::SingularHomography`] when the matrix has no
    /// inverse.
    pub fn new(image_to_ground: Matrix3<f64>) -> CipvResult<Self> {
        let ground_to_image = image_to_ground
            .try_inverse()
            .ok_or(CipvError::SingularHomography)?;
        Ok(Self {
            image_to_ground,
            ground_to_image,
        })
    }

    /// Project an image pixel onto the ground plane.
    pub fn image_to_ground(&self, image_x: f32, image_y: f32) -> CipvResult<(f32, f32)> {
        project(&self.image_to_ground, image_x, image_y)
    }

    /// Project a ground-plane point back into the image.
    pub fn ground_to_image(&self, ground_x: f32, ground_y: f32) -> CipvResult<(f32, f32)> {
        project(&self.ground_to_image, ground_x, ground_y)
    }
}

fn project(homography: &Matrix3<f64>, x: f32, y: f32) -> CipvResult<(f32, f32)> {
    let mapped = homography * Vector3::new(f64::from(x), f64::from(y), 1.0);
    if mapped[2].abs() <= f64::MIN_POSITIVE {
        return Err(CipvError::DegenerateProjection);
    }
    Ok((
        (mapped[0] / mapped[2]) as f32,
        (mapped[1] / mapped[2]) as f32,
    ))
}
