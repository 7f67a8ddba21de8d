use image::{Rgb, RgbImage};
use imageproc::geometric_transformations::{Border, Interpolation, warp};

use super::{Transform, affine::Affine2, ensure_shape};
use crate::error::{AugmentError, Result};

/// Rotation about the canvas center, canvas size unchanged (no expansion);
/// corners rotated out of frame are lost and the background fills in black.
#[derive(Debug, Clone)]
pub struct RotationTransform {
    height: u32,
    width: u32,
    angle: f64,
    matrix: Affine2,
}

impl RotationTransform {
    pub fn new(height: u32, width: u32, angle: f64) -> Self {
        let matrix = Affine2::rotation_about(angle, width as f64 / 2.0, height as f64 / 2.0);
        Self {
            height,
            width,
            angle,
            matrix,
        }
    }

    pub fn angle(&self) -> f64 {
        self.angle
    }
}

impl Transform for RotationTransform {
    fn apply_image(&self, img: &RgbImage) -> Result<RgbImage> {
        ensure_shape(self.height, self.width, img)?;
        let projection = self.matrix.to_projection().ok_or_else(|| {
            AugmentError::GeometricComputation(format!(
                "rotation by {} degrees is not invertible",
                self.angle
            ))
        })?;
        Ok(warp(
            img,
            projection,
            Interpolation::Bilinear,
            Border::Constant(Rgb([0, 0, 0])),
        ))
    }

    fn apply_coords(&self, coords: &[[f64; 2]]) -> Vec<[f64; 2]> {
        coords.iter().map(|&p| self.matrix.apply(p)).collect()
    }

    fn clip_bounds(&self) -> Option<(f64, f64)> {
        Some((self.width as f64, self.height as f64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_rotation_is_the_identity_on_coords() {
        let t = RotationTransform::new(50, 80, 0.0);
        let pts = [[0.0, 0.0], [40.0, 25.0], [79.0, 49.0]];
        for (p, q) in pts.iter().zip(t.apply_coords(&pts)) {
            assert!((p[0] - q[0]).abs() < 1e-12);
            assert!((p[1] - q[1]).abs() < 1e-12);
        }
    }

    #[test]
    fn center_is_a_fixed_point() {
        let t = RotationTransform::new(100, 100, 33.0);
        let out = t.apply_coords(&[[50.0, 50.0]]);
        assert!((out[0][0] - 50.0).abs() < 1e-9);
        assert!((out[0][1] - 50.0).abs() < 1e-9);
    }

    #[test]
    fn quarter_turn_on_a_square_canvas() {
        let t = RotationTransform::new(100, 100, 90.0);
        // (80, 50) sits 30 right of center; a positive quarter turn takes it
        // 30 above center in image coordinates.
        let out = t.apply_coords(&[[80.0, 50.0]]);
        assert!((out[0][0] - 50.0).abs() < 1e-9);
        assert!((out[0][1] - 20.0).abs() < 1e-9);
    }

    #[test]
    fn rotated_corner_polygon_is_clipped() {
        let t = RotationTransform::new(100, 100, 45.0);
        // A box hugging the corner swings partially out of frame.
        let corner = [[70.0, 0.0], [100.0, 0.0], [100.0, 30.0], [70.0, 30.0]];
        let out = t.apply_polygon(&corner);
        for ring in &out {
            for &[x, y] in ring {
                assert!((0.0..=100.0).contains(&x));
                assert!((0.0..=100.0).contains(&y));
            }
        }
    }

    #[test]
    fn requires_the_constructed_canvas() {
        let t = RotationTransform::new(64, 64, 10.0);
        let img = RgbImage::new(32, 64);
        assert!(matches!(
            t.apply_image(&img),
            Err(AugmentError::ShapeMismatch { .. })
        ));
    }
}
