use image::{Rgb, RgbImage};
use imageproc::geometric_transformations::{Border, Interpolation, warp};

use super::{Transform, affine::Affine2, ensure_shape};
use crate::error::{AugmentError, Result};

/// Affine shear on a fixed-size canvas.
///
/// The matrix `[[1, tan(angle_h), 0], [tan(angle_v), 1, 0]]` drives both the
/// raster warp and the coordinate mapping; pixels pushed outside the canvas
/// are lost and the background fills in black. The transform may only be
/// applied to images of exactly the `(height, width)` it was built for.
#[derive(Debug, Clone)]
pub struct ShearTransform {
    height: u32,
    width: u32,
    angle_h: f64,
    angle_v: f64,
    matrix: Affine2,
}

impl ShearTransform {
    pub fn new(height: u32, width: u32, angle_h: f64, angle_v: f64) -> Self {
        Self {
            height,
            width,
            angle_h,
            angle_v,
            matrix: Affine2::shear(angle_h, angle_v),
        }
    }

    pub fn angles(&self) -> (f64, f64) {
        (self.angle_h, self.angle_v)
    }
}

impl Transform for ShearTransform {
    fn apply_image(&self, img: &RgbImage) -> Result<RgbImage> {
        ensure_shape(self.height, self.width, img)?;
        let projection = self.matrix.to_projection().ok_or_else(|| {
            AugmentError::GeometricComputation(format!(
                "shear ({}, {}) is not invertible",
                self.angle_h, self.angle_v
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
    use crate::types::ring_area;
    use rand::{Rng, SeedableRng, rngs::StdRng};

    fn checker_image(width: u32, height: u32) -> RgbImage {
        let mut img = RgbImage::new(width, height);
        for y in 0..height {
            for x in 0..width {
                let v = if (x + y) % 2 == 0 { 200 } else { 40 };
                img.put_pixel(x, y, Rgb([v, v, v]));
            }
        }
        img
    }

    #[test]
    fn zero_shear_is_the_identity() {
        let t = ShearTransform::new(12, 16, 0.0, 0.0);
        let img = checker_image(16, 12);
        assert_eq!(t.apply_image(&img).unwrap(), img);

        let pts = [[0.0, 0.0], [3.5, 7.25], [15.0, 11.0]];
        assert_eq!(t.apply_coords(&pts), pts.to_vec());
    }

    #[test]
    fn coords_match_the_matrix_for_random_points() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let angle_h = rng.gen_range(-40.0..40.0);
            let angle_v = rng.gen_range(-40.0..40.0);
            let t = ShearTransform::new(100, 100, angle_h, angle_v);

            let points: Vec<[f64; 2]> = (0..20)
                .map(|_| [rng.gen_range(0.0..100.0), rng.gen_range(0.0..100.0)])
                .collect();

            let tan_h = f64::tan(f64::to_radians(angle_h));
            let tan_v = f64::tan(f64::to_radians(angle_v));
            for (p, q) in points.iter().zip(t.apply_coords(&points)) {
                assert!((q[0] - (p[0] + tan_h * p[1])).abs() < 1e-9);
                assert!((q[1] - (tan_v * p[0] + p[1])).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn coordinate_mapping_is_linear() {
        let t = ShearTransform::new(50, 50, 17.0, -9.0);
        let p = [12.0, 30.0];
        let q = [41.0, 5.0];
        let mid = [(p[0] + q[0]) / 2.0, (p[1] + q[1]) / 2.0];
        let out = t.apply_coords(&[p, q, mid]);
        assert!((out[2][0] - (out[0][0] + out[1][0]) / 2.0).abs() < 1e-9);
        assert!((out[2][1] - (out[0][1] + out[1][1]) / 2.0).abs() < 1e-9);
    }

    #[test]
    fn sheared_square_is_clipped_to_the_canvas() {
        let t = ShearTransform::new(100, 100, 45.0, 0.0);
        let square = [[10.0, 10.0], [90.0, 10.0], [90.0, 90.0], [10.0, 90.0]];
        let out = t.apply_polygon(&square);
        assert_eq!(out.len(), 1);
        let area = ring_area(&out[0]);
        assert!(area < 6400.0);
        assert!(area > 0.0);
        for &[x, y] in &out[0] {
            assert!((0.0..=100.0).contains(&x));
            assert!((0.0..=100.0).contains(&y));
        }
    }

    #[test]
    fn polygon_sheared_fully_outside_returns_empty() {
        // Strong vertical shear pushes a box far below the canvas.
        let t = ShearTransform::new(100, 100, 0.0, 80.0);
        let square = [[60.0, 60.0], [90.0, 60.0], [90.0, 90.0], [60.0, 90.0]];
        assert!(t.apply_polygon(&square).is_empty());
    }

    #[test]
    fn registration_between_pixels_and_coords() {
        // A single bright pixel must land where apply_coords says it does.
        let mut img = RgbImage::new(64, 64);
        img.put_pixel(20, 30, Rgb([255, 255, 255]));

        let t = ShearTransform::new(64, 64, 25.0, 0.0);
        let warped = t.apply_image(&img).unwrap();
        let [mx, my] = t.apply_coords(&[[20.0, 30.0]])[0];

        let (cx, cy) = (mx.round() as i64, my.round() as i64);
        let mut found = false;
        for dy in -1..=1 {
            for dx in -1..=1 {
                let (x, y) = (cx + dx, cy + dy);
                if (0..64).contains(&x) && (0..64).contains(&y) {
                    found |= warped.get_pixel(x as u32, y as u32)[0] > 0;
                }
            }
        }
        assert!(found, "warped pixel not found near ({mx}, {my})");
    }
}
