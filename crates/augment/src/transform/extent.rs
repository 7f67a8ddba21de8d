use image::{Rgb, RgbImage};
use imageproc::geometric_transformations::{Border, Interpolation, warp_into};

use super::{Transform, affine::Affine2, ensure_shape};
use crate::error::{AugmentError, Result};

/// Resamples a source sub-rectangle (possibly reaching outside the image)
/// onto a fresh canvas. With a unit scale this is a pure extent shift: the
/// view slides over the image and out-of-source pixels fill in black.
#[derive(Debug, Clone)]
pub struct ExtentTransform {
    height: u32,
    width: u32,
    /// Source rectangle `[x0, y0, x1, y1]` in input coordinates.
    src: [f64; 4],
    out_width: u32,
    out_height: u32,
    matrix: Affine2,
}

impl ExtentTransform {
    pub fn new(height: u32, width: u32, src: [f64; 4], out_width: u32, out_height: u32) -> Self {
        let [x0, y0, x1, y1] = src;
        let sx = out_width as f64 / (x1 - x0);
        let sy = out_height as f64 / (y1 - y0);
        let matrix = Affine2::scale_translate(sx, sy, -x0 * sx, -y0 * sy);
        Self {
            height,
            width,
            src,
            out_width,
            out_height,
            matrix,
        }
    }

    pub fn src_rect(&self) -> [f64; 4] {
        self.src
    }
}

impl Transform for ExtentTransform {
    fn apply_image(&self, img: &RgbImage) -> Result<RgbImage> {
        ensure_shape(self.height, self.width, img)?;
        let projection = self.matrix.to_projection().ok_or_else(|| {
            AugmentError::GeometricComputation(format!(
                "extent source rect {:?} is degenerate",
                self.src
            ))
        })?;
        let mut out = RgbImage::new(self.out_width, self.out_height);
        warp_into(
            img,
            projection,
            Interpolation::Bilinear,
            Border::Constant(Rgb([0, 0, 0])),
            &mut out,
        );
        Ok(out)
    }

    fn apply_coords(&self, coords: &[[f64; 2]]) -> Vec<[f64; 2]> {
        coords.iter().map(|&p| self.matrix.apply(p)).collect()
    }

    fn clip_bounds(&self) -> Option<(f64, f64)> {
        Some((self.out_width as f64, self.out_height as f64))
    }
}
