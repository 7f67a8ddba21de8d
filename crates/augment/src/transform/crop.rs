use image::{RgbImage, imageops};

use super::{Transform, ensure_shape};
use crate::error::Result;

/// Crop to a sub-rectangle. Coordinates are translated into the crop frame
/// and polygons are clipped against the new, smaller canvas.
#[derive(Debug, Clone)]
pub struct CropTransform {
    height: u32,
    width: u32,
    x0: u32,
    y0: u32,
    crop_width: u32,
    crop_height: u32,
}

impl CropTransform {
    /// `(height, width)` is the expected input canvas; the crop window is
    /// `[x0, x0 + crop_width) x [y0, y0 + crop_height)` and must lie inside
    /// it.
    pub fn new(
        height: u32,
        width: u32,
        x0: u32,
        y0: u32,
        crop_width: u32,
        crop_height: u32,
    ) -> Self {
        debug_assert!(x0 + crop_width <= width && y0 + crop_height <= height);
        Self {
            height,
            width,
            x0,
            y0,
            crop_width,
            crop_height,
        }
    }

    pub fn window(&self) -> (u32, u32, u32, u32) {
        (self.x0, self.y0, self.crop_width, self.crop_height)
    }
}

impl Transform for CropTransform {
    fn apply_image(&self, img: &RgbImage) -> Result<RgbImage> {
        ensure_shape(self.height, self.width, img)?;
        Ok(imageops::crop_imm(img, self.x0, self.y0, self.crop_width, self.crop_height).to_image())
    }

    fn apply_coords(&self, coords: &[[f64; 2]]) -> Vec<[f64; 2]> {
        coords
            .iter()
            .map(|&[x, y]| [x - self.x0 as f64, y - self.y0 as f64])
            .collect()
    }

    fn clip_bounds(&self) -> Option<(f64, f64)> {
        Some((self.crop_width as f64, self.crop_height as f64))
    }
}
