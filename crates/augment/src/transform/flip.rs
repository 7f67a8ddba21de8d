use image::{RgbImage, imageops};

use super::{Transform, ensure_shape};
use crate::error::Result;

/// Horizontal mirror: `x -> width - x`, same canvas.
#[derive(Debug, Clone)]
pub struct HFlipTransform {
    height: u32,
    width: u32,
}

impl HFlipTransform {
    pub fn new(height: u32, width: u32) -> Self {
        Self { height, width }
    }
}

impl Transform for HFlipTransform {
    fn apply_image(&self, img: &RgbImage) -> Result<RgbImage> {
        ensure_shape(self.height, self.width, img)?;
        Ok(imageops::flip_horizontal(img))
    }

    fn apply_coords(&self, coords: &[[f64; 2]]) -> Vec<[f64; 2]> {
        coords
            .iter()
            .map(|&[x, y]| [self.width as f64 - x, y])
            .collect()
    }
}
