use image::{RgbImage, imageops, imageops::FilterType};

use super::{Transform, ensure_shape};
use crate::error::Result;

/// Exact resize to a new canvas; coordinates scale by the same axis ratios.
#[derive(Debug, Clone)]
pub struct ResizeTransform {
    height: u32,
    width: u32,
    new_height: u32,
    new_width: u32,
}

impl ResizeTransform {
    pub fn new(height: u32, width: u32, new_height: u32, new_width: u32) -> Self {
        Self {
            height,
            width,
            new_height,
            new_width,
        }
    }
}

impl Transform for ResizeTransform {
    fn apply_image(&self, img: &RgbImage) -> Result<RgbImage> {
        ensure_shape(self.height, self.width, img)?;
        Ok(imageops::resize(
            img,
            self.new_width,
            self.new_height,
            FilterType::Triangle,
        ))
    }

    fn apply_coords(&self, coords: &[[f64; 2]]) -> Vec<[f64; 2]> {
        let sx = self.new_width as f64 / self.width as f64;
        let sy = self.new_height as f64 / self.height as f64;
        coords.iter().map(|&[x, y]| [x * sx, y * sy]).collect()
    }
}
