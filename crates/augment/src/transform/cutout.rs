use image::{Rgb, RgbImage};
use imageproc::drawing::draw_filled_circle_mut;

use super::{Transform, ensure_shape};
use crate::error::Result;

/// One opaque disk to stamp onto the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Disk {
    pub center: (i32, i32),
    pub radius: i32,
    pub color: Rgb<u8>,
}

/// Occlusion by stamping opaque disks, in order: later disks paint over
/// earlier ones. Purely photometric; annotation geometry is never altered.
/// Centers or radii reaching outside the canvas clamp visually (the draw
/// clips at the edges) rather than raising.
#[derive(Debug, Clone)]
pub struct CutoutTransform {
    height: u32,
    width: u32,
    disks: Vec<Disk>,
}

impl CutoutTransform {
    pub fn new(height: u32, width: u32, disks: Vec<Disk>) -> Self {
        Self {
            height,
            width,
            disks,
        }
    }

    pub fn disks(&self) -> &[Disk] {
        &self.disks
    }
}

impl Transform for CutoutTransform {
    fn apply_image(&self, img: &RgbImage) -> Result<RgbImage> {
        ensure_shape(self.height, self.width, img)?;
        let mut out = img.clone();
        for disk in &self.disks {
            draw_filled_circle_mut(&mut out, disk.center, disk.radius, disk.color);
        }
        Ok(out)
    }

    fn apply_coords(&self, coords: &[[f64; 2]]) -> Vec<[f64; 2]> {
        coords.to_vec()
    }
}
