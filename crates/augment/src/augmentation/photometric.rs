use image::{Rgb, RgbImage};
use rand::{Rng, RngCore};

use super::{Augmentation, validate_range};
use crate::{
    error::Result,
    transform::{BlendSource, BlendTransform, CutoutTransform, Disk, Transform},
};

/// Blends towards the image mean with a weight drawn from the range; weights
/// below 1 wash contrast out, weights above 1 deepen it.
#[derive(Debug, Clone)]
pub struct RandomContrast {
    min: f64,
    max: f64,
}

impl RandomContrast {
    pub fn new(min: f64, max: f64) -> Result<Self> {
        validate_range("contrast", min, max)?;
        Ok(Self { min, max })
    }
}

impl Augmentation for RandomContrast {
    fn get_transform(
        &self,
        rng: &mut dyn RngCore,
        _image: &RgbImage,
    ) -> Result<Box<dyn Transform>> {
        let w = rng.gen_range(self.min..=self.max);
        Ok(Box::new(BlendTransform::new(
            BlendSource::Mean,
            1.0 - w,
            w,
        )))
    }
}

/// Blends towards black with a weight drawn from the range.
#[derive(Debug, Clone)]
pub struct RandomBrightness {
    min: f64,
    max: f64,
}

impl RandomBrightness {
    pub fn new(min: f64, max: f64) -> Result<Self> {
        validate_range("brightness", min, max)?;
        Ok(Self { min, max })
    }
}

impl Augmentation for RandomBrightness {
    fn get_transform(
        &self,
        rng: &mut dyn RngCore,
        _image: &RgbImage,
    ) -> Result<Box<dyn Transform>> {
        let w = rng.gen_range(self.min..=self.max);
        Ok(Box::new(BlendTransform::new(
            BlendSource::Black,
            1.0 - w,
            w,
        )))
    }
}

/// Blends towards the per-pixel luma with a weight drawn from the range.
#[derive(Debug, Clone)]
pub struct RandomSaturation {
    min: f64,
    max: f64,
}

impl RandomSaturation {
    pub fn new(min: f64, max: f64) -> Result<Self> {
        validate_range("saturation", min, max)?;
        Ok(Self { min, max })
    }
}

impl Augmentation for RandomSaturation {
    fn get_transform(
        &self,
        rng: &mut dyn RngCore,
        _image: &RgbImage,
    ) -> Result<Box<dyn Transform>> {
        let w = rng.gen_range(self.min..=self.max);
        Ok(Box::new(BlendTransform::new(
            BlendSource::Grayscale,
            1.0 - w,
            w,
        )))
    }
}

/// Draws a hole count, then for each hole a center anywhere on the canvas, a
/// radius as a fraction of the shorter image side, and a color sampled
/// per channel from its own range.
#[derive(Debug, Clone)]
pub struct RandomCutout {
    num_holes: (u32, u32),
    radius: (f64, f64),
    colors: [(f64, f64); 3],
}

impl RandomCutout {
    pub fn new(num_holes: (u32, u32), radius: (f64, f64), colors: [(f64, f64); 3]) -> Result<Self> {
        validate_range("cutout holes", num_holes.0 as f64, num_holes.1 as f64)?;
        validate_range("cutout radius", radius.0, radius.1)?;
        for &(lo, hi) in &colors {
            validate_range("cutout color", lo, hi)?;
        }
        Ok(Self {
            num_holes,
            radius,
            colors,
        })
    }
}

impl Augmentation for RandomCutout {
    fn get_transform(
        &self,
        rng: &mut dyn RngCore,
        image: &RgbImage,
    ) -> Result<Box<dyn Transform>> {
        let (width, height) = image.dimensions();
        let short = height.min(width) as f64;

        let count = rng.gen_range(self.num_holes.0..=self.num_holes.1);
        let mut disks = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let cx = rng.gen_range(0.0..width as f64) as i32;
            let cy = rng.gen_range(0.0..height as f64) as i32;
            let radius = (short * rng.gen_range(self.radius.0..=self.radius.1)) as i32;
            let mut color = [0u8; 3];
            for (c, &(lo, hi)) in color.iter_mut().zip(&self.colors) {
                *c = rng.gen_range(lo..=hi).clamp(0.0, 255.0) as u8;
            }
            disks.push(Disk {
                center: (cx, cy),
                radius,
                color: Rgb(color),
            });
        }
        Ok(Box::new(CutoutTransform::new(height, width, disks)))
    }
}
