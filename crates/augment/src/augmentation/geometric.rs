use image::RgbImage;
use rand::{Rng, RngCore};

use super::{Augmentation, validate_range};
use crate::{
    error::Result,
    transform::{CropTransform, ExtentTransform, RotationTransform, ShearTransform, Transform},
};

/// Draws a rotation angle in degrees from a closed range.
#[derive(Debug, Clone)]
pub struct RandomRotation {
    min: f64,
    max: f64,
}

impl RandomRotation {
    pub fn new(min: f64, max: f64) -> Result<Self> {
        validate_range("rotation angle", min, max)?;
        Ok(Self { min, max })
    }
}

impl Augmentation for RandomRotation {
    fn get_transform(
        &self,
        rng: &mut dyn RngCore,
        image: &RgbImage,
    ) -> Result<Box<dyn Transform>> {
        let (width, height) = image.dimensions();
        let angle = rng.gen_range(self.min..=self.max);
        Ok(Box::new(RotationTransform::new(height, width, angle)))
    }
}

/// Draws horizontal and vertical shear angles independently. A disabled axis
/// (`None`) is fixed to zero and consumes no randomness.
#[derive(Debug, Clone)]
pub struct RandomShear {
    angle_h: Option<(f64, f64)>,
    angle_v: Option<(f64, f64)>,
}

impl RandomShear {
    pub fn new(angle_h: Option<(f64, f64)>, angle_v: Option<(f64, f64)>) -> Result<Self> {
        if let Some((lo, hi)) = angle_h {
            validate_range("shear horizontal angle", lo, hi)?;
        }
        if let Some((lo, hi)) = angle_v {
            validate_range("shear vertical angle", lo, hi)?;
        }
        Ok(Self { angle_h, angle_v })
    }
}

impl Augmentation for RandomShear {
    fn get_transform(
        &self,
        rng: &mut dyn RngCore,
        image: &RgbImage,
    ) -> Result<Box<dyn Transform>> {
        let (width, height) = image.dimensions();
        let angle_h = match self.angle_h {
            Some((lo, hi)) => rng.gen_range(lo..=hi),
            None => 0.0,
        };
        let angle_v = match self.angle_v {
            Some((lo, hi)) => rng.gen_range(lo..=hi),
            None => 0.0,
        };
        Ok(Box::new(ShearTransform::new(height, width, angle_h, angle_v)))
    }
}

/// Slides a same-size view window over the image: the source rectangle is
/// the (scaled) canvas shifted by a random fraction of each dimension.
#[derive(Debug, Clone)]
pub struct RandomExtent {
    scale: (f64, f64),
    shift: (f64, f64),
}

impl RandomExtent {
    pub fn new(scale: (f64, f64), shift: (f64, f64)) -> Result<Self> {
        validate_range("extent scale", scale.0, scale.1)?;
        if scale.0 <= 0.0 {
            return Err(crate::error::AugmentError::InvalidRange {
                name: "extent scale",
                min: scale.0,
                max: scale.1,
            });
        }
        validate_range("extent shift", 0.0, shift.0)?;
        validate_range("extent shift", 0.0, shift.1)?;
        Ok(Self { scale, shift })
    }
}

impl Augmentation for RandomExtent {
    fn get_transform(
        &self,
        rng: &mut dyn RngCore,
        image: &RgbImage,
    ) -> Result<Box<dyn Transform>> {
        let (width, height) = image.dimensions();
        let (w, h) = (width as f64, height as f64);

        let scale = rng.gen_range(self.scale.0..=self.scale.1);
        let mut rect = [
            -0.5 * w * scale,
            -0.5 * h * scale,
            0.5 * w * scale,
            0.5 * h * scale,
        ];
        let dx = self.shift.0 * w * (rng.gen_range(0.0..1.0) - 0.5);
        let dy = self.shift.1 * h * (rng.gen_range(0.0..1.0) - 0.5);
        rect[0] += dx + 0.5 * w;
        rect[2] += dx + 0.5 * w;
        rect[1] += dy + 0.5 * h;
        rect[3] += dy + 0.5 * h;

        // A tiny scale on a small image can round to zero; a canvas is
        // always at least one pixel.
        let out_width = ((rect[2] - rect[0]).round() as u32).max(1);
        let out_height = ((rect[3] - rect[1]).round() as u32).max(1);
        Ok(Box::new(ExtentTransform::new(
            height, width, rect, out_width, out_height,
        )))
    }
}

/// Draws a crop window of a fixed relative size at a uniform origin.
#[derive(Debug, Clone)]
pub struct RandomCrop {
    crop_size: (f64, f64),
}

impl RandomCrop {
    /// `crop_size` is `(height fraction, width fraction)`, each in `(0, 1]`.
    pub fn new(crop_size: (f64, f64)) -> Result<Self> {
        for frac in [crop_size.0, crop_size.1] {
            if !(frac > 0.0 && frac <= 1.0) {
                return Err(crate::error::AugmentError::InvalidRange {
                    name: "crop size",
                    min: crop_size.0,
                    max: crop_size.1,
                });
            }
        }
        Ok(Self { crop_size })
    }
}

impl Augmentation for RandomCrop {
    fn get_transform(
        &self,
        rng: &mut dyn RngCore,
        image: &RgbImage,
    ) -> Result<Box<dyn Transform>> {
        let (width, height) = image.dimensions();
        let crop_height = ((height as f64 * self.crop_size.0 + 0.5) as u32).clamp(1, height);
        let crop_width = ((width as f64 * self.crop_size.1 + 0.5) as u32).clamp(1, width);
        let y0 = rng.gen_range(0..=height - crop_height);
        let x0 = rng.gen_range(0..=width - crop_width);
        Ok(Box::new(CropTransform::new(
            height,
            width,
            x0,
            y0,
            crop_width,
            crop_height,
        )))
    }
}
