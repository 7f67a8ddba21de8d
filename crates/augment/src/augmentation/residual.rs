//! The residual transform library: the fixed resize/flip tail every training
//! sample passes through after the randomized geometric stages.

use image::RgbImage;
use rand::{Rng, RngCore};

use super::{Augmentation, validate_range};
use crate::{
    error::{AugmentError, Result},
    transform::{HFlipTransform, Identity, ResizeTransform, Transform},
};

/// Scales the image so its shorter edge hits a drawn target length, capped
/// so the longer edge never exceeds `max_size`.
#[derive(Debug, Clone)]
pub struct ResizeShortestEdge {
    short_edge: (u32, u32),
    max_size: u32,
}

impl ResizeShortestEdge {
    pub fn new(short_edge: (u32, u32), max_size: u32) -> Result<Self> {
        validate_range("resize short edge", short_edge.0 as f64, short_edge.1 as f64)?;
        if short_edge.0 == 0 || max_size == 0 {
            return Err(AugmentError::InvalidRange {
                name: "resize short edge",
                min: short_edge.0 as f64,
                max: max_size as f64,
            });
        }
        Ok(Self {
            short_edge,
            max_size,
        })
    }
}

impl Augmentation for ResizeShortestEdge {
    fn get_transform(
        &self,
        rng: &mut dyn RngCore,
        image: &RgbImage,
    ) -> Result<Box<dyn Transform>> {
        let (width, height) = image.dimensions();
        let size = rng.gen_range(self.short_edge.0..=self.short_edge.1) as f64;
        let (w, h) = (width as f64, height as f64);

        let (mut new_h, mut new_w) = if h < w {
            (size, size * w / h)
        } else {
            (size * h / w, size)
        };
        if new_h.max(new_w) > self.max_size as f64 {
            let scale = self.max_size as f64 / new_h.max(new_w);
            new_h *= scale;
            new_w *= scale;
        }
        Ok(Box::new(ResizeTransform::new(
            height,
            width,
            (new_h + 0.5) as u32,
            (new_w + 0.5) as u32,
        )))
    }
}

/// Mirrors horizontally with the given probability; the draw happens even
/// when it comes up "no flip" so the consumed randomness is stable.
#[derive(Debug, Clone)]
pub struct RandomFlip {
    prob: f64,
}

impl RandomFlip {
    pub fn new(prob: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&prob) {
            return Err(AugmentError::InvalidRange {
                name: "flip probability",
                min: prob,
                max: prob,
            });
        }
        Ok(Self { prob })
    }
}

impl Augmentation for RandomFlip {
    fn get_transform(
        &self,
        rng: &mut dyn RngCore,
        image: &RgbImage,
    ) -> Result<Box<dyn Transform>> {
        let (width, height) = image.dimensions();
        if rng.gen_bool(self.prob) {
            Ok(Box::new(HFlipTransform::new(height, width)))
        } else {
            Ok(Box::new(Identity))
        }
    }
}
