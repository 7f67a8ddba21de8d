//! Random-parameter samplers.
//!
//! A sampler looks at the image it will be applied to, draws parameters from
//! an injected random source, and instantiates a concrete [`Transform`].
//! Samplers never own or reseed the source: the handle is passed into every
//! call so per-worker generators stay reproducible and race-free. A feature
//! that is disabled simply has no sampler, so it consumes no randomness.

pub mod geometric;
pub mod photometric;
pub mod residual;

use std::fmt::Debug;

use image::RgbImage;
use rand::RngCore;

use crate::{
    error::{AugmentError, Result},
    transform::Transform,
};

pub use geometric::{RandomCrop, RandomExtent, RandomRotation, RandomShear};
pub use photometric::{RandomBrightness, RandomContrast, RandomCutout, RandomSaturation};
pub use residual::{RandomFlip, ResizeShortestEdge};

/// A component that draws random parameters and produces a concrete
/// transform for the given image.
pub trait Augmentation: Debug + Send + Sync {
    fn get_transform(&self, rng: &mut dyn RngCore, image: &RgbImage)
    -> Result<Box<dyn Transform>>;
}

/// Range validation shared by every sampler constructor. An enabled feature
/// with a bad range must fail when the pipeline is built, not deep inside a
/// sample.
pub(crate) fn validate_range(name: &'static str, min: f64, max: f64) -> Result<()> {
    if !min.is_finite() || !max.is_finite() || min > max {
        return Err(AugmentError::InvalidRange { name, min, max });
    }
    Ok(())
}
