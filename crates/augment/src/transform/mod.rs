//! Coordinate-consistent transforms.
//!
//! Every transform is a paired operation: it resamples a raster and maps
//! vector coordinates through the identical geometric mapping. The
//! `apply_coords` of each implementation is the exact forward point mapping
//! used by its `apply_image`, which is what keeps pixels and instance masks
//! in registration.

pub mod affine;
pub mod blend;
pub mod clip;
pub mod crop;
pub mod cutout;
pub mod extent;
pub mod flip;
pub mod resize;
pub mod rotation;
pub mod shear;

use std::fmt::Debug;

use image::RgbImage;

use crate::{
    error::{AugmentError, Result},
    types::{Box2, Ring},
};

pub use blend::{BlendSource, BlendTransform};
pub use crop::CropTransform;
pub use cutout::{CutoutTransform, Disk};
pub use extent::ExtentTransform;
pub use flip::HFlipTransform;
pub use resize::ResizeTransform;
pub use rotation::RotationTransform;
pub use shear::ShearTransform;

/// A paired image-resampling + coordinate-mapping operation.
///
/// Implementations are immutable once constructed and safe to share across
/// threads.
pub trait Transform: Debug + Send + Sync {
    /// Resamples the raster. Fails with [`AugmentError::ShapeMismatch`] when
    /// the image is not the size the transform was built for.
    fn apply_image(&self, img: &RgbImage) -> Result<RgbImage>;

    /// Maps points through the forward geometric mapping.
    fn apply_coords(&self, coords: &[[f64; 2]]) -> Vec<[f64; 2]>;

    /// The `(width, height)` rectangle mapped polygons must be clipped to,
    /// or `None` for transforms that cannot push vertices out of bounds.
    fn clip_bounds(&self) -> Option<(f64, f64)> {
        None
    }

    /// Maps a ring and clips it against the output canvas. May return zero,
    /// one, or several rings; an empty result is not an error.
    fn apply_polygon(&self, ring: &[[f64; 2]]) -> Vec<Ring> {
        let mapped = self.apply_coords(ring);
        match self.clip_bounds() {
            Some((w, h)) => clip::clip_to_rect(&mapped, w, h),
            None => vec![mapped],
        }
    }

    /// Maps an axis-aligned box to the envelope of its mapped corners.
    fn apply_box(&self, b: Box2) -> Box2 {
        let corners = [
            [b[0], b[1]],
            [b[2], b[1]],
            [b[2], b[3]],
            [b[0], b[3]],
        ];
        let mapped = self.apply_coords(&corners);
        let xs = mapped.iter().map(|p| p[0]);
        let ys = mapped.iter().map(|p| p[1]);
        [
            xs.clone().fold(f64::INFINITY, f64::min),
            ys.clone().fold(f64::INFINITY, f64::min),
            xs.fold(f64::NEG_INFINITY, f64::max),
            ys.fold(f64::NEG_INFINITY, f64::max),
        ]
    }
}

/// The do-nothing transform, used when a probabilistic sampler decides not
/// to act so the composite chain keeps a uniform shape.
#[derive(Debug, Clone, Default)]
pub struct Identity;

impl Transform for Identity {
    fn apply_image(&self, img: &RgbImage) -> Result<RgbImage> {
        Ok(img.clone())
    }

    fn apply_coords(&self, coords: &[[f64; 2]]) -> Vec<[f64; 2]> {
        coords.to_vec()
    }
}

/// An ordered chain of transforms exposed through the same interface as a
/// single transform. Order is semantically significant: it must match the
/// order the corresponding image edits were applied.
#[derive(Debug, Default)]
pub struct TransformList {
    transforms: Vec<Box<dyn Transform>>,
}

impl TransformList {
    pub fn new() -> Self {
        Self {
            transforms: Vec::new(),
        }
    }

    /// Appends a transform after every existing member.
    pub fn push(&mut self, transform: Box<dyn Transform>) {
        self.transforms.push(transform);
    }

    /// Concatenates two chains, preserving order: `self` first, then `other`.
    pub fn then(mut self, other: TransformList) -> Self {
        self.transforms.extend(other.transforms);
        self
    }

    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }
}

impl Transform for TransformList {
    fn apply_image(&self, img: &RgbImage) -> Result<RgbImage> {
        let mut out = img.clone();
        for t in &self.transforms {
            out = t.apply_image(&out)?;
        }
        Ok(out)
    }

    fn apply_coords(&self, coords: &[[f64; 2]]) -> Vec<[f64; 2]> {
        let mut out = coords.to_vec();
        for t in &self.transforms {
            out = t.apply_coords(&out);
        }
        out
    }

    fn apply_polygon(&self, ring: &[[f64; 2]]) -> Vec<Ring> {
        let mut rings = vec![ring.to_vec()];
        for t in &self.transforms {
            rings = rings.iter().flat_map(|r| t.apply_polygon(r)).collect();
            if rings.is_empty() {
                break;
            }
        }
        rings
    }

    fn apply_box(&self, b: Box2) -> Box2 {
        let mut out = b;
        for t in &self.transforms {
            out = t.apply_box(out);
        }
        out
    }
}

pub(crate) fn ensure_shape(
    expected_height: u32,
    expected_width: u32,
    img: &RgbImage,
) -> Result<()> {
    let (width, height) = img.dimensions();
    if height != expected_height || width != expected_width {
        return Err(AugmentError::ShapeMismatch {
            expected_height,
            expected_width,
            actual_height: height,
            actual_width: width,
        });
    }
    Ok(())
}
