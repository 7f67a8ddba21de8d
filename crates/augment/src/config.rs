//! Configuration surface for the dataset mapper.
//!
//! Every augmentation is independently togglable with explicit numeric
//! ranges. Validation happens once, when the mapper is built: an enabled
//! feature with a bad range fails here, never deep inside a sample.

use serde::Deserialize;
use tracing::info;

use crate::{
    augmentation::{
        Augmentation, RandomBrightness, RandomContrast, RandomCrop, RandomCutout, RandomExtent,
        RandomFlip, RandomRotation, RandomSaturation, RandomShear, ResizeShortestEdge,
    },
    error::{AugmentError, Result},
    mapper::{DatasetMapper, Mode},
};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MapperConfig {
    /// This pipeline only supports instance segmentation; masks must stay on
    /// and keypoints/proposals off.
    pub mask_on: bool,
    pub keypoint_on: bool,
    pub load_proposals: bool,

    pub contrast: ToggleRange,
    pub brightness: ToggleRange,
    pub saturation: ToggleRange,
    pub cutout: CutoutConfig,
    pub rotation: ToggleRange,
    pub shear: ShearConfig,
    pub extent: ExtentConfig,
    pub crop: CropConfig,
    pub resize: ResizeConfig,
    pub flip: FlipConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ToggleRange {
    pub enabled: bool,
    pub range: (f64, f64),
}

impl Default for ToggleRange {
    fn default() -> Self {
        Self {
            enabled: false,
            range: (1.0, 1.0),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CutoutConfig {
    pub enabled: bool,
    pub num_hole_range: (u32, u32),
    /// Radius as a fraction of the shorter image side.
    pub radius_range: (f64, f64),
    /// Per-channel (R, G, B) color ranges.
    pub color_ranges: [(f64, f64); 3],
}

impl Default for CutoutConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            num_hole_range: (1, 3),
            radius_range: (0.05, 0.2),
            color_ranges: [(0.0, 255.0); 3],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ShearConfig {
    pub enabled: bool,
    pub angle_h_range: Option<(f64, f64)>,
    pub angle_v_range: Option<(f64, f64)>,
}

impl Default for ShearConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            angle_h_range: Some((-10.0, 10.0)),
            angle_v_range: Some((-10.0, 10.0)),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExtentConfig {
    pub enabled: bool,
    pub scale_range: (f64, f64),
    pub shift_range: (f64, f64),
}

impl Default for ExtentConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            scale_range: (1.0, 1.0),
            shift_range: (0.2, 0.2),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CropConfig {
    pub enabled: bool,
    /// `(height fraction, width fraction)` of the crop window.
    pub size: (f64, f64),
}

impl Default for CropConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            size: (0.9, 0.9),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ResizeConfig {
    pub enabled: bool,
    pub short_edge_range: (u32, u32),
    pub max_size: u32,
}

impl Default for ResizeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            short_edge_range: (640, 800),
            max_size: 1333,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FlipConfig {
    pub enabled: bool,
    pub prob: f64,
}

impl Default for FlipConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            prob: 0.5,
        }
    }
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            mask_on: true,
            keypoint_on: false,
            load_proposals: false,
            contrast: ToggleRange {
                enabled: true,
                range: (0.5, 1.5),
            },
            brightness: ToggleRange {
                enabled: true,
                range: (0.8, 1.2),
            },
            saturation: ToggleRange::default(),
            cutout: CutoutConfig::default(),
            rotation: ToggleRange {
                enabled: true,
                range: (-20.0, 20.0),
            },
            shear: ShearConfig::default(),
            extent: ExtentConfig::default(),
            crop: CropConfig::default(),
            resize: ResizeConfig::default(),
            flip: FlipConfig::default(),
        }
    }
}

impl MapperConfig {
    /// A configuration with every augmentation turned off: the mapper only
    /// decodes, validates, and packs the sample.
    pub fn all_disabled() -> Self {
        Self {
            mask_on: true,
            keypoint_on: false,
            load_proposals: false,
            contrast: ToggleRange::default(),
            brightness: ToggleRange::default(),
            saturation: ToggleRange::default(),
            cutout: CutoutConfig {
                enabled: false,
                ..CutoutConfig::default()
            },
            rotation: ToggleRange::default(),
            shear: ShearConfig {
                enabled: false,
                ..ShearConfig::default()
            },
            extent: ExtentConfig {
                enabled: false,
                ..ExtentConfig::default()
            },
            crop: CropConfig::default(),
            resize: ResizeConfig {
                enabled: false,
                ..ResizeConfig::default()
            },
            flip: FlipConfig {
                enabled: false,
                prob: 0.5,
            },
        }
    }

    /// Builds the mapper, validating the whole configuration up front.
    pub fn build(&self, mode: Mode) -> Result<DatasetMapper> {
        if !self.mask_on {
            return Err(AugmentError::UnsupportedTask(
                "instance masks must be enabled".into(),
            ));
        }
        if self.keypoint_on {
            return Err(AugmentError::UnsupportedTask(
                "keypoints are not supported".into(),
            ));
        }
        if self.load_proposals {
            return Err(AugmentError::UnsupportedTask(
                "pre-computed proposals are not supported".into(),
            ));
        }

        let contrast = self
            .contrast
            .enabled
            .then(|| RandomContrast::new(self.contrast.range.0, self.contrast.range.1))
            .transpose()?;
        let brightness = self
            .brightness
            .enabled
            .then(|| RandomBrightness::new(self.brightness.range.0, self.brightness.range.1))
            .transpose()?;
        let saturation = self
            .saturation
            .enabled
            .then(|| RandomSaturation::new(self.saturation.range.0, self.saturation.range.1))
            .transpose()?;
        let cutout = self
            .cutout
            .enabled
            .then(|| {
                RandomCutout::new(
                    self.cutout.num_hole_range,
                    self.cutout.radius_range,
                    self.cutout.color_ranges,
                )
            })
            .transpose()?;
        let rotation = self
            .rotation
            .enabled
            .then(|| RandomRotation::new(self.rotation.range.0, self.rotation.range.1))
            .transpose()?;
        let shear = self
            .shear
            .enabled
            .then(|| RandomShear::new(self.shear.angle_h_range, self.shear.angle_v_range))
            .transpose()?;
        let extent = self
            .extent
            .enabled
            .then(|| RandomExtent::new(self.extent.scale_range, self.extent.shift_range))
            .transpose()?;
        let crop = self
            .crop
            .enabled
            .then(|| RandomCrop::new(self.crop.size))
            .transpose()?;

        let mut residual: Vec<Box<dyn Augmentation>> = Vec::new();
        if self.resize.enabled {
            // Inference pins the short edge to the range minimum so output
            // sizes are deterministic; only training samples the range.
            let short_edge = match mode {
                Mode::Training => self.resize.short_edge_range,
                Mode::Inference => (
                    self.resize.short_edge_range.0,
                    self.resize.short_edge_range.0,
                ),
            };
            residual.push(Box::new(ResizeShortestEdge::new(
                short_edge,
                self.resize.max_size,
            )?));
        }
        // Flipping is a training augmentation; inference only resizes.
        if self.flip.enabled && mode == Mode::Training {
            residual.push(Box::new(RandomFlip::new(self.flip.prob)?));
        }

        if mode == Mode::Training {
            if crop.is_some() {
                info!(size = ?self.crop.size, "crop used in training");
            }
            info!(
                photometric = [
                    contrast.is_some(),
                    brightness.is_some(),
                    saturation.is_some(),
                    cutout.is_some()
                ]
                .iter()
                .filter(|e| **e)
                .count(),
                geometric = [
                    rotation.is_some(),
                    shear.is_some(),
                    extent.is_some(),
                    crop.is_some()
                ]
                .iter()
                .filter(|e| **e)
                .count(),
                residual = residual.len(),
                "built training mapper"
            );
        }

        Ok(DatasetMapper {
            contrast,
            brightness,
            saturation,
            cutout,
            rotation,
            shear,
            extent,
            crop,
            residual,
            mode,
        })
    }
}
