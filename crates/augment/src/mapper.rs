//! The per-sample mapping pipeline.
//!
//! One call takes a dataset record, decodes its image, runs the configured
//! augmentation stages, and rewrites every annotation through the exact same
//! geometric transforms the pixels went through. Photometric stages touch
//! pixels only and are never recorded; geometric stages are accumulated into
//! a composite that replays over every polygon.

use image::RgbImage;
use rand::RngCore;
use tracing::{debug, warn};

use crate::{
    augmentation::{
        Augmentation, RandomBrightness, RandomContrast, RandomCrop, RandomCutout, RandomExtent,
        RandomRotation, RandomSaturation, RandomShear,
    },
    error::{AugmentError, Result},
    io,
    transform::{Transform, TransformList},
    types::{
        Annotation, ImageTensor, Instance, MappedSample, SampleRecord, bbox_from_rings, clamp_box,
    },
};

/// Whether the mapper augments and emits instances, or only prepares pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Training,
    Inference,
}

/// Maps one dataset record at a time. Built by
/// [`MapperConfig::build`](crate::config::MapperConfig::build); a disabled
/// stage is simply absent and consumes no randomness.
///
/// The mapper holds no random state of its own: the caller passes a generator
/// into every [`map`](DatasetMapper::map) call, so each data-loading worker
/// can own an independently seeded one.
#[derive(Debug)]
pub struct DatasetMapper {
    pub(crate) contrast: Option<RandomContrast>,
    pub(crate) brightness: Option<RandomBrightness>,
    pub(crate) saturation: Option<RandomSaturation>,
    pub(crate) cutout: Option<RandomCutout>,
    pub(crate) rotation: Option<RandomRotation>,
    pub(crate) shear: Option<RandomShear>,
    pub(crate) extent: Option<RandomExtent>,
    pub(crate) crop: Option<RandomCrop>,
    pub(crate) residual: Vec<Box<dyn Augmentation>>,
    pub(crate) mode: Mode,
}

/// The image and the accumulated geometric transforms, threaded through the
/// stages in order.
struct SampleState {
    image: RgbImage,
    transforms: TransformList,
}

impl SampleState {
    /// Applies a pixel-only stage. The transform is dropped afterwards, so
    /// it never participates in coordinate mapping.
    fn photometric(self, rng: &mut dyn RngCore, aug: &dyn Augmentation) -> Result<Self> {
        let tfm = aug.get_transform(rng, &self.image)?;
        let image = tfm.apply_image(&self.image)?;
        Ok(Self {
            image,
            transforms: self.transforms,
        })
    }

    /// Applies a stage and records its transform for coordinate replay. The
    /// next stage samples against the image this one produced.
    fn geometric(mut self, rng: &mut dyn RngCore, aug: &dyn Augmentation) -> Result<Self> {
        let tfm = aug.get_transform(rng, &self.image)?;
        let image = tfm.apply_image(&self.image)?;
        self.transforms.push(tfm);
        Ok(Self {
            image,
            transforms: self.transforms,
        })
    }
}

impl DatasetMapper {
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Reads the record's image from disk and maps the sample.
    pub fn map(&self, rng: &mut dyn RngCore, record: &SampleRecord) -> Result<MappedSample> {
        let image = io::read_image(&record.file_name)?;
        self.map_decoded(rng, record, image)
    }

    /// Maps a sample whose image is already decoded. The raster must match
    /// the size declared in the record.
    pub fn map_decoded(
        &self,
        rng: &mut dyn RngCore,
        record: &SampleRecord,
        image: RgbImage,
    ) -> Result<MappedSample> {
        io::check_image_size(record, &image)?;
        // Inference ignores annotation fields entirely; training treats a
        // panoptic reference as a schema violation.
        if self.mode == Mode::Training && record.sem_seg_file_name.is_some() {
            return Err(AugmentError::MalformedAnnotation(
                "semantic segmentation references are not supported".into(),
            ));
        }

        let mut state = SampleState {
            image,
            transforms: TransformList::new(),
        };
        // Randomized stages are training-only; inference just runs the
        // residual resize tail.
        if self.mode == Mode::Training {
            for aug in self.photometric_stages() {
                state = state.photometric(rng, aug)?;
            }
            for aug in self.geometric_stages() {
                state = state.geometric(rng, aug)?;
            }
        }
        for aug in &self.residual {
            state = state.geometric(rng, aug.as_ref())?;
        }

        if self.mode == Mode::Inference {
            return Ok(MappedSample {
                file_name: record.file_name.clone(),
                image: ImageTensor::from_rgb(&state.image),
                instances: Vec::new(),
            });
        }

        let annotations = record.annotations.as_ref().ok_or_else(|| {
            AugmentError::MalformedAnnotation("training record without annotations".into())
        })?;

        let (out_width, out_height) = state.image.dimensions();
        let instances = self.transform_annotations(
            annotations,
            &state.transforms,
            out_width as f64,
            out_height as f64,
        )?;

        Ok(MappedSample {
            file_name: record.file_name.clone(),
            image: ImageTensor::from_rgb(&state.image),
            instances,
        })
    }

    fn photometric_stages(&self) -> impl Iterator<Item = &dyn Augmentation> {
        [
            self.contrast.as_ref().map(|a| a as &dyn Augmentation),
            self.brightness.as_ref().map(|a| a as &dyn Augmentation),
            self.saturation.as_ref().map(|a| a as &dyn Augmentation),
            self.cutout.as_ref().map(|a| a as &dyn Augmentation),
        ]
        .into_iter()
        .flatten()
    }

    fn geometric_stages(&self) -> impl Iterator<Item = &dyn Augmentation> {
        [
            self.rotation.as_ref().map(|a| a as &dyn Augmentation),
            self.shear.as_ref().map(|a| a as &dyn Augmentation),
            self.extent.as_ref().map(|a| a as &dyn Augmentation),
            self.crop.as_ref().map(|a| a as &dyn Augmentation),
        ]
        .into_iter()
        .flatten()
    }

    /// Rewrites annotations through the accumulated geometric composite.
    ///
    /// Crowd regions are dropped before any geometry runs. An instance whose
    /// polygons all vanish (clipped away or degenerate) is dropped with a
    /// warning, never an error. Boxes come from the transformed box corners
    /// by default; when a crop ran, from the tight bounds of the transformed
    /// mask, since a box mapped through a crop can badly overshoot the part
    /// of the instance that survived.
    fn transform_annotations(
        &self,
        annotations: &[Annotation],
        composite: &TransformList,
        out_width: f64,
        out_height: f64,
    ) -> Result<Vec<Instance>> {
        let crop_active = self.crop.is_some();
        let mut instances = Vec::with_capacity(annotations.len());

        for (index, ann) in annotations.iter().enumerate() {
            if ann.iscrowd != 0 {
                debug!(index, "dropping crowd region");
                continue;
            }
            if ann.segmentation.is_empty() {
                return Err(AugmentError::MalformedAnnotation(format!(
                    "annotation {index} has no segmentation rings"
                )));
            }

            let polygons: Vec<_> = ann
                .segmentation
                .iter()
                .flat_map(|ring| composite.apply_polygon(ring))
                .collect();
            if polygons.is_empty() {
                warn!(index, category = ann.category_id, "instance clipped away");
                continue;
            }

            let bbox = if crop_active {
                match bbox_from_rings(&polygons) {
                    Some(b) => b,
                    None => continue,
                }
            } else {
                let src = match ann.bbox {
                    Some(b) => b,
                    None => match bbox_from_rings(&ann.segmentation) {
                        Some(b) => b,
                        None => continue,
                    },
                };
                clamp_box(composite.apply_box(src), out_width, out_height)
            };
            if bbox[2] <= bbox[0] || bbox[3] <= bbox[1] {
                warn!(index, category = ann.category_id, "degenerate box, dropping");
                continue;
            }

            instances.push(Instance {
                polygons,
                bbox,
                category_id: ann.category_id,
            });
        }
        Ok(instances)
    }
}
