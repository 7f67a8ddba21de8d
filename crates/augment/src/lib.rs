//! Coordinate-consistent image augmentation for instance-segmentation
//! training.
//!
//! The core contract: every geometric change to the pixels is paired with the
//! exact same change to the polygon annotations, so masks stay registered
//! with the image through arbitrary stacks of rotation, shear, extent, crop,
//! resize and flip. Photometric changes (contrast, brightness, saturation,
//! cutout) touch pixels only.
//!
//! Typical use:
//!
//! ```no_run
//! use augment::{MapperConfig, Mode};
//! use rand::{SeedableRng, rngs::StdRng};
//!
//! # fn main() -> augment::Result<()> {
//! let mapper = MapperConfig::default().build(Mode::Training)?;
//! let mut rng = StdRng::seed_from_u64(0);
//! let record: augment::SampleRecord =
//!     serde_json::from_str(r#"{"file_name": "img.png", "height": 480, "width": 640}"#)?;
//! let sample = mapper.map(&mut rng, &record)?;
//! # let _ = sample;
//! # Ok(())
//! # }
//! ```

pub mod augmentation;
pub mod config;
pub mod error;
pub mod io;
pub mod mapper;
pub mod transform;
pub mod types;

pub use config::MapperConfig;
pub use error::{AugmentError, Result};
pub use mapper::{DatasetMapper, Mode};
pub use transform::{Transform, TransformList};
pub use types::{Annotation, ImageTensor, Instance, MappedSample, SampleRecord};
