use std::path::Path;

use image::RgbImage;

use crate::{
    error::{AugmentError, Result},
    types::SampleRecord,
};

/// Decodes an image file into a 3-channel RGB raster.
pub fn read_image<P: AsRef<Path>>(path: P) -> Result<RgbImage> {
    Ok(image::open(path)?.to_rgb8())
}

/// Verifies that a decoded raster matches the size declared in its record.
///
/// A mismatch means the annotations were produced against a different image
/// and every downstream coordinate would be wrong, so this is fatal.
pub fn check_image_size(record: &SampleRecord, image: &RgbImage) -> Result<()> {
    let (width, height) = image.dimensions();
    if record.height != height || record.width != width {
        return Err(AugmentError::ShapeMismatch {
            expected_height: record.height,
            expected_width: record.width,
            actual_height: height,
            actual_width: width,
        });
    }
    Ok(())
}
