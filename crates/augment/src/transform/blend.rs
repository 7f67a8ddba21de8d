use image::{Rgb, RgbImage};

use super::Transform;
use crate::error::Result;

/// ITU-R 601 luma weights for the grayscale blend source.
const LUMA: [f64; 3] = [0.299, 0.587, 0.114];

/// What the image is blended against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendSource {
    /// All-zero pixels: blending towards black adjusts brightness.
    Black,
    /// The per-image mean intensity: blending towards it adjusts contrast.
    Mean,
    /// The per-pixel luma: blending towards it adjusts saturation.
    Grayscale,
}

/// Photometric blend `out = src_weight * src + dst_weight * img`, clamped to
/// the valid pixel range. Purely photometric: coordinates pass through.
#[derive(Debug, Clone)]
pub struct BlendTransform {
    source: BlendSource,
    src_weight: f64,
    dst_weight: f64,
}

impl BlendTransform {
    pub fn new(source: BlendSource, src_weight: f64, dst_weight: f64) -> Self {
        Self {
            source,
            src_weight,
            dst_weight,
        }
    }
}

impl Transform for BlendTransform {
    fn apply_image(&self, img: &RgbImage) -> Result<RgbImage> {
        let mean = match self.source {
            BlendSource::Mean => {
                let raw = img.as_raw();
                raw.iter().map(|&v| v as f64).sum::<f64>() / raw.len().max(1) as f64
            }
            _ => 0.0,
        };

        let mut out = img.clone();
        for px in out.pixels_mut() {
            let src = match self.source {
                BlendSource::Black => [0.0; 3],
                BlendSource::Mean => [mean; 3],
                BlendSource::Grayscale => {
                    let gray = LUMA[0] * px[0] as f64
                        + LUMA[1] * px[1] as f64
                        + LUMA[2] * px[2] as f64;
                    [gray; 3]
                }
            };
            let mut blended = [0u8; 3];
            for c in 0..3 {
                let v = self.src_weight * src[c] + self.dst_weight * px[c] as f64;
                blended[c] = v.round().clamp(0.0, 255.0) as u8;
            }
            *px = Rgb(blended);
        }
        Ok(out)
    }

    fn apply_coords(&self, coords: &[[f64; 2]]) -> Vec<[f64; 2]> {
        coords.to_vec()
    }
}
