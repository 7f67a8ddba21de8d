use std::path::PathBuf;

use geo_types::{Coord, LineString, Polygon};
use image::RgbImage;
use serde::{Deserialize, Serialize};

/// An open polygon ring: ordered vertices, first vertex NOT repeated at the
/// end. The closing edge is implicit.
pub type Ring = Vec<[f64; 2]>;

/// Axis-aligned bounding box as `[x0, y0, x1, y1]`.
pub type Box2 = [f64; 4];

/// One training sample as handed to the mapper: an image reference plus the
/// instance annotations attached to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampleRecord {
    pub file_name: PathBuf,
    pub height: u32,
    pub width: u32,
    #[serde(default)]
    pub annotations: Option<Vec<Annotation>>,
    /// Panoptic segmentation reference. This pipeline does not support it;
    /// its presence is a schema violation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sem_seg_file_name: Option<PathBuf>,
}

/// One labeled instance: polygon mask(s), optional box, class label.
///
/// The mapper only rewrites `segmentation` and the derived box; identity and
/// class fields pass through untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Annotation {
    /// One or more rings making up the instance mask.
    pub segmentation: Vec<Ring>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bbox: Option<Box2>,
    pub category_id: u32,
    #[serde(default)]
    pub iscrowd: u8,
}

/// A surviving instance after mapping: transformed rings and the box
/// recomputed from them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instance {
    pub polygons: Vec<Ring>,
    pub bbox: Box2,
    pub category_id: u32,
}

/// A fully mapped sample: channel-first pixels plus the surviving instances
/// (always empty in inference mode).
#[derive(Debug, Clone)]
pub struct MappedSample {
    pub file_name: PathBuf,
    pub image: ImageTensor,
    pub instances: Vec<Instance>,
}

/// Channel-first (CHW) u8 pixel array, the layout training frameworks expect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageTensor {
    pub data: Vec<u8>,
    pub channels: u32,
    pub height: u32,
    pub width: u32,
}

impl ImageTensor {
    /// Repacks an interleaved RGB raster into CHW order.
    pub fn from_rgb(img: &RgbImage) -> Self {
        let (width, height) = img.dimensions();
        let raw = img.as_raw();
        let plane = (width * height) as usize;
        let mut data = vec![0u8; plane * 3];
        for (i, px) in raw.chunks_exact(3).enumerate() {
            data[i] = px[0];
            data[plane + i] = px[1];
            data[2 * plane + i] = px[2];
        }
        Self {
            data,
            channels: 3,
            height,
            width,
        }
    }
}

/// Converts an open ring to a closed geo polygon (no holes).
pub fn ring_to_polygon(ring: &[[f64; 2]]) -> Polygon<f64> {
    let coords: Vec<Coord<f64>> = ring.iter().map(|&[x, y]| Coord { x, y }).collect();
    Polygon::new(LineString::new(coords), vec![])
}

/// Unsigned area enclosed by an open ring.
pub fn ring_area(ring: &[[f64; 2]]) -> f64 {
    use geo::Area;
    ring_to_polygon(ring).unsigned_area()
}

/// Tight envelope of a set of rings, or `None` if there are no vertices.
pub fn bbox_from_rings(rings: &[Ring]) -> Option<Box2> {
    let mut min_x = f64::INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    let mut seen = false;
    for ring in rings {
        for &[x, y] in ring {
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
            seen = true;
        }
    }
    seen.then_some([min_x, min_y, max_x, max_y])
}

/// Clamps a box to the `[0, width] x [0, height]` canvas.
pub fn clamp_box(b: Box2, width: f64, height: f64) -> Box2 {
    [
        b[0].clamp(0.0, width),
        b[1].clamp(0.0, height),
        b[2].clamp(0.0, width),
        b[3].clamp(0.0, height),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn image_tensor_is_channel_first() {
        let mut img = RgbImage::new(2, 1);
        img.put_pixel(0, 0, Rgb([1, 2, 3]));
        img.put_pixel(1, 0, Rgb([4, 5, 6]));

        let t = ImageTensor::from_rgb(&img);
        assert_eq!(t.channels, 3);
        assert_eq!((t.width, t.height), (2, 1));
        assert_eq!(t.data, vec![1, 4, 2, 5, 3, 6]);
    }

    #[test]
    fn bbox_envelopes_all_rings() {
        let rings = vec![
            vec![[1.0, 2.0], [5.0, 2.0], [5.0, 8.0]],
            vec![[0.0, 4.0], [3.0, 9.0], [2.0, 4.0]],
        ];
        assert_eq!(bbox_from_rings(&rings), Some([0.0, 2.0, 5.0, 9.0]));
        assert_eq!(bbox_from_rings(&[]), None);
    }

    #[test]
    fn ring_area_of_unit_square() {
        let square = vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
        assert!((ring_area(&square) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn sample_record_round_trips_through_json() {
        let json = r#"{
            "file_name": "img/0001.png",
            "height": 100,
            "width": 200,
            "annotations": [
                {
                    "segmentation": [[[10.0, 10.0], [90.0, 10.0], [90.0, 90.0]]],
                    "category_id": 3,
                    "iscrowd": 0
                }
            ]
        }"#;
        let record: SampleRecord = serde_json::from_str(json).expect("should parse");
        assert_eq!(record.height, 100);
        let annos = record.annotations.as_ref().expect("annotations present");
        assert_eq!(annos.len(), 1);
        assert_eq!(annos[0].category_id, 3);
        assert!(record.sem_seg_file_name.is_none());

        let back = serde_json::to_string(&record).expect("should serialize");
        let reparsed: SampleRecord = serde_json::from_str(&back).expect("should reparse");
        assert_eq!(reparsed.width, 200);
    }
}
