//! End-to-end pipeline behavior: build a mapper from a config, push a full
//! record through it, and check pixels and polygons together.

use augment::{MapperConfig, Mode, SampleRecord, types::ring_area};
use image::RgbImage;
use rand::{SeedableRng, rngs::StdRng};

fn record_with_square(height: u32, width: u32, ring: Vec<[f64; 2]>) -> SampleRecord {
    serde_json::from_value(serde_json::json!({
        "file_name": "sample.png",
        "height": height,
        "width": width,
        "annotations": [{
            "segmentation": [ring],
            "category_id": 1,
            "iscrowd": 0
        }]
    }))
    .expect("record should parse")
}

#[test]
fn strong_shear_clips_the_polygon_to_the_canvas() {
    let mut cfg = MapperConfig::all_disabled();
    cfg.shear.enabled = true;
    cfg.shear.angle_h_range = Some((45.0, 45.0));
    cfg.shear.angle_v_range = Some((0.0, 0.0));
    let mapper = cfg.build(Mode::Training).expect("valid config");

    let ring = vec![[10.0, 10.0], [90.0, 10.0], [90.0, 90.0], [10.0, 90.0]];
    let record = record_with_square(100, 100, ring);
    let img = RgbImage::from_pixel(100, 100, image::Rgb([128, 128, 128]));

    let mut rng = StdRng::seed_from_u64(0);
    let out = mapper.map_decoded(&mut rng, &record, img).expect("maps");

    assert_eq!(out.instances.len(), 1);
    let polygons = &out.instances[0].polygons;
    assert_eq!(polygons.len(), 1, "a sheared square clips to one piece");

    // The unclipped parallelogram spans x in [20, 180]; everything that
    // matters here is that the surviving piece fits the canvas and lost area.
    for &[x, y] in &polygons[0] {
        assert!((0.0..=100.0).contains(&x), "x = {x} out of canvas");
        assert!((0.0..=100.0).contains(&y), "y = {y} out of canvas");
    }
    assert!(ring_area(&polygons[0]) < 6400.0);

    let bbox = out.instances[0].bbox;
    assert!(bbox[0] >= 0.0 && bbox[2] <= 100.0);
    assert!(bbox[1] >= 0.0 && bbox[3] <= 100.0);
}

#[test]
fn crop_can_exclude_an_instance_entirely() {
    let mut cfg = MapperConfig::all_disabled();
    cfg.crop.enabled = true;
    cfg.crop.size = (0.2, 0.2);
    let mapper = cfg.build(Mode::Training).expect("valid config");

    // A small square tucked into the bottom-right corner: most crop windows
    // miss it completely.
    let ring = vec![[85.0, 85.0], [95.0, 85.0], [95.0, 95.0], [85.0, 95.0]];
    let record = record_with_square(100, 100, ring);

    let mut saw_empty = false;
    for seed in 0..50 {
        let mut rng = StdRng::seed_from_u64(seed);
        let img = RgbImage::new(100, 100);
        let out = mapper.map_decoded(&mut rng, &record, img).expect("maps");

        assert_eq!((out.image.height, out.image.width), (20, 20));
        if out.instances.is_empty() {
            saw_empty = true;
        } else {
            // Survivors live in crop-window coordinates.
            for ring in &out.instances[0].polygons {
                for &[x, y] in ring {
                    assert!((0.0..=20.0).contains(&x));
                    assert!((0.0..=20.0).contains(&y));
                }
            }
            let bbox = out.instances[0].bbox;
            assert!(bbox[2] > bbox[0] && bbox[3] > bbox[1]);
        }
    }
    assert!(saw_empty, "a 20x20 window should often miss the corner square");
}

#[test]
fn inference_mode_only_prepares_pixels() {
    let mut cfg = MapperConfig::all_disabled();
    cfg.resize.enabled = true;
    cfg.resize.short_edge_range = (50, 50);
    cfg.resize.max_size = 1000;
    let mapper = cfg.build(Mode::Inference).expect("valid config");

    let record: SampleRecord = serde_json::from_value(serde_json::json!({
        "file_name": "sample.png",
        "height": 100,
        "width": 200
    }))
    .expect("record should parse");

    let mut rng = StdRng::seed_from_u64(0);
    let out = mapper
        .map_decoded(&mut rng, &record, RgbImage::new(200, 100))
        .expect("maps without annotations");

    assert!(out.instances.is_empty());
    assert_eq!(out.image.channels, 3);
    assert_eq!((out.image.height, out.image.width), (50, 100));
    assert_eq!(out.image.data.len(), 3 * 50 * 100);
}

#[test]
fn inference_resize_is_deterministic_across_seeds() {
    let mut cfg = MapperConfig::all_disabled();
    cfg.resize.enabled = true;
    cfg.resize.short_edge_range = (50, 100);
    cfg.resize.max_size = 1000;
    let mapper = cfg.build(Mode::Inference).expect("valid config");

    let record: SampleRecord = serde_json::from_value(serde_json::json!({
        "file_name": "sample.png",
        "height": 100,
        "width": 200
    }))
    .expect("record should parse");

    for seed in 0..20 {
        let mut rng = StdRng::seed_from_u64(seed);
        let out = mapper
            .map_decoded(&mut rng, &record, RgbImage::new(200, 100))
            .expect("maps");
        // Always the range minimum: short edge 50, long edge scaled.
        assert_eq!((out.image.height, out.image.width), (50, 100));
    }
}

#[test]
fn cutout_changes_pixels_but_never_coordinates() {
    let mut cfg = MapperConfig::all_disabled();
    cfg.cutout.enabled = true;
    cfg.cutout.num_hole_range = (1, 1);
    cfg.cutout.radius_range = (0.2, 0.3);
    cfg.cutout.color_ranges = [(255.0, 255.0); 3];
    let mapper = cfg.build(Mode::Training).expect("valid config");

    let ring = vec![[10.0, 10.0], [90.0, 10.0], [90.0, 90.0], [10.0, 90.0]];
    let record = record_with_square(100, 100, ring.clone());
    let img = RgbImage::new(100, 100);
    let plain = augment::ImageTensor::from_rgb(&img);

    let mut rng = StdRng::seed_from_u64(3);
    let out = mapper.map_decoded(&mut rng, &record, img).expect("maps");

    assert_ne!(out.image.data, plain.data, "the disk must paint something");
    assert_eq!(out.instances.len(), 1);
    assert_eq!(out.instances[0].polygons, vec![ring]);
    assert_eq!(out.instances[0].bbox, [10.0, 10.0, 90.0, 90.0]);
}

#[test]
fn certain_flip_mirrors_polygons_with_the_pixels() {
    let mut cfg = MapperConfig::all_disabled();
    cfg.flip.enabled = true;
    cfg.flip.prob = 1.0;
    let mapper = cfg.build(Mode::Training).expect("valid config");

    let ring = vec![[10.0, 20.0], [30.0, 20.0], [30.0, 40.0], [10.0, 40.0]];
    let record = record_with_square(100, 100, ring);

    let mut img = RgbImage::new(100, 100);
    img.put_pixel(10, 20, image::Rgb([255, 0, 0]));

    let mut rng = StdRng::seed_from_u64(0);
    let out = mapper.map_decoded(&mut rng, &record, img).expect("maps");

    // The marked pixel lands mirrored at x = 89; the polygon edge at x = 10
    // maps to x = 90 under the continuous-coordinate convention.
    let plane = 100 * 100;
    let mirrored = 20 * 100 + 89;
    assert_eq!(out.image.data[mirrored], 255);
    assert_eq!(out.image.data[plane + mirrored], 0);

    let polygon = &out.instances[0].polygons[0];
    let xs: Vec<f64> = polygon.iter().map(|&[x, _]| x).collect();
    assert!(xs.iter().any(|&x| (x - 90.0).abs() < 1e-9));
    assert!(xs.iter().any(|&x| (x - 70.0).abs() < 1e-9));
}

#[test]
fn stacked_geometric_stages_compose_in_application_order() {
    let mut cfg = MapperConfig::all_disabled();
    cfg.shear.enabled = true;
    cfg.shear.angle_h_range = Some((10.0, 10.0));
    cfg.shear.angle_v_range = Some((0.0, 0.0));
    cfg.crop.enabled = true;
    cfg.crop.size = (0.5, 0.5);
    cfg.flip.enabled = true;
    cfg.flip.prob = 1.0;
    let mapper = cfg.build(Mode::Training).expect("valid config");

    let ring = vec![[20.0, 20.0], [80.0, 20.0], [80.0, 80.0], [20.0, 80.0]];
    let record = record_with_square(100, 100, ring);

    for seed in 0..20 {
        let mut rng = StdRng::seed_from_u64(seed);
        let img = RgbImage::new(100, 100);
        let out = mapper.map_decoded(&mut rng, &record, img).expect("maps");

        // Output canvas is the 50x50 crop window regardless of what survived.
        assert_eq!((out.image.height, out.image.width), (50, 50));
        for instance in &out.instances {
            for ring in &instance.polygons {
                assert!(ring.len() >= 3);
                for &[x, y] in ring {
                    assert!((0.0..=50.0).contains(&x));
                    assert!((0.0..=50.0).contains(&y));
                }
            }
            let b = instance.bbox;
            assert!(b[2] > b[0] && b[3] > b[1]);
        }
    }
}
