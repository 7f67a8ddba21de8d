use geo::algorithm::orient::{Direction, Orient};
use geo::{Area, BooleanOps};
use geo_types::{Coord, LineString, Polygon, Rect};
use tracing::debug;

use crate::types::Ring;

/// Pieces smaller than this are geometric noise, not instances.
const MIN_AREA: f64 = 1e-6;

/// Repairs a mapped ring into a valid closed polygon.
///
/// Affine maps cannot introduce self-intersections into a simple ring, so
/// repair only has to cope with malformed source data: duplicate consecutive
/// vertices are dropped, winding is normalized, and rings that do not
/// enclose any area are rejected.
pub fn repair_ring(ring: &[[f64; 2]]) -> Option<Polygon<f64>> {
    let mut coords: Vec<Coord<f64>> = Vec::with_capacity(ring.len());
    for &[x, y] in ring {
        if !x.is_finite() || !y.is_finite() {
            return None;
        }
        let c = Coord { x, y };
        if coords.last() != Some(&c) {
            coords.push(c);
        }
    }
    if coords.first() == coords.last() {
        coords.pop();
    }
    if coords.len() < 3 {
        return None;
    }

    let polygon = Polygon::new(LineString::new(coords), vec![]);
    if polygon.unsigned_area() < MIN_AREA {
        return None;
    }
    Some(polygon.orient(Direction::Default))
}

/// Clips a mapped ring against the axis-aligned rectangle
/// `[0, width] x [0, height]`.
///
/// The boolean intersection may split the ring into several disjoint pieces
/// (a shape straddling a corner, say); every piece that still encloses area
/// is kept as a separate ring. Pieces come back open, with the implicit
/// closing vertex removed. An empty result is legal and left to the caller
/// to act on.
pub fn clip_to_rect(ring: &[[f64; 2]], width: f64, height: f64) -> Vec<Ring> {
    let Some(polygon) = repair_ring(ring) else {
        debug!("dropping degenerate ring with {} vertices", ring.len());
        return Vec::new();
    };

    let canvas = Rect::new(
        Coord { x: 0.0, y: 0.0 },
        Coord {
            x: width,
            y: height,
        },
    )
    .to_polygon();

    let pieces = polygon.intersection(&canvas);

    let mut rings = Vec::new();
    for piece in &pieces {
        if piece.unsigned_area() < MIN_AREA {
            continue;
        }
        let exterior = &piece.exterior().0;
        // The exterior repeats the first vertex at the end; emit it open.
        let open = &exterior[..exterior.len().saturating_sub(1)];
        if open.len() < 3 {
            continue;
        }
        rings.push(
            open.iter()
                .map(|c| [c.x.clamp(0.0, width), c.y.clamp(0.0, height)])
                .collect(),
        );
    }

    if rings.is_empty() {
        debug!("clipping removed the entire ring");
    }
    rings
}
