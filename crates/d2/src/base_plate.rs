//! Base plate synthesis.
//!
//! A base plate is a support shape placed under every other shape, colored
//! [`BASE_COLOR`]. Its outline is derived from a reference box (document
//! viewport or shape extents) grown by the configured buffer.

use std::f64::consts::TAU;
use u_layering_core::{
    BasePlateShape, BoundingBox, Error, LayeringConfig, Result, Ring, Shape, BASE_COLOR,
};

/// Number of vertices of a circular plate.
pub const CIRCLE_SEGMENTS: usize = 128;

/// Builds the base plate around `reference`.
///
/// The buffer `base_buffer / object_width * reference.width()` is added on
/// every side when `base_buffer > 0`.
pub fn build_base_plate(reference: &BoundingBox, config: &LayeringConfig) -> Result<Shape> {
    if !reference.is_valid() {
        return Err(Error::InvalidGeometry(
            "cannot build a base plate around an empty box".into(),
        ));
    }

    let mut bbox = *reference;
    if config.base_buffer > 0.0 {
        let buffer = config.base_buffer / config.object_width * reference.width();
        bbox = bbox.dilated(buffer);
    }

    let contour = match config.base_plate_shape {
        BasePlateShape::Rectangular => rectangle(&bbox),
        BasePlateShape::Squared => {
            let (cx, cy) = bbox.center();
            let half = bbox.max_extent() / 2.0;
            rectangle(&BoundingBox::new(cx - half, cy - half, cx + half, cy + half))
        }
        BasePlateShape::Circular => circle(&bbox),
    };

    let mut plate = Shape::from_contour(contour, BASE_COLOR);
    plate.normalize_orientation();
    log::debug!(
        "Base plate {:?} over [{}, {}] x [{}, {}]",
        config.base_plate_shape,
        bbox.min_x,
        bbox.max_x,
        bbox.min_y,
        bbox.max_y
    );
    Ok(plate)
}

fn rectangle(bbox: &BoundingBox) -> Ring {
    vec![
        (bbox.min_x, bbox.max_y),
        (bbox.max_x, bbox.max_y),
        (bbox.max_x, bbox.min_y),
        (bbox.min_x, bbox.min_y),
        (bbox.min_x, bbox.max_y),
    ]
}

/// Circle through the corners of `bbox`.
fn circle(bbox: &BoundingBox) -> Ring {
    let (cx, cy) = bbox.center();
    let radius = (bbox.width() / 2.0).hypot(bbox.height() / 2.0);
    let mut ring: Ring = (0..CIRCLE_SEGMENTS)
        .map(|i| {
            let angle = i as f64 / CIRCLE_SEGMENTS as f64 * TAU;
            (cx + radius * angle.cos(), cy + radius * angle.sin())
        })
        .collect();
    ring.push(ring[0]);
    ring
}
