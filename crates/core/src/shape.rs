//! Colored polygon-with-holes shape.

use crate::geometry::{
    is_clockwise, remove_consecutive_duplicates, truncate_ring, BoundingBox, Point, Ring,
};
use geo::{Area, Coord, LineString, Polygon as GeoPolygon};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Color tag reserved for a synthesized base plate.
pub const BASE_COLOR: &str = "base";

/// A contour with holes, tagged by a color (material) identifier.
///
/// After normalization the contour is clockwise and every hole is
/// counter-clockwise.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Shape {
    contour: Ring,
    holes: Vec<Ring>,
    color: String,
}

impl Shape {
    /// Creates a shape from a contour and holes, keeping the given vertex order.
    pub fn new(contour: Ring, holes: Vec<Ring>, color: impl Into<String>) -> Self {
        Self {
            contour,
            holes,
            color: color.into(),
        }
    }

    /// Creates a hole-free shape.
    pub fn from_contour(contour: Ring, color: impl Into<String>) -> Self {
        Self::new(contour, Vec::new(), color)
    }

    /// Adds a hole.
    pub fn with_hole(mut self, hole: Ring) -> Self {
        self.holes.push(hole);
        self
    }

    /// Returns the outer ring.
    pub fn contour(&self) -> &Ring {
        &self.contour
    }

    /// Returns the holes.
    pub fn holes(&self) -> &[Ring] {
        &self.holes
    }

    /// Returns the color tag.
    pub fn color(&self) -> &str {
        &self.color
    }

    /// Replaces the color tag.
    pub fn set_color(&mut self, color: impl Into<String>) {
        self.color = color.into();
    }

    /// Returns true if this shape is the synthesized base plate.
    pub fn is_base(&self) -> bool {
        self.color == BASE_COLOR
    }

    /// Returns true if the contour has no vertices.
    pub fn is_empty(&self) -> bool {
        self.contour.is_empty()
    }

    /// Iterates over the contour followed by the holes.
    pub fn rings(&self) -> impl Iterator<Item = &Ring> {
        std::iter::once(&self.contour).chain(self.holes.iter())
    }

    /// Mutable iteration over the contour followed by the holes.
    pub fn rings_mut(&mut self) -> impl Iterator<Item = &mut Ring> {
        std::iter::once(&mut self.contour).chain(self.holes.iter_mut())
    }

    /// Total number of vertices over all rings.
    pub fn vertex_count(&self) -> usize {
        self.rings().map(Vec::len).sum()
    }

    /// Bounds of the contour and holes.
    pub fn bounds(&self) -> BoundingBox {
        BoundingBox::from_rings(self.rings())
    }

    /// Reverses rings as needed so the contour is clockwise and the holes counter-clockwise.
    pub fn normalize_orientation(&mut self) {
        if !is_clockwise(&self.contour) {
            self.contour.reverse();
        }
        for hole in &mut self.holes {
            if is_clockwise(hole) {
                hole.reverse();
            }
        }
    }

    /// Rounds all coordinates to `precision` digits. Negative precision is a no-op.
    pub fn truncate(&mut self, precision: i32) {
        if precision < 0 {
            return;
        }
        for ring in self.rings_mut() {
            truncate_ring(ring, precision);
        }
    }

    /// Drops vertices equal to their predecessor in every ring.
    pub fn remove_consecutive_duplicates(&mut self) {
        for ring in self.rings_mut() {
            remove_consecutive_duplicates(ring);
        }
    }

    /// Maps every vertex `p` to `(p - center) * ratio`.
    pub fn rescale_and_center(&mut self, ratio: f64, center: Point) {
        for ring in self.rings_mut() {
            for p in ring.iter_mut() {
                *p = ((p.0 - center.0) * ratio, (p.1 - center.1) * ratio);
            }
        }
    }

    /// Returns true if every coordinate is finite.
    pub fn is_finite(&self) -> bool {
        self.rings()
            .flat_map(|r| r.iter())
            .all(|p| p.0.is_finite() && p.1.is_finite())
    }

    /// Converts to a geo crate Polygon.
    pub fn to_geo_polygon(&self) -> GeoPolygon<f64> {
        let to_line = |ring: &Ring| {
            LineString::from(
                ring.iter()
                    .map(|&(x, y)| Coord { x, y })
                    .collect::<Vec<_>>(),
            )
        };
        GeoPolygon::new(
            to_line(&self.contour),
            self.holes.iter().map(to_line).collect(),
        )
    }

    /// Area of the contour minus the holes.
    pub fn area(&self) -> f64 {
        self.to_geo_polygon().unsigned_area()
    }
}

/// Combined bounds of a list of shapes; invalid for an empty list.
pub fn bounds_of_shapes<'a>(shapes: impl IntoIterator<Item = &'a Shape>) -> BoundingBox {
    let mut result = BoundingBox::invalid();
    for shape in shapes {
        result.merge(&shape.bounds());
    }
    result
}
