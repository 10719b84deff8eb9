//! Geometry primitives: points, rings, bounding boxes and precision helpers.
//!
//! A [`Ring`] is an ordered list of points whose first and last vertices are
//! equal. Orientation is never stored: it is recomputed from the signed sum
//! `Σ (x2 - x1) * (y2 + y1)` over consecutive vertices, a non-negative sum
//! meaning clockwise.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A 2D point as `(x, y)`.
pub type Point = (f64, f64);

/// A closed loop of points (first vertex equals last vertex).
pub type Ring = Vec<Point>;

/// Returns true if the ring is non-empty and its first and last vertices are equal.
pub fn is_closed(ring: &[Point]) -> bool {
    match (ring.first(), ring.last()) {
        (Some(first), Some(last)) => first == last,
        _ => false,
    }
}

/// Returns the orientation sum `Σ (x2 - x1) * (y2 + y1)` over consecutive vertices.
pub fn orientation_sum(ring: &[Point]) -> f64 {
    ring.windows(2)
        .map(|w| {
            let (x1, y1) = w[0];
            let (x2, y2) = w[1];
            (x2 - x1) * (y2 + y1)
        })
        .sum()
}

/// Returns true if the ring is clockwise.
///
/// Rings with fewer than three vertices have no orientation and report `false`.
pub fn is_clockwise(ring: &[Point]) -> bool {
    if ring.len() < 3 {
        return false;
    }
    orientation_sum(ring) >= 0.0
}

/// Even-odd ray casting point-in-ring test.
///
/// Points exactly on the boundary may be reported either way; callers that
/// depend on boundary behavior must fix the order in which they test.
pub fn contains_point(ring: &[Point], point: Point) -> bool {
    let (x, y) = point;
    let n = ring.len();
    if n == 0 {
        return false;
    }

    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (xi, yi) = ring[i];
        let (xj, yj) = ring[j];
        if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Euclidean distance between two points.
pub fn distance(a: Point, b: Point) -> f64 {
    (b.0 - a.0).hypot(b.1 - a.1)
}

/// Rounds a coordinate to `precision` decimal digits.
///
/// Applying it twice with the same precision gives the same value as applying it once.
pub fn truncate(x: f64, precision: i32) -> f64 {
    let scale = 10f64.powi(precision);
    (x * scale).round() / scale
}

/// Rounds every vertex of a ring to `precision` decimal digits, in place.
pub fn truncate_ring(ring: &mut [Point], precision: i32) {
    for p in ring.iter_mut() {
        *p = (truncate(p.0, precision), truncate(p.1, precision));
    }
}

/// Removes vertices equal to their predecessor. The first vertex is always kept.
pub fn remove_consecutive_duplicates(ring: &mut Ring) {
    ring.dedup();
}

/// Axis-aligned bounding box with an explicit invalid (empty) state.
///
/// The invalid box is the identity for [`BoundingBox::merge`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BoundingBox {
    /// Left edge.
    pub min_x: f64,
    /// Top edge (smallest y).
    pub min_y: f64,
    /// Right edge.
    pub max_x: f64,
    /// Bottom edge (largest y).
    pub max_y: f64,
    valid: bool,
}

impl BoundingBox {
    /// Creates a box from two corners. Extents are ordered, never inverted.
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self {
            min_x: x1.min(x2),
            min_y: y1.min(y2),
            max_x: x1.max(x2),
            max_y: y1.max(y2),
            valid: true,
        }
    }

    /// The empty box.
    pub fn invalid() -> Self {
        Self {
            min_x: 0.0,
            min_y: 0.0,
            max_x: 0.0,
            max_y: 0.0,
            valid: false,
        }
    }

    /// A zero-size box around a single point.
    pub fn from_point(p: Point) -> Self {
        Self::new(p.0, p.1, p.0, p.1)
    }

    /// Bounds of a ring; invalid for an empty ring.
    pub fn from_ring(ring: &[Point]) -> Self {
        let mut iter = ring.iter();
        let Some(&first) = iter.next() else {
            return Self::invalid();
        };
        let mut result = Self::from_point(first);
        for &p in iter {
            result.add_point(p);
        }
        result
    }

    /// Bounds of several rings; invalid if all are empty.
    pub fn from_rings<'a>(rings: impl IntoIterator<Item = &'a Ring>) -> Self {
        let mut result = Self::invalid();
        for ring in rings {
            result.merge(&Self::from_ring(ring));
        }
        result
    }

    /// Returns true unless this is the empty box.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Expands this box to the union with `other`. No-op if `other` is invalid.
    pub fn merge(&mut self, other: &BoundingBox) {
        if !other.valid {
            return;
        }
        if !self.valid {
            *self = *other;
            return;
        }
        self.min_x = self.min_x.min(other.min_x);
        self.min_y = self.min_y.min(other.min_y);
        self.max_x = self.max_x.max(other.max_x);
        self.max_y = self.max_y.max(other.max_y);
    }

    /// Expands this box to include `p`. No-op if this box is invalid.
    pub fn add_point(&mut self, p: Point) {
        if !self.valid {
            return;
        }
        self.min_x = self.min_x.min(p.0);
        self.min_y = self.min_y.min(p.1);
        self.max_x = self.max_x.max(p.0);
        self.max_y = self.max_y.max(p.1);
    }

    /// Returns a copy grown by `margin` on every side.
    pub fn dilated(&self, margin: f64) -> Self {
        if !self.valid {
            return *self;
        }
        Self::new(
            self.min_x - margin,
            self.min_y - margin,
            self.max_x + margin,
            self.max_y + margin,
        )
    }

    /// Midpoint of the extents.
    pub fn center(&self) -> Point {
        (
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Horizontal extent.
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Vertical extent.
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// `max(width, height)`, used to derive scale-dependent tolerances.
    pub fn max_extent(&self) -> f64 {
        self.width().max(self.height())
    }

    /// Returns true if both boxes are valid and overlap (touching counts).
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.valid
            && other.valid
            && self.min_x <= other.max_x
            && other.min_x <= self.max_x
            && self.min_y <= other.max_y
            && other.min_y <= self.max_y
    }

    /// Returns the corners as `([min_x, min_y], [max_x, max_y])`.
    pub fn corners(&self) -> ([f64; 2], [f64; 2]) {
        ([self.min_x, self.min_y], [self.max_x, self.max_y])
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::invalid()
    }
}
