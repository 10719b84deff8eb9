//! Region accumulator: incremental per-color union and difference.
//!
//! A [`RegionAccumulator`] holds mutually disjoint shape fragments in a
//! [`SpatialIndex`]. Every boolean call is restricted to the fragments whose
//! bounds overlap the incoming shape, which keeps the cost of an insertion
//! independent of the total number of fragments.

use crate::boolean::{PolygonClipper, ShapeBooleanExt};
use crate::spatial_index::SpatialIndex;
use u_layering_core::{Result, Shape};

/// Disjoint fragments of one color.
#[derive(Debug, Clone, Default)]
pub struct RegionAccumulator {
    color: Option<String>,
    regions: SpatialIndex<Shape>,
}

impl RegionAccumulator {
    /// Creates an empty accumulator. Its color is taken from the first inserted shape.
    pub fn new() -> Self {
        Self::default()
    }

    /// Color of the accumulated fragments, once known.
    pub fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }

    /// Number of fragments held.
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// Returns true if no fragment is held.
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Merges `shape` into the held fragments.
    ///
    /// Fragments overlapping the shape's bounds are replaced by their union
    /// with the shape, which takes the accumulator's color. A shape touching
    /// nothing is stored unchanged.
    pub fn add(&mut self, shape: &Shape, clipper: &dyn PolygonClipper) -> Result<()> {
        let bounds = shape.bounds();
        let hits = self.regions.search(&bounds);

        if hits.is_empty() {
            if self.color.is_none() {
                self.color = Some(shape.color().to_string());
            }
            self.regions.insert(bounds, shape.clone());
            return Ok(());
        }

        let color = self
            .color
            .clone()
            .unwrap_or_else(|| shape.color().to_string());
        let merged = {
            let overlapping: Vec<&Shape> =
                hits.iter().filter_map(|&h| self.regions.get(h)).collect();
            shape.union_with(&overlapping, &color, clipper)?
        };

        for h in hits {
            self.regions.remove(h);
        }
        for fragment in merged {
            self.regions.insert(fragment.bounds(), fragment);
        }
        Ok(())
    }

    /// Merges every shape of `shapes`.
    pub fn add_list(&mut self, shapes: &[Shape], clipper: &dyn PolygonClipper) -> Result<()> {
        for shape in shapes {
            self.add(shape, clipper)?;
        }
        Ok(())
    }

    /// Returns the parts of `shape` not covered by the held fragments.
    ///
    /// Zero fragments means the shape is fully covered; a shape touching no
    /// fragment comes back unchanged.
    pub fn crop(&self, shape: Shape, clipper: &dyn PolygonClipper) -> Result<Vec<Shape>> {
        let hits = self.regions.search(&shape.bounds());
        if hits.is_empty() {
            return Ok(vec![shape]);
        }
        let overlapping: Vec<&Shape> = hits.iter().filter_map(|&h| self.regions.get(h)).collect();
        shape.difference_with(&overlapping, clipper)
    }

    /// Crops every shape of `shapes`, concatenating the surviving fragments.
    pub fn crop_list(
        &self,
        shapes: Vec<Shape>,
        clipper: &dyn PolygonClipper,
    ) -> Result<Vec<Shape>> {
        let mut result = Vec::with_capacity(shapes.len());
        for shape in shapes {
            result.extend(self.crop(shape, clipper)?);
        }
        Ok(result)
    }

    /// Iterates over the held fragments in insertion order.
    pub fn shapes(&self) -> impl Iterator<Item = &Shape> {
        self.regions.iter().map(|(_, shape)| shape)
    }

    /// Consumes the accumulator, returning its fragments in insertion order.
    pub fn into_shapes(self) -> Vec<Shape> {
        self.regions.into_payloads()
    }

    /// Total area of the held fragments.
    pub fn area(&self) -> f64 {
        self.shapes().map(Shape::area).sum()
    }
}
