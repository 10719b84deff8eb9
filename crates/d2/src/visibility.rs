//! Visibility resolver.
//!
//! Turns a z-ordered shape list (last = topmost) into disjoint per-color
//! regions and a color-agnostic silhouette. Shapes are visited from the top
//! down; each one is cropped by every other color's region seen so far, then
//! merged into its own color's region and into the silhouette.

use crate::boolean::PolygonClipper;
use crate::region::RegionAccumulator;
use u_layering_core::{Result, Shape};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Occlusion-resolved output of [`resolve_visibility`].
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Partition {
    /// Visible fragments, grouped by color in first-seen (topmost first) order.
    pub shapes: Vec<Shape>,
    /// Union of all visible fragments regardless of color.
    pub silhouette: Vec<Shape>,
}

/// Per-color region accumulators plus the silhouette.
///
/// Colors are kept in first-seen order so the output ordering is reproducible.
#[derive(Debug, Default)]
pub struct VisibilityResolver {
    regions: Vec<(String, RegionAccumulator)>,
    silhouette: RegionAccumulator,
}

impl VisibilityResolver {
    /// Creates an empty resolver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct colors seen so far.
    pub fn color_count(&self) -> usize {
        self.regions.len()
    }

    /// Adds a shape below everything pushed before it.
    pub fn push_below(&mut self, shape: Shape, clipper: &dyn PolygonClipper) -> Result<()> {
        let color = shape.color().to_string();
        let mut fragments = vec![shape];

        for (region_color, region) in &self.regions {
            if fragments.is_empty() {
                break;
            }
            if *region_color != color {
                fragments = region.crop_list(fragments, clipper)?;
            }
        }

        let slot = match self.regions.iter().position(|(c, _)| *c == color) {
            Some(slot) => slot,
            None => {
                self.regions.push((color, RegionAccumulator::new()));
                self.regions.len() - 1
            }
        };
        self.regions[slot].1.add_list(&fragments, clipper)?;
        self.silhouette.add_list(&fragments, clipper)?;
        Ok(())
    }

    /// Consumes the resolver, returning the partition.
    pub fn finish(self) -> Partition {
        let shapes = self
            .regions
            .into_iter()
            .flat_map(|(_, region)| region.into_shapes())
            .collect();
        Partition {
            shapes,
            silhouette: self.silhouette.into_shapes(),
        }
    }
}

/// Resolves occlusion for `shapes`, ordered bottom to top.
pub fn resolve_visibility(shapes: Vec<Shape>, clipper: &dyn PolygonClipper) -> Result<Partition> {
    let mut resolver = VisibilityResolver::new();
    let total = shapes.len();
    for shape in shapes.into_iter().rev() {
        resolver.push_below(shape, clipper)?;
    }
    let partition = resolver.finish();
    log::debug!(
        "Visibility resolved {} shape(s) into {} fragment(s), silhouette of {}",
        total,
        partition.shapes.len(),
        partition.silhouette.len()
    );
    Ok(partition)
}
