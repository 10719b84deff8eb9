//! Layering pipeline.
//!
//! [`Layering`] holds the z-ordered colored inputs and the configuration;
//! [`Layering::run`] performs the whole batch and returns an immutable
//! [`LayeringResult`]:
//!
//! 1. classify each input's rings into shapes (and apply its clip, if any)
//! 2. truncate to a precision adapted to the physical scale
//! 3. optionally put a base plate under everything
//! 4. resolve visibility into disjoint per-color regions and a silhouette
//! 5. rescale and center to the target width
//! 6. snap shared vertices
//! 7. truncate to the final precision

use crate::base_plate::build_base_plate;
use crate::boolean::{OverlayClipper, PolygonClipper, ShapeBooleanExt};
use crate::nesting::split_into_shapes;
use crate::region::RegionAccumulator;
use crate::snapping::{snap_epsilon, snap_shared_vertices};
use crate::visibility::{resolve_visibility, Partition};
use std::collections::BTreeMap;
use u_layering_core::{
    bounds_of_shapes, BoundingBox, Error, LayeringConfig, Result, Ring, Shape, BASE_COLOR,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One colored input: a bag of rings with a stacking position.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ShapeInput {
    /// Rings in any order; containment decides contours and holes.
    pub rings: Vec<Ring>,
    /// Color tag given to every resulting shape.
    pub color: String,
    /// Stacking position; higher is drawn on top.
    pub z_order: i32,
    /// Optional clip region; only the part of the input inside it is kept.
    pub clip: Option<Vec<Ring>>,
    /// Classify rings even if they are not closed.
    pub allow_open_rings: bool,
}

impl ShapeInput {
    /// Creates an empty input of the given color.
    pub fn new(color: impl Into<String>) -> Self {
        Self {
            rings: Vec::new(),
            color: color.into(),
            z_order: 0,
            clip: None,
            allow_open_rings: false,
        }
    }

    /// Adds a ring.
    pub fn with_ring(mut self, ring: Ring) -> Self {
        self.rings.push(ring);
        self
    }

    /// Adds several rings.
    pub fn with_rings(mut self, rings: impl IntoIterator<Item = Ring>) -> Self {
        self.rings.extend(rings);
        self
    }

    /// Sets the stacking position.
    pub fn with_z_order(mut self, z_order: i32) -> Self {
        self.z_order = z_order;
        self
    }

    /// Restricts the input to the region bounded by `rings`.
    pub fn with_clip(mut self, rings: Vec<Ring>) -> Self {
        self.clip = Some(rings);
        self
    }

    /// Sets whether open rings are classified instead of skipped.
    pub fn with_open_rings(mut self, allow: bool) -> Self {
        self.allow_open_rings = allow;
        self
    }

    fn classify(&self, clipper: &dyn PolygonClipper) -> Result<Vec<Shape>> {
        let shapes = split_into_shapes(
            self.rings.iter().cloned(),
            &self.color,
            self.allow_open_rings,
        );
        let Some(clip) = &self.clip else {
            return Ok(shapes);
        };

        // overlapping clip rings are fused first so the even-odd overlay sees disjoint regions
        let mut region = RegionAccumulator::new();
        region.add_list(
            &split_into_shapes(clip.iter().cloned(), &self.color, true),
            clipper,
        )?;
        if region.is_empty() {
            return Ok(Vec::new());
        }
        let clip_shapes: Vec<&Shape> = region.shapes().collect();

        let mut result = Vec::with_capacity(shapes.len());
        for shape in &shapes {
            result.extend(shape.intersection_with(&clip_shapes, clipper)?);
        }
        Ok(result)
    }
}

/// Output of a layering run.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LayeringResult {
    shapes: Vec<Shape>,
    silhouette: Vec<Shape>,
    scale: f64,
    bounds: BoundingBox,
    depths: BTreeMap<String, f64>,
}

impl LayeringResult {
    /// Disjoint colored shapes, grouped by color.
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    /// Number of shapes.
    pub fn count(&self) -> usize {
        self.shapes.len()
    }

    /// Color of each shape, in shape order.
    pub fn colors(&self) -> Vec<&str> {
        self.shapes.iter().map(Shape::color).collect()
    }

    /// Distinct colors in first-seen order, without the base plate.
    pub fn palette(&self) -> Vec<&str> {
        let mut palette: Vec<&str> = Vec::new();
        for color in self.shapes.iter().map(Shape::color) {
            if color != BASE_COLOR && !palette.contains(&color) {
                palette.push(color);
            }
        }
        palette
    }

    /// Union of all shapes regardless of color.
    pub fn silhouette(&self) -> &[Shape] {
        &self.silhouette
    }

    /// Per-color extrusion depth.
    pub fn depths(&self) -> &BTreeMap<String, f64> {
        &self.depths
    }

    /// Bounds of the final shapes.
    pub fn bounds(&self) -> BoundingBox {
        self.bounds
    }

    /// Physical units per document unit, 0 when nothing was produced.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Returns true if a base plate is part of the output.
    pub fn has_base_plate(&self) -> bool {
        self.shapes.iter().any(Shape::is_base)
    }

    /// Returns true if no shape was produced.
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

/// Layering run: inputs plus configuration.
#[derive(Debug, Clone, Default)]
pub struct Layering {
    inputs: Vec<ShapeInput>,
    config: LayeringConfig,
}

impl Layering {
    /// Creates a run over `inputs`.
    pub fn new(inputs: Vec<ShapeInput>, config: LayeringConfig) -> Self {
        Self { inputs, config }
    }

    /// Appends an input.
    pub fn add(&mut self, input: ShapeInput) {
        self.inputs.push(input);
    }

    /// Appends an input (builder form).
    pub fn with_input(mut self, input: ShapeInput) -> Self {
        self.add(input);
        self
    }

    /// Returns the inputs in insertion order.
    pub fn inputs(&self) -> &[ShapeInput] {
        &self.inputs
    }

    /// Returns the configuration.
    pub fn config(&self) -> &LayeringConfig {
        &self.config
    }

    /// Runs the pipeline with the default [`OverlayClipper`].
    pub fn run_default(&self) -> Result<LayeringResult> {
        self.run(&OverlayClipper)
    }

    /// Runs the whole pipeline.
    pub fn run(&self, clipper: &dyn PolygonClipper) -> Result<LayeringResult> {
        let config = &self.config;
        config.validate()?;

        let mut shapes = self.classify(clipper)?;
        if shapes.is_empty() {
            log::debug!("No shape to layer");
            return Ok(LayeringResult {
                depths: config.color_depths.clone(),
                ..LayeringResult::default()
            });
        }

        let scale = self.scale(&shapes)?;
        if config.truncation_enabled() {
            let adapted = config.precision + scale.log10().floor() as i32;
            log::debug!("Scale {}, working precision {}", scale, adapted);
            adjust_to_precision(&mut shapes, adapted);
        }

        let mut depths = config.color_depths.clone();
        if config.want_base_plate {
            let reference = self.reference_bounds(&shapes);
            shapes.insert(0, build_base_plate(&reference, config)?);
            depths.insert(BASE_COLOR.to_string(), 0.0);
        }

        let Partition {
            mut shapes,
            mut silhouette,
        } = resolve_visibility(shapes, clipper)?;
        if shapes.is_empty() {
            return Ok(LayeringResult {
                scale,
                depths,
                ..LayeringResult::default()
            });
        }

        let bounds = bounds_of_shapes(&shapes);
        if !bounds.width().is_finite() || bounds.width() <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "cannot rescale visible shapes of width {}",
                bounds.width()
            )));
        }
        let ratio = config.target_width() / bounds.width();
        let center = bounds.center();
        for shape in shapes.iter_mut().chain(silhouette.iter_mut()) {
            shape.rescale_and_center(ratio, center);
        }

        let epsilon = snap_epsilon(config.precision, self.scale(&shapes)?);
        snap_shared_vertices(&mut shapes, &mut silhouette, epsilon);

        if config.truncation_enabled() {
            adjust_to_precision(&mut shapes, config.precision);
            adjust_to_precision(&mut silhouette, config.precision);
        }

        let result = LayeringResult {
            bounds: bounds_of_shapes(&shapes),
            shapes,
            silhouette,
            scale,
            depths,
        };
        log::info!(
            "Layering produced {} shape(s) in {} color(s), silhouette of {}",
            result.count(),
            result.palette().len(),
            result.silhouette.len()
        );
        Ok(result)
    }

    /// Classifies every input, stable-sorted by z-order (bottom first).
    fn classify(&self, clipper: &dyn PolygonClipper) -> Result<Vec<Shape>> {
        let mut ordered: Vec<&ShapeInput> = self.inputs.iter().collect();
        ordered.sort_by_key(|input| input.z_order);

        let mut shapes = Vec::new();
        for input in ordered {
            shapes.extend(input.classify(clipper)?);
        }
        log::debug!(
            "Classified {} input(s) into {} shape(s)",
            self.inputs.len(),
            shapes.len()
        );
        Ok(shapes)
    }

    /// Box the physical width maps onto: the viewport, or the shapes when
    /// margins are ignored or no viewport is set.
    fn reference_bounds(&self, shapes: &[Shape]) -> BoundingBox {
        if self.config.ignore_document_margins || !self.config.viewport.is_valid() {
            bounds_of_shapes(shapes)
        } else {
            self.config.viewport
        }
    }

    fn scale(&self, shapes: &[Shape]) -> Result<f64> {
        let width = self.reference_bounds(shapes).width();
        if !width.is_finite() || width <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "cannot derive a scale from a reference width of {}",
                width
            )));
        }
        Ok(self.config.object_width / width)
    }
}

/// Truncates every shape and drops the vertices truncation made redundant.
/// A negative precision leaves coordinates untouched.
fn adjust_to_precision(shapes: &mut [Shape], precision: i32) {
    for shape in shapes.iter_mut() {
        shape.truncate(precision);
        shape.remove_consecutive_duplicates();
    }
}
