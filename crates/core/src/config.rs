//! Layering pipeline configuration.

use crate::geometry::BoundingBox;
use crate::{Error, Result};
use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Outline of a synthesized base plate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BasePlateShape {
    /// The (buffered) reference box.
    #[default]
    Rectangular,
    /// A square around the reference box center, side = max(width, height).
    Squared,
    /// A circle through the corners of the reference box.
    Circular,
}

/// Configuration for a layering run.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LayeringConfig {
    /// Number of decimal digits kept in output coordinates. Negative disables truncation.
    pub precision: i32,

    /// Target physical width of the output (including the plate buffer).
    pub object_width: f64,

    /// Margin added around a synthesized base plate, in physical units.
    pub base_buffer: f64,

    /// Whether to synthesize a base plate under all shapes.
    pub want_base_plate: bool,

    /// Outline of the synthesized base plate.
    pub base_plate_shape: BasePlateShape,

    /// Derive the scale from shape extents instead of the document viewport.
    pub ignore_document_margins: bool,

    /// Document viewport. When invalid, shape extents are used instead.
    pub viewport: BoundingBox,

    /// Per-color extrusion depth, passed through to the result.
    pub color_depths: BTreeMap<String, f64>,
}

impl Default for LayeringConfig {
    fn default() -> Self {
        Self {
            precision: 2,
            object_width: 100.0,
            base_buffer: 0.0,
            want_base_plate: false,
            base_plate_shape: BasePlateShape::default(),
            ignore_document_margins: false,
            viewport: BoundingBox::invalid(),
            color_depths: BTreeMap::new(),
        }
    }
}

impl LayeringConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the output precision (negative disables truncation).
    pub fn with_precision(mut self, precision: i32) -> Self {
        self.precision = precision;
        self
    }

    /// Sets the target physical width.
    pub fn with_object_width(mut self, width: f64) -> Self {
        self.object_width = width;
        self
    }

    /// Sets the base plate buffer.
    pub fn with_base_buffer(mut self, buffer: f64) -> Self {
        self.base_buffer = buffer;
        self
    }

    /// Enables a base plate with the given outline.
    pub fn with_base_plate(mut self, shape: BasePlateShape) -> Self {
        self.want_base_plate = true;
        self.base_plate_shape = shape;
        self
    }

    /// Sets whether document margins are ignored.
    pub fn with_ignore_document_margins(mut self, ignore: bool) -> Self {
        self.ignore_document_margins = ignore;
        self
    }

    /// Sets the document viewport from its four bounds.
    pub fn with_viewport(mut self, min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        self.viewport = BoundingBox::new(min_x, min_y, max_x, max_y);
        self
    }

    /// Sets the extrusion depth of one color.
    pub fn with_color_depth(mut self, color: impl Into<String>, depth: f64) -> Self {
        self.color_depths.insert(color.into(), depth);
        self
    }

    /// Returns true if coordinates are truncated.
    pub fn truncation_enabled(&self) -> bool {
        self.precision >= 0
    }

    /// Width available to the shapes once the plate buffer is removed on both sides.
    pub fn target_width(&self) -> f64 {
        self.object_width - 2.0 * self.base_buffer
    }

    /// Validates the numeric configuration.
    pub fn validate(&self) -> Result<()> {
        if !self.object_width.is_finite() || self.object_width <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "object width must be positive, got {}",
                self.object_width
            )));
        }
        if !self.base_buffer.is_finite() || self.base_buffer < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "base buffer must be non-negative, got {}",
                self.base_buffer
            )));
        }
        if self.target_width() <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "base buffer {} leaves no room in object width {}",
                self.base_buffer, self.object_width
            )));
        }
        Ok(())
    }
}
