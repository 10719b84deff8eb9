//! # U-Layering Core
//!
//! Core types shared by the U-Layering shape partitioning engine.
//!
//! U-Layering turns a z-ordered list of colored vector shapes into a flat,
//! non-overlapping, per-color partition of the plane plus an overall
//! silhouette, ready for multi-material layered fabrication.
//!
//! ## Core Components
//!
//! - **Geometry primitives**: [`Point`], [`Ring`], [`BoundingBox`], orientation
//!   and point-in-ring tests, precision truncation
//! - **Shapes**: [`Shape`] - a contour with holes and a color tag
//! - **Configuration**: [`LayeringConfig`], [`BasePlateShape`]
//! - **Errors**: [`Error`], [`Result`]
//!
//! ## Configuration
//!
//! ```rust
//! use u_layering_core::{BasePlateShape, LayeringConfig};
//!
//! let config = LayeringConfig::new()
//!     .with_precision(2)
//!     .with_object_width(120.0)
//!     .with_base_buffer(4.0)
//!     .with_base_plate(BasePlateShape::Rectangular);
//! assert!(config.validate().is_ok());
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization/deserialization support

pub mod config;
pub mod error;
pub mod geometry;
pub mod shape;

// Re-exports
pub use config::{BasePlateShape, LayeringConfig};
pub use error::{Error, Result};
pub use geometry::{
    contains_point, distance, is_closed, is_clockwise, orientation_sum, truncate, BoundingBox,
    Point, Ring,
};
pub use shape::{bounds_of_shapes, Shape, BASE_COLOR};
