//! # U-Layering 2D
//!
//! Shape partitioning for layered multi-material fabrication.
//!
//! This crate turns a z-ordered list of colored ring sets into disjoint
//! per-color regions plus a silhouette, rescaled to a physical width and
//! with matching vertices along shared edges.
//!
//! ## Features
//!
//! - Containment classification of unordered rings into shapes with holes
//! - Occlusion resolution from the topmost shape down
//! - Spatially indexed incremental union/difference per color
//! - T-junction repair along shared edges
//! - Optional base plate (rectangular, square or circular)
//!
//! ## Quick Start
//!
//! ```rust
//! use u_layering_d2::{Layering, LayeringConfig, ShapeInput};
//!
//! let square = |x: f64, y: f64, s: f64| {
//!     vec![(x, y), (x + s, y), (x + s, y + s), (x, y + s), (x, y)]
//! };
//!
//! let config = LayeringConfig::new()
//!     .with_precision(2)
//!     .with_object_width(150.0)
//!     .with_ignore_document_margins(true);
//!
//! let result = Layering::new(
//!     vec![
//!         ShapeInput::new("red").with_ring(square(0.0, 0.0, 10.0)),
//!         ShapeInput::new("blue").with_ring(square(5.0, 5.0, 10.0)),
//!     ],
//!     config,
//! )
//! .run_default()
//! .unwrap();
//!
//! assert_eq!(result.palette(), vec!["blue", "red"]);
//! println!("{} shapes, {} silhouette part(s)", result.count(), result.silhouette().len());
//! ```
//!
//! ## Building Blocks
//!
//! ```rust
//! use u_layering_d2::{split_into_shapes, OverlayClipper, RegionAccumulator};
//!
//! let outer = vec![(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0), (0.0, 0.0)];
//! let inner = vec![(3.0, 3.0), (7.0, 3.0), (7.0, 7.0), (3.0, 7.0), (3.0, 3.0)];
//! let shapes = split_into_shapes(vec![outer, inner], "c", false);
//! assert_eq!(shapes[0].holes().len(), 1);
//!
//! let mut region = RegionAccumulator::new();
//! region.add_list(&shapes, &OverlayClipper).unwrap();
//! assert_eq!(region.len(), 1);
//! ```

pub mod base_plate;
pub mod boolean;
pub mod layering;
pub mod nesting;
pub mod region;
pub mod snapping;
pub mod spatial_index;
pub mod visibility;

// Re-exports
pub use base_plate::{build_base_plate, CIRCLE_SEGMENTS};
pub use boolean::{BooleanOp, OverlayClipper, PolygonClipper, ShapeBooleanExt};
pub use layering::{Layering, LayeringResult, ShapeInput};
pub use nesting::{split_groups_into_shapes, split_into_shapes, ContainmentTree};
pub use region::RegionAccumulator;
pub use snapping::{snap_epsilon, snap_shared_vertices, VertexSnapper};
pub use spatial_index::{IndexHandle, SpatialIndex};
pub use u_layering_core::{
    bounds_of_shapes, BasePlateShape, BoundingBox, Error, LayeringConfig, Point, Result, Ring,
    Shape, BASE_COLOR,
};
pub use visibility::{resolve_visibility, Partition, VisibilityResolver};
