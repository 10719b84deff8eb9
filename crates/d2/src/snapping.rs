//! Vertex snapping (T-junction repair).
//!
//! Independently computed region boundaries that should share an edge may
//! end up with different vertex sets along it, leaving slivers once the
//! shapes are fabricated. The snapping pass indexes every vertex of every
//! ring and splices into each segment the vertices lying on it.

use crate::spatial_index::SpatialIndex;
use u_layering_core::{distance, BoundingBox, Point, Ring, Shape};

/// Snapping tolerance for a coordinate precision at a physical scale:
/// `10^-(precision * scale + 2)`.
///
/// A negative (disabled) precision is treated as zero digits.
pub fn snap_epsilon(precision: i32, scale: f64) -> f64 {
    0.1f64.powf(precision.max(0) as f64 * scale + 2.0)
}

/// Index over the vertices of a set of shapes.
#[derive(Debug, Clone)]
pub struct VertexSnapper {
    points: SpatialIndex<Point>,
    epsilon: f64,
    dilation: f64,
}

impl VertexSnapper {
    /// Creates an empty snapper. Segment queries are dilated by `10 * epsilon`.
    pub fn new(epsilon: f64) -> Self {
        Self {
            points: SpatialIndex::new(),
            epsilon,
            dilation: epsilon * 10.0,
        }
    }

    /// Creates a snapper indexing every vertex of `shapes`.
    pub fn from_shapes<'a>(shapes: impl IntoIterator<Item = &'a Shape>, epsilon: f64) -> Self {
        let mut snapper = Self::new(epsilon);
        for shape in shapes {
            snapper.insert_shape(shape);
        }
        snapper
    }

    /// Tolerance used for distances and segment lengths.
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Number of indexed vertices.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns true if no vertex is indexed.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Indexes every vertex of every ring of `shape`.
    pub fn insert_shape(&mut self, shape: &Shape) {
        for ring in shape.rings() {
            self.insert_ring(ring);
        }
    }

    /// Indexes every vertex of `ring`.
    pub fn insert_ring(&mut self, ring: &[Point]) {
        for &p in ring {
            self.points.insert(BoundingBox::from_point(p), p);
        }
    }

    /// Returns `ring` with indexed vertices spliced into the segments they lie on.
    ///
    /// A vertex is accepted when its distance to the segment is below epsilon
    /// and its projection falls strictly between the endpoints. Segments
    /// shorter than epsilon are left alone.
    pub fn snap_ring(&self, ring: &[Point]) -> Ring {
        if ring.len() <= 1 {
            return ring.to_vec();
        }

        let mut result = Vec::with_capacity(ring.len());
        result.push(ring[0]);
        for segment in ring.windows(2) {
            let (a, b) = (segment[0], segment[1]);
            result.extend(self.points_on_segment(a, b));
            result.push(b);
        }
        result
    }

    fn points_on_segment(&self, a: Point, b: Point) -> Vec<Point> {
        let length = distance(a, b);
        if length < self.epsilon {
            return Vec::new();
        }

        let mut query = BoundingBox::from_point(a);
        query.add_point(b);
        let query = query.dilated(self.dilation);

        let (dx, dy) = (b.0 - a.0, b.1 - a.1);
        let length_sq = length * length;
        let mut inside: Vec<(f64, Point)> = self
            .points
            .search(&query)
            .into_iter()
            .filter_map(|h| self.points.get(h).copied())
            .filter_map(|c| {
                let t = ((c.0 - a.0) * dx + (c.1 - a.1) * dy) / length_sq;
                if t <= 0.0 || t >= 1.0 {
                    return None;
                }
                let projected = (a.0 + t * dx, a.1 + t * dy);
                (distance(c, projected) < self.epsilon).then_some((t, c))
            })
            .collect();

        inside.sort_by(|x, y| x.0.total_cmp(&y.0));
        inside.dedup_by(|x, y| x.0 == y.0);
        inside.into_iter().map(|(_, p)| p).collect()
    }

    /// Snaps every ring of `shape` in place. Returns the number of vertices added.
    pub fn snap_shape(&self, shape: &mut Shape) -> usize {
        let mut added = 0;
        for ring in shape.rings_mut() {
            let snapped = self.snap_ring(ring);
            added += snapped.len() - ring.len();
            *ring = snapped;
        }
        added
    }
}

/// Runs the snapping pass over shapes and silhouette, both contributing vertices.
///
/// Returns the number of vertices added.
pub fn snap_shared_vertices(shapes: &mut [Shape], silhouette: &mut [Shape], epsilon: f64) -> usize {
    let snapper = VertexSnapper::from_shapes(shapes.iter().chain(silhouette.iter()), epsilon);
    let added: usize = shapes
        .iter_mut()
        .chain(silhouette.iter_mut())
        .map(|shape| snapper.snap_shape(shape))
        .sum();
    log::debug!(
        "Snapping indexed {} vertices, added {}",
        snapper.len(),
        added
    );
    added
}
