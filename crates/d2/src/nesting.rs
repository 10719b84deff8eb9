//! Polygon nesting classifier.
//!
//! Builds a containment tree from an unordered bag of closed rings and
//! flattens it into shapes with holes. Depth encodes meaning: depth 1 is a
//! contour, depth 2 a hole, depth 3 an island inside a hole (a new contour),
//! and so on.
//!
//! The tree is an arena of nodes addressed by index. Every node keeps a
//! [`SpatialIndex`] over its immediate children's bounds, used as the broad
//! phase of the containment tests. Only the first vertex of a ring takes part
//! in the narrow phase, so insertion order does not change the final tree.

use crate::spatial_index::SpatialIndex;
use u_layering_core::{contains_point, is_clockwise, is_closed, BoundingBox, Ring, Shape};

type NodeId = usize;

const ROOT: NodeId = 0;

#[derive(Debug)]
struct Node {
    ring: Option<Ring>,
    bounds: BoundingBox,
    children: Vec<NodeId>,
    child_index: SpatialIndex<NodeId>,
}

impl Node {
    fn new(ring: Option<Ring>, bounds: BoundingBox) -> Self {
        Self {
            ring,
            bounds,
            children: Vec::new(),
            child_index: SpatialIndex::new(),
        }
    }
}

/// Containment tree of rings sharing one color.
#[derive(Debug)]
pub struct ContainmentTree {
    color: String,
    nodes: Vec<Node>,
}

impl ContainmentTree {
    /// Creates a tree holding only the synthetic root.
    pub fn new(color: impl Into<String>) -> Self {
        Self {
            color: color.into(),
            nodes: vec![Node::new(None, BoundingBox::invalid())],
        }
    }

    /// Returns the color given to every flattened shape.
    pub fn color(&self) -> &str {
        &self.color
    }

    /// Number of rings in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len() - 1
    }

    /// Returns true if no ring was added.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Nesting depth of the deepest ring (0 for an empty tree).
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(ROOT, 0usize)];
        while let Some((id, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            stack.extend(self.nodes[id].children.iter().map(|&c| (c, depth + 1)));
        }
        deepest
    }

    /// Inserts a ring at its place in the hierarchy. Empty rings are ignored.
    ///
    /// Starting from the root, the ring descends into the first candidate
    /// child containing its first vertex. If none does, the candidates whose
    /// first vertex lies inside the new ring become its children. Otherwise
    /// it is appended as a sibling.
    pub fn add_polygon(&mut self, ring: Ring) {
        let Some(&first) = ring.first() else {
            return;
        };
        let bounds = BoundingBox::from_ring(&ring);

        let mut parent = ROOT;
        'descend: loop {
            let candidates: Vec<NodeId> = self.nodes[parent]
                .child_index
                .search(&bounds)
                .into_iter()
                .filter_map(|h| self.nodes[parent].child_index.get(h).copied())
                .collect();

            for &child in &candidates {
                if contains_point(self.ring_of(child), first) {
                    parent = child;
                    continue 'descend;
                }
            }

            let enclosed: Vec<NodeId> = candidates
                .into_iter()
                .filter(|&child| {
                    self.ring_of(child)
                        .first()
                        .is_some_and(|&p| contains_point(&ring, p))
                })
                .collect();

            let id = self.nodes.len();
            self.nodes.push(Node::new(Some(ring), bounds));

            if enclosed.is_empty() {
                self.nodes[parent].children.push(id);
                self.nodes[parent].child_index.insert(bounds, id);
            } else {
                self.nodes[id].children = enclosed.clone();
                self.rebuild_child_index(id);
                self.nodes[parent]
                    .children
                    .retain(|child| !enclosed.contains(child));
                self.nodes[parent].children.push(id);
                self.rebuild_child_index(parent);
            }
            return;
        }
    }

    fn ring_of(&self, id: NodeId) -> &[(f64, f64)] {
        self.nodes[id].ring.as_deref().unwrap_or(&[])
    }

    fn rebuild_child_index(&mut self, id: NodeId) {
        let mut index = SpatialIndex::new();
        for &child in &self.nodes[id].children {
            index.insert(self.nodes[child].bounds, child);
        }
        self.nodes[id].child_index = index;
    }

    /// Flattens the tree into shapes.
    ///
    /// Each depth-1 ring becomes a clockwise contour whose depth-2 children
    /// are its counter-clockwise holes; deeper rings are flattened the same
    /// way into additional shapes of the same color.
    pub fn flatten(mut self) -> Vec<Shape> {
        let mut shapes = Vec::new();
        let mut pending = vec![ROOT];
        while let Some(container) = pending.pop() {
            let contours = self.nodes[container].children.clone();
            for contour_id in contours {
                let mut contour = self.nodes[contour_id].ring.take().unwrap_or_default();
                if !is_clockwise(&contour) {
                    contour.reverse();
                }

                let hole_ids = self.nodes[contour_id].children.clone();
                let mut holes = Vec::with_capacity(hole_ids.len());
                for &hole_id in &hole_ids {
                    let mut hole = self.nodes[hole_id].ring.take().unwrap_or_default();
                    if is_clockwise(&hole) {
                        hole.reverse();
                    }
                    holes.push(hole);
                }

                shapes.push(Shape::new(contour, holes, self.color.clone()));
                // islands inside holes come after their enclosing shape
                pending.extend(hole_ids.into_iter().rev());
            }
        }
        shapes
    }
}

/// Classifies rings into shapes of one color.
///
/// Unless `ignore_non_polygons` is set, rings that are not closed are skipped.
pub fn split_into_shapes(
    rings: impl IntoIterator<Item = Ring>,
    color: &str,
    ignore_non_polygons: bool,
) -> Vec<Shape> {
    let mut tree = ContainmentTree::new(color);
    let mut skipped = 0usize;
    for ring in rings {
        if ignore_non_polygons || is_closed(&ring) {
            tree.add_polygon(ring);
        } else {
            skipped += 1;
        }
    }
    if skipped > 0 {
        log::warn!(
            "Skipped {} open ring(s) while classifying color '{}'",
            skipped,
            color
        );
    }
    tree.flatten()
}

/// Classifies groups of rings (contour followed by holes) into shapes.
///
/// Grouping is not trusted: every ring is classified on its own, exactly as
/// [`split_into_shapes`] does for a flat list.
pub fn split_groups_into_shapes(
    groups: impl IntoIterator<Item = Vec<Ring>>,
    color: &str,
    ignore_non_polygons: bool,
) -> Vec<Shape> {
    split_into_shapes(groups.into_iter().flatten(), color, ignore_non_polygons)
}
