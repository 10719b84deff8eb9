//! Spatial indexing of bounding boxes using R*-tree.
//!
//! [`SpatialIndex`] stores arbitrary payloads keyed by their bounding box and
//! serves as the broad phase of every geometric query in the engine: shape
//! fragments in region accumulators, child rings in the containment tree, and
//! individual vertices in the snapping pass.
//!
//! Payloads live in an ordered map keyed by [`IndexHandle`]; the R*-tree only
//! carries handles and envelopes. Handles are never reused, so a handle
//! removed while iterating a search result can be skipped safely.

use rstar::{RTree, RTreeObject, AABB};
use std::collections::BTreeMap;
use u_layering_core::BoundingBox;

/// Stable identifier of an entry in a [`SpatialIndex`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IndexHandle(usize);

impl IndexHandle {
    /// Position of the entry in insertion order.
    pub fn position(self) -> usize {
        self.0
    }
}

/// An envelope stored in the R*-tree.
#[derive(Debug, Clone, PartialEq)]
struct IndexedBox {
    handle: IndexHandle,
    min: [f64; 2],
    max: [f64; 2],
}

impl IndexedBox {
    fn new(handle: IndexHandle, bounds: &BoundingBox) -> Self {
        let (min, max) = bounds.corners();
        Self { handle, min, max }
    }
}

impl RTreeObject for IndexedBox {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(self.min, self.max)
    }
}

#[derive(Debug, Clone)]
struct Slot<P> {
    bounds: BoundingBox,
    payload: P,
}

/// 2D box index carrying one payload per entry.
///
/// Removed entries are dropped from `slots` right away, so storage tracks
/// the live entries only.
#[derive(Debug, Clone)]
pub struct SpatialIndex<P> {
    tree: RTree<IndexedBox>,
    slots: BTreeMap<IndexHandle, Slot<P>>,
    next: usize,
}

impl<P> SpatialIndex<P> {
    /// Creates a new empty spatial index.
    pub fn new() -> Self {
        Self {
            tree: RTree::new(),
            slots: BTreeMap::new(),
            next: 0,
        }
    }

    /// Inserts a payload with its bounds.
    ///
    /// Entries with invalid bounds are stored (and returned by [`iter`](Self::iter))
    /// but never match a search.
    pub fn insert(&mut self, bounds: BoundingBox, payload: P) -> IndexHandle {
        let handle = IndexHandle(self.next);
        self.next += 1;
        if bounds.is_valid() {
            self.tree.insert(IndexedBox::new(handle, &bounds));
        }
        self.slots.insert(handle, Slot { bounds, payload });
        handle
    }

    /// Removes an entry, returning its payload. Returns `None` if already removed.
    pub fn remove(&mut self, handle: IndexHandle) -> Option<P> {
        let slot = self.slots.remove(&handle)?;
        if slot.bounds.is_valid() {
            self.tree.remove(&IndexedBox::new(handle, &slot.bounds));
        }
        Some(slot.payload)
    }

    /// Returns the payload of a live entry.
    pub fn get(&self, handle: IndexHandle) -> Option<&P> {
        self.slots.get(&handle).map(|slot| &slot.payload)
    }

    /// Returns the bounds of a live entry.
    pub fn bounds(&self, handle: IndexHandle) -> Option<BoundingBox> {
        self.slots.get(&handle).map(|slot| slot.bounds)
    }

    /// Finds all entries whose bounding boxes intersect `query` (touching counts).
    ///
    /// Handles are returned in insertion order so that callers iterating the
    /// result behave deterministically.
    pub fn search(&self, query: &BoundingBox) -> Vec<IndexHandle> {
        if !query.is_valid() {
            return Vec::new();
        }
        let (min, max) = query.corners();
        let envelope = AABB::from_corners(min, max);
        let mut handles: Vec<IndexHandle> = self
            .tree
            .locate_in_envelope_intersecting(&envelope)
            .map(|entry| entry.handle)
            .collect();
        handles.sort_unstable();
        handles
    }

    /// Returns the number of live entries.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns true if the index holds no live entries.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Clears all entries. Handles issued before the call no longer resolve.
    pub fn clear(&mut self) {
        self.tree = RTree::new();
        self.slots.clear();
    }

    /// Iterates over live entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (IndexHandle, &P)> {
        self.slots.iter().map(|(&handle, slot)| (handle, &slot.payload))
    }

    /// Consumes the index, returning live payloads in insertion order.
    pub fn into_payloads(self) -> Vec<P> {
        self.slots.into_values().map(|slot| slot.payload).collect()
    }
}

impl<P> Default for SpatialIndex<P> {
    fn default() -> Self {
        Self::new()
    }
}
