//! `Element<D>`: a leaf region of a block and its Direction→neighbors table.
//!
//! An element's neighbor table maps each internal face direction to the
//! *set* of abutting elements on the other side, together with the
//! orientation reconciling the two frames. The set has one entry at a
//! conforming interface and several when the neighbor side is refined more
//! finely. All containers are ordered (`BTreeMap`/`BTreeSet`) so that a
//! recomputed table is bit-identical to the original; nothing downstream
//! may observe iteration-order nondeterminism.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::topology::direction::Direction;
use crate::topology::element_id::ElementId;
use crate::topology::orientation::OrientationMap;

/// The elements abutting one face, with the orientation into their frame.
///
/// Every element behind one face of a block shares the block-level
/// orientation, so a single map serves the whole set.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Neighbors<const D: usize> {
    ids: BTreeSet<ElementId<D>>,
    orientation: OrientationMap<D>,
}

impl<const D: usize> Neighbors<D> {
    pub fn new(ids: BTreeSet<ElementId<D>>, orientation: OrientationMap<D>) -> Self {
        Self { ids, orientation }
    }

    #[inline]
    pub fn ids(&self) -> &BTreeSet<ElementId<D>> {
        &self.ids
    }

    /// Orientation from the host element's frame into the neighbors' frame.
    #[inline]
    pub fn orientation(&self) -> &OrientationMap<D> {
        &self.orientation
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl<const D: usize> fmt::Debug for Neighbors<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Neighbors(orientation={}, ids={:?})", self.orientation, self.ids)
    }
}

/// One leaf element: the unit of parallel work.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element<const D: usize> {
    id: ElementId<D>,
    neighbors: BTreeMap<Direction<D>, Neighbors<D>>,
    external_boundaries: BTreeSet<Direction<D>>,
}

impl<const D: usize> Element<D> {
    /// Creates an element; directions absent from `neighbors` become
    /// external boundaries.
    pub fn new(id: ElementId<D>, neighbors: BTreeMap<Direction<D>, Neighbors<D>>) -> Self {
        let external_boundaries = Direction::all_directions()
            .filter(|direction| !neighbors.contains_key(direction))
            .collect();
        Self {
            id,
            neighbors,
            external_boundaries,
        }
    }

    #[inline]
    pub fn id(&self) -> &ElementId<D> {
        &self.id
    }

    #[inline]
    pub fn neighbors(&self) -> &BTreeMap<Direction<D>, Neighbors<D>> {
        &self.neighbors
    }

    #[inline]
    pub fn external_boundaries(&self) -> &BTreeSet<Direction<D>> {
        &self.external_boundaries
    }

    /// Total number of abutting elements over all faces.
    pub fn number_of_neighbors(&self) -> usize {
        self.neighbors.values().map(Neighbors::len).sum()
    }
}

impl<const D: usize> fmt::Debug for Element<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Element({}, neighbors={:?})", self.id, self.neighbors)
    }
}
