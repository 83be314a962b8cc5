//! `ElementId<D>`: a strong handle identifying one leaf element of a block.
//!
//! The id encodes the path from the block root through the per-axis binary
//! subdivision: the owning block, one [`SegmentId`] per logical axis, and a
//! grid index distinguishing successive grids with equal content (AMR
//! generations). Element ids have a total order so they work as stable map
//! and set keys, and they double as the actor address in the boundary
//! exchange layer.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::topology::segment::SegmentId;

/// Identifier of one element: the unit of parallel work.
#[derive(
    Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct ElementId<const D: usize> {
    block_id: usize,
    grid_index: usize,
    #[serde(with = "crate::serde_arrays")]
    segments: [SegmentId; D],
}

impl<const D: usize> ElementId<D> {
    /// Creates the id of the element at `segments` within block `block_id`.
    pub fn new(block_id: usize, segments: [SegmentId; D]) -> Self {
        Self {
            block_id,
            grid_index: 0,
            segments,
        }
    }

    /// The unrefined root element of a block.
    pub fn root(block_id: usize) -> Self {
        Self::new(block_id, [SegmentId::root(); D])
    }

    /// The same element on a later equal-content grid (AMR generation).
    pub fn with_grid_index(mut self, grid_index: usize) -> Self {
        self.grid_index = grid_index;
        self
    }

    #[inline]
    pub fn block_id(self) -> usize {
        self.block_id
    }

    #[inline]
    pub fn grid_index(self) -> usize {
        self.grid_index
    }

    #[inline]
    pub fn segments(&self) -> &[SegmentId; D] {
        &self.segments
    }

    /// The segment along one axis.
    #[inline]
    pub fn segment(self, axis: usize) -> SegmentId {
        self.segments[axis]
    }

    /// The per-axis refinement levels of this element.
    pub fn refinement_levels(self) -> [u8; D] {
        self.segments.map(SegmentId::refinement_level)
    }

    /// A copy of this id with the segment along `axis` replaced.
    pub fn with_segment(mut self, axis: usize, segment: SegmentId) -> Self {
        self.segments[axis] = segment;
        self
    }
}

impl<const D: usize> fmt::Display for ElementId<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[B{}", self.block_id)?;
        for segment in &self.segments {
            write!(f, ",({segment})")?;
        }
        if self.grid_index != 0 {
            write!(f, ";g{}", self.grid_index)?;
        }
        write!(f, "]")
    }
}

impl<const D: usize> fmt::Debug for ElementId<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ElementId<{D}>{self}")
    }
}


#[cfg(test)]
mod layout_tests {
    use super::*;
    use static_assertions::assert_impl_all;

    // ElementId is an actor address: it must stay a small, thread-safe,
    // totally ordered value type.
    assert_impl_all!(ElementId<3>: Copy, Send, Sync, Ord, std::hash::Hash);
    assert_impl_all!(SegmentId: Copy, Send, Sync, Ord);
}
