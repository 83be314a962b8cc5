//! `Domain<M, D>`: the ordered collection of blocks forming the full
//! simulation domain.
//!
//! Construction validates global connectivity eagerly: block ids must be
//! dense in construction order, every neighbor id must be in range, and the
//! neighbor graph must be symmetric, with reciprocal entries carrying
//! inverse orientations. A malformed graph is rejected with the offending
//! block and direction; nothing downstream ever has to re-check adjacency.

use std::fmt;

use crate::domain_error::DomainError;
use crate::topology::block::Block;
use crate::topology::direction::Direction;

/// The full simulation domain: blocks indexed by their dense id.
///
/// Read-only shared state after construction (safe for unsynchronized
/// concurrent reads); the only permitted mutation is injecting
/// time-dependent maps block by block.
#[derive(Clone, Debug, PartialEq)]
pub struct Domain<M, const D: usize> {
    blocks: Vec<Block<M, D>>,
}

impl<M, const D: usize> Domain<M, D> {
    /// Builds a domain from blocks, validating ids and graph symmetry.
    pub fn new(blocks: Vec<Block<M, D>>) -> Result<Self, DomainError> {
        let num_blocks = blocks.len();
        for (position, block) in blocks.iter().enumerate() {
            if block.id() != position {
                return Err(DomainError::BlockIdMismatch {
                    position,
                    id: block.id(),
                });
            }
        }

        for block in &blocks {
            for (&direction, neighbor) in block.neighbors() {
                if neighbor.id() >= num_blocks {
                    return Err(DomainError::NeighborIdOutOfRange {
                        block: block.id(),
                        direction: direction.to_string(),
                        neighbor: neighbor.id(),
                        num_blocks,
                    });
                }

                // The face seen from the neighbor: this block's outgoing
                // direction expressed in the neighbor's frame points *into*
                // the neighbor, so the reciprocal entry sits on its
                // opposite.
                let orientation = neighbor.orientation();
                let expected_direction =
                    orientation.mapped_direction(direction).opposite();
                let Some(reciprocal) =
                    blocks[neighbor.id()].neighbors().get(&expected_direction)
                else {
                    return Err(DomainError::AsymmetricNeighbor {
                        block: block.id(),
                        direction: direction.to_string(),
                        neighbor: neighbor.id(),
                        expected_direction: expected_direction.to_string(),
                    });
                };
                if reciprocal.id() != block.id()
                    || *reciprocal.orientation() != orientation.inverse()
                {
                    return Err(DomainError::NeighborOrientationMismatch {
                        block: block.id(),
                        direction: direction.to_string(),
                        neighbor: neighbor.id(),
                        orientation: orientation.to_string(),
                    });
                }
            }
        }

        log::debug!("validated domain connectivity for {num_blocks} blocks");
        Ok(Self { blocks })
    }

    #[inline]
    pub fn blocks(&self) -> &[Block<M, D>] {
        &self.blocks
    }

    /// The block with the given id.
    pub fn block(&self, id: usize) -> Option<&Block<M, D>> {
        self.blocks.get(id)
    }

    /// Mutable access for the one-time map injection; the block API exposes
    /// no topological mutation, so connectivity stays valid.
    pub fn block_mut(&mut self, id: usize) -> Option<&mut Block<M, D>> {
        self.blocks.get_mut(id)
    }

    #[inline]
    pub fn num_blocks(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Block<M, D>> {
        self.blocks.iter()
    }

    /// Directions of `block` that face the domain exterior.
    pub fn external_boundaries_of(
        &self,
        id: usize,
    ) -> Option<impl Iterator<Item = Direction<D>> + '_> {
        self.block(id)
            .map(|block| block.external_boundaries().iter().copied())
    }
}

impl<M, const D: usize> fmt::Display for Domain<M, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Domain with {} blocks", self.blocks.len())
    }
}
