//! An axis-aligned lattice of rectilinear blocks.
//!
//! The lattice is described by the block-boundary coordinates along each
//! axis; every cell of the resulting grid becomes one block with the aligned
//! orientation toward each of its lattice neighbors. Individual cells can be
//! excluded (their would-be neighbors gain external boundaries there, and
//! the remaining blocks are renumbered densely), and rectangular regions can
//! override the uniform initial refinement.

use std::collections::BTreeMap;

use itertools::Itertools;

use crate::creators::DomainCreator;
use crate::domain_error::DomainError;
use crate::maps::ProductOfAffineMaps;
use crate::topology::block::{Block, BlockNeighbor};
use crate::topology::direction::{Direction, Side};
use crate::topology::domain::Domain;
use crate::topology::orientation::OrientationMap;

/// A rectangular sub-lattice whose blocks get their own refinement levels.
///
/// Corners are lattice cell indices with a half-open upper bound. When
/// regions overlap, the later one wins.
#[derive(Clone, Debug)]
pub struct RefinementRegion<const D: usize> {
    pub lower_corner: [usize; D],
    pub upper_corner: [usize; D],
    pub refinement: [u8; D],
}

impl<const D: usize> RefinementRegion<D> {
    fn contains(&self, cell: [usize; D]) -> bool {
        (0..D).all(|axis| {
            self.lower_corner[axis] <= cell[axis] && cell[axis] < self.upper_corner[axis]
        })
    }
}

/// Creator for an axis-aligned lattice of blocks.
pub struct Rectilinear<const D: usize> {
    block_bounds: [Vec<f64>; D],
    is_periodic: [bool; D],
    initial_refinement: [u8; D],
    refined_regions: Vec<RefinementRegion<D>>,
    blocks_to_exclude: Vec<[usize; D]>,
}

impl<const D: usize> Rectilinear<D> {
    /// Validates the lattice description.
    ///
    /// Each axis needs at least two strictly increasing boundary
    /// coordinates. Periodic axes cannot be combined with excluded blocks,
    /// and excluded cells and refined regions must lie inside the lattice.
    pub fn new(
        block_bounds: [Vec<f64>; D],
        is_periodic: [bool; D],
        initial_refinement: [u8; D],
        refined_regions: Vec<RefinementRegion<D>>,
        blocks_to_exclude: Vec<[usize; D]>,
    ) -> Result<Self, DomainError> {
        for (axis, bounds) in block_bounds.iter().enumerate() {
            let increasing = bounds.windows(2).all(|pair| pair[0] < pair[1]);
            if bounds.len() < 2 || !increasing {
                return Err(DomainError::InvalidBlockBounds {
                    axis,
                    found: bounds.len(),
                });
            }
        }
        if !blocks_to_exclude.is_empty() && is_periodic.iter().any(|&periodic| periodic) {
            return Err(DomainError::PeriodicWithExcludedBlocks);
        }
        let extents: [usize; D] = core::array::from_fn(|axis| block_bounds[axis].len() - 1);
        for excluded in &blocks_to_exclude {
            if (0..D).any(|axis| excluded[axis] >= extents[axis]) {
                return Err(DomainError::ExcludedBlockOutOfRange {
                    index: format!("{excluded:?}"),
                    extents: format!("{extents:?}"),
                });
            }
        }
        for region in &refined_regions {
            let inside = (0..D).all(|axis| {
                region.lower_corner[axis] <= region.upper_corner[axis]
                    && region.upper_corner[axis] <= extents[axis]
            });
            if !inside {
                return Err(DomainError::RefinementRegionOutOfRange {
                    lower: format!("{:?}", region.lower_corner),
                    upper: format!("{:?}", region.upper_corner),
                    extents: format!("{extents:?}"),
                });
            }
        }
        Ok(Self {
            block_bounds,
            is_periodic,
            initial_refinement,
            refined_regions,
            blocks_to_exclude,
        })
    }

    fn extents(&self) -> [usize; D] {
        core::array::from_fn(|axis| self.block_bounds[axis].len() - 1)
    }

    /// Lattice cells in id order, excluded cells skipped.
    fn included_cells(&self) -> impl Iterator<Item = [usize; D]> + '_ {
        let extents = self.extents();
        (0..D)
            .map(move |axis| 0..extents[axis])
            .multi_cartesian_product()
            .map(|cell| core::array::from_fn(|axis| cell[axis]))
            .filter(move |cell| !self.blocks_to_exclude.contains(cell))
    }

    /// The lattice cell across `direction` from `cell`, accounting for
    /// periodic wraparound. `None` on a non-periodic lattice edge.
    fn adjacent_cell(&self, cell: [usize; D], direction: Direction<D>) -> Option<[usize; D]> {
        let extents = self.extents();
        let axis = direction.axis();
        let mut neighbor = cell;
        match direction.side() {
            Side::Lower => {
                if cell[axis] == 0 {
                    if !self.is_periodic[axis] {
                        return None;
                    }
                    neighbor[axis] = extents[axis] - 1;
                } else {
                    neighbor[axis] -= 1;
                }
            }
            Side::Upper => {
                if cell[axis] + 1 == extents[axis] {
                    if !self.is_periodic[axis] {
                        return None;
                    }
                    neighbor[axis] = 0;
                } else {
                    neighbor[axis] += 1;
                }
            }
        }
        Some(neighbor)
    }
}

impl<const D: usize> DomainCreator<ProductOfAffineMaps<D>, D> for Rectilinear<D> {
    fn create_domain(&self) -> Result<Domain<ProductOfAffineMaps<D>, D>, DomainError> {
        let ids: BTreeMap<[usize; D], usize> = self
            .included_cells()
            .enumerate()
            .map(|(id, cell)| (cell, id))
            .collect();

        let mut blocks = Vec::with_capacity(ids.len());
        for cell in self.included_cells() {
            let mut neighbors = BTreeMap::new();
            for direction in Direction::<D>::all_directions() {
                let Some(adjacent) = self.adjacent_cell(cell, direction) else {
                    continue;
                };
                // An excluded neighbor leaves this face external.
                if let Some(&id) = ids.get(&adjacent) {
                    neighbors.insert(direction, BlockNeighbor::new(id, OrientationMap::aligned()));
                }
            }
            let lower: [f64; D] =
                core::array::from_fn(|axis| self.block_bounds[axis][cell[axis]]);
            let upper: [f64; D] =
                core::array::from_fn(|axis| self.block_bounds[axis][cell[axis] + 1]);
            let map = ProductOfAffineMaps::from_bounds(lower, upper);
            blocks.push(Block::new(map, ids[&cell], neighbors));
        }
        Domain::new(blocks)
    }

    fn initial_refinement_levels(&self) -> Vec<[u8; D]> {
        self.included_cells()
            .map(|cell| {
                let mut levels = self.initial_refinement;
                for region in &self.refined_regions {
                    if region.contains(cell) {
                        levels = region.refinement;
                    }
                }
                levels
            })
            .collect()
    }
}
