//! `Block<M, D>`: one coarse, independently-mapped topological patch of the
//! simulation domain.
//!
//! A block owns its coordinate map(s), its neighbor-by-direction table, and
//! the derived set of directions facing the domain exterior. Whether the
//! block is time-independent (one Logical→Inertial map) or time-dependent
//! (a stationary Logical→Grid map plus a Grid→Inertial map) is a sum type,
//! so the invalid "neither map" state is unrepresentable and wrong-variant
//! accesses are caught by a single `match`.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::domain_error::DomainError;
use crate::maps::ToGridFrame;
use crate::topology::direction::Direction;
use crate::topology::orientation::OrientationMap;

/// The identity and orientation of the block across one face.
#[derive(Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockNeighbor<const D: usize> {
    id: usize,
    orientation: OrientationMap<D>,
}

impl<const D: usize> BlockNeighbor<D> {
    pub fn new(id: usize, orientation: OrientationMap<D>) -> Self {
        Self { id, orientation }
    }

    #[inline]
    pub fn id(&self) -> usize {
        self.id
    }

    /// Orientation from the host block's frame into this neighbor's frame.
    #[inline]
    pub fn orientation(&self) -> &OrientationMap<D> {
        &self.orientation
    }
}

impl<const D: usize> fmt::Debug for BlockNeighbor<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlockNeighbor(id={}, orientation={})", self.id, self.orientation)
    }
}

/// The coordinate-map state of a block.
///
/// A block starts `Stationary` and transitions at most once to `Moving` via
/// [`Block::inject_time_dependent_map`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum BlockMaps<M> {
    /// Time-independent: a single Logical→Inertial map.
    Stationary(M),
    /// Time-dependent: a stationary Logical→Grid map and a time-dependent
    /// Grid→Inertial map.
    Moving {
        logical_to_grid: M,
        grid_to_inertial: M,
    },
}

/// One coarse topological patch of the domain.
///
/// Topologically immutable after construction; the only permitted state
/// change is the one-time `Stationary` → `Moving` map transition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Block<M, const D: usize> {
    id: usize,
    maps: BlockMaps<M>,
    neighbors: BTreeMap<Direction<D>, BlockNeighbor<D>>,
    external_boundaries: BTreeSet<Direction<D>>,
}

impl<M, const D: usize> Block<M, D> {
    /// Creates a time-independent block.
    ///
    /// Directions absent from `neighbors` become external boundaries; the
    /// derived set is frozen here, which is sound because the neighbor table
    /// can never change afterwards.
    pub fn new(
        stationary_map: M,
        id: usize,
        neighbors: BTreeMap<Direction<D>, BlockNeighbor<D>>,
    ) -> Self {
        let external_boundaries = Direction::all_directions()
            .filter(|direction| !neighbors.contains_key(direction))
            .collect();
        Self {
            id,
            maps: BlockMaps::Stationary(stationary_map),
            neighbors,
            external_boundaries,
        }
    }

    #[inline]
    pub fn id(&self) -> usize {
        self.id
    }

    #[inline]
    pub fn neighbors(&self) -> &BTreeMap<Direction<D>, BlockNeighbor<D>> {
        &self.neighbors
    }

    #[inline]
    pub fn external_boundaries(&self) -> &BTreeSet<Direction<D>> {
        &self.external_boundaries
    }

    /// Whether the block has transitioned to the moving-mesh state.
    pub fn is_time_dependent(&self) -> bool {
        matches!(self.maps, BlockMaps::Moving { .. })
    }

    /// The Logical→Inertial map of a time-independent block.
    pub fn stationary_map(&self) -> Result<&M, DomainError> {
        match &self.maps {
            BlockMaps::Stationary(map) => Ok(map),
            BlockMaps::Moving { .. } => {
                Err(DomainError::StationaryMapUnavailable { block: self.id })
            }
        }
    }

    /// The stationary Logical→Grid map of a time-dependent block.
    pub fn moving_mesh_logical_to_grid_map(&self) -> Result<&M, DomainError> {
        match &self.maps {
            BlockMaps::Moving {
                logical_to_grid, ..
            } => Ok(logical_to_grid),
            BlockMaps::Stationary(_) => {
                Err(DomainError::MovingMapUnavailable { block: self.id })
            }
        }
    }

    /// The time-dependent Grid→Inertial map of a time-dependent block.
    pub fn moving_mesh_grid_to_inertial_map(&self) -> Result<&M, DomainError> {
        match &self.maps {
            BlockMaps::Moving {
                grid_to_inertial, ..
            } => Ok(grid_to_inertial),
            BlockMaps::Stationary(_) => {
                Err(DomainError::MovingMapUnavailable { block: self.id })
            }
        }
    }

    /// Transitions the block from `Stationary` to `Moving`.
    ///
    /// The Logical→Grid map is derived from the existing stationary map via
    /// [`ToGridFrame`]; calling this on an already-moving block fails.
    pub fn inject_time_dependent_map(&mut self, grid_to_inertial: M) -> Result<(), DomainError>
    where
        M: ToGridFrame,
    {
        match &self.maps {
            BlockMaps::Stationary(map) => {
                let logical_to_grid = map.to_grid_frame();
                self.maps = BlockMaps::Moving {
                    logical_to_grid,
                    grid_to_inertial,
                };
                Ok(())
            }
            BlockMaps::Moving { .. } => {
                Err(DomainError::MapAlreadyTimeDependent { block: self.id })
            }
        }
    }
}

impl<M, const D: usize> fmt::Display for Block<M, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Block {}:", self.id)?;
        write!(f, "Neighbors:")?;
        for (direction, neighbor) in &self.neighbors {
            write!(f, " {direction}->{:?}", neighbor)?;
        }
        writeln!(f)?;
        write!(f, "External boundaries:")?;
        for direction in &self.external_boundaries {
            write!(f, " {direction}")?;
        }
        writeln!(f)?;
        write!(f, "Is time dependent: {}", self.is_time_dependent())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maps::{AffineMap, ProductOfAffineMaps};

    fn unit_map() -> ProductOfAffineMaps<1> {
        ProductOfAffineMaps::new([AffineMap::new(0.0, 1.0)])
    }

    #[test]
    fn external_boundaries_complement_neighbors() {
        let upper = Direction::<1>::upper(0).unwrap();
        let mut neighbors = BTreeMap::new();
        neighbors.insert(upper, BlockNeighbor::new(1, OrientationMap::aligned()));
        let block = Block::new(unit_map(), 0, neighbors);

        assert_eq!(block.external_boundaries().len(), 1);
        assert!(block
            .external_boundaries()
            .contains(&Direction::lower(0).unwrap()));
        assert!(block.neighbors().contains_key(&upper));
    }

    #[test]
    fn stationary_block_rejects_moving_accessors() {
        let block = Block::<_, 1>::new(unit_map(), 4, BTreeMap::new());
        assert!(!block.is_time_dependent());
        assert!(block.stationary_map().is_ok());
        assert_eq!(
            block.moving_mesh_logical_to_grid_map().unwrap_err(),
            DomainError::MovingMapUnavailable { block: 4 }
        );
        assert_eq!(
            block.moving_mesh_grid_to_inertial_map().unwrap_err(),
            DomainError::MovingMapUnavailable { block: 4 }
        );
    }

    #[test]
    fn inject_transitions_exactly_once() {
        let mut block = Block::<_, 1>::new(unit_map(), 0, BTreeMap::new());
        block.inject_time_dependent_map(unit_map()).unwrap();

        assert!(block.is_time_dependent());
        assert!(block.moving_mesh_logical_to_grid_map().is_ok());
        assert!(block.moving_mesh_grid_to_inertial_map().is_ok());
        assert_eq!(
            block.stationary_map().unwrap_err(),
            DomainError::StationaryMapUnavailable { block: 0 }
        );
        assert_eq!(
            block.inject_time_dependent_map(unit_map()).unwrap_err(),
            DomainError::MapAlreadyTimeDependent { block: 0 }
        );
    }

    #[test]
    fn equality_dispatches_on_the_active_variant() {
        let a = Block::<_, 1>::new(unit_map(), 0, BTreeMap::new());
        let b = Block::<_, 1>::new(unit_map(), 0, BTreeMap::new());
        assert_eq!(a, b);

        let mut moving = b.clone();
        moving.inject_time_dependent_map(unit_map()).unwrap();
        assert_ne!(a, moving);
    }
}
