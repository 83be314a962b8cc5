//! The simplest creator: a single 1D block, optionally periodic.

use std::collections::BTreeMap;

use crate::creators::DomainCreator;
use crate::domain_error::DomainError;
use crate::maps::ProductOfAffineMaps;
use crate::topology::block::{Block, BlockNeighbor};
use crate::topology::direction::Direction;
use crate::topology::domain::Domain;
use crate::topology::orientation::OrientationMap;

/// A one-block interval `[lower_x, upper_x]`.
///
/// With `periodic` set, the block neighbors itself across both faces and the
/// domain has no external boundaries.
pub struct Interval {
    lower_x: f64,
    upper_x: f64,
    initial_refinement: u8,
    periodic: bool,
}

impl Interval {
    pub fn new(
        lower_x: f64,
        upper_x: f64,
        initial_refinement: u8,
        periodic: bool,
    ) -> Result<Self, DomainError> {
        if !(lower_x < upper_x) {
            return Err(DomainError::InvalidBlockBounds { axis: 0, found: 2 });
        }
        Ok(Self {
            lower_x,
            upper_x,
            initial_refinement,
            periodic,
        })
    }
}

impl DomainCreator<ProductOfAffineMaps<1>, 1> for Interval {
    fn create_domain(&self) -> Result<Domain<ProductOfAffineMaps<1>, 1>, DomainError> {
        let mut neighbors = BTreeMap::new();
        if self.periodic {
            for direction in Direction::<1>::all_directions() {
                neighbors.insert(direction, BlockNeighbor::new(0, OrientationMap::aligned()));
            }
        }
        let map = ProductOfAffineMaps::from_bounds([self.lower_x], [self.upper_x]);
        Domain::new(vec![Block::new(map, 0, neighbors)])
    }

    fn initial_refinement_levels(&self) -> Vec<[u8; 1]> {
        vec![[self.initial_refinement]]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_interval_has_two_external_boundaries() {
        let domain = Interval::new(0.0, 1.0, 2, false)
            .unwrap()
            .create_domain()
            .unwrap();
        assert_eq!(domain.num_blocks(), 1);
        let block = domain.block(0).unwrap();
        assert!(block.neighbors().is_empty());
        assert_eq!(block.external_boundaries().len(), 2);
    }

    #[test]
    fn periodic_interval_neighbors_itself() {
        let domain = Interval::new(-1.0, 1.0, 0, true)
            .unwrap()
            .create_domain()
            .unwrap();
        let block = domain.block(0).unwrap();
        assert!(block.external_boundaries().is_empty());
        for neighbor in block.neighbors().values() {
            assert_eq!(neighbor.id(), 0);
            assert!(neighbor.orientation().is_aligned());
        }
    }

    #[test]
    fn refinement_levels_cover_the_single_block() {
        let creator = Interval::new(0.0, 1.0, 3, false).unwrap();
        assert_eq!(creator.initial_refinement_levels(), vec![[3]]);
    }

    #[test]
    fn rejects_reversed_or_degenerate_bounds() {
        assert!(matches!(
            Interval::new(1.0, 0.0, 0, false),
            Err(DomainError::InvalidBlockBounds { axis: 0, .. })
        ));
        assert!(matches!(
            Interval::new(0.5, 0.5, 0, true),
            Err(DomainError::InvalidBlockBounds { .. })
        ));
    }
}
