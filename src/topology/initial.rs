//! Derivation of initial elements and their neighbor tables from the static
//! block graph and the per-block refinement levels.
//!
//! The derivation is pure: the same block topology and refinement levels
//! always produce the same element tables, entry for entry. It runs once at
//! startup and again whenever adaptive refinement changes the level
//! vectors; between those points the tables are immutable.
//!
//! The per-face rule, for an element face lying on a block face with a
//! block-level neighbor of orientation `O`:
//! - along the face-normal axis the abutting neighbor element is the one
//!   segment touching the shared face in the neighbor block's own
//!   refinement;
//! - along each tangential axis the host segment is re-expressed in the
//!   neighbor frame through `O` (flip, then rescale to the neighbor's
//!   level), giving one segment when the neighbor is as coarse or coarser
//!   and a span of segments when the neighbor is finer;
//! - the neighbor ids are the cartesian product of the per-axis segments.
//! Faces interior to a block pair up segments at index ±1, aligned.
//! Periodic identifications need no special case: a block that neighbors
//! itself flows through the same rule.

use itertools::Itertools;
use std::collections::{BTreeMap, BTreeSet};

use crate::domain_error::DomainError;
use crate::topology::block::Block;
use crate::topology::direction::{Direction, Side};
use crate::topology::domain::Domain;
use crate::topology::element::{Element, Neighbors};
use crate::topology::element_id::ElementId;
use crate::topology::orientation::OrientationMap;
use crate::topology::segment::{MAX_REFINEMENT_LEVEL, SegmentId};

/// All element ids of one block at the given per-axis refinement levels, in
/// ascending id order.
pub fn initial_element_ids<const D: usize>(
    block_id: usize,
    refinement_levels: [u8; D],
) -> Result<Vec<ElementId<D>>, DomainError> {
    for &level in &refinement_levels {
        if level > MAX_REFINEMENT_LEVEL {
            return Err(DomainError::RefinementLevelTooLarge {
                refinement_level: level,
                max: MAX_REFINEMENT_LEVEL,
            });
        }
    }
    let ids = refinement_levels
        .iter()
        .map(|&level| 0..(1u64 << level))
        .multi_cartesian_product()
        .map(|indices| {
            let segments = core::array::from_fn(|axis| {
                SegmentId::unchecked(refinement_levels[axis], indices[axis])
            });
            ElementId::new(block_id, segments)
        })
        .collect();
    Ok(ids)
}

/// Builds one element's neighbor table from its block's neighbor table and
/// the refinement levels of every block.
pub fn create_initial_element<M, const D: usize>(
    element_id: ElementId<D>,
    block: &Block<M, D>,
    refinement_by_block: &[[u8; D]],
) -> Result<Element<D>, DomainError> {
    let mut neighbors = BTreeMap::new();

    for direction in Direction::<D>::all_directions() {
        let axis = direction.axis();
        let segment = element_id.segment(axis);

        if !segment.is_at_side_of_axis(direction.side()) {
            // Face interior to the block: the abutting segment at the same
            // level, same frame.
            let neighbor_index = match direction.side() {
                Side::Lower => segment.index() - 1,
                Side::Upper => segment.index() + 1,
            };
            let neighbor_id = element_id.with_segment(
                axis,
                SegmentId::unchecked(segment.refinement_level(), neighbor_index),
            );
            neighbors.insert(
                direction,
                Neighbors::new(
                    std::iter::once(neighbor_id).collect(),
                    OrientationMap::aligned(),
                ),
            );
            continue;
        }

        let Some(block_neighbor) = block.neighbors().get(&direction) else {
            // Inherited external boundary.
            continue;
        };
        let orientation = *block_neighbor.orientation();
        let neighbor_block = block_neighbor.id();
        let neighbor_levels = refinement_by_block
            .get(neighbor_block)
            .ok_or(DomainError::MissingRefinementLevels {
                block: neighbor_block,
            })?;

        // Candidate segments per axis of the *neighbor* frame.
        let mut candidates: [Vec<SegmentId>; D] = core::array::from_fn(|_| Vec::new());

        // Normal axis: the unique segment touching the shared face.
        let normal_image = orientation.mapped_direction(direction);
        let face_side = normal_image.opposite().side();
        let normal_level = neighbor_levels[normal_image.axis()];
        let normal_index = match face_side {
            Side::Lower => 0,
            Side::Upper => (1u64 << normal_level) - 1,
        };
        candidates[normal_image.axis()]
            .push(SegmentId::unchecked(normal_level, normal_index));

        // Tangential axes: flip through the orientation, then rescale to
        // the neighbor's refinement level.
        for host_axis in 0..D {
            if host_axis == axis {
                continue;
            }
            let image = orientation.mapped(host_axis);
            let host_segment = element_id.segment(host_axis);
            let oriented = match image.side() {
                Side::Upper => host_segment,
                Side::Lower => host_segment.id_if_flipped(),
            };
            let neighbor_level = neighbor_levels[image.axis()];
            for index in oriented.indices_at_level(neighbor_level) {
                candidates[image.axis()].push(SegmentId::unchecked(neighbor_level, index));
            }
        }

        let ids: BTreeSet<ElementId<D>> = candidates
            .iter()
            .map(|segments| segments.iter().copied())
            .multi_cartesian_product()
            .map(|combination| {
                let segments: [SegmentId; D] = core::array::from_fn(|a| combination[a]);
                ElementId::new(neighbor_block, segments)
                    .with_grid_index(element_id.grid_index())
            })
            .collect();
        neighbors.insert(direction, Neighbors::new(ids, orientation));
    }

    Ok(Element::new(element_id, neighbors))
}

/// Builds every element of every block of a domain.
///
/// `refinement_by_block` must carry one level vector per block, indexed by
/// block id. The result is ordered by element id.
pub fn create_initial_elements<M, const D: usize>(
    domain: &Domain<M, D>,
    refinement_by_block: &[[u8; D]],
) -> Result<BTreeMap<ElementId<D>, Element<D>>, DomainError> {
    let mut elements = BTreeMap::new();
    for block in domain.iter() {
        let levels = refinement_by_block
            .get(block.id())
            .copied()
            .ok_or(DomainError::MissingRefinementLevels { block: block.id() })?;
        for element_id in initial_element_ids(block.id(), levels)? {
            let element = create_initial_element(element_id, block, refinement_by_block)?;
            elements.insert(element_id, element);
        }
    }
    log::debug!(
        "created {} initial elements across {} blocks",
        elements.len(),
        domain.num_blocks()
    );
    Ok(elements)
}
