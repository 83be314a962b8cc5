//! Domain creators: factories assembling complete, validated domains.
//!
//! A creator owns the user-facing description of a domain (coordinate
//! bounds, periodicity, refinement) and produces both the block structure
//! and the per-block initial refinement levels that seed the element layer.

pub mod interval;
pub mod rectilinear;

use crate::domain_error::DomainError;
use crate::topology::domain::Domain;

/// A factory for a domain together with its initial refinement.
pub trait DomainCreator<M, const D: usize> {
    /// Assemble and validate the block structure.
    fn create_domain(&self) -> Result<Domain<M, D>, DomainError>;

    /// The initial refinement level per axis, indexed by block id.
    fn initial_refinement_levels(&self) -> Vec<[u8; D]>;
}

pub use interval::Interval;
pub use rectilinear::{Rectilinear, RefinementRegion};
