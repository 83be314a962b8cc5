//! The wire format of one boundary-data contribution.

use serde::{Deserialize, Serialize};

use crate::mortar::MortarId;
use crate::topology::element_id::ElementId;

/// One neighbor's contribution to one mortar at one temporal id.
///
/// `mortar` is expressed in the *receiver's* frame: the direction of the
/// receiver's face the data belongs to, paired with the sender's id. The
/// receiver can therefore index straight into its mortar table without
/// re-deriving the interface geometry.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BoundaryMessage<T, R, const D: usize> {
    pub mortar: MortarId<D>,
    pub temporal_id: T,
    pub data: R,
}

impl<T, R, const D: usize> BoundaryMessage<T, R, D> {
    /// The element that produced this contribution.
    pub fn sender(&self) -> &ElementId<D> {
        &self.mortar.1
    }
}
