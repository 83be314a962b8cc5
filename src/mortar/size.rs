//! `MortarSize`: which fraction of a face a mortar covers.
//!
//! At a non-conforming interface the mortar is the finer of the two abutting
//! faces. Seen from the coarser element, the mortar therefore covers only
//! half of its face along each tangential axis where the neighbor is
//! refined more finely; the downstream projection of boundary data onto the
//! mortar needs to know which half.

use serde::{Deserialize, Serialize};

use crate::topology::direction::Side;
use crate::topology::element_id::ElementId;
use crate::topology::orientation::OrientationMap;
use crate::topology::segment::SegmentId;

/// The portion of one face axis covered by a mortar.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MortarSize {
    /// Conforming along this axis (or the neighbor is coarser).
    Full,
    /// The mortar covers the lower half of this element's face axis.
    LowerHalf,
    /// The mortar covers the upper half of this element's face axis.
    UpperHalf,
}

/// The mortar size along each tangential axis of the face normal to
/// `normal_axis`, seen from `element_id`'s side.
///
/// `orientation` maps the host frame into `neighbor_id`'s frame. The result
/// is ordered by ascending host tangential axis and has length `D - 1`.
pub fn mortar_size<const D: usize>(
    element_id: &ElementId<D>,
    neighbor_id: &ElementId<D>,
    normal_axis: usize,
    orientation: &OrientationMap<D>,
) -> Vec<MortarSize> {
    let mut sizes = Vec::with_capacity(D.saturating_sub(1));
    for host_axis in 0..D {
        if host_axis == normal_axis {
            continue;
        }
        let image = orientation.mapped(host_axis);
        let neighbor_segment = neighbor_id.segment(image.axis());
        // Compare in the host frame: undo the neighbor's flip first.
        let neighbor_in_host_frame = match image.side() {
            Side::Upper => neighbor_segment,
            Side::Lower => neighbor_segment.id_if_flipped(),
        };
        let host_segment = element_id.segment(host_axis);
        sizes.push(relative_size(host_segment, neighbor_in_host_frame));
    }
    sizes
}

fn relative_size(host: SegmentId, neighbor: SegmentId) -> MortarSize {
    if neighbor.refinement_level() <= host.refinement_level() {
        return MortarSize::Full;
    }
    // Neighbor finer: the mortar is the neighbor's face. Which half of the
    // host segment it lies in is decided by the neighbor's ancestor one
    // level below the host.
    let shift = neighbor.refinement_level() - host.refinement_level() - 1;
    let ancestor_index = neighbor.index() >> shift;
    if ancestor_index % 2 == 0 {
        MortarSize::LowerHalf
    } else {
        MortarSize::UpperHalf
    }
}
