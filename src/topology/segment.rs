//! `SegmentId`: position within the binary subdivision of one logical axis.
//!
//! Refining a block `l` times along an axis splits the axis into `2^l`
//! segments; a segment is identified by its refinement level and its index
//! within that level. Parent/child arithmetic on segment ids is what the
//! element-neighbor derivation uses to match faces across interfaces whose
//! two sides are refined differently.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

use crate::domain_error::DomainError;
use crate::topology::direction::Side;

/// The largest representable refinement level. Indices are stored in a
/// `u64`, so one bit per level.
pub const MAX_REFINEMENT_LEVEL: u8 = 63;

/// One segment of the binary subdivision of a logical axis.
#[derive(
    Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct SegmentId {
    refinement_level: u8,
    index: u64,
}

impl SegmentId {
    /// Creates a segment id, validating `index < 2^refinement_level`.
    pub fn new(refinement_level: u8, index: u64) -> Result<Self, DomainError> {
        if refinement_level > MAX_REFINEMENT_LEVEL {
            return Err(DomainError::RefinementLevelTooLarge {
                refinement_level,
                max: MAX_REFINEMENT_LEVEL,
            });
        }
        if index >= (1u64 << refinement_level) {
            return Err(DomainError::InvalidSegmentIndex {
                refinement_level,
                index,
            });
        }
        Ok(Self {
            refinement_level,
            index,
        })
    }

    /// Internal constructor for call sites where `index < 2^level` is
    /// structurally guaranteed.
    #[inline]
    pub(crate) fn unchecked(refinement_level: u8, index: u64) -> Self {
        debug_assert!(refinement_level <= MAX_REFINEMENT_LEVEL);
        debug_assert!(index < (1u64 << refinement_level));
        Self {
            refinement_level,
            index,
        }
    }

    /// The single level-0 segment covering the whole axis.
    pub fn root() -> Self {
        Self {
            refinement_level: 0,
            index: 0,
        }
    }

    #[inline]
    pub fn refinement_level(self) -> u8 {
        self.refinement_level
    }

    #[inline]
    pub fn index(self) -> u64 {
        self.index
    }

    /// Number of segments at this segment's level.
    #[inline]
    pub fn number_of_segments(self) -> u64 {
        1u64 << self.refinement_level
    }

    /// The parent segment one level coarser, or `None` at level 0.
    pub fn id_of_parent(self) -> Option<Self> {
        if self.refinement_level == 0 {
            None
        } else {
            Some(Self {
                refinement_level: self.refinement_level - 1,
                index: self.index / 2,
            })
        }
    }

    /// The child segment on the given side, one level finer.
    ///
    /// Fails only when the child level would exceed [`MAX_REFINEMENT_LEVEL`].
    pub fn id_of_child(self, side: Side) -> Result<Self, DomainError> {
        let level = self.refinement_level + 1;
        if level > MAX_REFINEMENT_LEVEL {
            return Err(DomainError::RefinementLevelTooLarge {
                refinement_level: level,
                max: MAX_REFINEMENT_LEVEL,
            });
        }
        let offset = match side {
            Side::Lower => 0,
            Side::Upper => 1,
        };
        Ok(Self {
            refinement_level: level,
            index: 2 * self.index + offset,
        })
    }

    /// The mirror image of this segment when the axis direction is reversed.
    pub fn id_if_flipped(self) -> Self {
        Self {
            refinement_level: self.refinement_level,
            index: self.number_of_segments() - 1 - self.index,
        }
    }

    /// Which child of its parent this segment is, or `None` at level 0.
    pub fn side_of_parent(self) -> Option<Side> {
        if self.refinement_level == 0 {
            None
        } else if self.index % 2 == 0 {
            Some(Side::Lower)
        } else {
            Some(Side::Upper)
        }
    }

    /// Whether this segment touches the given side of the full axis.
    pub fn is_at_side_of_axis(self, side: Side) -> bool {
        match side {
            Side::Lower => self.index == 0,
            Side::Upper => self.index == self.number_of_segments() - 1,
        }
    }

    /// The range of indices at `level` whose segments overlap this one.
    ///
    /// When `level` is finer the range covers the `2^(level - l)` descendant
    /// segments; when `level` is coarser it is the single ancestor.
    pub fn indices_at_level(self, level: u8) -> Range<u64> {
        if level >= self.refinement_level {
            let shift = level - self.refinement_level;
            (self.index << shift)..((self.index + 1) << shift)
        } else {
            let shift = self.refinement_level - level;
            (self.index >> shift)..((self.index >> shift) + 1)
        }
    }

    /// Whether two segments of the same axis cover overlapping intervals.
    pub fn overlaps(self, other: Self) -> bool {
        let level = self.refinement_level.max(other.refinement_level);
        let a = self.indices_at_level(level);
        let b = other.indices_at_level(level);
        a.start < b.end && b.start < a.end
    }
}

impl fmt::Display for SegmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}I{}", self.refinement_level, self.index)
    }
}

impl fmt::Debug for SegmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SegmentId({self})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_must_fit_level() {
        assert!(SegmentId::new(0, 0).is_ok());
        assert!(matches!(
            SegmentId::new(1, 2),
            Err(DomainError::InvalidSegmentIndex {
                refinement_level: 1,
                index: 2
            })
        ));
    }

    #[test]
    fn parent_and_children_invert() {
        let s = SegmentId::new(2, 3).unwrap();
        let parent = s.id_of_parent().unwrap();
        assert_eq!(parent, SegmentId::new(1, 1).unwrap());
        assert_eq!(parent.id_of_child(Side::Upper).unwrap(), s);
        assert_eq!(s.side_of_parent(), Some(Side::Upper));
        assert_eq!(SegmentId::root().id_of_parent(), None);
    }

    #[test]
    fn flip_mirrors_the_index() {
        let s = SegmentId::new(2, 0).unwrap();
        assert_eq!(s.id_if_flipped(), SegmentId::new(2, 3).unwrap());
        assert_eq!(s.id_if_flipped().id_if_flipped(), s);
    }

    #[test]
    fn boundary_detection() {
        let s = SegmentId::new(2, 0).unwrap();
        assert!(s.is_at_side_of_axis(Side::Lower));
        assert!(!s.is_at_side_of_axis(Side::Upper));
        assert!(SegmentId::new(2, 3).unwrap().is_at_side_of_axis(Side::Upper));
        // The root segment touches both ends of the axis.
        assert!(SegmentId::root().is_at_side_of_axis(Side::Lower));
        assert!(SegmentId::root().is_at_side_of_axis(Side::Upper));
    }

    #[test]
    fn indices_at_level_spans_descendants() {
        let s = SegmentId::new(1, 1).unwrap();
        assert_eq!(s.indices_at_level(3), 4..8);
        assert_eq!(s.indices_at_level(1), 1..2);
        assert_eq!(s.indices_at_level(0), 0..1);
    }

    #[test]
    fn overlap_is_ancestry() {
        let coarse = SegmentId::new(1, 0).unwrap();
        let fine = SegmentId::new(3, 3).unwrap();
        assert!(coarse.overlaps(fine));
        assert!(fine.overlaps(coarse));
        assert!(!coarse.overlaps(SegmentId::new(3, 4).unwrap()));
        assert!(!SegmentId::new(2, 1).unwrap().overlaps(SegmentId::new(2, 2).unwrap()));
    }

    mod segment_arithmetic_props {
        use super::*;
        use proptest::prelude::*;

        fn arb_segment() -> impl Strategy<Value = SegmentId> {
            (0u8..=8).prop_flat_map(|level| {
                (0u64..(1u64 << level))
                    .prop_map(move |index| SegmentId::new(level, index).unwrap())
            })
        }

        proptest! {
            #[test]
            fn children_partition_parent(s in arb_segment()) {
                let lower = s.id_of_child(Side::Lower).unwrap();
                let upper = s.id_of_child(Side::Upper).unwrap();
                prop_assert_eq!(lower.id_of_parent(), Some(s));
                prop_assert_eq!(upper.id_of_parent(), Some(s));
                prop_assert!(!lower.overlaps(upper));
                prop_assert!(s.overlaps(lower) && s.overlaps(upper));
            }

            #[test]
            fn flip_commutes_with_ancestry(s in arb_segment()) {
                if let Some(parent) = s.id_of_parent() {
                    prop_assert_eq!(
                        s.id_if_flipped().id_of_parent(),
                        Some(parent.id_if_flipped())
                    );
                }
            }
        }
    }
}
