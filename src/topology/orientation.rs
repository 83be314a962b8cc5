//! `OrientationMap<D>`: the axis-permutation-plus-flip bijection reconciling
//! two adjacent regions' local coordinate conventions.
//!
//! The map sends each direction of a "host" frame to the corresponding
//! direction of a "neighbor" frame. It is stored as the image of each
//! positive host axis; the image of a negative direction follows by sign.
//! Orientation maps form a finite group: `composed` is associative, the
//! aligned (identity) map is a two-sided unit, and `inverse` satisfies
//! `m.composed(&m.inverse()) == aligned`. These laws are what let per-face
//! orientations be accumulated along paths through the block graph.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain_error::DomainError;
use crate::topology::direction::{Direction, Side};

/// A bijection between two `D`-dimensional logical frames, represented as a
/// permutation of the axes together with a per-axis sign flip.
///
/// `Default` is the aligned map, which is what two adjoining elements that
/// share axis conventions use.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OrientationMap<const D: usize> {
    /// Image of the positive host axis `i` in the neighbor frame.
    #[serde(with = "crate::serde_arrays")]
    mapped: [Direction<D>; D],
}

impl<const D: usize> OrientationMap<D> {
    /// The identity map: every host direction is its own image.
    pub fn aligned() -> Self {
        let mapped = core::array::from_fn(|axis| Direction::unchecked(axis, Side::Upper));
        Self { mapped }
    }

    /// Creates a map from the images of the positive host axes.
    ///
    /// Fails unless the image axes form a permutation of `0..D`.
    pub fn new(mapped: [Direction<D>; D]) -> Result<Self, DomainError> {
        let mut seen = [false; D];
        for dir in &mapped {
            if seen[dir.axis()] {
                return Err(DomainError::NonBijectiveOrientation {
                    image: format!("{:?}", mapped.map(|d| d.to_string())),
                });
            }
            seen[dir.axis()] = true;
        }
        Ok(Self { mapped })
    }

    /// Whether this is the identity map.
    pub fn is_aligned(&self) -> bool {
        *self == Self::aligned()
    }

    /// The image of the positive host axis `axis`.
    #[inline]
    pub fn mapped(&self, axis: usize) -> Direction<D> {
        self.mapped[axis]
    }

    /// The image of an arbitrary host direction.
    pub fn mapped_direction(&self, direction: Direction<D>) -> Direction<D> {
        let image = self.mapped[direction.axis()];
        match direction.side() {
            Side::Upper => image,
            Side::Lower => image.opposite(),
        }
    }

    /// The inverse map, from the neighbor frame back to the host frame.
    pub fn inverse(&self) -> Self {
        let mut inv = Self::aligned().mapped;
        for (host_axis, image) in self.mapped.iter().enumerate() {
            inv[image.axis()] = Direction::unchecked(host_axis, image.side());
        }
        Self { mapped: inv }
    }

    /// Composition "apply `self`, then `second`".
    pub fn composed(&self, second: &Self) -> Self {
        let mapped = core::array::from_fn(|axis| second.mapped_direction(self.mapped[axis]));
        Self { mapped }
    }
}

impl<const D: usize> Default for OrientationMap<D> {
    fn default() -> Self {
        Self::aligned()
    }
}

impl<const D: usize> fmt::Display for OrientationMap<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, dir) in self.mapped.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{dir}")?;
        }
        write!(f, ")")
    }
}

impl<const D: usize> fmt::Debug for OrientationMap<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OrientationMap<{D}>{self}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dir(axis: usize, side: Side) -> Direction<3> {
        Direction::new(axis, side).unwrap()
    }

    /// 3D map: host +0 -> +1, host +1 -> -2, host +2 -> +0.
    fn sample() -> OrientationMap<3> {
        OrientationMap::new([
            dir(1, Side::Upper),
            dir(2, Side::Lower),
            dir(0, Side::Upper),
        ])
        .unwrap()
    }

    #[test]
    fn aligned_is_fixed_point_for_every_direction() {
        let id = OrientationMap::<3>::aligned();
        for d in Direction::<3>::all_directions() {
            assert_eq!(id.mapped_direction(d), d);
        }
        assert!(id.is_aligned());
    }

    #[test]
    fn rejects_non_bijection() {
        let bad = OrientationMap::<2>::new([
            Direction::upper(0).unwrap(),
            Direction::lower(0).unwrap(),
        ]);
        assert!(matches!(
            bad,
            Err(DomainError::NonBijectiveOrientation { .. })
        ));
    }

    #[test]
    fn negative_directions_flip_through_the_map() {
        let m = sample();
        assert_eq!(m.mapped_direction(dir(1, Side::Lower)), dir(2, Side::Upper));
        assert_eq!(m.mapped_direction(dir(0, Side::Lower)), dir(1, Side::Lower));
    }

    #[test]
    fn inverse_composes_to_identity() {
        let m = sample();
        assert!(m.composed(&m.inverse()).is_aligned());
        assert!(m.inverse().composed(&m).is_aligned());
        for d in Direction::<3>::all_directions() {
            assert_eq!(m.inverse().mapped_direction(m.mapped_direction(d)), d);
        }
    }

    #[test]
    fn serde_bincode_roundtrip() {
        let m = sample();
        let bytes = bincode::serialize(&m).unwrap();
        let m2: OrientationMap<3> = bincode::deserialize(&bytes).unwrap();
        assert_eq!(m, m2);
    }

    mod group_laws {
        use super::*;
        use proptest::prelude::*;

        /// All 48 orientation maps of a 3-cube: a permutation of the axes
        /// together with a sign for each.
        fn arb_orientation() -> impl Strategy<Value = OrientationMap<3>> {
            let perms = vec![
                [0usize, 1, 2],
                [0, 2, 1],
                [1, 0, 2],
                [1, 2, 0],
                [2, 0, 1],
                [2, 1, 0],
            ];
            (proptest::sample::select(perms), any::<[bool; 3]>()).prop_map(|(perm, flips)| {
                let mapped = core::array::from_fn(|i| {
                    let side = if flips[i] { Side::Lower } else { Side::Upper };
                    Direction::new(perm[i], side).unwrap()
                });
                OrientationMap::new(mapped).unwrap()
            })
        }

        proptest! {
            #[test]
            fn composition_is_associative(
                a in arb_orientation(),
                b in arb_orientation(),
                c in arb_orientation(),
            ) {
                prop_assert_eq!(a.composed(&b).composed(&c), a.composed(&b.composed(&c)));
            }

            #[test]
            fn identity_is_two_sided_unit(a in arb_orientation()) {
                let id = OrientationMap::<3>::aligned();
                prop_assert_eq!(a.composed(&id), a);
                prop_assert_eq!(id.composed(&a), a);
            }

            #[test]
            fn inverse_cancels(a in arb_orientation()) {
                prop_assert!(a.composed(&a.inverse()).is_aligned());
                prop_assert!(a.inverse().composed(&a).is_aligned());
            }
        }
    }
}
