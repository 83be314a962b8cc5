//! `Direction<D>`: one of the `2 * D` logical half-axes of a reference cube.
//!
//! A direction is a (axis, side) pair: axis `0..D` of the element's logical
//! frame together with the lower or upper side of that axis. Directions key
//! the neighbor tables of [`Block`](crate::topology::block::Block) and
//! [`Element`](crate::topology::element::Element), so they are small `Copy`
//! values with a total order and a stable canonical enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain_error::DomainError;

/// The lower or upper side of a logical axis.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Side {
    Lower,
    Upper,
}

impl Side {
    /// The other side of the same axis.
    #[inline]
    pub fn opposite(self) -> Self {
        match self {
            Side::Lower => Side::Upper,
            Side::Upper => Side::Lower,
        }
    }

    /// `-1.0` for the lower side, `+1.0` for the upper side.
    #[inline]
    pub fn sign(self) -> f64 {
        match self {
            Side::Lower => -1.0,
            Side::Upper => 1.0,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Lower => write!(f, "-"),
            Side::Upper => write!(f, "+"),
        }
    }
}

/// A logical half-axis of a `D`-dimensional reference cube.
///
/// There are exactly `2 * D` distinct values per dimensionality, enumerated
/// canonically by [`Direction::all_directions`]. Compared and hashed by
/// `(axis, side)`.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Direction<const D: usize> {
    axis: usize,
    side: Side,
}

impl<const D: usize> Direction<D> {
    /// Creates a direction along `axis` on the given side.
    ///
    /// Fails if `axis >= D`.
    pub fn new(axis: usize, side: Side) -> Result<Self, DomainError> {
        if axis >= D {
            return Err(DomainError::InvalidAxis { axis, dim: D });
        }
        Ok(Self { axis, side })
    }

    /// The lower side of `axis`.
    pub fn lower(axis: usize) -> Result<Self, DomainError> {
        Self::new(axis, Side::Lower)
    }

    /// The upper side of `axis`.
    pub fn upper(axis: usize) -> Result<Self, DomainError> {
        Self::new(axis, Side::Upper)
    }

    /// Internal constructor for call sites where `axis < D` is structurally
    /// guaranteed.
    #[inline]
    pub(crate) fn unchecked(axis: usize, side: Side) -> Self {
        debug_assert!(axis < D);
        Self { axis, side }
    }

    /// The axis this direction lies along, in `[0, D)`.
    #[inline]
    pub fn axis(self) -> usize {
        self.axis
    }

    /// Which side of the axis this direction points to.
    #[inline]
    pub fn side(self) -> Side {
        self.side
    }

    /// The direction along the same axis with the opposite sign.
    #[inline]
    pub fn opposite(self) -> Self {
        Self {
            axis: self.axis,
            side: self.side.opposite(),
        }
    }

    /// All `2 * D` directions in canonical order: for each axis `0..D`,
    /// lower then upper.
    pub fn all_directions() -> impl Iterator<Item = Direction<D>> + Clone {
        (0..D).flat_map(|axis| {
            [Side::Lower, Side::Upper]
                .into_iter()
                .map(move |side| Direction { axis, side })
        })
    }
}

impl<const D: usize> fmt::Display for Direction<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.side, self.axis)
    }
}

impl<const D: usize> fmt::Debug for Direction<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Direction<{D}>({self})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_directions_canonical_order() {
        let dirs: Vec<Direction<2>> = Direction::all_directions().collect();
        assert_eq!(
            dirs,
            vec![
                Direction::lower(0).unwrap(),
                Direction::upper(0).unwrap(),
                Direction::lower(1).unwrap(),
                Direction::upper(1).unwrap(),
            ]
        );
    }

    #[test]
    fn all_directions_distinct() {
        use std::collections::BTreeSet;
        let dirs: BTreeSet<Direction<3>> = Direction::all_directions().collect();
        assert_eq!(dirs.len(), 6);
    }

    #[test]
    fn axis_out_of_range_rejected() {
        assert!(matches!(
            Direction::<2>::new(2, Side::Lower),
            Err(DomainError::InvalidAxis { axis: 2, dim: 2 })
        ));
    }

    #[test]
    fn opposite_flips_side_only() {
        let d = Direction::<3>::upper(1).unwrap();
        assert_eq!(d.opposite(), Direction::lower(1).unwrap());
        assert_eq!(d.opposite().opposite(), d);
    }

    #[test]
    fn display() {
        assert_eq!(Direction::<3>::lower(0).unwrap().to_string(), "-0");
        assert_eq!(Direction::<3>::upper(2).unwrap().to_string(), "+2");
    }

    #[test]
    fn serde_json_roundtrip() {
        let d = Direction::<2>::upper(1).unwrap();
        let s = serde_json::to_string(&d).unwrap();
        let d2: Direction<2> = serde_json::from_str(&s).unwrap();
        assert_eq!(d, d2);
    }
}
