//! Thin coordinate-map collaborator interface.
//!
//! The map mathematics (Jacobians for curved maps, specific map classes)
//! lives outside this crate; blocks only need to own *some* map type and to
//! derive a logical-to-grid map when a time-dependent distortion is injected
//! on top of a previously stationary map. A product-of-affines map is
//! provided so domain creators and tests have a concrete implementation.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A map from a block's logical cube `[-1, 1]^D` to a target frame.
pub trait FrameMap<const D: usize> {
    /// Apply the map.
    fn map(&self, logical: &[f64; D]) -> [f64; D];

    /// Invert the map; `None` when `target` lies outside the image.
    fn inverse(&self, target: &[f64; D]) -> Option<[f64; D]>;

    /// The Jacobian `d target / d logical` at a logical point.
    fn jacobian(&self, logical: &[f64; D]) -> [[f64; D]; D];
}

/// Reinterpretation of a Logical→Inertial map as Logical→Grid, used when a
/// time-dependent map is injected into a stationary block.
pub trait ToGridFrame {
    fn to_grid_frame(&self) -> Self;
}

/// One time-dependent parameter of a moving mesh, looked up by name.
pub trait FunctionOfTime {
    fn value(&self, time: f64) -> f64;
}

/// Registry of time-dependent parameters threaded through to the maps of
/// moving blocks. Owned by the caller, not by this crate.
pub type FunctionsOfTime = BTreeMap<String, Box<dyn FunctionOfTime + Send + Sync>>;

/// The 1D affine map `[-1, 1] -> [a, b]`.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AffineMap {
    a: f64,
    b: f64,
}

impl AffineMap {
    pub fn new(a: f64, b: f64) -> Self {
        debug_assert!(a < b);
        Self { a, b }
    }

    #[inline]
    fn apply(&self, xi: f64) -> f64 {
        self.a + 0.5 * (xi + 1.0) * (self.b - self.a)
    }

    #[inline]
    fn invert(&self, x: f64) -> f64 {
        2.0 * (x - self.a) / (self.b - self.a) - 1.0
    }

    #[inline]
    fn slope(&self) -> f64 {
        0.5 * (self.b - self.a)
    }
}

/// The product of one affine map per axis: the stationary map of every
/// rectilinear block.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProductOfAffineMaps<const D: usize> {
    #[serde(with = "crate::serde_arrays")]
    maps: [AffineMap; D],
}

impl<const D: usize> ProductOfAffineMaps<D> {
    pub fn new(maps: [AffineMap; D]) -> Self {
        Self { maps }
    }

    /// The map for the unit cube `[lower, upper]` per axis.
    pub fn from_bounds(lower: [f64; D], upper: [f64; D]) -> Self {
        Self {
            maps: core::array::from_fn(|axis| AffineMap::new(lower[axis], upper[axis])),
        }
    }
}

impl<const D: usize> FrameMap<D> for ProductOfAffineMaps<D> {
    fn map(&self, logical: &[f64; D]) -> [f64; D] {
        core::array::from_fn(|axis| self.maps[axis].apply(logical[axis]))
    }

    fn inverse(&self, target: &[f64; D]) -> Option<[f64; D]> {
        let logical: [f64; D] =
            core::array::from_fn(|axis| self.maps[axis].invert(target[axis]));
        if logical.iter().all(|xi| (-1.0..=1.0).contains(xi)) {
            Some(logical)
        } else {
            None
        }
    }

    fn jacobian(&self, _logical: &[f64; D]) -> [[f64; D]; D] {
        let mut jac = [[0.0; D]; D];
        for (axis, row) in jac.iter_mut().enumerate() {
            row[axis] = self.maps[axis].slope();
        }
        jac
    }
}

impl<const D: usize> ToGridFrame for ProductOfAffineMaps<D> {
    // An affine map has no time dependence to strip; the grid-frame map is
    // the same map with its target frame relabeled.
    fn to_grid_frame(&self) -> Self {
        *self
    }
}
