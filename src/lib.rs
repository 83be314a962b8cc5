//! # dg-domain
//!
//! dg-domain is a Rust library for the block-structured domain decomposition
//! used by discontinuous-Galerkin PDE codes. It models a computational
//! domain as a graph of coarse, independently-mapped blocks, derives the
//! element-level neighbor topology created by binary refinement of each
//! block, and drives the mortar-based boundary-data exchange that couples
//! neighboring elements at each communication step.
//!
//! ## Features
//! - `Direction`, `OrientationMap`, and `SegmentId` primitives for logical
//!   coordinate frames and binary refinement
//! - `Block` and `Domain` types with eagerly validated neighbor symmetry and
//!   a one-time stationary-to-moving coordinate-map transition
//! - Pure derivation of element neighbors across block faces, including
//!   non-conforming refinement and periodic identifications
//! - `SimpleMortarData` buffers and an actor-style `ElementArray` driver
//!   completing every mortar before a step returns
//! - Domain creators for intervals and axis-aligned block lattices
//!
//! ## Determinism
//!
//! All containers keyed by ids or directions are `BTreeMap`/`BTreeSet`, so
//! iteration order, derived topology, and exchange results are reproducible
//! across runs and independent of hash seeds.
//!
//! ## Usage
//! Add `dg-domain` as a dependency in your `Cargo.toml` and enable features
//! as needed:
//!
//! ```toml
//! [dependencies]
//! dg-domain = "0.1.0"
//! # Optional features:
//! # features = ["rayon"]
//! ```

pub mod creators;
pub mod domain_error;
pub mod exchange;
pub mod maps;
pub mod mortar;
mod serde_arrays;
pub mod topology;

pub use domain_error::DomainError;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::creators::{DomainCreator, Interval, Rectilinear, RefinementRegion};
    pub use crate::domain_error::DomainError;
    pub use crate::exchange::{
        BoundaryMessage, BoundaryScheme, ElementArray, LocalTransport, StepFluxes, Transport,
    };
    pub use crate::maps::{FrameMap, ProductOfAffineMaps, ToGridFrame};
    pub use crate::mortar::{mortar_size, MortarId, MortarSize, SimpleMortarData};
    pub use crate::topology::block::{Block, BlockMaps, BlockNeighbor};
    pub use crate::topology::direction::{Direction, Side};
    pub use crate::topology::domain::Domain;
    pub use crate::topology::element::{Element, Neighbors};
    pub use crate::topology::element_id::ElementId;
    pub use crate::topology::initial::{create_initial_elements, initial_element_ids};
    pub use crate::topology::orientation::OrientationMap;
    pub use crate::topology::segment::SegmentId;
}
