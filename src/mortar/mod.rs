//! Mortar bookkeeping for discontinuous-Galerkin boundary coupling.
//!
//! A mortar is the shared interface between a local element face and one
//! neighbor face. [`data`] buffers the two boundary-data contributions until
//! both are present; [`size`] describes how much of a face each mortar
//! covers when the interface is non-conforming.

pub mod data;
pub mod size;

pub use data::{MortarId, SimpleMortarData};
pub use size::{mortar_size, MortarSize};
