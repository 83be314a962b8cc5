//! Top-level module for the domain topology model.
//!
//! The topology model represents a simulation domain as a graph of coarse,
//! independently-mapped [`Block`](block::Block)s, each recursively refined
//! into a binary tree of [`Element`](element::Element)s. It provides:
//! - [`Direction`](direction::Direction) and
//!   [`OrientationMap`](orientation::OrientationMap) for expressing faces
//!   and reconciling neighboring frames
//! - [`Block`](block::Block) and [`Domain`](domain::Domain) with eager
//!   connectivity validation
//! - [`ElementId`](element_id::ElementId)/[`SegmentId`](segment::SegmentId)
//!   refinement bookkeeping and the pure element-neighbor derivation in
//!   [`initial`]

pub mod block;
pub mod direction;
pub mod domain;
pub mod element;
pub mod element_id;
pub mod initial;
pub mod orientation;
pub mod segment;

pub use block::{Block, BlockMaps, BlockNeighbor};
pub use direction::{Direction, Side};
pub use domain::Domain;
pub use element::{Element, Neighbors};
pub use element_id::ElementId;
pub use initial::{create_initial_element, create_initial_elements, initial_element_ids};
pub use orientation::OrientationMap;
pub use segment::SegmentId;
