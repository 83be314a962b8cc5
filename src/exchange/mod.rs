//! Boundary-data synchronization between neighboring elements.
//!
//! [`message`] defines the wire format, [`transport`] the delivery
//! substrate, and [`driver`] the actor-style exchange that completes every
//! mortar before a communication step returns.

pub mod driver;
pub mod message;
pub mod transport;

pub use driver::{BoundaryScheme, ElementActor, ElementArray, SchemeMessage, StepFluxes};
pub use message::BoundaryMessage;
pub use transport::{LocalTransport, Transport};
