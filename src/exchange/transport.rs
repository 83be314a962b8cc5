//! Message delivery between elements.
//!
//! The driver is written against the [`Transport`] trait so the same
//! exchange logic runs over any delivery substrate. [`LocalTransport`] is
//! the in-process implementation: a concurrent mailbox per element, safe to
//! send into from multiple threads while the driver drains sequentially.

use std::collections::BTreeSet;

use dashmap::DashMap;
use parking_lot::RwLock;

use crate::domain_error::DomainError;
use crate::topology::element_id::ElementId;

/// Point-to-point delivery of boundary messages keyed by destination
/// element.
pub trait Transport<M, const D: usize> {
    /// Make `destination` a valid address.
    fn register(&self, destination: ElementId<D>);

    /// Queue `message` for `destination`.
    ///
    /// Fails if the destination was never registered.
    fn send(&self, destination: ElementId<D>, message: M) -> Result<(), DomainError>;

    /// Take every message queued for `destination`, in arrival order.
    fn drain(&self, destination: &ElementId<D>) -> Vec<M>;
}

/// In-process transport backed by a concurrent map of mailboxes.
pub struct LocalTransport<M, const D: usize> {
    mailboxes: DashMap<ElementId<D>, Vec<M>>,
    registered: RwLock<BTreeSet<ElementId<D>>>,
}

impl<M, const D: usize> LocalTransport<M, D> {
    pub fn new() -> Self {
        Self {
            mailboxes: DashMap::new(),
            registered: RwLock::new(BTreeSet::new()),
        }
    }
}

impl<M, const D: usize> Default for LocalTransport<M, D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M, const D: usize> Transport<M, D> for LocalTransport<M, D> {
    fn register(&self, destination: ElementId<D>) {
        self.registered.write().insert(destination);
        self.mailboxes.entry(destination).or_default();
    }

    fn send(&self, destination: ElementId<D>, message: M) -> Result<(), DomainError> {
        if !self.registered.read().contains(&destination) {
            return Err(DomainError::UnknownElement {
                element: destination.to_string(),
            });
        }
        self.mailboxes.entry(destination).or_default().push(message);
        Ok(())
    }

    fn drain(&self, destination: &ElementId<D>) -> Vec<M> {
        self.mailboxes
            .get_mut(destination)
            .map(|mut mailbox| std::mem::take(&mut *mailbox))
            .unwrap_or_default()
    }
}
