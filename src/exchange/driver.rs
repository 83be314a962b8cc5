//! The flux-communication driver.
//!
//! Each element is wrapped in an [`ElementActor`] holding one
//! [`SimpleMortarData`] buffer per mortar. A communication step has two
//! phases. In the send phase every actor computes its boundary data once per
//! face, buffers the local contribution on each of its mortars, and ships
//! the projected contribution to every neighbor through the [`Transport`].
//! In the delivery phase the driver drains each actor's mailbox; an actor
//! that receives the contribution completing a mortar immediately extracts
//! the pair and evaluates the numerical flux. A step only returns once every
//! mortar has completed, so the caller never observes a half-exchanged
//! state.

use std::collections::BTreeMap;
use std::fmt::Debug;

use crate::domain_error::DomainError;
use crate::exchange::message::BoundaryMessage;
use crate::exchange::transport::Transport;
use crate::mortar::{MortarId, SimpleMortarData};
use crate::topology::direction::Direction;
use crate::topology::element::Element;
use crate::topology::element_id::ElementId;
use crate::topology::orientation::OrientationMap;

/// The numerical method's side of the exchange: what data each face
/// contributes and how a completed pair combines into a flux.
pub trait BoundaryScheme<const D: usize> {
    /// Orders the communication steps.
    type TemporalId: Ord + Copy + Debug;
    /// Boundary data retained on the local side of a mortar.
    type LocalData: Clone + Send;
    /// Boundary data projected toward a neighbor.
    type RemoteData: Clone + Send;
    /// The result of combining the two sides of a mortar.
    type Flux;

    /// The contribution this element keeps for the mortars on `direction`.
    fn local_data(
        &self,
        element: &Element<D>,
        direction: Direction<D>,
        temporal_id: Self::TemporalId,
    ) -> Self::LocalData;

    /// The contribution this element sends across `direction`, already
    /// reoriented into the neighbor's frame via `orientation`.
    fn remote_data(
        &self,
        element: &Element<D>,
        direction: Direction<D>,
        orientation: &OrientationMap<D>,
        temporal_id: Self::TemporalId,
    ) -> Self::RemoteData;

    /// The numerical flux on a completed mortar.
    fn boundary_flux(
        &self,
        mortar: &MortarId<D>,
        local: &Self::LocalData,
        remote: &Self::RemoteData,
    ) -> Self::Flux;

    /// The flux on an external boundary, where no neighbor contributes.
    fn external_flux(
        &self,
        element: &Element<D>,
        direction: Direction<D>,
        temporal_id: Self::TemporalId,
    ) -> Self::Flux;
}

type Mortars<S, const D: usize> = BTreeMap<
    MortarId<D>,
    SimpleMortarData<
        <S as BoundaryScheme<D>>::TemporalId,
        <S as BoundaryScheme<D>>::LocalData,
        <S as BoundaryScheme<D>>::RemoteData,
    >,
>;

/// Message type exchanged by an array driven by scheme `S`.
pub type SchemeMessage<S, const D: usize> = BoundaryMessage<
    <S as BoundaryScheme<D>>::TemporalId,
    <S as BoundaryScheme<D>>::RemoteData,
    D,
>;

/// One element together with its mortar buffers and the fluxes completed in
/// the current step.
pub struct ElementActor<S: BoundaryScheme<D>, const D: usize> {
    element: Element<D>,
    mortars: Mortars<S, D>,
    completed: BTreeMap<MortarId<D>, S::Flux>,
}

impl<S: BoundaryScheme<D>, const D: usize> ElementActor<S, D> {
    pub fn new(element: Element<D>) -> Self {
        let mut mortars = Mortars::<S, D>::new();
        for (&direction, neighbors) in element.neighbors() {
            for &neighbor in neighbors.ids() {
                mortars.insert((direction, neighbor), SimpleMortarData::new());
            }
        }
        Self {
            element,
            mortars,
            completed: BTreeMap::new(),
        }
    }

    pub fn element(&self) -> &Element<D> {
        &self.element
    }

    /// Buffer local contributions and ship remote contributions for every
    /// internal face.
    fn send_data<X>(
        &mut self,
        scheme: &S,
        transport: &X,
        temporal_id: S::TemporalId,
    ) -> Result<(), DomainError>
    where
        X: Transport<SchemeMessage<S, D>, D>,
    {
        for (&direction, neighbors) in self.element.neighbors() {
            let orientation = neighbors.orientation();
            let local = scheme.local_data(&self.element, direction, temporal_id);
            let payload = scheme.remote_data(&self.element, direction, orientation, temporal_id);
            let receiver_direction = orientation.mapped_direction(direction).opposite();
            for &neighbor in neighbors.ids() {
                let mortar = (direction, neighbor);
                self.mortars
                    .get_mut(&mortar)
                    .ok_or_else(|| DomainError::UnknownMortar {
                        element: self.element.id().to_string(),
                        direction: direction.to_string(),
                        sender: neighbor.to_string(),
                    })?
                    .local_insert(temporal_id, local.clone())?;
                transport.send(
                    neighbor,
                    BoundaryMessage {
                        mortar: (receiver_direction, *self.element.id()),
                        temporal_id,
                        data: payload.clone(),
                    },
                )?;
            }
        }
        Ok(())
    }

    /// Absorb one delivered contribution; if it completes its mortar,
    /// evaluate the flux right away.
    fn receive(&mut self, scheme: &S, message: SchemeMessage<S, D>) -> Result<(), DomainError> {
        let mortar = message.mortar;
        let buffer = self
            .mortars
            .get_mut(&mortar)
            .ok_or_else(|| DomainError::UnknownMortar {
                element: self.element.id().to_string(),
                direction: mortar.0.to_string(),
                sender: mortar.1.to_string(),
            })?;
        buffer.remote_insert(message.temporal_id, message.data)?;
        if !buffer.is_complete() {
            return Ok(());
        }
        let (local, remote) = buffer.extract()?;
        let flux = scheme.boundary_flux(&mortar, &local, &remote);
        self.completed.insert(mortar, flux);
        Ok(())
    }

    fn incomplete_mortars(&self) -> impl Iterator<Item = &MortarId<D>> {
        self.mortars
            .keys()
            .filter(|mortar| !self.completed.contains_key(mortar))
    }
}

/// The fluxes an element ends a communication step with.
#[derive(Debug)]
pub struct StepFluxes<F, const D: usize> {
    /// One flux per internal mortar, keyed by face direction and neighbor.
    pub mortar: BTreeMap<MortarId<D>, F>,
    /// One flux per external boundary face.
    pub external: BTreeMap<Direction<D>, F>,
}

/// Drives a collection of element actors through lockstep communication
/// steps.
pub struct ElementArray<S, X, const D: usize>
where
    S: BoundaryScheme<D>,
    X: Transport<SchemeMessage<S, D>, D>,
{
    scheme: S,
    transport: X,
    actors: BTreeMap<ElementId<D>, ElementActor<S, D>>,
}

impl<S, X, const D: usize> ElementArray<S, X, D>
where
    S: BoundaryScheme<D>,
    X: Transport<SchemeMessage<S, D>, D>,
{
    pub fn new(elements: BTreeMap<ElementId<D>, Element<D>>, scheme: S, transport: X) -> Self {
        for id in elements.keys() {
            transport.register(*id);
        }
        let actors = elements
            .into_iter()
            .map(|(id, element)| (id, ElementActor::new(element)))
            .collect();
        Self {
            scheme,
            transport,
            actors,
        }
    }

    pub fn num_elements(&self) -> usize {
        self.actors.len()
    }

    pub fn element(&self, id: &ElementId<D>) -> Option<&Element<D>> {
        self.actors.get(id).map(ElementActor::element)
    }

    /// Run one full communication step at `temporal_id`.
    ///
    /// Returns the per-element fluxes once every mortar in the array has
    /// completed. An incomplete mortar after delivery means the neighbor
    /// graph and the mortar tables disagree, and is reported as
    /// [`DomainError::StalledExchange`].
    pub fn advance(
        &mut self,
        temporal_id: S::TemporalId,
    ) -> Result<BTreeMap<ElementId<D>, StepFluxes<S::Flux, D>>, DomainError> {
        let mut externals = BTreeMap::new();
        for (id, actor) in &mut self.actors {
            externals.insert(*id, external_fluxes(&self.scheme, actor.element(), temporal_id));
            actor.send_data(&self.scheme, &self.transport, temporal_id)?;
        }
        self.deliver_and_collect(temporal_id, externals)
    }

    /// Like [`advance`](Self::advance), with the send phase fanned out over
    /// the rayon thread pool.
    #[cfg(feature = "rayon")]
    pub fn advance_parallel(
        &mut self,
        temporal_id: S::TemporalId,
    ) -> Result<BTreeMap<ElementId<D>, StepFluxes<S::Flux, D>>, DomainError>
    where
        S: Sync,
        X: Sync,
        S::TemporalId: Send + Sync,
        S::Flux: Send,
    {
        use rayon::prelude::*;

        let scheme = &self.scheme;
        let transport = &self.transport;
        let externals = self
            .actors
            .par_iter_mut()
            .map(|(id, actor)| {
                let fluxes = external_fluxes(scheme, actor.element(), temporal_id);
                actor.send_data(scheme, transport, temporal_id)?;
                Ok((*id, fluxes))
            })
            .collect::<Result<BTreeMap<_, _>, DomainError>>()?;
        self.deliver_and_collect(temporal_id, externals)
    }

    fn deliver_and_collect(
        &mut self,
        temporal_id: S::TemporalId,
        mut externals: BTreeMap<ElementId<D>, BTreeMap<Direction<D>, S::Flux>>,
    ) -> Result<BTreeMap<ElementId<D>, StepFluxes<S::Flux, D>>, DomainError> {
        let ids: Vec<ElementId<D>> = self.actors.keys().copied().collect();
        for id in &ids {
            let messages = self.transport.drain(id);
            log::trace!("delivering {} boundary messages to {id}", messages.len());
            for message in messages {
                let actor = self
                    .actors
                    .get_mut(id)
                    .ok_or_else(|| DomainError::UnknownElement {
                        element: id.to_string(),
                    })?;
                actor.receive(&self.scheme, message)?;
            }
        }

        let stalled: Vec<String> = self
            .actors
            .values()
            .flat_map(|actor| {
                actor.incomplete_mortars().map(move |(direction, neighbor)| {
                    format!(
                        "({direction}, {neighbor}) on {element}",
                        element = actor.element.id()
                    )
                })
            })
            .collect();
        if !stalled.is_empty() {
            log::warn!(
                "boundary exchange at {temporal_id:?} left {} mortars incomplete",
                stalled.len()
            );
            return Err(DomainError::StalledExchange {
                temporal_id: format!("{temporal_id:?}"),
                mortars: stalled.join(", "),
            });
        }

        log::debug!(
            "boundary exchange at {temporal_id:?} completed across {} elements",
            self.actors.len()
        );
        let mut fluxes = BTreeMap::new();
        for (id, actor) in &mut self.actors {
            fluxes.insert(
                *id,
                StepFluxes {
                    mortar: std::mem::take(&mut actor.completed),
                    external: externals.remove(id).unwrap_or_default(),
                },
            );
        }
        Ok(fluxes)
    }
}

fn external_fluxes<S: BoundaryScheme<D>, const D: usize>(
    scheme: &S,
    element: &Element<D>,
    temporal_id: S::TemporalId,
) -> BTreeMap<Direction<D>, S::Flux> {
    element
        .external_boundaries()
        .iter()
        .map(|&direction| (direction, scheme.external_flux(element, direction, temporal_id)))
        .collect()
}
