//! `SimpleMortarData`: the per-mortar boundary-data buffer.
//!
//! A mortar joins one face of a local element to one face of a neighbor.
//! During a communication step each side contributes exactly one piece of
//! data per temporal id: the local element inserts as it sends, the remote
//! contribution arrives as a message. Once both contributions for the same
//! temporal id are present the pair is extracted, emptying the buffer for
//! the next step.
//!
//! The buffer is keyed by temporal id so that a fast neighbor may deliver
//! its next-step contribution before the local side has caught up. At most
//! one local and one remote contribution may be buffered at a time; a second
//! insert on an occupied side is a protocol violation and fails.

use std::collections::BTreeMap;
use std::fmt::Debug;

use serde::{Deserialize, Serialize};

use crate::domain_error::DomainError;
use crate::topology::direction::Direction;
use crate::topology::element_id::ElementId;

/// A mortar is identified by the direction of the face it sits on (in the
/// owning element's frame) and the id of the neighbor across it.
pub type MortarId<const D: usize> = (Direction<D>, ElementId<D>);

#[derive(Clone, Debug, Serialize, Deserialize)]
struct MortarEntry<L, R> {
    local: Option<L>,
    remote: Option<R>,
}

impl<L, R> Default for MortarEntry<L, R> {
    fn default() -> Self {
        Self {
            local: None,
            remote: None,
        }
    }
}

/// Buffers the two contributions to a mortar until both are present.
///
/// `T` is the temporal id ordering the communication steps; `L` and `R` are
/// the local and remote boundary-data payloads.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SimpleMortarData<T: Ord, L, R> {
    entries: BTreeMap<T, MortarEntry<L, R>>,
}

impl<T: Ord, L, R> Default for SimpleMortarData<T, L, R> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<T, L, R> SimpleMortarData<T, L, R>
where
    T: Ord + Copy + Debug,
{
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    fn buffered_temporal_id<F>(&self, occupied: F) -> Option<T>
    where
        F: Fn(&MortarEntry<L, R>) -> bool,
    {
        self.entries
            .iter()
            .find(|(_, entry)| occupied(entry))
            .map(|(id, _)| *id)
    }

    /// Buffer this element's own contribution for `temporal_id`.
    ///
    /// Fails if a local contribution is already buffered, at this or any
    /// other temporal id.
    pub fn local_insert(&mut self, temporal_id: T, data: L) -> Result<(), DomainError> {
        if let Some(buffered) = self.buffered_temporal_id(|entry| entry.local.is_some()) {
            return Err(DomainError::AlreadyReceivedLocalData {
                requested: format!("{temporal_id:?}"),
                buffered: format!("{buffered:?}"),
            });
        }
        self.entries.entry(temporal_id).or_default().local = Some(data);
        Ok(())
    }

    /// Buffer the neighbor's contribution for `temporal_id`.
    ///
    /// Fails if a remote contribution is already buffered, at this or any
    /// other temporal id.
    pub fn remote_insert(&mut self, temporal_id: T, data: R) -> Result<(), DomainError> {
        if let Some(buffered) = self.buffered_temporal_id(|entry| entry.remote.is_some()) {
            return Err(DomainError::AlreadyReceivedRemoteData {
                requested: format!("{temporal_id:?}"),
                buffered: format!("{buffered:?}"),
            });
        }
        self.entries.entry(temporal_id).or_default().remote = Some(data);
        Ok(())
    }

    /// Whether both contributions for the same temporal id are buffered.
    pub fn is_complete(&self) -> bool {
        self.entries
            .values()
            .any(|entry| entry.local.is_some() && entry.remote.is_some())
    }

    /// Take the completed pair out of the buffer.
    ///
    /// Fails unless exactly one temporal id holds both a local and a remote
    /// contribution; the error distinguishes an empty buffer, a missing
    /// side, and contributions buffered at different temporal ids.
    pub fn extract(&mut self) -> Result<(L, R), DomainError> {
        let local_id = self.buffered_temporal_id(|entry| entry.local.is_some());
        let remote_id = self.buffered_temporal_id(|entry| entry.remote.is_some());
        let temporal_id = match (local_id, remote_id) {
            (None, None) => return Err(DomainError::ExtractWithoutData),
            (None, Some(_)) => return Err(DomainError::ExtractWithoutLocalData),
            (Some(_), None) => return Err(DomainError::ExtractWithoutRemoteData),
            (Some(local), Some(remote)) if local != remote => {
                return Err(DomainError::ExtractMismatchedTemporalIds {
                    local: format!("{local:?}"),
                    remote: format!("{remote:?}"),
                });
            }
            (Some(id), Some(_)) => id,
        };
        let entry = self
            .entries
            .remove(&temporal_id)
            .ok_or(DomainError::ExtractWithoutData)?;
        match (entry.local, entry.remote) {
            (Some(local), Some(remote)) => Ok((local, remote)),
            _ => Err(DomainError::ExtractWithoutData),
        }
    }

    /// Borrow the buffered local contribution, checking the temporal id.
    pub fn local_data(&self, temporal_id: T) -> Result<&L, DomainError> {
        let buffered = self
            .buffered_temporal_id(|entry| entry.local.is_some())
            .ok_or(DomainError::NoLocalData)?;
        if buffered != temporal_id {
            return Err(DomainError::LocalDataAtWrongTime {
                requested: format!("{temporal_id:?}"),
                buffered: format!("{buffered:?}"),
            });
        }
        self.entries
            .get(&buffered)
            .and_then(|entry| entry.local.as_ref())
            .ok_or(DomainError::NoLocalData)
    }

    /// Borrow the buffered remote contribution, checking the temporal id.
    pub fn remote_data(&self, temporal_id: T) -> Result<&R, DomainError> {
        let buffered = self
            .buffered_temporal_id(|entry| entry.remote.is_some())
            .ok_or(DomainError::NoRemoteData)?;
        if buffered != temporal_id {
            return Err(DomainError::RemoteDataAtWrongTime {
                requested: format!("{temporal_id:?}"),
                buffered: format!("{buffered:?}"),
            });
        }
        self.entries
            .get(&buffered)
            .and_then(|entry| entry.remote.as_ref())
            .ok_or(DomainError::NoRemoteData)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Data = SimpleMortarData<u32, String, Vec<f64>>;

    #[test]
    fn insert_then_extract_round_trips() {
        let mut mortar = Data::new();
        mortar.local_insert(3, "interior flux".into()).unwrap();
        assert!(!mortar.is_complete());
        mortar.remote_insert(3, vec![1.0, 2.0]).unwrap();
        assert!(mortar.is_complete());
        let (local, remote) = mortar.extract().unwrap();
        assert_eq!(local, "interior flux");
        assert_eq!(remote, vec![1.0, 2.0]);
        // The buffer is reusable afterwards.
        assert!(matches!(
            mortar.extract(),
            Err(DomainError::ExtractWithoutData)
        ));
    }

    #[test]
    fn double_insert_on_one_side_is_fatal() {
        let mut mortar = Data::new();
        mortar.local_insert(1, "a".into()).unwrap();
        let err = mortar.local_insert(1, "b".into()).unwrap_err();
        assert_eq!(
            err,
            DomainError::AlreadyReceivedLocalData {
                requested: "1".into(),
                buffered: "1".into(),
            }
        );
        let err = mortar.local_insert(2, "c".into()).unwrap_err();
        assert_eq!(
            err,
            DomainError::AlreadyReceivedLocalData {
                requested: "2".into(),
                buffered: "1".into(),
            }
        );
    }

    #[test]
    fn remote_may_run_one_step_ahead() {
        let mut mortar = Data::new();
        mortar.local_insert(1, "slow".into()).unwrap();
        // A fast neighbor delivers for the next step before this side has
        // extracted; the ids differ, so the pair is not yet complete.
        mortar.remote_insert(2, vec![9.0]).unwrap();
        assert!(!mortar.is_complete());
        let err = mortar.extract().unwrap_err();
        assert_eq!(
            err,
            DomainError::ExtractMismatchedTemporalIds {
                local: "1".into(),
                remote: "2".into(),
            }
        );
    }

    #[test]
    fn accessors_check_the_temporal_id() {
        let mut mortar = Data::new();
        assert!(matches!(mortar.local_data(0), Err(DomainError::NoLocalData)));
        assert!(matches!(
            mortar.remote_data(0),
            Err(DomainError::NoRemoteData)
        ));
        mortar.local_insert(4, "x".into()).unwrap();
        assert_eq!(mortar.local_data(4).unwrap(), "x");
        assert_eq!(
            mortar.local_data(5).unwrap_err(),
            DomainError::LocalDataAtWrongTime {
                requested: "5".into(),
                buffered: "4".into(),
            }
        );
        mortar.remote_insert(4, vec![]).unwrap();
        assert_eq!(
            mortar.remote_data(3).unwrap_err(),
            DomainError::RemoteDataAtWrongTime {
                requested: "3".into(),
                buffered: "4".into(),
            }
        );
    }

    #[test]
    fn extract_reports_which_side_is_missing() {
        let mut mortar = Data::new();
        mortar.remote_insert(0, vec![1.0]).unwrap();
        assert!(matches!(
            mortar.extract(),
            Err(DomainError::ExtractWithoutLocalData)
        ));
        let mut mortar = Data::new();
        mortar.local_insert(0, "only local".into()).unwrap();
        assert!(matches!(
            mortar.extract(),
            Err(DomainError::ExtractWithoutRemoteData)
        ));
    }

    #[test]
    fn serde_round_trip_preserves_buffered_state() {
        let mut mortar = Data::new();
        mortar.local_insert(7, "payload".into()).unwrap();
        let encoded = serde_json::to_string(&mortar).unwrap();
        let mut decoded: Data = serde_json::from_str(&encoded).unwrap();
        decoded.remote_insert(7, vec![0.5]).unwrap();
        let (local, remote) = decoded.extract().unwrap();
        assert_eq!(local, "payload");
        assert_eq!(remote, vec![0.5]);
    }
}
