//! `DomainError`: unified error type for dg-domain public APIs.
//!
//! Every failure in this crate falls into one of three classes: malformed
//! topology detected while building a [`Domain`](crate::topology::domain::Domain),
//! misuse of a [`Block`](crate::topology::block::Block)'s coordinate-map
//! variant, or a violation of the mortar communication protocol. All of them
//! indicate a corrupted topology or a bug in the calling driver rather than
//! an environmental condition, so callers are expected to treat them as
//! fatal and propagate them to an abort. None of these errors are retried or
//! converted into soft-failure states.

use thiserror::Error;

/// Unified error type for dg-domain operations.
///
/// Temporal ids, element ids, and directions are carried as preformatted
/// strings so a single non-generic error type can serve every instantiation
/// of the generic containers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A direction was constructed with an axis outside `[0, D)`.
    #[error("axis {axis} is out of range for a {dim}-dimensional direction")]
    InvalidAxis { axis: usize, dim: usize },

    /// An orientation map's image does not form a bijection of the axes.
    #[error("orientation map is not a bijection: image is {image}")]
    NonBijectiveOrientation { image: String },

    /// A segment index does not fit its refinement level.
    #[error("segment index {index} is out of range for refinement level {refinement_level}")]
    InvalidSegmentIndex { refinement_level: u8, index: u64 },

    /// A segment refinement level exceeds the representable maximum.
    #[error("refinement level {refinement_level} exceeds the maximum of {max}")]
    RefinementLevelTooLarge { refinement_level: u8, max: u8 },

    /// Block ids must be dense and match construction order.
    #[error("block at position {position} has id {id}; ids must be dense in construction order")]
    BlockIdMismatch { position: usize, id: usize },

    /// A neighbor entry names a block outside the domain.
    #[error("block {block} lists neighbor {neighbor} in direction {direction}, but the domain only has {num_blocks} blocks")]
    NeighborIdOutOfRange {
        block: usize,
        direction: String,
        neighbor: usize,
        num_blocks: usize,
    },

    /// The neighbor graph is not symmetric.
    #[error("block {block} has neighbor {neighbor} in direction {direction}, but block {neighbor} has no reciprocal entry pointing back in direction {expected_direction}")]
    AsymmetricNeighbor {
        block: usize,
        direction: String,
        neighbor: usize,
        expected_direction: String,
    },

    /// Reciprocal neighbor entries must carry inverse orientations.
    #[error("block {block} maps to neighbor {neighbor} across {direction} with orientation {orientation}, but the reciprocal entry does not carry the inverse orientation")]
    NeighborOrientationMismatch {
        block: usize,
        direction: String,
        neighbor: usize,
        orientation: String,
    },

    /// No refinement levels were supplied for a block referenced by the
    /// element-neighbor derivation.
    #[error("no initial refinement levels supplied for block {block}")]
    MissingRefinementLevels { block: usize },

    /// The stationary map was requested from a time-dependent block.
    #[error("the stationary map of block {block} cannot be retrieved: the block is time-dependent, so there are two maps (logical-to-grid and grid-to-inertial)")]
    StationaryMapUnavailable { block: usize },

    /// A moving-mesh map was requested from a time-independent block.
    #[error("the moving-mesh maps of block {block} cannot be retrieved: the block is time-independent, so only the stationary map exists")]
    MovingMapUnavailable { block: usize },

    /// `inject_time_dependent_map` was called a second time.
    #[error("cannot inject a time-dependent map into block {block}: it already has one")]
    MapAlreadyTimeDependent { block: usize },

    /// A second local contribution arrived while one is still buffered.
    #[error("received local mortar data at {requested}, but already have local data at {buffered}")]
    AlreadyReceivedLocalData { requested: String, buffered: String },

    /// A second remote contribution arrived while one is still buffered.
    #[error("received remote mortar data at {requested}, but already have remote data at {buffered}")]
    AlreadyReceivedRemoteData { requested: String, buffered: String },

    /// `local_data` was called with no local contribution buffered.
    #[error("local mortar data not available")]
    NoLocalData,

    /// `remote_data` was called with no remote contribution buffered.
    #[error("remote mortar data not available")]
    NoRemoteData,

    /// `local_data` was called with a temporal id other than the buffered one.
    #[error("only have local mortar data at {buffered}, requested {requested}")]
    LocalDataAtWrongTime { requested: String, buffered: String },

    /// `remote_data` was called with a temporal id other than the buffered one.
    #[error("only have remote mortar data at {buffered}, requested {requested}")]
    RemoteDataAtWrongTime { requested: String, buffered: String },

    /// `extract` was called on an empty mortar.
    #[error("tried to extract mortar data, but do not have any data")]
    ExtractWithoutData,

    /// `extract` was called with only a remote contribution present.
    #[error("tried to extract mortar data, but do not have local data")]
    ExtractWithoutLocalData,

    /// `extract` was called with only a local contribution present.
    #[error("tried to extract mortar data, but do not have remote data")]
    ExtractWithoutRemoteData,

    /// `extract` was called while the buffered contributions belong to
    /// different temporal ids.
    #[error("tried to extract mortar data, but local data is at {local} and remote data is at {remote}")]
    ExtractMismatchedTemporalIds { local: String, remote: String },

    /// A boundary message was addressed to an element the transport does not
    /// know about.
    #[error("boundary message addressed to unknown element {element}")]
    UnknownElement { element: String },

    /// A boundary message named a mortar the receiving element does not own.
    #[error("element {element} received a boundary message for unknown mortar ({direction}, {sender})")]
    UnknownMortar {
        element: String,
        direction: String,
        sender: String,
    },

    /// A communication step finished without completing every mortar.
    #[error("boundary exchange at {temporal_id} stalled: mortars never completed: {mortars}")]
    StalledExchange { temporal_id: String, mortars: String },

    /// Periodic boundary conditions cannot be combined with excluded blocks.
    #[error("periodic boundary conditions are not supported for lattices with excluded blocks")]
    PeriodicWithExcludedBlocks,

    /// A lattice axis needs at least two boundary coordinates.
    #[error("axis {axis} of the lattice has {found} block-boundary coordinates; at least 2 are required, in strictly increasing order")]
    InvalidBlockBounds { axis: usize, found: usize },

    /// An excluded-block index lies outside the lattice.
    #[error("excluded block index {index} is outside the lattice extents {extents}")]
    ExcludedBlockOutOfRange { index: String, extents: String },

    /// A refined region's corners lie outside the lattice.
    #[error("refinement region {lower}..{upper} is outside the lattice extents {extents}")]
    RefinementRegionOutOfRange {
        lower: String,
        upper: String,
        extents: String,
    },
}
