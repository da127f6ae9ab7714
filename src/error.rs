use crate::RingPosition;

/// Errors surfaced by the signalling variants of ring operations.
///
/// The core operations (`add`, `remove`, `get_node`) never fail; these are
/// only returned by methods such as [`HashRing::try_add`](crate::HashRing::try_add).
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    /// The very same node is already on the ring.
    #[error("node {0:?} is already on the ring")]
    AlreadyPresent(String),

    /// The node hashes to a position already held by a different node.
    #[error("ring position {position:#010x} is already taken by {occupant:?}")]
    PositionTaken {
        /// The contested position.
        position: RingPosition,
        /// The node holding the position, rendered as lossy UTF-8.
        occupant: String,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
