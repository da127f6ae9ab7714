use {
    crate::{RingNode, RingPosition},
    std::{borrow::Borrow, cmp::Ordering, ops::Deref},
};

/// An ownership over a position on the ring by the object of type `T`
/// (normally, `RingNode`).
///
/// Tokens are snapshots: they own a copy of the node, so holding one never
/// blocks writers of the ring it came from.
#[derive(Clone, Debug)]
pub struct RingToken<T> {
    position: RingPosition,
    node: T,
}

impl<T> RingToken<T> {
    pub(crate) fn new(position: RingPosition, node: T) -> Self {
        Self { position, node }
    }

    /// Return the position of the node on the ring.
    pub fn position(&self) -> RingPosition {
        self.position
    }

    /// Return the node that owns this token.
    pub fn node(&self) -> &T {
        &self.node
    }

    /// Consumes the token, returning the node.
    pub fn into_node(self) -> T {
        self.node
    }
}

impl<T> Deref for RingToken<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.node
    }
}

impl<T> AsRef<T> for RingToken<T> {
    fn as_ref(&self) -> &T {
        &self.node
    }
}

impl<T> Borrow<T> for RingToken<T> {
    fn borrow(&self) -> &T {
        &self.node
    }
}

impl<T: RingNode> PartialEq for RingToken<T> {
    fn eq(&self, other: &Self) -> bool {
        self.position == other.position
    }
}

impl<T: RingNode> Eq for RingToken<T> {}

impl<T> PartialEq<T> for RingToken<T>
where
    T: RingNode + PartialEq,
{
    fn eq(&self, other: &T) -> bool {
        &self.node == other
    }
}

impl<T: RingNode> PartialOrd for RingToken<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: RingNode> Ord for RingToken<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.position.cmp(&other.position)
    }
}
