#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]

mod error;
mod iter;
mod partitioner;
mod range;
mod token;

use {
    crate::iter::HashRingIter,
    parking_lot::RwLock,
    std::{borrow::Cow, collections::HashMap, fmt},
    tracing::debug,
};
pub use {
    error::{Error, Result},
    partitioner::*,
    range::KeyRange,
    token::RingToken,
};

/// Node that serves as a destination for data.
///
/// Node is placed on the ring by hashing its byte representation, and
/// controls the interval of the key space ending at that position.
pub trait RingNode: AsRef<[u8]> + Clone + Send + Sync + 'static {}

impl<T> RingNode for T where T: AsRef<[u8]> + Clone + Send + Sync + 'static {}

/// Position on the ring.
pub type RingPosition = u32;

/// Defines the direction in which the ring is traversed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RingDirection {
    Clockwise,
    CounterClockwise,
}

/// Ring contents, only ever touched under the ring's lock.
///
/// `positions` holds exactly the keys of `owners`, sorted ascending.
struct RingState<N> {
    owners: HashMap<RingPosition, N>,
    positions: Vec<RingPosition>,
}

impl<N: RingNode> RingState<N> {
    fn new() -> Self {
        Self {
            owners: HashMap::new(),
            positions: Vec::new(),
        }
    }

    /// Places `node` at `pos` unless the position is taken.
    fn insert(&mut self, pos: RingPosition, node: N) -> bool {
        match self.positions.binary_search(&pos) {
            Ok(_) => false,
            Err(idx) => {
                self.positions.insert(idx, pos);
                self.owners.insert(pos, node);
                true
            }
        }
    }

    fn remove(&mut self, pos: RingPosition) -> Option<N> {
        let node = self.owners.remove(&pos)?;
        if let Ok(idx) = self.positions.binary_search(&pos) {
            self.positions.remove(idx);
        }
        Some(node)
    }

    fn token(&self, pos: RingPosition) -> Option<RingToken<N>> {
        self.owners
            .get(&pos)
            .map(|node| RingToken::new(pos, node.clone()))
    }

    /// First occupied position at or after `pos`, wrapping to the smallest.
    fn successor(&self, pos: RingPosition) -> Option<RingToken<N>> {
        let idx = self.positions.partition_point(|p| *p < pos);
        let owner = self.positions.get(idx).or_else(|| self.positions.first())?;
        self.token(*owner)
    }

    fn walk(&self, start: RingPosition, dir: RingDirection) -> HashRingIter<'_> {
        HashRingIter::new(&self.positions, start, dir)
    }

    /// Keys in `(prev, pos]`, where `prev` is the closest position before
    /// `pos` going counter-clockwise.
    fn key_range(&self, pos: RingPosition) -> Option<KeyRange> {
        let prev = self.walk(pos, RingDirection::Clockwise).next_back()?;
        Some(KeyRange::new(prev.wrapping_add(1), pos.wrapping_add(1)))
    }

    /// Returns whether `node` itself (not just something hashing to the
    /// same position) sits at `pos`.
    fn holds(&self, pos: RingPosition, node: &[u8]) -> bool {
        self.owners
            .get(&pos)
            .is_some_and(|owner| owner.as_ref() == node)
    }
}

/// Consistent hash ring.
///
/// Every node gets exactly one position on a 32-bit ring, computed by the
/// partitioner (CRC-32 by default). A key is owned by the first node at or
/// after the key's position, wrapping around past the largest position.
///
/// The ring is internally synchronized: lookups share a read lock, while
/// `add` and `remove` take the write lock. Wrap it into an `Arc` to share it
/// between threads.
pub struct HashRing<N: RingNode = String, P = DefaultPartitioner> {
    /// Partitioner used to compute ring positions.
    partitioner: P,

    /// Node positions and their owners.
    state: RwLock<RingState<N>>,
}

impl<N: RingNode, P: Partitioner + Default> Default for HashRing<N, P> {
    fn default() -> Self {
        Self::with_partitioner(P::default())
    }
}

impl<N: RingNode> HashRing<N> {
    /// Creates a new, empty hash ring using the CRC-32 partitioner.
    ///
    /// # Examples
    ///
    /// ```
    /// let ring = crcring::HashRing::<String>::new();
    /// assert!(ring.is_empty());
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a ring and adds every node in order, as [`add`](Self::add)
    /// would.
    ///
    /// Nodes colliding with an earlier node are dropped.
    ///
    /// # Examples
    ///
    /// ```
    /// use crcring::HashRing;
    ///
    /// let ring: HashRing = HashRing::from_nodes(["node-a", "node-b", "node-c"]);
    /// assert_eq!(ring.len(), 3);
    /// ```
    pub fn from_nodes<I>(nodes: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<N>,
    {
        let ring = Self::new();
        nodes.into_iter().for_each(|node| ring.add(node));
        ring
    }
}

impl<N: RingNode, P: Partitioner> HashRing<N, P> {
    /// Creates an empty ring that places nodes and keys with `partitioner`.
    ///
    /// # Examples
    ///
    /// ```
    /// use crcring::{HashRing, Xxh3Partitioner};
    ///
    /// let ring = HashRing::<String, _>::with_partitioner(Xxh3Partitioner::new());
    /// ring.add("node-a");
    /// assert_eq!(ring.get_node("some key"), "node-a");
    /// ```
    pub fn with_partitioner(partitioner: P) -> Self {
        Self {
            partitioner,
            state: RwLock::new(RingState::new()),
        }
    }

    /// Adds a node to the ring.
    ///
    /// If the node's position is already occupied (by the same node or by a
    /// different one with a colliding hash), the call does nothing and the
    /// earlier node keeps the position. Use [`try_add`](Self::try_add) to
    /// find out whether the node was placed.
    pub fn add(&self, node: impl Into<N>) {
        // `place` logs dropped nodes.
        let _ = self.try_add(node);
    }

    /// Adds a node to the ring, reporting whether it was placed.
    ///
    /// Returns the token of the newly placed node. Fails with
    /// [`Error::AlreadyPresent`] if the node is on the ring already, and
    /// with [`Error::PositionTaken`] if a different node holds its position.
    pub fn try_add(&self, node: impl Into<N>) -> Result<RingToken<N>> {
        let node = node.into();
        let pos = self.position(&node);
        self.place(pos, node)
    }

    /// Inserts a node to a given ring position.
    ///
    /// Mostly useful for testing and simulation, use `add` in all other
    /// cases. Follows the same first-writer-wins rule, returning `false` if
    /// the position was taken.
    ///
    /// # Examples
    ///
    /// ```
    /// let ring = crcring::HashRing::<String>::new();
    /// assert!(ring.insert(0, "node-a"));
    /// assert!(!ring.insert(0, "node-b"));
    /// assert_eq!(ring.get_node("anything"), "node-a");
    /// ```
    pub fn insert(&self, pos: RingPosition, node: impl Into<N>) -> bool {
        self.place(pos, node.into()).is_ok()
    }

    fn place(&self, pos: RingPosition, node: N) -> Result<RingToken<N>> {
        let mut state = self.state.write();
        if let Some(occupant) = state.owners.get(&pos) {
            let same = occupant.as_ref() == node.as_ref();
            let occupant = lossy(occupant).into_owned();
            debug!(
                position = pos,
                node = %lossy(&node),
                %occupant,
                "ring position taken, node dropped"
            );
            return Err(if same {
                Error::AlreadyPresent(occupant)
            } else {
                Error::PositionTaken {
                    position: pos,
                    occupant,
                }
            });
        }
        state.insert(pos, node.clone());
        debug!(position = pos, node = %lossy(&node), "added node to ring");
        Ok(RingToken::new(pos, node))
    }

    /// Removes a node from the ring.
    ///
    /// Whatever occupies the node's position is removed and returned. Removing
    /// a node that is not on the ring is a no-op returning `None`.
    ///
    /// # Examples
    ///
    /// ```
    /// let ring = crcring::HashRing::<String>::new();
    /// ring.add("node-a");
    /// assert_eq!(ring.remove("node-a").as_deref().map(String::as_str), Some("node-a"));
    /// assert!(ring.remove("node-a").is_none());
    /// ```
    pub fn remove<K: AsRef<[u8]> + ?Sized>(&self, node: &K) -> Option<RingToken<N>> {
        let pos = self.position(node);
        let removed = self.state.write().remove(pos)?;
        debug!(position = pos, node = %lossy(&removed), "removed node from ring");
        Some(RingToken::new(pos, removed))
    }

    /// Returns the node responsible for the given key.
    ///
    /// On an empty ring the empty sentinel `N::default()` is returned, which
    /// is `""` for `String` nodes. Prefer [`node`](Self::node) when the node
    /// type has no natural "nothing" value.
    pub fn get_node<K: AsRef<[u8]> + ?Sized>(&self, key: &K) -> N
    where
        N: Default,
    {
        self.node(key).map(RingToken::into_node).unwrap_or_default()
    }

    /// Returns the token of the node responsible for the given key, or
    /// `None` if the ring is empty.
    ///
    /// The owner is the node at the first position at or after the key's
    /// position. Keys positioned after the last node wrap around to the first
    /// one.
    pub fn node<K: AsRef<[u8]> + ?Sized>(&self, key: &K) -> Option<RingToken<N>> {
        let pos = self.position(key);
        self.state.read().successor(pos)
    }

    /// Returns up to `k` distinct nodes responsible for the given key.
    ///
    /// The first node is the primary node responsible for the key, the rest
    /// follow clockwise. It is guaranteed that the first node is the same as
    /// the one returned by [`node()`](Self::node).
    pub fn replicas<K: AsRef<[u8]> + ?Sized>(&self, key: &K, k: usize) -> Vec<RingToken<N>> {
        let pos = self.position(key);
        let state = self.state.read();
        state
            .walk(pos, RingDirection::Clockwise)
            .take(k)
            .filter_map(|pos| state.token(pos))
            .collect()
    }

    /// Returns all tokens, starting from the given location on the ring.
    ///
    /// One can go in both directions. Since positions wrap around, every
    /// token is visited exactly once. The result is a snapshot and does not
    /// reflect later changes to the ring.
    pub fn tokens(&self, start: RingPosition, dir: RingDirection) -> Vec<RingToken<N>> {
        let state = self.state.read();
        state
            .walk(start, dir)
            .filter_map(|pos| state.token(pos))
            .collect()
    }

    /// Returns the key space range owned by a node, if it was located at the
    /// given position.
    ///
    /// A node owns the keys after its counter-clockwise neighbour, up to and
    /// including its own position. In `[start..end)` form that is
    /// `[prev + 1..pos + 1)`, with wrapping arithmetic. Returns `None` on an
    /// empty ring.
    ///
    /// # Examples
    ///
    /// ```
    /// let ring = crcring::HashRing::<String>::new();
    /// ring.insert(100, "node-a");
    /// ring.insert(200, "node-b");
    ///
    /// let range = ring.key_range(200).unwrap();
    /// assert_eq!((range.start, range.end), (101, 201));
    /// assert!(range.contains(200));
    ///
    /// // Node "node-a" owns everything past "node-b" round to itself.
    /// let range = ring.key_range(100).unwrap();
    /// assert!(range.is_wrapping());
    /// assert_eq!((range.start, range.end), (201, 101));
    /// ```
    pub fn key_range(&self, pos: RingPosition) -> Option<KeyRange> {
        self.state.read().key_range(pos)
    }

    /// Returns intervals of the key space controlled by the given node.
    ///
    /// Before a node is added or removed, data needs to be moved between
    /// nodes, and these are the intervals affected. Returns `None` when the
    /// node is not on the ring.
    pub fn intervals<K: AsRef<[u8]> + ?Sized>(&self, node: &K) -> Option<Vec<KeyRange>> {
        let pos = self.position(node);
        let state = self.state.read();
        if !state.holds(pos, node.as_ref()) {
            return None;
        }
        state.key_range(pos).map(|range| vec![range])
    }

    /// Returns `true` if this exact node is on the ring.
    pub fn contains<K: AsRef<[u8]> + ?Sized>(&self, node: &K) -> bool {
        let pos = self.position(node);
        self.state.read().holds(pos, node.as_ref())
    }

    /// Returns ring position to which a given key or node is assigned.
    pub fn position<K: AsRef<[u8]> + ?Sized>(&self, key: &K) -> RingPosition {
        self.partitioner.position(key.as_ref())
    }

    /// Returns a list of all nodes currently in the ring, in ascending
    /// position order.
    pub fn nodes(&self) -> Vec<RingToken<N>> {
        let state = self.state.read();
        state
            .positions
            .iter()
            .filter_map(|pos| state.token(*pos))
            .collect()
    }

    /// Returns size of the ring, i.e. number of contained tokens.
    pub fn len(&self) -> usize {
        self.state.read().positions.len()
    }

    /// Returns `true` if the ring is empty.
    pub fn is_empty(&self) -> bool {
        self.state.read().positions.is_empty()
    }
}

impl<N: RingNode, P: Partitioner + Default> FromIterator<N> for HashRing<N, P> {
    fn from_iter<I: IntoIterator<Item = N>>(iter: I) -> Self {
        let mut ring = Self::default();
        ring.extend(iter);
        ring
    }
}

impl<N: RingNode, P: Partitioner> Extend<N> for HashRing<N, P> {
    fn extend<I: IntoIterator<Item = N>>(&mut self, iter: I) {
        iter.into_iter().for_each(|node| self.add(node));
    }
}

impl<N: RingNode, P> fmt::Debug for HashRing<N, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.read();
        f.debug_map()
            .entries(
                state
                    .positions
                    .iter()
                    .filter_map(|pos| Some((pos, lossy(state.owners.get(pos)?)))),
            )
            .finish()
    }
}

fn lossy<T: AsRef<[u8]> + ?Sized>(node: &T) -> Cow<'_, str> {
    String::from_utf8_lossy(node.as_ref())
}
