use {
    crate::{RingDirection, RingPosition},
    std::{
        iter::{Chain, Rev},
        slice::Iter,
    },
};

/// Iterator over sorted ring positions, starting at some location on the
/// ring and wrapping around once.
pub(crate) enum HashRingIter<'a> {
    Clockwise(Chain<Iter<'a, RingPosition>, Iter<'a, RingPosition>>),
    CounterClockwise(Chain<Rev<Iter<'a, RingPosition>>, Rev<Iter<'a, RingPosition>>>),
}

impl<'a> HashRingIter<'a> {
    /// Walks `positions` (ascending, unique) from `start` in direction `dir`.
    ///
    /// Clockwise traversal yields positions `>= start` first. Counter-clockwise
    /// traversal yields positions `<= start` first, in descending order.
    pub(crate) fn new(positions: &'a [RingPosition], start: RingPosition, dir: RingDirection) -> Self {
        match dir {
            RingDirection::Clockwise => {
                let idx = positions.partition_point(|pos| *pos < start);
                let (before, after) = positions.split_at(idx);
                Self::Clockwise(after.iter().chain(before.iter()))
            }
            RingDirection::CounterClockwise => {
                let idx = positions.partition_point(|pos| *pos <= start);
                let (upto, after) = positions.split_at(idx);
                Self::CounterClockwise(upto.iter().rev().chain(after.iter().rev()))
            }
        }
    }
}

impl Iterator for HashRingIter<'_> {
    type Item = RingPosition;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Self::Clockwise(iter) => iter.next().copied(),
            Self::CounterClockwise(iter) => iter.next().copied(),
        }
    }
}

impl DoubleEndedIterator for HashRingIter<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        match self {
            Self::Clockwise(iter) => iter.next_back().copied(),
            Self::CounterClockwise(iter) => iter.next_back().copied(),
        }
    }
}
