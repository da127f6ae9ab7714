use crate::RingPosition;

/// A (half-open) range of ring positions bounded inclusively below and
/// exclusively above i.e. `[start..end)`.
///
/// If `start >= end`, the range is inverted. An inverted range with
/// `start > end` wraps through the origin and covers `[start..MAX]` and
/// `[0..end)`. A range with `start == end` covers the whole ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyRange {
    pub start: RingPosition,
    pub end: RingPosition,
}

impl KeyRange {
    /// Creates a new range.
    pub fn new(start: RingPosition, end: RingPosition) -> Self {
        Self { start, end }
    }

    /// Returns `true` if the range is inverted, i.e. `start >= end`.
    pub fn is_inverted(&self) -> bool {
        self.start >= self.end
    }

    /// Returns `true` if the range crosses the origin.
    ///
    /// `[start..0)` is inverted but does not wrap: it stops right at the
    /// origin.
    pub fn is_wrapping(&self) -> bool {
        self.is_inverted() && self.end != 0
    }

    /// Returns `true` if the range covers the whole ring.
    pub fn covers_whole_ring(&self) -> bool {
        self.start == self.end
    }

    /// Returns `true` if `pos` is contained in the range.
    pub fn contains(&self, pos: RingPosition) -> bool {
        if self.is_inverted() {
            pos >= self.start || pos < self.end
        } else {
            pos >= self.start && pos < self.end
        }
    }

    /// Returns the number of positions covered by the range.
    ///
    /// The whole ring holds `2^32` positions, one more than fits into
    /// `RingPosition`, hence the wider return type.
    pub fn size(&self) -> u64 {
        if self.is_inverted() {
            (1u64 << 32) - u64::from(self.start - self.end)
        } else {
            u64::from(self.end - self.start)
        }
    }
}
