//! Prospective placements produced by the timeline search.

use std::fmt;

/// Zero-based index of a timeline in the allocator's pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimelineId(pub usize);

impl fmt::Display for TimelineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An uncommitted placement `[start, start + length)` on one timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CandidateSlot {
    pub timeline: TimelineId,
    pub start: usize,
    pub length: usize,
}

impl CandidateSlot {
    pub fn new(timeline: TimelineId, start: usize, length: usize) -> Self {
        Self {
            timeline,
            start,
            length,
        }
    }

    /// Exclusive end of the slot.
    pub fn end(&self) -> usize {
        self.start + self.length
    }

    /// `true` if the two slots share at least one time unit.
    /// Adjacent slots (one ends where the other starts) do not overlap.
    pub fn overlaps(&self, other: &CandidateSlot) -> bool {
        self.timeline == other.timeline && self.start < other.end() && other.start < self.end()
    }
}
