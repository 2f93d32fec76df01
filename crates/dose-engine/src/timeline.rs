//! Resource timelines: per-unit occupancy with exhaustive free-run search.
//!
//! A timeline is a forward-growing sequence of unit cells. Cells past the end
//! of the stored occupancy are free, so the stored part only has to reach the
//! furthest committed interval (or transient probe).

use std::fmt;

use crate::config::RunConfig;
use crate::error::{AllocError, Result};
use crate::request::RequestId;
use crate::slot::{CandidateSlot, TimelineId};

/// Symbols used by the `Display` rendering, cycled by request id.
const ALPHABET: &[u8] =
    b"123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ!@#$%^&*()_=+[]{};:'\",.<>/?|\\`~";

/// State of one time unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Free,
    /// Transient marker set while measuring joint distances. Never survives
    /// a call to [`ResourceTimeline::joint_distances`].
    Probe,
    OwnedBy(RequestId),
}

impl Cell {
    pub fn is_free(self) -> bool {
        matches!(self, Cell::Free)
    }
}

/// Number of free units between a slot edge and the nearest blocking cell.
///
/// `Infinite` means the free run after the slot is never interrupted again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Distance {
    Finite(usize),
    Infinite,
}

/// One independently owned resource lane.
#[derive(Debug, Clone)]
pub struct ResourceTimeline {
    id: TimelineId,
    config: RunConfig,
    occupancy: Vec<Cell>,
    high_water_mark: usize,
}

impl ResourceTimeline {
    /// Create an empty timeline.
    pub fn new(id: TimelineId, config: RunConfig) -> Self {
        Self {
            id,
            config,
            occupancy: Vec::new(),
            high_water_mark: 0,
        }
    }

    pub fn id(&self) -> TimelineId {
        self.id
    }

    /// Furthest end of any committed interval.
    pub fn high_water_mark(&self) -> usize {
        self.high_water_mark
    }

    /// Number of stored cells.
    pub fn len(&self) -> usize {
        self.occupancy.len()
    }

    pub fn is_empty(&self) -> bool {
        self.occupancy.is_empty()
    }

    /// Stored cells, in time order.
    pub fn cells(&self) -> &[Cell] {
        &self.occupancy
    }

    /// State of the cell at `t`; cells past the stored occupancy are free.
    pub fn cell(&self, t: usize) -> Cell {
        self.occupancy.get(t).copied().unwrap_or(Cell::Free)
    }

    /// Grow the stored occupancy with free cells until it covers `to_len`.
    /// Never shrinks.
    pub fn extend(&mut self, to_len: usize) {
        if self.occupancy.len() < to_len {
            self.occupancy.resize(to_len, Cell::Free);
        }
    }

    /// Every placement of `length` units whose start lies in
    /// `[range_start, range_end]` and whose cells are all free.
    ///
    /// Starts beyond `high_water_mark + longest_dose` sit in the unbounded
    /// free region and are not enumerated, except that `range_start` itself
    /// is always considered. Slots are returned in increasing start order.
    pub fn find_free_runs(
        &self,
        length: usize,
        range_start: usize,
        range_end: usize,
    ) -> Vec<CandidateSlot> {
        let horizon = self.high_water_mark.saturating_add(self.config.longest_dose());
        let last_start = range_end.min(range_start.max(horizon));

        let mut slots = Vec::new();
        if length == 0 || range_start > last_start {
            return slots;
        }

        let mut run = 0;
        for t in range_start..last_start.saturating_add(length) {
            if self.cell(t).is_free() {
                run += 1;
                if run >= length {
                    slots.push(CandidateSlot::new(self.id, t + 1 - length, length));
                }
            } else {
                run = 0;
            }
        }
        slots
    }

    /// Free units immediately before and after `slot`.
    ///
    /// `before` stops at the first blocking cell or at time 0. `after` is
    /// `Infinite` when the free run reaches the end of the stored occupancy,
    /// since nothing is ever blocked beyond it.
    pub fn distance_to_neighbors(&self, slot: &CandidateSlot) -> (Distance, Distance) {
        (
            Distance::Finite(self.free_run_before(slot.start)),
            self.free_run_after(slot.end()),
        )
    }

    /// Distances of two slots on this timeline, each measured as if the other
    /// were already placed.
    ///
    /// The first slot is measured with the second slot's start cell probed,
    /// the second with the first slot's last cell probed. Returns
    /// `[first_before, first_after, second_before, second_after]`.
    ///
    /// # Errors
    /// Returns `AllocError::InvariantViolation` if either slot belongs to
    /// another timeline, if `second` starts before `first` ends, or if a
    /// probed cell is not free.
    pub fn joint_distances(
        &mut self,
        first: &CandidateSlot,
        second: &CandidateSlot,
    ) -> Result<[Distance; 4]> {
        if first.timeline != self.id || second.timeline != self.id {
            return Err(self.violation(format!(
                "joint distances requested for slots on timelines {} and {}",
                first.timeline, second.timeline
            )));
        }
        if second.start < first.end() || first.length == 0 {
            return Err(self.violation(format!(
                "second slot at {} does not follow first slot [{}, {})",
                second.start,
                first.start,
                first.end()
            )));
        }

        let (first_before, first_after) =
            self.probed(second.start, |tl| tl.distance_to_neighbors(first))?;
        let (second_before, second_after) =
            self.probed(first.end() - 1, |tl| tl.distance_to_neighbors(second))?;

        Ok([first_before, first_after, second_before, second_after])
    }

    /// Mark `[slot.start, slot.end)` as owned by `request`.
    ///
    /// Nothing is written unless every target cell is free.
    ///
    /// # Errors
    /// Returns `AllocError::InvariantViolation` on double-booking or if the
    /// slot belongs to another timeline.
    pub fn commit(&mut self, request: RequestId, slot: &CandidateSlot) -> Result<()> {
        if slot.timeline != self.id {
            return Err(self.violation(format!(
                "slot for timeline {} committed here",
                slot.timeline
            )));
        }
        if let Some(t) = (slot.start..slot.end()).find(|&t| !self.cell(t).is_free()) {
            return Err(self.violation(format!(
                "request {} overlaps cell {} held as {:?}",
                request,
                t,
                self.cell(t)
            )));
        }

        self.extend(slot.end());
        self.high_water_mark = self.high_water_mark.max(slot.end());
        self.occupancy[slot.start..slot.end()].fill(Cell::OwnedBy(request));
        Ok(())
    }

    fn free_run_before(&self, t: usize) -> usize {
        let stored = t.min(self.occupancy.len());
        let unstored = t - stored;
        unstored
            + self.occupancy[..stored]
                .iter()
                .rev()
                .take_while(|c| c.is_free())
                .count()
    }

    fn free_run_after(&self, t: usize) -> Distance {
        match self.occupancy.get(t..) {
            None => Distance::Infinite,
            Some(rest) => match rest.iter().position(|c| !c.is_free()) {
                Some(n) => Distance::Finite(n),
                None => Distance::Infinite,
            },
        }
    }

    /// Run `measure` with the cell at `t` transiently marked as a probe.
    fn probed<T>(&mut self, t: usize, measure: impl FnOnce(&Self) -> T) -> Result<T> {
        let current = self.cell(t);
        if !current.is_free() {
            return Err(self.violation(format!(
                "probe cell {} is {:?}, expected free",
                t, current
            )));
        }

        self.extend(t + 1);
        self.occupancy[t] = Cell::Probe;
        let measured = measure(self);
        self.occupancy[t] = Cell::Free;
        Ok(measured)
    }

    fn violation(&self, message: String) -> AllocError {
        AllocError::InvariantViolation {
            timeline: self.id,
            message,
        }
    }
}

impl fmt::Display for ResourceTimeline {
    /// One character per stored cell: `-` free, `*` probe, otherwise a symbol
    /// chosen by the owning request's id.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: String = self
            .occupancy
            .iter()
            .map(|cell| match cell {
                Cell::Free => '-',
                Cell::Probe => '*',
                Cell::OwnedBy(id) => {
                    ALPHABET[id.0.saturating_sub(1) % ALPHABET.len()] as char
                }
            })
            .collect();
        f.write_str(&rendered)
    }
}
