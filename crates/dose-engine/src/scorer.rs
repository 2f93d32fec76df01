//! Proximity scoring of candidate placements.
//!
//! Each of the four neighbor distances of a placed pair is scored 0..=3:
//!
//! - `3` -- flush against an occupied cell or time 0, or facing an unbounded free region
//! - `2` -- the gap can later be filled exactly by whole doses
//! - `0` -- anything else
//!
//! A pair's score is the sum of the four, so 12 is the best attainable.

use crate::config::RunConfig;
use crate::timeline::Distance;

/// Best score a single distance can receive.
pub const MAX_DISTANCE_SCORE: u32 = 3;

/// Best score a (first, second) pair can receive.
pub const MAX_PAIR_SCORE: u32 = 4 * MAX_DISTANCE_SCORE;

const ALIGNED_SCORE: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProximityScorer {
    first_dose: usize,
    second_dose: usize,
}

impl ProximityScorer {
    pub fn new(config: &RunConfig) -> Self {
        Self {
            first_dose: config.first_dose,
            second_dose: config.second_dose,
        }
    }

    /// Score one neighbor distance.
    pub fn score(&self, distance: Distance) -> u32 {
        match distance {
            Distance::Infinite | Distance::Finite(0) => MAX_DISTANCE_SCORE,
            Distance::Finite(d) if self.is_fillable(d) => ALIGNED_SCORE,
            Distance::Finite(_) => 0,
        }
    }

    /// Sum of [`score`](Self::score) over
    /// `[first_before, first_after, second_before, second_after]`.
    pub fn pair_score(&self, distances: [Distance; 4]) -> u32 {
        distances.iter().map(|&d| self.score(d)).sum()
    }

    /// `true` if `d` units are exactly some count of first doses plus some
    /// count of second doses.
    ///
    /// Stripping whole doses off `d` until it is a multiple of either
    /// duration succeeds exactly in this case, whether only first doses or
    /// both kinds are stripped.
    fn is_fillable(&self, d: usize) -> bool {
        let long = self.first_dose.max(self.second_dose);
        let short = self.first_dose.min(self.second_dose);
        // Residues of `d - k * long` modulo `short` repeat after `short` steps.
        (0..=(d / long).min(short)).any(|k| (d - k * long) % short == 0)
    }
}
