//! Incoming two-dose requests.

use std::fmt;

use crate::config::MAX_TIME;
use crate::error::{AllocError, Result};

/// Arrival-order identifier of a request. The first request is `1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(pub usize);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Timing constraints of one request, in zero-based time units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub id: RequestId,
    /// Earliest start of the first interval.
    pub first_window_start: usize,
    /// Latest start of the first interval (inclusive).
    pub first_window_end: usize,
    /// Extra delay after the first interval ends, on top of the run gap.
    pub gap_after_first: usize,
    /// Width of the window in which the second interval may start.
    pub second_window_width: usize,
}

impl Request {
    /// Build a request, rejecting an inverted first window or a field beyond
    /// [`MAX_TIME`].
    ///
    /// # Errors
    /// Returns `AllocError::InvalidRequest` if `first_window_start > first_window_end`
    /// or any field exceeds [`MAX_TIME`].
    pub fn new(
        id: RequestId,
        first_window_start: usize,
        first_window_end: usize,
        gap_after_first: usize,
        second_window_width: usize,
    ) -> Result<Self> {
        let request = Self {
            id,
            first_window_start,
            first_window_end,
            gap_after_first,
            second_window_width,
        };
        request.validate()?;
        Ok(request)
    }

    /// Check the constraints [`Request::new`] enforces. Also run by
    /// `Allocator::schedule`.
    ///
    /// # Errors
    /// Returns `AllocError::InvalidRequest` on an inverted first window or a
    /// field beyond [`MAX_TIME`].
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("first window start", self.first_window_start),
            ("first window end", self.first_window_end),
            ("delay after the first dose", self.gap_after_first),
            ("second window width", self.second_window_width),
        ];
        if let Some((name, value)) = fields.into_iter().find(|&(_, v)| v > MAX_TIME) {
            return Err(self.invalid(format!(
                "{} of {} exceeds the limit of {}",
                name, value, MAX_TIME
            )));
        }
        if self.first_window_start > self.first_window_end {
            return Err(self.invalid(format!(
                "first window [{}, {}] is empty",
                self.first_window_start, self.first_window_end
            )));
        }
        Ok(())
    }

    /// Window `[start, end]` in which the second interval may start, given
    /// where the first interval ends.
    ///
    /// Saturates instead of wrapping.
    pub fn second_window(&self, first_end: usize, run_gap: usize) -> (usize, usize) {
        let start = first_end
            .saturating_add(run_gap)
            .saturating_add(self.gap_after_first);
        (start, start.saturating_add(self.second_window_width))
    }

    fn invalid(&self, message: String) -> AllocError {
        AllocError::InvalidRequest {
            id: self.id,
            message,
        }
    }
}
