//! Run-wide parameters shared by every timeline and every request.

use serde::Serialize;

use crate::error::{AllocError, Result};

/// Largest time value accepted anywhere in a run: dose durations, the gap,
/// and every field of a request.
///
/// Occupancy is stored densely, one cell per time unit, so this also bounds
/// the memory of a single timeline to a small multiple of `MAX_TIME` cells.
pub const MAX_TIME: usize = 1_000_000;

/// Durations and gap fixed for the whole run.
///
/// Constructed once through [`RunConfig::new`] and then only copied; the
/// allocator and every timeline it creates hold their own copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunConfig {
    /// Length of the first interval, in time units.
    pub first_dose: usize,
    /// Length of the second interval, in time units.
    pub second_dose: usize,
    /// Minimum delay between the end of the first interval and the opening
    /// of the second window, applied on top of each request's own delay.
    pub gap: usize,
}

impl RunConfig {
    /// Validate and build a configuration.
    ///
    /// # Errors
    /// Returns `AllocError::InvalidConfig` if either dose duration is zero or
    /// any value exceeds [`MAX_TIME`].
    pub fn new(first_dose: usize, second_dose: usize, gap: usize) -> Result<Self> {
        let config = Self {
            first_dose,
            second_dose,
            gap,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check the constraints [`RunConfig::new`] enforces.
    ///
    /// # Errors
    /// Returns `AllocError::InvalidConfig` on a zero duration or a value
    /// beyond [`MAX_TIME`].
    pub fn validate(&self) -> Result<()> {
        if self.first_dose == 0 {
            return Err(AllocError::InvalidConfig(
                "first dose duration must be at least 1".to_string(),
            ));
        }
        if self.second_dose == 0 {
            return Err(AllocError::InvalidConfig(
                "second dose duration must be at least 1".to_string(),
            ));
        }
        let limited = [
            ("first dose duration", self.first_dose),
            ("second dose duration", self.second_dose),
            ("gap", self.gap),
        ];
        for (name, value) in limited {
            if value > MAX_TIME {
                return Err(AllocError::InvalidConfig(format!(
                    "{} of {} exceeds the limit of {}",
                    name, value, MAX_TIME
                )));
            }
        }
        Ok(())
    }

    /// The longer of the two dose durations.
    pub fn longest_dose(&self) -> usize {
        self.first_dose.max(self.second_dose)
    }
}

/// Whether time values and timeline ids are counted from 0 or from 1 in the
/// external encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndexBase {
    Zero,
    /// Test cases are written one-based.
    #[default]
    One,
}

impl IndexBase {
    /// Amount added to internal values when writing output.
    pub fn offset(self) -> usize {
        match self {
            IndexBase::Zero => 0,
            IndexBase::One => 1,
        }
    }
}
