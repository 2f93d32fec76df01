//! Output assembly: the external text format and a JSON report.

use std::fmt;

use serde::Serialize;

use crate::allocator::Placement;
use crate::config::{IndexBase, RunConfig};
use crate::error::Result;

/// Result of a complete run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    pub config: RunConfig,
    /// One entry per request, in arrival order.
    pub placements: Vec<Placement>,
    /// Number of timelines the run needed.
    pub timeline_count: usize,
}

/// A placement with times and timeline ids shifted into the external index base.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlacementRecord {
    pub request: usize,
    pub first_start: usize,
    pub first_timeline: usize,
    pub second_start: usize,
    pub second_timeline: usize,
    pub score: u32,
}

impl PlacementRecord {
    pub fn new(placement: &Placement, base: IndexBase) -> Self {
        let offset = base.offset();
        Self {
            request: placement.request.0,
            first_start: placement.first.start + offset,
            first_timeline: placement.first.timeline.0 + offset,
            second_start: placement.second.start + offset,
            second_timeline: placement.second.timeline.0 + offset,
            score: placement.score,
        }
    }
}

impl fmt::Display for PlacementRecord {
    /// `start1, timeline1, start2, timeline2`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {}, {}, {}",
            self.first_start, self.first_timeline, self.second_start, self.second_timeline
        )
    }
}

#[derive(Serialize)]
struct ScheduleReport<'a> {
    config: &'a RunConfig,
    placements: Vec<PlacementRecord>,
    timeline_count: usize,
}

impl Schedule {
    fn records(&self, base: IndexBase) -> Vec<PlacementRecord> {
        self.placements
            .iter()
            .map(|p| PlacementRecord::new(p, base))
            .collect()
    }

    /// One line per placement followed by the timeline count, each line
    /// newline-terminated.
    pub fn to_text(&self, base: IndexBase) -> String {
        let mut out = String::new();
        for record in self.records(base) {
            out.push_str(&record.to_string());
            out.push('\n');
        }
        out.push_str(&self.timeline_count.to_string());
        out.push('\n');
        out
    }

    /// Pretty-printed JSON report of the run.
    pub fn to_json(&self, base: IndexBase) -> Result<String> {
        let report = ScheduleReport {
            config: &self.config,
            placements: self.records(base),
            timeline_count: self.timeline_count,
        };
        Ok(serde_json::to_string_pretty(&report)?)
    }
}
