//! Greedy online allocation of two-dose requests onto a growing timeline pool.
//!
//! For each request, every first-interval candidate on every timeline is paired
//! with every second-interval candidate its derived window allows, each pair is
//! scored by [`ProximityScorer`], and the best pair is committed. When no pair
//! exists the pool grows by one empty timeline and the request is retried once.

use tracing::{debug, instrument, trace};

use crate::config::RunConfig;
use crate::error::{AllocError, Result};
use crate::output::Schedule;
use crate::request::{Request, RequestId};
use crate::scorer::{ProximityScorer, MAX_PAIR_SCORE};
use crate::slot::{CandidateSlot, TimelineId};
use crate::timeline::{Distance, ResourceTimeline};

/// A committed request: both intervals and the score that selected them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub request: RequestId,
    pub first: CandidateSlot,
    pub second: CandidateSlot,
    pub score: u32,
}

/// Owner of the timeline pool for one run.
#[derive(Debug, Clone)]
pub struct Allocator {
    config: RunConfig,
    scorer: ProximityScorer,
    timelines: Vec<ResourceTimeline>,
}

impl Allocator {
    /// Create an allocator with an empty pool.
    pub fn new(config: RunConfig) -> Self {
        Self {
            config,
            scorer: ProximityScorer::new(&config),
            timelines: Vec::new(),
        }
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    pub fn timeline_count(&self) -> usize {
        self.timelines.len()
    }

    pub fn timelines(&self) -> &[ResourceTimeline] {
        &self.timelines
    }

    /// Place both intervals of `request`, opening a new timeline if no
    /// existing one can host it.
    ///
    /// Either both intervals are committed or the pool is left untouched
    /// apart from growth.
    ///
    /// # Errors
    /// Returns `AllocError::InvalidConfig` or `AllocError::InvalidRequest` if
    /// the run configuration or the request fails validation, and
    /// `AllocError::InvariantViolation` if timeline state turns out to be
    /// inconsistent, including a fresh timeline that cannot host the request.
    #[instrument(level = "debug", skip_all, fields(request = %request.id))]
    pub fn schedule(&mut self, request: &Request) -> Result<Placement> {
        self.config.validate()?;
        request.validate()?;

        if let Some(placement) = self.try_place(request)? {
            return Ok(placement);
        }

        self.grow();
        self.try_place(request)?
            .ok_or_else(|| AllocError::InvariantViolation {
                timeline: TimelineId(self.timelines.len() - 1),
                message: format!("fresh timeline cannot host request {}", request.id),
            })
    }

    fn grow(&mut self) {
        let id = TimelineId(self.timelines.len());
        self.timelines.push(ResourceTimeline::new(id, self.config));
        debug!(timelines = self.timelines.len(), "opened a new timeline");
    }

    fn try_place(&mut self, request: &Request) -> Result<Option<Placement>> {
        let Some(best) = self.best_pair(request)? else {
            return Ok(None);
        };

        self.timelines[best.first.timeline.0].commit(request.id, &best.first)?;
        self.timelines[best.second.timeline.0].commit(request.id, &best.second)?;
        Ok(Some(best))
    }

    /// Highest-scoring (first, second) pair over the current pool. Ties keep
    /// the pair found first, so the result depends only on pool state.
    fn best_pair(&mut self, request: &Request) -> Result<Option<Placement>> {
        let config = self.config;
        let first_candidates = self.candidates(
            config.first_dose,
            request.first_window_start,
            request.first_window_end,
        );

        let mut best: Option<Placement> = None;
        'search: for first in &first_candidates {
            let (window_start, window_end) = request.second_window(first.end(), config.gap);
            let second_candidates = self.candidates(config.second_dose, window_start, window_end);

            for second in &second_candidates {
                let distances = self.pair_distances(first, second)?;
                let score = self.scorer.pair_score(distances);
                if best.as_ref().is_none_or(|b| score > b.score) {
                    trace!(score, ?first, ?second, "new best pair");
                    best = Some(Placement {
                        request: request.id,
                        first: *first,
                        second: *second,
                        score,
                    });
                    if score == MAX_PAIR_SCORE {
                        break 'search;
                    }
                }
            }
        }
        Ok(best)
    }

    fn candidates(&self, length: usize, range_start: usize, range_end: usize) -> Vec<CandidateSlot> {
        self.timelines
            .iter()
            .flat_map(|tl| tl.find_free_runs(length, range_start, range_end))
            .collect()
    }

    fn pair_distances(
        &mut self,
        first: &CandidateSlot,
        second: &CandidateSlot,
    ) -> Result<[Distance; 4]> {
        if first.timeline == second.timeline {
            return self.timelines[first.timeline.0].joint_distances(first, second);
        }

        let (first_before, first_after) =
            self.timelines[first.timeline.0].distance_to_neighbors(first);
        let (second_before, second_after) =
            self.timelines[second.timeline.0].distance_to_neighbors(second);
        Ok([first_before, first_after, second_before, second_after])
    }
}

/// Schedule `requests` in order on a fresh pool.
///
/// The batch counterpart of feeding requests to [`Allocator::schedule`] one
/// at a time; placements are identical.
pub fn schedule_all(config: RunConfig, requests: &[Request]) -> Result<Schedule> {
    let mut allocator = Allocator::new(config);
    let placements = requests
        .iter()
        .map(|request| allocator.schedule(request))
        .collect::<Result<Vec<_>>>()?;

    Ok(Schedule {
        config,
        placements,
        timeline_count: allocator.timeline_count(),
    })
}
