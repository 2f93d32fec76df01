//! # dose-engine
//!
//! Online allocation of two-interval requests onto the fewest parallel
//! resource timelines.
//!
//! Each request needs a first interval that starts inside a fixed window and a
//! second interval that starts inside a window derived from where the first one
//! ends. Requests arrive one at a time and are committed immediately; when no
//! existing timeline can host a request, a new one is opened. Placements are
//! chosen greedily by a proximity score that prefers slots flush against
//! occupied cells or leaving gaps that whole doses can fill later.
//!
//! ## Quick start
//!
//! ```rust
//! use dose_engine::{schedule_all, IndexBase, Request, RequestId, RunConfig};
//!
//! let config = RunConfig::new(3, 3, 0).unwrap();
//! let request = Request::new(RequestId(1), 0, 0, 0, 3).unwrap();
//! let schedule = schedule_all(config, &[request]).unwrap();
//!
//! assert_eq!(schedule.timeline_count, 1);
//! assert_eq!(schedule.to_text(IndexBase::Zero), "0, 0, 3, 0\n1\n");
//! ```
//!
//! ## Modules
//!
//! - [`config`] -- run-wide durations and gap, index base of the external format
//! - [`request`] -- incoming requests
//! - [`slot`] -- candidate placements
//! - [`timeline`] -- per-unit occupancy, free-run search, neighbor distances
//! - [`scorer`] -- proximity scoring of candidate pairs
//! - [`allocator`] -- the greedy commit/grow loop
//! - [`input`] -- header and request-stream decoding
//! - [`output`] -- text and JSON output
//! - [`error`] -- Error types

pub mod allocator;
pub mod config;
pub mod error;
pub mod input;
pub mod output;
pub mod request;
pub mod scorer;
pub mod slot;
pub mod timeline;

pub use allocator::{schedule_all, Allocator, Placement};
pub use config::{IndexBase, RunConfig, MAX_TIME};
pub use error::AllocError;
pub use input::{parse_request, parse_requests, RequestStream};
pub use output::{PlacementRecord, Schedule};
pub use request::{Request, RequestId};
pub use scorer::{ProximityScorer, MAX_PAIR_SCORE};
pub use slot::{CandidateSlot, TimelineId};
pub use timeline::{Cell, Distance, ResourceTimeline};
