//! Tests for resource timelines: free-run search, neighbor distances, probing,
//! and commit.

use dose_engine::{
    AllocError, CandidateSlot, Cell, Distance, RequestId, ResourceTimeline, RunConfig, TimelineId,
};

// ── Helpers ─────────────────────────────────────────────────────────────────

fn timeline(first: usize, second: usize) -> ResourceTimeline {
    ResourceTimeline::new(TimelineId(0), RunConfig::new(first, second, 0).unwrap())
}

fn slot(start: usize, length: usize) -> CandidateSlot {
    CandidateSlot::new(TimelineId(0), start, length)
}

fn starts(slots: &[CandidateSlot]) -> Vec<usize> {
    slots.iter().map(|s| s.start).collect()
}

// ── extend ──────────────────────────────────────────────────────────────────

#[test]
fn extend_grows_and_never_shrinks() {
    let mut tl = timeline(3, 3);
    assert!(tl.is_empty());

    tl.extend(5);
    assert_eq!(tl.len(), 5);
    tl.extend(3);
    assert_eq!(tl.len(), 5, "extend must not shrink");
    assert!(tl.cells().iter().all(|c| c.is_free()));
}

// ── find_free_runs ──────────────────────────────────────────────────────────

#[test]
fn empty_timeline_enumerates_up_to_horizon() {
    // Horizon = high water mark (0) + longest dose (3).
    let tl = timeline(3, 3);
    let slots = tl.find_free_runs(3, 0, 10);
    assert_eq!(starts(&slots), vec![0, 1, 2, 3]);
    assert!(slots.iter().all(|s| s.length == 3 && s.timeline == TimelineId(0)));
}

#[test]
fn every_fitting_start_is_emitted() {
    let mut tl = timeline(3, 3);
    tl.commit(RequestId(1), &slot(2, 3)).unwrap();

    // Cells 2..5 owned, horizon = 5 + 3 = 8.
    let slots = tl.find_free_runs(2, 0, 10);
    assert_eq!(starts(&slots), vec![0, 5, 6, 7, 8]);
}

#[test]
fn window_bounds_the_start_not_the_end() {
    let mut tl = timeline(3, 3);
    tl.commit(RequestId(1), &slot(0, 3)).unwrap();

    assert!(tl.find_free_runs(3, 0, 2).is_empty());
    assert_eq!(starts(&tl.find_free_runs(3, 0, 3)), vec![3]);
}

#[test]
fn window_beyond_horizon_still_offers_its_first_start() {
    let tl = timeline(3, 3);
    assert_eq!(starts(&tl.find_free_runs(3, 50, 60)), vec![50]);
}

#[test]
fn inverted_range_is_empty() {
    let tl = timeline(3, 3);
    assert!(tl.find_free_runs(3, 5, 4).is_empty());
}

#[test]
fn single_unit_window_on_occupied_cell_is_empty() {
    let mut tl = timeline(1, 1);
    tl.commit(RequestId(1), &slot(4, 1)).unwrap();
    assert!(tl.find_free_runs(1, 4, 4).is_empty());
    assert_eq!(starts(&tl.find_free_runs(1, 3, 5)), vec![3, 5]);
}

// ── distance_to_neighbors ───────────────────────────────────────────────────

#[test]
fn distances_between_committed_neighbors() {
    let mut tl = timeline(3, 3);
    tl.commit(RequestId(1), &slot(0, 3)).unwrap();
    tl.commit(RequestId(2), &slot(10, 3)).unwrap();

    assert_eq!(
        tl.distance_to_neighbors(&slot(5, 3)),
        (Distance::Finite(2), Distance::Finite(2))
    );
}

#[test]
fn distance_at_time_zero_is_zero() {
    let tl = timeline(3, 3);
    let (before, _) = tl.distance_to_neighbors(&slot(0, 3));
    assert_eq!(before, Distance::Finite(0));
}

#[test]
fn after_past_last_commit_is_infinite() {
    let mut tl = timeline(3, 3);
    tl.commit(RequestId(1), &slot(0, 3)).unwrap();
    tl.commit(RequestId(2), &slot(10, 3)).unwrap();

    assert_eq!(
        tl.distance_to_neighbors(&slot(13, 3)),
        (Distance::Finite(0), Distance::Infinite)
    );
}

#[test]
fn before_counts_unstored_free_cells() {
    let mut tl = timeline(3, 3);
    tl.commit(RequestId(1), &slot(10, 3)).unwrap();

    // Cells 13..20 are past the stored occupancy but still free.
    assert_eq!(
        tl.distance_to_neighbors(&slot(20, 3)),
        (Distance::Finite(7), Distance::Infinite)
    );
}

// ── joint_distances ─────────────────────────────────────────────────────────

#[test]
fn joint_distances_see_each_other() {
    let mut tl = timeline(3, 3);
    let distances = tl.joint_distances(&slot(0, 3), &slot(5, 3)).unwrap();

    assert_eq!(
        distances,
        [
            Distance::Finite(0),
            Distance::Finite(2),
            Distance::Finite(2),
            Distance::Infinite,
        ]
    );
}

#[test]
fn joint_distances_of_adjacent_slots_are_flush() {
    let mut tl = timeline(3, 3);
    let distances = tl.joint_distances(&slot(0, 3), &slot(3, 3)).unwrap();

    assert_eq!(
        distances,
        [
            Distance::Finite(0),
            Distance::Finite(0),
            Distance::Finite(0),
            Distance::Infinite,
        ]
    );
}

#[test]
fn probes_are_removed_after_measuring() {
    let mut tl = timeline(3, 3);
    tl.commit(RequestId(1), &slot(20, 3)).unwrap();
    tl.joint_distances(&slot(2, 3), &slot(9, 3)).unwrap();

    assert!(!tl.cells().contains(&Cell::Probe));
    assert_eq!(tl.high_water_mark(), 23, "probing must not move the high water mark");
}

#[test]
fn probe_on_occupied_cell_is_a_violation() {
    let mut tl = timeline(3, 3);
    tl.commit(RequestId(9), &slot(5, 1)).unwrap();

    let err = tl.joint_distances(&slot(0, 3), &slot(5, 3)).unwrap_err();
    assert!(matches!(err, AllocError::InvariantViolation { timeline: TimelineId(0), .. }));
    assert_eq!(tl.cell(5), Cell::OwnedBy(RequestId(9)));
}

#[test]
fn joint_distances_reject_out_of_order_slots() {
    let mut tl = timeline(3, 3);
    let err = tl.joint_distances(&slot(5, 3), &slot(0, 3)).unwrap_err();
    assert!(matches!(err, AllocError::InvariantViolation { .. }));
}

#[test]
fn joint_distances_reject_foreign_slots() {
    let mut tl = timeline(3, 3);
    let foreign = CandidateSlot::new(TimelineId(1), 5, 3);
    assert!(tl.joint_distances(&slot(0, 3), &foreign).is_err());
}

// ── commit ──────────────────────────────────────────────────────────────────

#[test]
fn commit_marks_cells_and_raises_high_water_mark() {
    let mut tl = timeline(3, 3);
    tl.commit(RequestId(4), &slot(2, 3)).unwrap();

    assert_eq!(tl.high_water_mark(), 5);
    assert_eq!(tl.len(), 5);
    assert_eq!(tl.cell(1), Cell::Free);
    assert_eq!(tl.cell(2), Cell::OwnedBy(RequestId(4)));
    assert_eq!(tl.cell(4), Cell::OwnedBy(RequestId(4)));
    assert_eq!(tl.cell(5), Cell::Free);
}

#[test]
fn high_water_mark_never_decreases() {
    let mut tl = timeline(3, 3);
    tl.commit(RequestId(1), &slot(10, 3)).unwrap();
    tl.commit(RequestId(2), &slot(0, 3)).unwrap();
    assert_eq!(tl.high_water_mark(), 13);
}

#[test]
fn double_booking_is_rejected_without_side_effects() {
    let mut tl = timeline(3, 3);
    tl.commit(RequestId(1), &slot(0, 3)).unwrap();

    let err = tl.commit(RequestId(2), &slot(2, 3)).unwrap_err();
    assert!(matches!(err, AllocError::InvariantViolation { .. }));
    assert_eq!(tl.cell(3), Cell::Free);
    assert_eq!(tl.cell(4), Cell::Free);
    assert_eq!(tl.high_water_mark(), 3);
}

#[test]
fn commit_rejects_slot_for_another_timeline() {
    let mut tl = timeline(3, 3);
    let foreign = CandidateSlot::new(TimelineId(3), 0, 3);
    assert!(tl.commit(RequestId(1), &foreign).is_err());
    assert!(tl.is_empty());
}

// ── Display ─────────────────────────────────────────────────────────────────

#[test]
fn display_renders_one_symbol_per_cell() {
    let mut tl = timeline(3, 2);
    tl.commit(RequestId(1), &slot(0, 3)).unwrap();
    tl.commit(RequestId(2), &slot(4, 2)).unwrap();
    assert_eq!(tl.to_string(), "111-22");
}
