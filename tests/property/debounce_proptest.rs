//! Property-based tests for the debounce state machine

use std::time::Duration;

use proptest::prelude::*;
use tokio::time::Instant;

use diagram_collab::client::sync::DebounceState;

/// Feed events separated by `gaps` and count how many pushes fire,
/// checking the deadline just before each event
fn replay(gaps: &[u64], quiet: Duration) -> (usize, Option<Instant>, Instant) {
    let start = Instant::now();
    let mut now = start;
    let mut state = DebounceState::Idle;
    let mut fired = 0;

    for gap in gaps {
        now += Duration::from_millis(*gap);
        if let Some(deadline) = state.deadline() {
            if state.fire(deadline.min(now)) {
                fired += 1;
            }
        }
        state.on_activity(now, quiet);
    }
    let pending = state.deadline();
    (fired, pending, now)
}

proptest! {
    #[test]
    fn test_one_push_per_quiet_gap(
        gaps in proptest::collection::vec(0u64..1_000, 1..40),
        quiet_ms in 1u64..800,
    ) {
        let quiet = Duration::from_millis(quiet_ms);
        let (fired, pending, last) = replay(&gaps, quiet);

        // every gap after the first event that reaches the quiet period closes a burst
        let closed = gaps.iter().skip(1).filter(|gap| **gap >= quiet_ms).count();
        prop_assert_eq!(fired, closed);
        prop_assert_eq!(pending, Some(last + quiet));
    }

    #[test]
    fn test_fire_never_early(offset_ms in 0u64..2_000, quiet_ms in 1u64..1_000) {
        let start = Instant::now();
        let quiet = Duration::from_millis(quiet_ms);
        let mut state = DebounceState::Idle;
        state.on_activity(start, quiet);

        let due = state.fire(start + Duration::from_millis(offset_ms));
        prop_assert_eq!(due, offset_ms >= quiet_ms);
        prop_assert_eq!(state == DebounceState::Idle, due);
    }
}
