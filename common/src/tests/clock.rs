use crate::{Clock, ManualClock, SystemClock};

/// **VALUE**: Clones of a `ManualClock` share one reading.
///
/// **WHY THIS MATTERS**: Tests hand one clone to the session and keep another to drive
/// time. If clones diverged, heartbeat tests would silently evaluate against a frozen clock.
#[test]
fn given_cloned_manual_clock_when_advanced_then_all_clones_observe_new_time() {
    // GIVEN: A manual clock and a clone
    let clock = ManualClock::starting_at(1_000);
    let observer = clock.clone();

    // WHEN: Advancing the original
    let now = clock.advance(2_999);

    // THEN: Both read the same instant
    assert_eq!(now, 3_999);
    assert_eq!(observer.now(), 3_999);

    clock.set(10);
    assert_eq!(observer.now(), 10);
}

#[test]
fn given_system_clock_when_read_twice_then_time_does_not_go_backwards() {
    let clock = SystemClock;
    let first = clock.now();
    let second = clock.now();
    assert!(second >= first);
    assert!(first > 0, "System clock should be past the epoch");
}
