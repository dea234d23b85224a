use crate::heartbeat::{HeartbeatMonitor, HeartbeatThresholds, LivenessSignal};

const T: u64 = 10_000;

fn monitor() -> HeartbeatMonitor {
    HeartbeatMonitor::new(HeartbeatThresholds::default(), 0)
}

#[test]
fn given_default_thresholds_then_down_is_3000_and_up_is_400() {
    let thresholds = HeartbeatThresholds::default();

    assert_eq!(thresholds.down_ms, 3_000);
    assert_eq!(thresholds.up_ms, 400);
}

/// **VALUE**: The down threshold is strict and sits exactly at 3000 ms.
///
/// **WHY THIS MATTERS**: A frame cadence close to the threshold must not flap the
/// connectivity banner; an off-by-one here shows up as spurious alarms.
///
/// **BUG THIS CATCHES**: Using `>=` instead of `>`, or measuring from the wrong
/// reference time.
#[test]
fn given_last_seen_t_when_evaluated_at_t_plus_2999_then_not_down() {
    let mut monitor = monitor();

    let signals = monitor.evaluate(T + 2_999, Some(T), false);

    assert!(signals.is_empty());
    assert!(!monitor.is_down());
    assert!(monitor.is_live(T + 2_999, Some(T)));
}

#[test]
fn given_last_seen_t_when_evaluated_at_t_plus_3001_then_down() {
    let mut monitor = monitor();

    let signals = monitor.evaluate(T + 3_001, Some(T), false);

    assert_eq!(signals, vec![LivenessSignal::ConnectionDown { last_seen: T }]);
    assert!(monitor.is_down());
    assert!(!monitor.is_live(T + 3_001, Some(T)));
}

/// **VALUE**: A fresh frame right after a loss restores liveness on the same evaluation path.
#[test]
fn given_down_at_t_plus_3001_when_frame_arrives_at_t_plus_3002_then_restored() {
    // GIVEN: Down was raised
    let mut monitor = monitor();
    monitor.evaluate(T + 3_001, Some(T), false);

    // WHEN: A liveness frame refreshes last_seen and evaluation re-runs
    let fresh = T + 3_002;
    let signals = monitor.evaluate(fresh, Some(fresh), false);

    // THEN: Restored, live, and no longer latched down
    assert_eq!(
        signals,
        vec![LivenessSignal::ConnectionRestored { last_seen: fresh }]
    );
    assert!(!monitor.is_down());
    assert!(monitor.is_live(fresh, Some(fresh)));
}

/// **VALUE**: Each signal fires once per transition, not once per tick.
///
/// **BUG THIS CATCHES**: A missing latch would append a connection-down entry to
/// the event log on every clock tick during an outage.
#[test]
fn given_down_raised_when_evaluated_again_then_not_raised_twice() {
    let mut monitor = monitor();
    monitor.evaluate(T + 3_001, Some(T), false);

    let again = monitor.evaluate(T + 4_000, Some(T), false);
    let later = monitor.evaluate(T + 60_000, Some(T), false);

    assert!(again.is_empty());
    assert!(later.is_empty());
    assert!(monitor.is_down());
}

#[test]
fn given_fault_already_logged_when_silence_exceeds_threshold_then_down_not_raised() {
    let mut monitor = monitor();

    let signals = monitor.evaluate(T + 5_000, Some(T), true);

    assert!(signals.is_empty());
    assert!(!monitor.is_down());
}

#[test]
fn given_no_frame_ever_when_evaluated_past_threshold_then_down_measured_from_start() {
    let mut monitor = HeartbeatMonitor::new(HeartbeatThresholds::default(), 1_000);

    assert!(monitor.evaluate(3_999, None, false).is_empty());
    assert_eq!(
        monitor.evaluate(4_001, None, false),
        vec![LivenessSignal::ConnectionDown { last_seen: 1_000 }]
    );
    assert!(!monitor.is_live(4_001, None));
}

/// **VALUE**: The two thresholds are separate comparisons on the same elapsed time.
///
/// **WHY THIS MATTERS**: With a misconfigured up threshold above the down threshold
/// both conditions hold at once; both must be reported, in a stable order, rather
/// than one silently winning.
#[test]
fn given_up_threshold_above_down_when_elapsed_between_then_both_signals_raised_in_order() {
    let mut monitor = HeartbeatMonitor::new(
        HeartbeatThresholds {
            down_ms: 3_000,
            up_ms: 5_000,
        },
        0,
    );

    let signals = monitor.evaluate(T + 4_000, Some(T), false);

    assert_eq!(
        signals,
        vec![
            LivenessSignal::ConnectionDown { last_seen: T },
            LivenessSignal::ConnectionRestored { last_seen: T },
        ]
    );
    assert!(!monitor.is_down(), "Restored ran last and cleared the down latch");
}

#[test]
fn given_subscribers_when_signal_raised_then_each_receives_it_and_dropped_ones_do_not_block() {
    let mut monitor = monitor();
    let mut first = monitor.subscribe();
    let second = monitor.subscribe();
    drop(second);

    monitor.evaluate(T + 3_001, Some(T), false);

    assert_eq!(
        first.try_recv().expect("signal should be delivered"),
        LivenessSignal::ConnectionDown { last_seen: T }
    );
}
