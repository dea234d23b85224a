use crate::state::EventLog;

use models::{ActiveLogEvents, LogEvent, LogEventCode, LogEventType, NextLogEvents};

fn event(id: u32, code: LogEventCode) -> LogEvent {
    LogEvent {
        id,
        time: u64::from(id) * 1_000,
        code: code as i32,
        event_type: LogEventType::Patient as i32,
        ..Default::default()
    }
}

fn batch(session_id: u32, ids: &[u32]) -> NextLogEvents {
    NextLogEvents {
        session_id,
        total: ids.len() as u32,
        remaining: 0,
        elements: ids
            .iter()
            .map(|&id| event(id, LogEventCode::Spo2TooLow))
            .collect(),
        ..Default::default()
    }
}

fn ids(log: &EventLog) -> Vec<u32> {
    log.elements().iter().map(|event| event.id).collect()
}

#[test]
fn given_empty_log_when_first_batch_arrives_then_batch_taken_whole() {
    let mut log = EventLog::default();

    log.apply_next(batch(7, &[0, 1, 2]));

    assert_eq!(ids(&log), vec![0, 1, 2]);
    assert_eq!(log.expected_id(), 3);
    assert_eq!(log.session_id(), 7);
}

/// **VALUE**: Overlapping batches do not duplicate entries.
///
/// **WHY THIS MATTERS**: The controller resends from whatever id the panel last
/// reported; a late `ExpectedLogEvent` means the next batch overlaps what we have.
#[test]
fn given_overlapping_batch_when_merged_then_entries_below_expected_id_are_not_duplicated() {
    // GIVEN: Entries 0..=2 stored
    let mut log = EventLog::default();
    log.apply_next(batch(1, &[0, 1, 2]));

    // WHEN: A batch starting below the expected id arrives
    log.apply_next(batch(1, &[2, 3, 4]));

    // THEN: Each id appears once and the cursor moves past the last one
    assert_eq!(ids(&log), vec![0, 1, 2, 3, 4]);
    assert_eq!(log.expected_id(), 5);
}

#[test]
fn given_empty_first_batch_when_merged_then_expected_id_is_zero() {
    let mut log = EventLog::default();

    log.apply_next(batch(1, &[]));

    assert!(log.elements().is_empty());
    assert_eq!(log.expected_id(), 0);
}

/// **VALUE**: A locally raised fault is active until the controller's own log replaces it.
///
/// **BUG THIS CATCHES**: Would catch `apply_active` wiping panel-local entries
/// (the fault would vanish on the next active-id push) or `apply_next` keeping
/// them (the fault would linger after the controller takes over).
#[test]
fn given_ephemeral_fault_when_controller_pushes_then_active_survives_but_next_batch_removes_it() {
    // GIVEN: A log with one controller entry and one ephemeral fault
    let mut log = EventLog::default();
    log.apply_next(batch(1, &[0]));
    let fault_id = log.add_ephemeral(
        LogEventCode::FrontendBackendConnectionDown,
        LogEventType::System,
        42,
    );

    assert_eq!(fault_id, 1, "Ephemeral ids start at the expected id");
    assert!(log.is_ephemeral(fault_id));
    assert!(log.has_active(LogEventCode::FrontendBackendConnectionDown));

    // WHEN: The controller pushes its active ids
    log.apply_active(ActiveLogEvents { id: vec![0] });

    // THEN: The ephemeral fault is still active
    assert!(log.has_active(LogEventCode::FrontendBackendConnectionDown));
    assert!(log.active_ids().contains(&0));

    // WHEN: The next controller batch arrives
    log.apply_next(batch(1, &[1, 2]));

    // THEN: The ephemeral entry is gone and its id now belongs to the controller entry
    assert!(!log.has_active(LogEventCode::FrontendBackendConnectionDown));
    assert!(!log.is_ephemeral(1));
    assert_eq!(ids(&log), vec![0, 1, 2]);
}

#[test]
fn given_two_ephemeral_entries_when_added_then_ids_do_not_collide() {
    let mut log = EventLog::default();
    log.apply_next(batch(1, &[0, 1]));

    let code = LogEventCode::FrontendBackendConnectionDown;

    let first = log.add_ephemeral(code, LogEventType::System, 1);
    let second = log.add_ephemeral(code, LogEventType::System, 2);

    assert_ne!(first, second);
}

#[test]
fn given_active_ephemeral_fault_when_deactivated_then_no_longer_active_but_still_listed() {
    let mut log = EventLog::default();
    let id = log.add_ephemeral(
        LogEventCode::FrontendBackendConnectionDown,
        LogEventType::System,
        10,
    );

    let cleared = log.deactivate_ephemeral(LogEventCode::FrontendBackendConnectionDown);

    assert_eq!(cleared, 1);
    assert!(!log.has_active(LogEventCode::FrontendBackendConnectionDown));
    assert!(ids(&log).contains(&id));
    assert_eq!(
        log.deactivate_ephemeral(LogEventCode::FrontendBackendConnectionDown),
        0,
        "Second deactivation is a no-op"
    );
}

#[test]
fn given_active_ephemeral_id_when_controller_lists_same_id_then_listed_once() {
    let mut log = EventLog::default();
    log.apply_next(batch(1, &[0]));
    let fault_id = log.add_ephemeral(
        LogEventCode::FrontendBackendConnectionDown,
        LogEventType::System,
        5,
    );

    log.apply_active(ActiveLogEvents {
        id: vec![0, fault_id],
    });

    assert_eq!(log.active_ids(), &[0, fault_id]);
}
