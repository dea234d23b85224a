use crate::helpers::{
    TEST_TIMEOUT, accept, next_frame_of, send_message, start_controller, unreachable_url, wait_for,
};

use link_core::connection::{ConnectionSettings, ConnectionStatus};
use link_core::heartbeat::{HeartbeatThresholds, LivenessSignal};
use link_core::reconcile::{EntityKey, FieldPatch, OperatingMode};
use link_core::session::{SessionHandle, SessionSettings};

use common::ManualClock;

use models::{
    AlarmLimits, AlarmLimitsRequest, ControllerMessage, LogEventCode, MessageType, Range,
    SensorMeasurements,
};

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;

const START: u64 = 1_000_000;

fn settings() -> SessionSettings {
    SessionSettings {
        connection: ConnectionSettings {
            retry_interval: Duration::from_millis(100),
            outbound_capacity: 32,
        },
        thresholds: HeartbeatThresholds::default(),
        clock_tick: Duration::from_millis(20),
    }
}

fn spo2(range: Range) -> AlarmLimits {
    AlarmLimits {
        spo2: Some(range),
        ..Default::default()
    }
}

/// **VALUE**: Full operator round trip over a real socket: the controller reports
/// spo2 limits `{90,100}`, the operator raises the lower bound to 92 and confirms,
/// the controller receives the request and acknowledges it.
///
/// **WHY THIS MATTERS**: This is the path every alarm-limit change takes. Each
/// stage (routing, draft tracking, request encoding, ack settlement) is unit
/// tested, but only this test proves they are wired together in the session task.
///
/// **BUG THIS CATCHES**: Would catch a session that publishes snapshots before
/// applying commands, sends requests on a stale link, or leaves unsaved keys
/// behind after the controller confirms the change.
#[tokio::test]
async fn given_reported_spo2_limits_when_operator_edits_and_confirms_then_controller_receives_request_and_ack_settles() {
    // GIVEN: A session connected to a controller reporting spo2 {90, 100}
    let (listener, url) = start_controller().await;
    let clock = ManualClock::starting_at(START);
    let session = SessionHandle::spawn(url, settings(), Arc::new(clock.clone()));
    let mut controller = accept(&listener).await;

    wait_for(&session, |s| s.connection.status == ConnectionStatus::Open).await;
    send_message(&mut controller, spo2(Range::new(90, 100))).await;
    wait_for(&session, |s| {
        s.alarm_limits.current.spo2 == Some(Range::new(90, 100))
    })
    .await;

    session.activate().await.expect("activate");
    let start = next_frame_of(&mut controller, MessageType::ParametersRequest).await;
    match start.into_message() {
        ControllerMessage::ParametersRequest(request) => {
            assert_eq!(request.ventilating, Some(true))
        }
        other => panic!("Expected ParametersRequest, got {other:?}"),
    }

    // WHEN: The operator raises the lower bound
    session
        .edit(FieldPatch::AlarmLimits(AlarmLimitsRequest {
            spo2: Some(Range::new(92, 100)),
            ..Default::default()
        }))
        .await
        .expect("edit");

    // THEN: Only spo2 is unsaved, visible as soon as the edit returns
    let snapshot = session.snapshot().await;
    assert_eq!(snapshot.mode, OperatingMode::Active);
    assert_eq!(
        snapshot.alarm_limits.unsaved_keys,
        BTreeSet::from(["spo2"])
    );

    // WHEN: Confirmed
    assert!(session.confirm(EntityKey::AlarmLimits).await.expect("confirm"));

    // THEN: The controller receives spo2 {92, 100}
    let frame = next_frame_of(&mut controller, MessageType::AlarmLimitsRequest).await;
    match frame.into_message() {
        ControllerMessage::AlarmLimitsRequest(request) => {
            assert_eq!(request.spo2, Some(Range::new(92, 100)))
        }
        other => panic!("Expected AlarmLimitsRequest, got {other:?}"),
    }
    let snapshot = session.snapshot().await;
    assert_eq!(
        snapshot.alarm_limits.standby.spo2,
        Some(Range::new(92, 100))
    );

    // WHEN: The controller applies and reports the new limits
    send_message(&mut controller, spo2(Range::new(92, 100))).await;

    // THEN: Nothing unsaved, nothing in conflict, and a second confirm sends nothing
    let snapshot = wait_for(&session, |s| {
        s.alarm_limits.current.spo2 == Some(Range::new(92, 100))
    })
    .await;
    assert!(!snapshot.alarm_limits.has_unsaved_changes());
    assert!(snapshot.alarm_limits.conflicting_keys.is_empty());
    assert!(!session.confirm(EntityKey::AlarmLimits).await.expect("confirm"));

    timeout(TEST_TIMEOUT, session.shutdown())
        .await
        .expect("Shutdown timed out");
}

/// **VALUE**: A controller that stops sending measurements is reported down once
/// the clock passes the threshold, and up again on the next measurement.
///
/// **WHY THIS MATTERS**: The socket can stay open while the controller's
/// measurement loop is stuck. Only the heartbeat notices.
#[tokio::test]
async fn given_open_connection_when_measurements_stop_then_liveness_goes_down_and_recovers() {
    // GIVEN: A session that has received one measurement
    let (listener, url) = start_controller().await;
    let clock = ManualClock::starting_at(START);
    let session = SessionHandle::spawn(url, settings(), Arc::new(clock.clone()));
    let mut liveness = session.subscribe_liveness();
    let mut controller = accept(&listener).await;

    wait_for(&session, |s| s.connection.status == ConnectionStatus::Open).await;
    send_message(&mut controller, SensorMeasurements::default()).await;
    wait_for(&session, |s| s.state.last_seen == Some(START)).await;

    // WHEN: The clock moves past the down threshold with no new measurement
    clock.advance(3_001);

    // THEN: ConnectionDown is broadcast and the fault is in the log
    let snapshot = wait_for(&session, |s| s.connection_down).await;
    assert!(!snapshot.is_live);
    assert!(
        snapshot
            .state
            .event_log
            .has_active(LogEventCode::FrontendBackendConnectionDown)
    );
    let signal = next_signal(&mut liveness, |s| {
        matches!(s, LivenessSignal::ConnectionDown { .. })
    })
    .await;
    assert_eq!(signal, LivenessSignal::ConnectionDown { last_seen: START });

    // WHEN: A measurement arrives
    send_message(&mut controller, SensorMeasurements::default()).await;

    // THEN: Restored, and the fault is no longer active
    let snapshot = wait_for(&session, |s| !s.connection_down).await;
    assert!(snapshot.is_live);
    assert!(
        !snapshot
            .state
            .event_log
            .has_active(LogEventCode::FrontendBackendConnectionDown)
    );
    let signal = next_signal(&mut liveness, |s| {
        matches!(s, LivenessSignal::ConnectionRestored { .. })
    })
    .await;
    assert_eq!(
        signal,
        LivenessSignal::ConnectionRestored {
            last_seen: START + 3_001
        }
    );

    timeout(TEST_TIMEOUT, session.shutdown())
        .await
        .expect("Shutdown timed out");
}

#[tokio::test]
async fn given_no_controller_when_activating_then_refused_and_standby_edit_staged() {
    let url = unreachable_url().await;
    let session = SessionHandle::spawn(url, settings(), Arc::new(ManualClock::starting_at(START)));

    let activation = session.activate().await;
    session
        .edit(FieldPatch::AlarmLimits(AlarmLimitsRequest {
            spo2: Some(Range::new(85, 100)),
            ..Default::default()
        }))
        .await
        .expect("edit");

    // Standby: the edit is staged rather than sent, and confirm has nothing to send
    assert!(activation.is_err());
    let snapshot = session.snapshot().await;
    assert_eq!(snapshot.mode, OperatingMode::Standby);
    assert_eq!(
        snapshot.alarm_limits.standby.spo2,
        Some(Range::new(85, 100))
    );
    assert_ne!(snapshot.connection.status, ConnectionStatus::Open);
    assert!(!session.confirm(EntityKey::AlarmLimits).await.expect("confirm"));

    timeout(TEST_TIMEOUT, session.shutdown())
        .await
        .expect("Shutdown timed out");
}

async fn next_signal<F>(
    liveness: &mut tokio::sync::broadcast::Receiver<LivenessSignal>,
    wanted: F,
) -> LivenessSignal
where
    F: Fn(&LivenessSignal) -> bool,
{
    timeout(TEST_TIMEOUT, async {
        loop {
            let signal = liveness.recv().await.expect("Liveness channel closed");
            if wanted(&signal) {
                return signal;
            }
        }
    })
    .await
    .expect("Timed out waiting for a liveness signal")
}
