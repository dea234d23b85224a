use crate::codec;
use crate::connection::{ConnectionEvent, ConnectionStatus, OutboundLink};
use crate::error::send::SendError;
use crate::heartbeat::{HeartbeatThresholds, LivenessSignal};
use crate::reconcile::{EntityKey, FieldPatch, OperatingMode};
use crate::session::ControlSession;
use crate::tests::wire;

use models::{
    AlarmMute, ControllerMessage, LogEventCode, MessageType, Parameters, ParametersRequest,
    SensorMeasurements,
};

use tokio::sync::mpsc;

fn session() -> ControlSession {
    ControlSession::new(HeartbeatThresholds::default(), 0)
}

/// Open connection `id` on `session`; returns the receiving end of its outbound queue.
fn open(session: &mut ControlSession, id: u64, capacity: usize) -> mpsc::Receiver<Vec<u8>> {
    let (frames, outbound) = mpsc::channel(capacity);
    session.handle_connection_event(ConnectionEvent::Connecting { id, attempt: 1 }, 0);
    session.handle_connection_event(
        ConnectionEvent::Opened {
            id,
            link: OutboundLink::new(id, frames),
        },
        0,
    );
    outbound
}

fn parameters_frame(fio2: f32) -> Vec<u8> {
    wire(Parameters {
        fio2: Some(fio2),
        ..Default::default()
    })
}

/// **VALUE**: Frames tagged with an old connection id are never routed once a new
/// connection has opened.
///
/// **WHY THIS MATTERS**: Events from a closed socket can still be queued when the
/// next one opens. Routing them would apply stale controller state on top of the
/// fresh session.
///
/// **BUG THIS CATCHES**: A session that routes every `Received` event regardless of
/// which connection produced it.
#[test]
fn given_reconnected_session_when_frame_from_old_connection_arrives_then_not_routed() {
    // GIVEN: Connection 1 opened then closed, connection 2 opened
    let mut session = session();
    let _first = open(&mut session, 1, 4);
    session.handle_connection_event(ConnectionEvent::Closed { id: 1 }, 0);
    let _second = open(&mut session, 2, 4);

    // WHEN: A frame tagged with connection 1 arrives
    session.handle_connection_event(
        ConnectionEvent::Received {
            id: 1,
            payload: parameters_frame(21.0),
        },
        10,
    );

    // THEN: Dropped and counted
    assert!(session.state().parameters.is_none());
    assert_eq!(session.stale_frames(), 1);

    // WHEN: A frame from connection 2 arrives
    session.handle_connection_event(
        ConnectionEvent::Received {
            id: 2,
            payload: parameters_frame(40.0),
        },
        20,
    );

    // THEN: Routed
    assert_eq!(
        session.state().parameters.as_ref().and_then(|p| p.fio2),
        Some(40.0)
    );
}

#[test]
fn given_closed_connection_when_frame_for_it_arrives_then_not_routed() {
    let mut session = session();
    let _outbound = open(&mut session, 3, 4);
    session.handle_connection_event(ConnectionEvent::Closed { id: 3 }, 0);

    session.handle_connection_event(
        ConnectionEvent::Received {
            id: 3,
            payload: parameters_frame(30.0),
        },
        0,
    );

    assert!(session.state().parameters.is_none());
    assert_eq!(session.open_connection(), None);
    assert_eq!(session.connection().status, ConnectionStatus::Closed);
}

/// **VALUE**: A silent controller produces one connection-down fault entry, and a
/// fresh measurement clears it.
#[test]
fn given_silent_controller_when_ticking_past_threshold_then_fault_logged_once_and_cleared_on_frame() {
    // GIVEN: A session that has heard one measurement at t=1000
    let mut session = session();
    let _outbound = open(&mut session, 1, 16);
    session.receive_frame(&wire(SensorMeasurements::default()), 1_000);

    // WHEN: Ticks pass the down threshold
    assert!(session.tick(3_999).is_empty());
    let signals = session.tick(4_001);
    let repeat = session.tick(5_000);

    // THEN: One ConnectionDown and one active fault entry
    assert_eq!(
        signals,
        vec![LivenessSignal::ConnectionDown { last_seen: 1_000 }]
    );
    assert!(repeat.is_empty());
    assert!(
        session
            .state()
            .event_log
            .has_active(LogEventCode::FrontendBackendConnectionDown)
    );
    assert!(!session.is_live(5_000));

    // WHEN: A measurement arrives
    let signals = session.receive_frame(&wire(SensorMeasurements::default()), 5_001);

    // THEN: Restored and the fault entry is no longer active
    assert_eq!(
        signals,
        vec![LivenessSignal::ConnectionRestored { last_seen: 5_001 }]
    );
    assert!(
        !session
            .state()
            .event_log
            .has_active(LogEventCode::FrontendBackendConnectionDown)
    );
    assert!(session.is_live(5_001));
}

#[test]
fn given_non_liveness_frames_only_when_ticking_then_connection_still_goes_down() {
    let mut session = session();
    let _outbound = open(&mut session, 1, 16);

    session.receive_frame(&parameters_frame(40.0), 2_000);
    let signals = session.tick(3_001);

    assert_eq!(
        signals,
        vec![LivenessSignal::ConnectionDown { last_seen: 0 }]
    );
}

#[test]
fn given_open_connection_when_ticking_then_expected_log_event_sent() {
    let mut session = session();
    let mut outbound = open(&mut session, 1, 16);

    session.tick(100);

    let bytes = outbound.try_recv().expect("a frame should be queued");
    assert_eq!(bytes[0], MessageType::ExpectedLogEvent.tag());
}

#[test]
fn given_no_connection_when_ticking_then_nothing_sent_and_no_error() {
    let mut session = session();

    assert!(session.tick(100).is_empty());
    assert_eq!(session.open_connection(), None);
}

/// **VALUE**: A full per-connection buffer refuses the frame instead of growing.
///
/// **BUG THIS CATCHES**: An unbounded outbound queue would hold every request made
/// during a stalled connection and flush them all at once later.
#[test]
fn given_full_outbound_buffer_when_sending_then_backpressure_error() {
    let mut session = session();
    let _outbound = open(&mut session, 1, 1);

    session.set_screen_lock(true).expect("first frame fits");
    let second = session.set_screen_lock(false);

    assert!(matches!(second, Err(SendError::Backpressure { .. })));
}

#[test]
fn given_connection_whose_writer_is_gone_when_confirming_then_not_connected() {
    // GIVEN: Active session with an unsaved edit and a dropped outbound receiver
    let mut session = session();
    let outbound = open(&mut session, 1, 4);
    session.receive_frame(&parameters_frame(40.0), 0);
    session.activate().expect("activate");
    session.edit(FieldPatch::Parameters(ParametersRequest {
        fio2: Some(60.0),
        ..Default::default()
    }));
    drop(outbound);

    // WHEN: Confirming
    let result = session.confirm(EntityKey::Parameters);

    // THEN: Refused, edit still unsaved
    assert!(result.is_err_and(|e| e.is_not_connected()));
    assert!(session.has_unsaved_changes(EntityKey::Parameters));
}

#[test]
fn given_reported_mute_sequence_when_requesting_mute_then_sequence_advances() {
    let mut session = session();
    let mut outbound = open(&mut session, 1, 4);
    session.receive_frame(
        &wire(AlarmMute {
            active: Some(false),
            seq_num: Some(41),
            ..Default::default()
        }),
        0,
    );

    session.set_alarm_mute(true).expect("mute request");

    let bytes = outbound.try_recv().expect("a frame should be queued");
    let frame = codec::decode(&bytes).expect("decode");
    match frame.into_message() {
        ControllerMessage::AlarmMuteRequest(request) => {
            assert_eq!(request.active, Some(true));
            assert_eq!(request.seq_num, Some(42));
        }
        other => panic!("Expected AlarmMuteRequest, got {other:?}"),
    }
}

#[test]
fn given_session_when_snapshot_taken_then_reflects_mode_connection_and_unsaved_keys() {
    let mut session = session();
    let _outbound = open(&mut session, 5, 4);
    session.receive_frame(&parameters_frame(40.0), 0);
    session.activate().expect("activate");
    session.edit(FieldPatch::Parameters(ParametersRequest {
        fio2: Some(60.0),
        ..Default::default()
    }));

    let snapshot = session.snapshot(10);

    assert_eq!(snapshot.mode, OperatingMode::Active);
    assert_eq!(snapshot.connection.status, ConnectionStatus::Open);
    assert_eq!(snapshot.connection.connection_id, Some(5));
    assert!(snapshot.parameters.has_unsaved_changes());
    assert!(snapshot.parameters.unsaved_keys.contains("fio2"));
    assert_eq!(snapshot.parameters.current.fio2, Some(40.0));
    assert_eq!(snapshot.parameters.draft.fio2, Some(60.0));
}

/// **VALUE**: The published snapshot serializes for the presentation layer,
/// with field names and key sets a UI can bind to.
#[test]
fn given_snapshot_with_unsaved_edit_when_serialized_to_json_then_keys_and_status_present() {
    let mut session = session();
    let _outbound = open(&mut session, 2, 4);
    session.receive_frame(&parameters_frame(40.0), 0);
    session.activate().expect("activate");
    session.edit(FieldPatch::Parameters(ParametersRequest {
        fio2: Some(60.0),
        ..Default::default()
    }));

    let json = serde_json::to_value(session.snapshot(10)).expect("snapshot serializes");

    assert_eq!(json["connection"]["status"], "Open");
    assert_eq!(json["mode"], "Active");
    assert_eq!(json["parameters"]["unsaved_keys"], serde_json::json!(["fio2"]));
    assert_eq!(json["taken_at"], 10);
}
