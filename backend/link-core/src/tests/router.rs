use crate::connection::NoLink;
use crate::error::codec::DecodeError;
use crate::error::send::SendError;
use crate::router::MessageRouter;
use crate::state::ControllerState;
use crate::tests::{RecordingSink, wire};

use models::{
    ControllerMessage, MessageType, Parameters, ParametersRequest, RotaryEncoder,
    ScreenStatusRequest, SensorMeasurements,
};

/// **VALUE**: Unknown-tag frames are isolated: no slice changes and the stream keeps working.
///
/// **WHY THIS MATTERS**: A controller running newer firmware may push types this
/// panel does not know. Those must not corrupt state or stall later frames.
///
/// **BUG THIS CATCHES**: Would catch a router that touches `last_seen` or a slice
/// before the decode succeeds, or one that stops routing after the first error.
#[test]
fn given_unknown_tag_frames_when_routed_then_state_unchanged_and_later_frames_route() {
    // GIVEN: Fresh state and router
    let mut router = MessageRouter::new();
    let mut state = ControllerState::default();

    // WHEN: Routing a run of unknown-tag frames
    for tag in [13u8, 99, 200] {
        let result = router.route_bytes(&mut state, &[tag, 0x08, 0x2a], 1_000);
        assert!(matches!(result, Err(DecodeError::UnknownType { .. })));
    }

    // THEN: Nothing changed
    assert_eq!(state, ControllerState::default());
    assert_eq!(router.stats().dropped, 3);
    assert_eq!(router.stats().routed, 0);

    // AND: A valid frame still routes
    let parameters = Parameters {
        fio2: Some(40.0),
        ..Default::default()
    };
    let routed = router
        .route_bytes(&mut state, &wire(parameters.clone()), 2_000)
        .expect("valid frame should route");
    assert_eq!(routed, MessageType::Parameters);
    assert_eq!(state.parameters, Some(parameters));
}

/// **VALUE**: Partial pushes merge field by field.
///
/// **BUG THIS CATCHES**: Replacing the whole slice would wipe `fio2` when the
/// controller pushes only `peep`.
#[test]
fn given_partial_push_when_routed_then_absent_fields_are_kept() {
    let mut router = MessageRouter::new();
    let mut state = ControllerState::default();

    router
        .route_bytes(
            &mut state,
            &wire(Parameters {
                fio2: Some(40.0),
                peep: Some(5.0),
                ..Default::default()
            }),
            0,
        )
        .expect("route");
    router
        .route_bytes(
            &mut state,
            &wire(Parameters {
                peep: Some(8.0),
                ..Default::default()
            }),
            0,
        )
        .expect("route");

    let parameters = state.parameters.expect("parameters slice should be set");
    assert_eq!(parameters.fio2, Some(40.0));
    assert_eq!(parameters.peep, Some(8.0));
}

#[test]
fn given_measurement_and_parameter_frames_when_routed_then_only_measurements_refresh_last_seen() {
    let mut router = MessageRouter::new();
    let mut state = ControllerState::default();

    router
        .route_bytes(&mut state, &wire(Parameters::default()), 500)
        .expect("route");
    assert_eq!(state.last_seen, None);

    router
        .route_bytes(&mut state, &wire(SensorMeasurements::default()), 700)
        .expect("route");
    assert_eq!(state.last_seen, Some(700));
}

#[test]
fn given_rotary_encoder_pushes_when_routed_then_step_diff_tracks_delta() {
    let mut router = MessageRouter::new();
    let mut state = ControllerState::default();

    router
        .route_bytes(
            &mut state,
            &wire(RotaryEncoder {
                step: Some(10),
                ..Default::default()
            }),
            0,
        )
        .expect("route");
    assert_eq!(state.rotary_encoder.step_diff, 0, "First push has no delta");

    router
        .route_bytes(
            &mut state,
            &wire(RotaryEncoder {
                step: Some(7),
                ..Default::default()
            }),
            0,
        )
        .expect("route");
    assert_eq!(state.rotary_encoder.step_diff, -3);
}

/// **VALUE**: Sends without a connection fail right away instead of queuing.
#[test]
fn given_no_connection_when_sending_then_returns_not_connected_and_counts_nothing() {
    let mut router = MessageRouter::new();

    let result = router.send(ScreenStatusRequest { lock: Some(true) }.into(), &NoLink);

    assert!(result.is_err_and(|e| e.is_not_connected()));
    assert_eq!(router.stats().sent, 0);
}

#[test]
fn given_inbound_only_type_when_sending_then_refused_before_reaching_sink() {
    let mut router = MessageRouter::new();
    let sink = RecordingSink::default();

    let result = router.send(ControllerMessage::from(Parameters::default()), &sink);

    assert!(matches!(
        result,
        Err(SendError::NotOutbound {
            message_type: MessageType::Parameters,
            ..
        })
    ));
    assert!(sink.frames().is_empty());
}

#[test]
fn given_open_sink_when_sending_request_then_frame_reaches_sink() {
    let mut router = MessageRouter::new();
    let sink = RecordingSink::default();
    let request = ParametersRequest {
        rr: Some(20.0),
        ..Default::default()
    };

    router
        .send(request.clone().into(), &sink)
        .expect("send should succeed");

    let frames = sink.frames();
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].message(), &ControllerMessage::from(request));
    assert_eq!(router.stats().sent, 1);
}
