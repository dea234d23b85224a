use crate::{
    AlarmLimits, AlarmLimitsRequest, ControllerMessage, MessageType, Parameters, ParametersRequest,
    Range, SensorMeasurements, VentilationMode,
};

/// **VALUE**: A typed message always reports the tag of its own schema.
///
/// **BUG THIS CATCHES**: Would catch a macro arm wiring a variant to the wrong tag, which
/// would send requests the controller parses as a different schema.
#[test]
fn given_request_payloads_when_wrapped_then_report_matching_message_type() {
    let parameters: ControllerMessage = ParametersRequest::default().into();
    let limits: ControllerMessage = AlarmLimitsRequest::default().into();

    assert_eq!(parameters.message_type(), MessageType::ParametersRequest);
    assert_eq!(limits.message_type(), MessageType::AlarmLimitsRequest);
}

/// **VALUE**: Fields absent on the wire decode as `None`, not as zero.
///
/// **WHY THIS MATTERS**: State slices merge sparsely. If an absent `spo2` decoded as `0.0`,
/// every partial push would wipe the slice.
#[test]
fn given_partial_payload_when_decoded_then_absent_fields_are_none() {
    // GIVEN: A sensor push carrying only spo2
    let sent = SensorMeasurements {
        spo2: Some(97.0),
        ..Default::default()
    };
    let bytes = ControllerMessage::from(sent).encode_payload();

    // WHEN: Decoding against the registered schema
    let decoded = ControllerMessage::decode_payload(MessageType::SensorMeasurements, &bytes)
        .expect("valid payload");

    // THEN: Only spo2 is present
    match decoded {
        ControllerMessage::SensorMeasurements(measurements) => {
            assert_eq!(measurements.spo2, Some(97.0));
            assert_eq!(measurements.fio2, None);
            assert_eq!(measurements.time, None);
        }
        other => panic!("Expected SensorMeasurements, got {other:?}"),
    }
}

#[test]
fn given_alarm_limits_push_when_decoded_then_range_preserves_zero_lower_bound() {
    let sent = AlarmLimits {
        hr: Some(Range::new(0, 160)),
        ..Default::default()
    };
    let bytes = ControllerMessage::from(sent).encode_payload();

    let decoded = ControllerMessage::decode_payload(MessageType::AlarmLimits, &bytes)
        .expect("valid payload");

    assert_eq!(
        decoded,
        ControllerMessage::AlarmLimits(AlarmLimits {
            hr: Some(Range::new(0, 160)),
            ..Default::default()
        })
    );
}

#[test]
fn given_truncated_payload_when_decoded_then_returns_decode_error() {
    // Field 4 (float) announced with only two of its four bytes.
    let bytes = [0x25, 0x00, 0x00];

    let result = ControllerMessage::decode_payload(MessageType::Parameters, &bytes);

    assert!(result.is_err(), "Truncated float must not decode");
}

#[test]
fn given_current_parameters_when_converted_to_request_then_fields_carry_over() {
    let current = Parameters {
        ventilating: Some(true),
        mode: Some(VentilationMode::PcAc as i32),
        fio2: Some(40.0),
        ..Default::default()
    };

    let request = ParametersRequest::from(current);

    assert_eq!(request.ventilating, Some(true));
    assert_eq!(request.mode(), VentilationMode::PcAc);
    assert_eq!(request.fio2, Some(40.0));
    assert_eq!(request.flow, None);
}
