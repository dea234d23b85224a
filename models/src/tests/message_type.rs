use crate::{MessageType, ModelError};

use std::collections::HashSet;

/// **VALUE**: Every registered tag resolves back to the same type.
///
/// **WHY THIS MATTERS**: The registry is a bidirectional mapping. A copy-paste slip in
/// `ALL` (a duplicated or missing entry) would make one schema unreachable on decode.
///
/// **BUG THIS CATCHES**: Would catch a variant missing from `ALL` or two variants sharing
/// a tag.
#[test]
fn given_registered_types_when_tag_resolved_then_maps_back_to_same_type() {
    // GIVEN: The full registry
    let mut seen = HashSet::new();

    for message_type in MessageType::ALL {
        // WHEN: Resolving its tag
        let resolved = MessageType::try_from(message_type.tag()).expect("registered tag");

        // THEN: Round trips and tags are unique
        assert_eq!(resolved, message_type);
        assert!(seen.insert(message_type.tag()), "Duplicate tag {message_type}");
    }
}

/// **VALUE**: Unlisted tags are rejected instead of falling into a catch-all.
///
/// **BUG THIS CATCHES**: Would catch a lookup that defaults unknown bytes to some schema.
#[test]
fn given_unlisted_tag_when_resolved_then_returns_unknown_message_type() {
    for tag in [0u8, 1, 13, 24, 128, 134, 253] {
        let result = MessageType::try_from(tag);

        match result {
            Err(ModelError::UnknownMessageType { tag: rejected, .. }) => assert_eq!(rejected, tag),
            other => panic!("Expected UnknownMessageType for {tag}, got {other:?}"),
        }
    }
}

#[test]
fn given_registry_when_outbound_queried_then_only_request_types_are_sendable() {
    let outbound: Vec<MessageType> = MessageType::ALL
        .into_iter()
        .filter(|message_type| message_type.is_outbound())
        .collect();

    assert_eq!(
        outbound,
        vec![
            MessageType::ParametersRequest,
            MessageType::AlarmLimitsRequest,
            MessageType::ExpectedLogEvent,
            MessageType::AlarmMuteRequest,
            MessageType::ScreenStatusRequest,
            MessageType::SystemSettingsRequest,
            MessageType::FrontendDisplaySettingRequest,
        ]
    );
}

/// **VALUE**: Only measurement pushes and pings count as signs of life.
///
/// **WHY THIS MATTERS**: The controller echoes request types back. If echoes counted as
/// liveness, a stalled measurement stream would be masked by unrelated traffic.
#[test]
fn given_registry_when_liveness_queried_then_only_measurements_and_ping_qualify() {
    let liveness: Vec<u8> = MessageType::ALL
        .into_iter()
        .filter(|message_type| message_type.is_liveness())
        .map(MessageType::tag)
        .collect();

    assert_eq!(liveness, vec![2, 3, 254]);
}

#[test]
fn given_message_type_when_displayed_then_shows_name_and_tag() {
    assert_eq!(MessageType::AlarmLimitsRequest.to_string(), "AlarmLimitsRequest(7)");
    assert_eq!(MessageType::Ping.to_string(), "Ping(254)");
}
