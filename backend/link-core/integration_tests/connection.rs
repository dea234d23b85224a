use crate::helpers::{
    TEST_TIMEOUT, accept, next_event, next_frame_of, send_message, start_controller,
    unreachable_url,
};

use link_core::codec;
use link_core::connection::{
    ConnectionEvent, ConnectionManager, ConnectionSettings, ConnectionStatus,
};
use link_core::error::transport::TransportError;
use link_core::router::FrameSink;

use models::{ControllerMessage, MessageType, ScreenStatusRequest, SensorMeasurements};

use std::time::{Duration, Instant};

use futures_util::StreamExt;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;

const RETRY: Duration = Duration::from_millis(100);

fn settings(retry_interval: Duration) -> ConnectionSettings {
    ConnectionSettings {
        retry_interval,
        outbound_capacity: 8,
    }
}

/// **VALUE**: A connection closed by the controller is reported once, then a new
/// attempt with a fresh id opens after the retry interval.
///
/// **WHY THIS MATTERS**: Controllers restart. The panel must come back on its own
/// without operator action, and must never keep writing into the dead socket.
///
/// **BUG THIS CATCHES**: Would catch a manager that reports the close twice
/// (once as Closed and again as Errored), reuses the old connection id,
/// reconnects without waiting, or leaves the old outbound link accepting frames.
#[tokio::test]
async fn given_open_connection_when_controller_closes_then_closed_once_and_new_connection_opens() {
    // GIVEN: A manager connected to a controller
    let (listener, url) = start_controller().await;
    let (handle, mut events) = ConnectionManager::start(url, settings(RETRY));
    let mut first_socket = accept(&listener).await;

    assert!(matches!(
        next_event(&mut events).await,
        ConnectionEvent::Connecting { id: 1, attempt: 1 }
    ));
    let first_link = match next_event(&mut events).await {
        ConnectionEvent::Opened { id: 1, link } => link,
        other => panic!("Expected Opened for connection 1, got {other:?}"),
    };
    assert_eq!(handle.status(), ConnectionStatus::Open);
    assert_eq!(handle.retry_count(), 0);

    // WHEN: The controller closes the socket
    first_socket.close(None).await.expect("Failed to close");

    // THEN: Exactly one Closed for connection 1
    assert!(matches!(
        next_event(&mut events).await,
        ConnectionEvent::Closed { id: 1 }
    ));
    let closed_at = Instant::now();

    // THEN: The next event is a new attempt, not a second end-of-connection report
    match next_event(&mut events).await {
        ConnectionEvent::Connecting { id, attempt } => {
            assert_eq!(id, 2);
            assert_eq!(attempt, 2);
        }
        other => panic!("Expected Connecting for connection 2, got {other:?}"),
    }
    assert!(
        closed_at.elapsed() >= RETRY - Duration::from_millis(20),
        "Reconnected after {:?}, before the retry interval",
        closed_at.elapsed()
    );

    let _second_socket = accept(&listener).await;
    assert!(matches!(
        next_event(&mut events).await,
        ConnectionEvent::Opened { id: 2, .. }
    ));
    assert_eq!(handle.retry_count(), 0, "A successful open resets the retry count");

    // THEN: The first connection's link refuses frames
    let result = first_link.send_frame(codec::encode(ScreenStatusRequest::default().into()));
    assert!(result.is_err_and(|e| e.is_not_connected()));
    assert!(!first_link.is_connected());

    timeout(TEST_TIMEOUT, handle.shutdown())
        .await
        .expect("Shutdown timed out");
}

#[tokio::test]
async fn given_no_controller_when_started_then_attempts_fail_and_retry_with_increasing_ids() {
    // GIVEN: Nothing listening
    let url = unreachable_url().await;

    // WHEN: Starting the manager
    let (handle, mut events) = ConnectionManager::start(url, settings(Duration::from_millis(20)));

    // THEN: Connect failures are reported and followed by new attempts
    for expected in 1..=2u64 {
        match next_event(&mut events).await {
            ConnectionEvent::Connecting { id, attempt } => {
                assert_eq!(id, expected);
                assert_eq!(u64::from(attempt), expected);
            }
            other => panic!("Expected Connecting, got {other:?}"),
        }
        match next_event(&mut events).await {
            ConnectionEvent::Errored { id, error } => {
                assert_eq!(id, expected);
                assert!(matches!(error, TransportError::Connect { .. }));
            }
            other => panic!("Expected Errored, got {other:?}"),
        }
    }
    assert!(handle.retry_count() >= 2);

    timeout(TEST_TIMEOUT, handle.shutdown())
        .await
        .expect("Shutdown timed out");
}

/// **VALUE**: Shutdown interrupts a pending retry delay.
///
/// **BUG THIS CATCHES**: A plain `sleep` in the retry loop would hold shutdown for
/// a full retry interval (a minute here).
#[tokio::test]
async fn given_manager_waiting_to_retry_when_shutdown_then_stops_promptly_and_reports_closed() {
    // GIVEN: A failed attempt followed by a long retry delay
    let url = unreachable_url().await;
    let (handle, mut events) = ConnectionManager::start(url, settings(Duration::from_secs(60)));
    let state = handle.subscribe_state();

    assert!(matches!(
        next_event(&mut events).await,
        ConnectionEvent::Connecting { id: 1, .. }
    ));
    assert!(matches!(
        next_event(&mut events).await,
        ConnectionEvent::Errored { id: 1, .. }
    ));

    // WHEN: Shutting down mid-delay
    timeout(TEST_TIMEOUT, handle.shutdown())
        .await
        .expect("Shutdown waited for the retry delay");

    // THEN: Final status is Closed and the event stream ends
    assert_eq!(state.borrow().status, ConnectionStatus::Closed);
    let end = timeout(TEST_TIMEOUT, events.recv())
        .await
        .expect("Event stream did not end");
    assert!(end.is_none());
}

#[tokio::test]
async fn given_open_connection_when_shutdown_then_controller_sees_close() {
    let (listener, url) = start_controller().await;
    let (handle, mut events) = ConnectionManager::start(url, settings(RETRY));
    let mut socket = accept(&listener).await;
    next_event(&mut events).await;
    next_event(&mut events).await;

    timeout(TEST_TIMEOUT, handle.shutdown())
        .await
        .expect("Shutdown timed out");

    let message = timeout(TEST_TIMEOUT, socket.next())
        .await
        .expect("Controller saw nothing")
        .expect("Stream ended without a close frame")
        .expect("Error reading close frame");
    assert!(matches!(message, Message::Close(_)));
}

/// **VALUE**: Binary frames flow both ways over one open connection.
#[tokio::test]
async fn given_open_connection_when_frames_exchanged_then_both_directions_deliver_tagged_bytes() {
    // GIVEN: An open connection
    let (listener, url) = start_controller().await;
    let (handle, mut events) = ConnectionManager::start(url, settings(RETRY));
    let mut socket = accept(&listener).await;
    next_event(&mut events).await;
    let link = match next_event(&mut events).await {
        ConnectionEvent::Opened { link, .. } => link,
        other => panic!("Expected Opened, got {other:?}"),
    };

    // WHEN: The controller pushes a measurement
    send_message(&mut socket, SensorMeasurements::default()).await;

    // THEN: It arrives as Received with its tag byte first
    match next_event(&mut events).await {
        ConnectionEvent::Received { id, payload } => {
            assert_eq!(id, link.id());
            assert_eq!(payload[0], MessageType::SensorMeasurements.tag());
        }
        other => panic!("Expected Received, got {other:?}"),
    }

    // WHEN: The panel sends a request through the link
    let request = ScreenStatusRequest { lock: Some(true) };
    link.send_frame(codec::encode(request.clone().into()))
        .expect("Link accepts frames while open");

    // THEN: The controller receives it intact
    let frame = next_frame_of(&mut socket, MessageType::ScreenStatusRequest).await;
    assert_eq!(
        frame.into_message(),
        ControllerMessage::ScreenStatusRequest(request)
    );

    timeout(TEST_TIMEOUT, handle.shutdown())
        .await
        .expect("Shutdown timed out");
}
