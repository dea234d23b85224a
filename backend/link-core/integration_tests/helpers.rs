//! Test helpers for link integration tests.
//!
//! This module provides a fake controller end of the link:
//! - Binding a listener and accepting WebSocket connections
//! - Pushing controller messages as tagged frames
//! - Reading frames the panel sent, skipping ones a test does not care about
//! - Waiting on connection events and session snapshots with a deadline

use link_core::codec::{self, Frame};
use link_core::connection::ConnectionEvent;
use link_core::session::{SessionHandle, SessionSnapshot};

use models::{ControllerMessage, MessageType};

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio::time::{sleep, timeout};
use tokio_tungstenite::{WebSocketStream, accept_async, tungstenite::Message};
use url::Url;

/// Upper bound for anything a test waits on.
pub const TEST_TIMEOUT: Duration = Duration::from_secs(5);

pub type ControllerSocket = WebSocketStream<TcpStream>;

/// Test helper: Bind a controller listener on an ephemeral port.
pub async fn start_controller() -> (TcpListener, Url) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind controller listener");
    let port = listener.local_addr().expect("Listener address").port();
    let url = Url::parse(&format!("ws://127.0.0.1:{port}/")).expect("Valid controller URL");
    (listener, url)
}

/// Test helper: Accept the next panel connection and finish the handshake.
pub async fn accept(listener: &TcpListener) -> ControllerSocket {
    let (stream, _) = timeout(TEST_TIMEOUT, listener.accept())
        .await
        .expect("Timed out waiting for the panel to connect")
        .expect("Failed to accept TCP connection");
    accept_async(stream)
        .await
        .expect("WebSocket handshake failed")
}

/// Test helper: A URL nothing is listening on.
pub async fn unreachable_url() -> Url {
    let (listener, url) = start_controller().await;
    drop(listener);
    url
}

/// Test helper: Push one controller message as a tagged binary frame.
pub async fn send_message(socket: &mut ControllerSocket, message: impl Into<ControllerMessage>) {
    let bytes = codec::encode(message.into()).to_wire();
    socket
        .send(Message::Binary(bytes.into()))
        .await
        .expect("Failed to send frame");
}

/// Test helper: Read frames until one of `wanted` type arrives.
///
/// The panel sends `ExpectedLogEvent` on every clock tick, so tests that look
/// for a specific request have to read past those.
pub async fn next_frame_of(socket: &mut ControllerSocket, wanted: MessageType) -> Frame {
    timeout(TEST_TIMEOUT, async {
        loop {
            let message = socket
                .next()
                .await
                .expect("Panel closed the connection")
                .expect("Error receiving frame");
            if let Message::Binary(data) = message {
                let frame = codec::decode(&data).expect("Panel sent an undecodable frame");
                if frame.message_type() == wanted {
                    return frame;
                }
            }
        }
    })
    .await
    .unwrap_or_else(|_| panic!("Timed out waiting for a {wanted} frame"))
}

/// Test helper: Next connection event, with a deadline.
pub async fn next_event(events: &mut mpsc::Receiver<ConnectionEvent>) -> ConnectionEvent {
    timeout(TEST_TIMEOUT, events.recv())
        .await
        .expect("Timed out waiting for a connection event")
        .expect("Connection manager stopped unexpectedly")
}

/// Test helper: Poll the published snapshot until `ready` holds.
pub async fn wait_for<F>(session: &SessionHandle, ready: F) -> SessionSnapshot
where
    F: Fn(&SessionSnapshot) -> bool,
{
    timeout(TEST_TIMEOUT, async {
        loop {
            let snapshot = session.snapshot().await;
            if ready(&snapshot) {
                return snapshot;
            }
            sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("Timed out waiting for the session snapshot")
}
