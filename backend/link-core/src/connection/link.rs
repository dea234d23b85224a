use crate::codec::Frame;
use crate::connection::event::ConnectionId;
use crate::error::send::SendError;
use crate::router::FrameSink;

use common::ErrorLocation;

use std::panic::Location;

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

/// Sending half of one open connection.
///
/// Bounded: a full buffer refuses the frame instead of growing. Once the
/// connection ends every send fails with [`SendError::NotConnected`].
#[derive(Debug, Clone)]
pub struct OutboundLink {
    id: ConnectionId,
    frames: mpsc::Sender<Vec<u8>>,
}

impl OutboundLink {
    pub(crate) fn new(id: ConnectionId, frames: mpsc::Sender<Vec<u8>>) -> Self {
        Self { id, frames }
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }
}

impl FrameSink for OutboundLink {
    fn send_frame(&self, frame: Frame) -> Result<(), SendError> {
        let message_type = frame.message_type();
        self.frames
            .try_send(frame.to_wire())
            .map_err(|e| match e {
                TrySendError::Full(_) => SendError::Backpressure {
                    message: format!(
                        "Outbound buffer of connection {} is full, dropped {message_type}",
                        self.id
                    ),
                    location: ErrorLocation::from(Location::caller()),
                },
                TrySendError::Closed(_) => SendError::NotConnected {
                    message: format!("Connection {} is no longer open", self.id),
                    location: ErrorLocation::from(Location::caller()),
                },
            })
    }

    fn is_connected(&self) -> bool {
        !self.frames.is_closed()
    }
}

/// Sink used while no connection is open.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLink;

impl FrameSink for NoLink {
    fn send_frame(&self, frame: Frame) -> Result<(), SendError> {
        Err(SendError::NotConnected {
            message: format!("No open connection for {}", frame.message_type()),
            location: ErrorLocation::from(Location::caller()),
        })
    }

    fn is_connected(&self) -> bool {
        false
    }
}
