use crate::connection::link::OutboundLink;
use crate::error::transport::TransportError;

use serde::Serialize;

/// Identity of one transport attempt. Strictly increasing per manager.
pub type ConnectionId = u64;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum ConnectionStatus {
    #[default]
    Idle,
    Connecting,
    Open,
    Closed,
    Failed,
}

/// Published snapshot of the connection lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConnectionState {
    pub status: ConnectionStatus,
    /// Attempts made since the last successful open.
    pub retry_count: u32,
    pub connection_id: Option<ConnectionId>,
}

#[derive(Debug)]
pub enum ConnectionEvent {
    Connecting {
        id: ConnectionId,
        attempt: u32,
    },
    Opened {
        id: ConnectionId,
        link: OutboundLink,
    },
    /// One binary WebSocket message, tag byte included.
    Received {
        id: ConnectionId,
        payload: Vec<u8>,
    },
    /// The controller closed the connection.
    Closed {
        id: ConnectionId,
    },
    /// The attempt failed to connect, or the open connection failed.
    Errored {
        id: ConnectionId,
        error: TransportError,
    },
}

impl ConnectionEvent {
    pub fn id(&self) -> ConnectionId {
        match self {
            ConnectionEvent::Connecting { id, .. }
            | ConnectionEvent::Opened { id, .. }
            | ConnectionEvent::Received { id, .. }
            | ConnectionEvent::Closed { id }
            | ConnectionEvent::Errored { id, .. } => *id,
        }
    }
}
