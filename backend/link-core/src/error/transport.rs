use common::ErrorLocation;

use std::panic::Location;

use thiserror::Error as ThisError;
use tokio_tungstenite::tungstenite::Error as WebSocketError;

/// Socket-level failure. Folded into the next retry cycle, never fatal.
#[derive(Debug, ThisError)]
pub enum TransportError {
    #[error("Connect Error: {message} {location}")]
    Connect {
        message: String,
        location: ErrorLocation,
    },

    #[error("WebSocket Error: {message} {location}")]
    WebSocket {
        message: String,
        location: ErrorLocation,
    },
}

impl From<WebSocketError> for TransportError {
    #[track_caller]
    fn from(error: WebSocketError) -> Self {
        TransportError::WebSocket {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}
