use common::ErrorLocation;

use models::MessageType;

use thiserror::Error as ThisError;

/// An outbound message was refused. Nothing was queued.
#[derive(Debug, ThisError)]
pub enum SendError {
    #[error("Not Connected Error: {message} {location}")]
    NotConnected {
        message: String,
        location: ErrorLocation,
    },

    #[error("Backpressure Error: {message} {location}")]
    Backpressure {
        message: String,
        location: ErrorLocation,
    },

    #[error("Not Outbound Error: {message} {location}")]
    NotOutbound {
        message_type: MessageType,
        message: String,
        location: ErrorLocation,
    },
}

impl SendError {
    pub fn is_not_connected(&self) -> bool {
        matches!(self, SendError::NotConnected { .. })
    }
}
