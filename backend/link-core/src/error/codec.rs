use common::ErrorLocation;

use models::{MessageType, ModelError};

use std::panic::Location;

use thiserror::Error as ThisError;

/// A single inbound frame could not be turned into a typed message.
///
/// Always recoverable: the frame is dropped and the stream continues.
#[derive(Debug, ThisError)]
pub enum DecodeError {
    #[error("Empty Frame Error: {message} {location}")]
    EmptyFrame {
        message: String,
        location: ErrorLocation,
    },

    #[error("Unknown Type Error: {message} {location}")]
    UnknownType {
        tag: u8,
        message: String,
        location: ErrorLocation,
    },

    #[error("Malformed Payload Error: {message} {location}")]
    MalformedPayload {
        message_type: MessageType,
        message: String,
        location: ErrorLocation,
    },
}

impl From<ModelError> for DecodeError {
    #[track_caller]
    fn from(error: ModelError) -> Self {
        match error {
            ModelError::UnknownMessageType { tag, message, .. } => DecodeError::UnknownType {
                tag,
                message,
                location: ErrorLocation::from(Location::caller()),
            },
        }
    }
}
