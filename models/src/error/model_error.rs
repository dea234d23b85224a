use common::ErrorLocation;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum ModelError {
    #[error("Unknown Message Type Error: {message} {location}")]
    UnknownMessageType {
        tag: u8,
        message: String,
        location: ErrorLocation,
    },
}
