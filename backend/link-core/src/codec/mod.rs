//! Tagged binary envelope.
//!
//! Wire format: `[tag: u8][payload: protobuf bytes]`. The tag selects the
//! payload schema from the closed [`MessageType`] registry.

use crate::error::codec::DecodeError;

use common::ErrorLocation;

use models::{ControllerMessage, MessageType};

use std::panic::Location;

/// One tagged unit of the wire protocol. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    message: ControllerMessage,
}

impl Frame {
    pub fn message_type(&self) -> MessageType {
        self.message.message_type()
    }

    pub fn message(&self) -> &ControllerMessage {
        &self.message
    }

    pub fn into_message(self) -> ControllerMessage {
        self.message
    }

    /// Protobuf body without the tag byte.
    pub fn payload(&self) -> Vec<u8> {
        self.message.encode_payload()
    }

    /// Tag byte followed by the protobuf body.
    pub fn to_wire(&self) -> Vec<u8> {
        let payload = self.message.encode_payload();
        let mut bytes = Vec::with_capacity(1 + payload.len());
        bytes.push(self.message_type().tag());
        bytes.extend_from_slice(&payload);
        bytes
    }
}

impl From<ControllerMessage> for Frame {
    fn from(message: ControllerMessage) -> Self {
        Self { message }
    }
}

pub fn encode(message: ControllerMessage) -> Frame {
    Frame::from(message)
}

/// Parse one wire frame.
///
/// # Errors
///
/// - [`DecodeError::EmptyFrame`] - no tag byte
/// - [`DecodeError::UnknownType`] - tag not in the registry
/// - [`DecodeError::MalformedPayload`] - body does not parse as the tag's schema
#[track_caller]
pub fn decode(bytes: &[u8]) -> Result<Frame, DecodeError> {
    let (&tag, payload) = bytes.split_first().ok_or_else(|| DecodeError::EmptyFrame {
        message: "Frame has no tag byte".to_string(),
        location: ErrorLocation::from(Location::caller()),
    })?;

    let message_type = MessageType::try_from(tag)?;

    let message = ControllerMessage::decode_payload(message_type, payload).map_err(|e| {
        DecodeError::MalformedPayload {
            message_type,
            message: format!("{message_type} payload of {} bytes: {e}", payload.len()),
            location: ErrorLocation::from(Location::caller()),
        }
    })?;

    Ok(Frame { message })
}
