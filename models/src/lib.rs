//! Wire schemas for the controller link.
//!
//! This crate contains the protobuf payload types exchanged with the
//! controller, the one-byte tag registry that frames them, and a typed
//! [`ControllerMessage`] that pairs each tag with its schema. Models carry
//! no connection or reconciliation logic.
//!
//! Payload structs use explicit field presence (`Option`) wherever the
//! controller may push partial state, so consumers can tell "absent" from
//! "zero".

pub mod error;
pub mod message;
pub mod message_type;
pub mod proto;

pub use error::model_error::ModelError;
pub use message::ControllerMessage;
pub use message_type::MessageType;
pub use proto::*;

#[cfg(test)]
mod tests;
