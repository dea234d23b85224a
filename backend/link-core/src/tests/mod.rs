mod config;
mod event_log;
mod heartbeat;
mod router;
mod session;

use crate::codec::Frame;
use crate::error::send::SendError;
use crate::router::FrameSink;

use common::ErrorLocation;

use models::ControllerMessage;

use std::cell::RefCell;
use std::panic::Location;

/// Sink that keeps every frame it accepts.
#[derive(Default)]
pub(crate) struct RecordingSink {
    frames: RefCell<Vec<Frame>>,
    disconnected: bool,
}

impl RecordingSink {
    pub(crate) fn disconnected() -> Self {
        Self {
            disconnected: true,
            ..Self::default()
        }
    }

    pub(crate) fn frames(&self) -> Vec<Frame> {
        self.frames.borrow().clone()
    }
}

impl FrameSink for RecordingSink {
    fn send_frame(&self, frame: Frame) -> Result<(), SendError> {
        if self.disconnected {
            return Err(SendError::NotConnected {
                message: "recording sink is disconnected".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        self.frames.borrow_mut().push(frame);
        Ok(())
    }

    fn is_connected(&self) -> bool {
        !self.disconnected
    }
}

/// Wire bytes for `message`, tag byte included.
pub(crate) fn wire(message: impl Into<ControllerMessage>) -> Vec<u8> {
    crate::codec::encode(message.into()).to_wire()
}
