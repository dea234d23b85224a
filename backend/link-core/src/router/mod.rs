//! Inbound dispatch and outbound serialization.
//!
//! Inbound frames are applied to exactly one [`ControllerState`] slice,
//! keyed by their tag. Outbound messages are framed and handed to a
//! [`FrameSink`], which refuses them when no connection is open.

use crate::codec::{self, Frame};
use crate::error::codec::DecodeError;
use crate::error::send::SendError;
use crate::state::{ControllerState, merge_slot};

use common::{ErrorLocation, Timestamp};

use models::{ControllerMessage, MessageType};

use std::panic::Location;

use log::{debug, trace, warn};
use serde::Serialize;

/// Destination for encoded outbound frames.
pub trait FrameSink {
    /// Hand one frame to the transport without waiting.
    ///
    /// # Errors
    ///
    /// - [`SendError::NotConnected`] - no open connection
    /// - [`SendError::Backpressure`] - the per-connection buffer is full
    fn send_frame(&self, frame: Frame) -> Result<(), SendError>;

    fn is_connected(&self) -> bool;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RouterStats {
    pub routed: u64,
    pub dropped: u64,
    pub sent: u64,
}

#[derive(Debug, Default)]
pub struct MessageRouter {
    stats: RouterStats,
}

impl MessageRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> RouterStats {
        self.stats
    }

    /// Decode and route one wire frame received at `now`.
    ///
    /// A frame that fails to decode is logged and dropped; `state` is untouched.
    pub fn route_bytes(
        &mut self,
        state: &mut ControllerState,
        bytes: &[u8],
        now: Timestamp,
    ) -> Result<MessageType, DecodeError> {
        match codec::decode(bytes) {
            Ok(frame) => Ok(self.route(state, frame, now)),
            Err(e) => {
                self.stats.dropped += 1;
                warn!("Dropping inbound frame: {e}");
                Err(e)
            }
        }
    }

    /// Apply a decoded frame to its state slice.
    pub fn route(&mut self, state: &mut ControllerState, frame: Frame, now: Timestamp) -> MessageType {
        let message_type = frame.message_type();
        trace!("Routing {message_type}");

        if message_type.is_liveness() {
            state.last_seen = Some(now);
        }

        match frame.into_message() {
            ControllerMessage::SensorMeasurements(m) => merge_slot(&mut state.sensor_measurements, m),
            ControllerMessage::CycleMeasurements(m) => merge_slot(&mut state.cycle_measurements, m),
            ControllerMessage::Parameters(m) => merge_slot(&mut state.parameters, m),
            ControllerMessage::ParametersRequest(m) => merge_slot(&mut state.parameters_request, m),
            ControllerMessage::AlarmLimits(m) => merge_slot(&mut state.alarm_limits, m),
            ControllerMessage::AlarmLimitsRequest(m) => {
                merge_slot(&mut state.alarm_limits_request, m)
            }
            ControllerMessage::ExpectedLogEvent(m) => state.expected_log_event = Some(m),
            ControllerMessage::NextLogEvents(m) => state.event_log.apply_next(m),
            ControllerMessage::ActiveLogEvents(m) => state.event_log.apply_active(m),
            ControllerMessage::AlarmMute(m) => merge_slot(&mut state.alarm_mute, m),
            ControllerMessage::AlarmMuteRequest(m) => merge_slot(&mut state.alarm_mute_request, m),
            ControllerMessage::McuPowerStatus(m) => merge_slot(&mut state.mcu_power_status, m),
            ControllerMessage::BackendConnections(m) => {
                merge_slot(&mut state.backend_connections, m)
            }
            ControllerMessage::ScreenStatus(m) => merge_slot(&mut state.screen_status, m),
            ControllerMessage::ScreenStatusRequest(m) => {
                merge_slot(&mut state.screen_status_request, m)
            }
            ControllerMessage::RotaryEncoder(m) => state.rotary_encoder.apply(m),
            ControllerMessage::SystemSettings(m) => merge_slot(&mut state.system_settings, m),
            ControllerMessage::SystemSettingsRequest(m) => {
                merge_slot(&mut state.system_settings_request, m)
            }
            ControllerMessage::FrontendDisplaySetting(m) => {
                merge_slot(&mut state.frontend_display_setting, m)
            }
            ControllerMessage::FrontendDisplaySettingRequest(m) => {
                merge_slot(&mut state.frontend_display_setting_request, m)
            }
            ControllerMessage::Ping(m) => merge_slot(&mut state.ping, m),
            ControllerMessage::Announcement(m) => merge_slot(&mut state.announcement, m),
        }

        self.stats.routed += 1;
        message_type
    }

    /// Frame `message` and hand it to `sink`.
    ///
    /// # Errors
    ///
    /// - [`SendError::NotOutbound`] - the panel never sends this type
    /// - [`SendError::NotConnected`] / [`SendError::Backpressure`] - from the sink
    pub fn send(&mut self, message: ControllerMessage, sink: &dyn FrameSink) -> Result<(), SendError> {
        let message_type = message.message_type();
        if !message_type.is_outbound() {
            return Err(SendError::NotOutbound {
                message_type,
                message: format!("{message_type} is not an outbound message type"),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        sink.send_frame(codec::encode(message))?;
        self.stats.sent += 1;
        debug!("Sent {message_type}");
        Ok(())
    }
}
