//! The closed one-byte tag registry.

use crate::error::model_error::ModelError;

use common::ErrorLocation;

use std::fmt::{Display, Formatter, Result as FormatResult};
use std::panic::Location;

use serde::{Deserialize, Serialize};

/// Frame tag identifying a payload schema.
///
/// Every tag maps to exactly one schema. Conversion from an unlisted byte
/// fails with [`ModelError::UnknownMessageType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum MessageType {
    // Measurements
    SensorMeasurements = 2,
    CycleMeasurements = 3,
    // Parameters
    Parameters = 4,
    ParametersRequest = 5,
    // Alarm limits
    AlarmLimits = 6,
    AlarmLimitsRequest = 7,
    // Log events
    ExpectedLogEvent = 8,
    NextLogEvents = 9,
    ActiveLogEvents = 10,
    // Alarm muting
    AlarmMute = 11,
    AlarmMuteRequest = 12,
    // System
    McuPowerStatus = 20,
    BackendConnections = 21,
    ScreenStatus = 22,
    ScreenStatusRequest = 23,
    // Panel
    RotaryEncoder = 129,
    SystemSettings = 130,
    SystemSettingsRequest = 131,
    FrontendDisplaySetting = 132,
    FrontendDisplaySettingRequest = 133,
    // Link
    Ping = 254,
    Announcement = 255,
}

impl MessageType {
    pub const ALL: [MessageType; 22] = [
        MessageType::SensorMeasurements,
        MessageType::CycleMeasurements,
        MessageType::Parameters,
        MessageType::ParametersRequest,
        MessageType::AlarmLimits,
        MessageType::AlarmLimitsRequest,
        MessageType::ExpectedLogEvent,
        MessageType::NextLogEvents,
        MessageType::ActiveLogEvents,
        MessageType::AlarmMute,
        MessageType::AlarmMuteRequest,
        MessageType::McuPowerStatus,
        MessageType::BackendConnections,
        MessageType::ScreenStatus,
        MessageType::ScreenStatusRequest,
        MessageType::RotaryEncoder,
        MessageType::SystemSettings,
        MessageType::SystemSettingsRequest,
        MessageType::FrontendDisplaySetting,
        MessageType::FrontendDisplaySettingRequest,
        MessageType::Ping,
        MessageType::Announcement,
    ];

    pub const fn tag(self) -> u8 {
        self as u8
    }

    /// Whether the panel may put this type on the wire.
    pub const fn is_outbound(self) -> bool {
        matches!(
            self,
            MessageType::ParametersRequest
                | MessageType::AlarmLimitsRequest
                | MessageType::ExpectedLogEvent
                | MessageType::AlarmMuteRequest
                | MessageType::ScreenStatusRequest
                | MessageType::SystemSettingsRequest
                | MessageType::FrontendDisplaySettingRequest
        )
    }

    /// Whether receiving this type counts as a sign of life from the controller.
    pub const fn is_liveness(self) -> bool {
        matches!(
            self,
            MessageType::SensorMeasurements | MessageType::CycleMeasurements | MessageType::Ping
        )
    }

    pub const fn name(self) -> &'static str {
        match self {
            MessageType::SensorMeasurements => "SensorMeasurements",
            MessageType::CycleMeasurements => "CycleMeasurements",
            MessageType::Parameters => "Parameters",
            MessageType::ParametersRequest => "ParametersRequest",
            MessageType::AlarmLimits => "AlarmLimits",
            MessageType::AlarmLimitsRequest => "AlarmLimitsRequest",
            MessageType::ExpectedLogEvent => "ExpectedLogEvent",
            MessageType::NextLogEvents => "NextLogEvents",
            MessageType::ActiveLogEvents => "ActiveLogEvents",
            MessageType::AlarmMute => "AlarmMute",
            MessageType::AlarmMuteRequest => "AlarmMuteRequest",
            MessageType::McuPowerStatus => "McuPowerStatus",
            MessageType::BackendConnections => "BackendConnections",
            MessageType::ScreenStatus => "ScreenStatus",
            MessageType::ScreenStatusRequest => "ScreenStatusRequest",
            MessageType::RotaryEncoder => "RotaryEncoder",
            MessageType::SystemSettings => "SystemSettings",
            MessageType::SystemSettingsRequest => "SystemSettingsRequest",
            MessageType::FrontendDisplaySetting => "FrontendDisplaySetting",
            MessageType::FrontendDisplaySettingRequest => "FrontendDisplaySettingRequest",
            MessageType::Ping => "Ping",
            MessageType::Announcement => "Announcement",
        }
    }
}

impl TryFrom<u8> for MessageType {
    type Error = ModelError;

    #[track_caller]
    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        MessageType::ALL
            .into_iter()
            .find(|message_type| message_type.tag() == tag)
            .ok_or_else(|| ModelError::UnknownMessageType {
                tag,
                message: format!("No schema registered for tag {tag}"),
                location: ErrorLocation::from(Location::caller()),
            })
    }
}

impl Display for MessageType {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FormatResult {
        write!(formatter, "{}({})", self.name(), self.tag())
    }
}
