//! Typed payloads paired with their registry tag.

use crate::message_type::MessageType;
use crate::proto::*;

use prost::Message as ProstMessage;
use serde::{Deserialize, Serialize};

/// One decoded controller payload.
///
/// Variants mirror [`MessageType`] one to one, so a value always knows its
/// own tag and schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ControllerMessage {
    SensorMeasurements(SensorMeasurements),
    CycleMeasurements(CycleMeasurements),
    Parameters(Parameters),
    ParametersRequest(ParametersRequest),
    AlarmLimits(AlarmLimits),
    AlarmLimitsRequest(AlarmLimitsRequest),
    ExpectedLogEvent(ExpectedLogEvent),
    NextLogEvents(NextLogEvents),
    ActiveLogEvents(ActiveLogEvents),
    AlarmMute(AlarmMute),
    AlarmMuteRequest(AlarmMuteRequest),
    McuPowerStatus(McuPowerStatus),
    BackendConnections(BackendConnections),
    ScreenStatus(ScreenStatus),
    ScreenStatusRequest(ScreenStatusRequest),
    RotaryEncoder(RotaryEncoder),
    SystemSettings(SystemSettings),
    SystemSettingsRequest(SystemSettingsRequest),
    FrontendDisplaySetting(FrontendDisplaySetting),
    FrontendDisplaySettingRequest(FrontendDisplaySettingRequest),
    Ping(Ping),
    Announcement(Announcement),
}

macro_rules! dispatch_schemas {
    ($($variant:ident),+ $(,)?) => {
        impl ControllerMessage {
            pub fn message_type(&self) -> MessageType {
                match self {
                    $(ControllerMessage::$variant(_) => MessageType::$variant,)+
                }
            }

            /// Serializes the payload without the tag byte.
            pub fn encode_payload(&self) -> Vec<u8> {
                match self {
                    $(ControllerMessage::$variant(payload) => payload.encode_to_vec(),)+
                }
            }

            /// Parses `payload` against the schema registered for `message_type`.
            pub fn decode_payload(
                message_type: MessageType,
                payload: &[u8],
            ) -> Result<Self, prost::DecodeError> {
                match message_type {
                    $(MessageType::$variant => {
                        $variant::decode(payload).map(ControllerMessage::$variant)
                    })+
                }
            }
        }

        $(
            impl From<$variant> for ControllerMessage {
                fn from(payload: $variant) -> Self {
                    ControllerMessage::$variant(payload)
                }
            }
        )+
    };
}

dispatch_schemas!(
    SensorMeasurements,
    CycleMeasurements,
    Parameters,
    ParametersRequest,
    AlarmLimits,
    AlarmLimitsRequest,
    ExpectedLogEvent,
    NextLogEvents,
    ActiveLogEvents,
    AlarmMute,
    AlarmMuteRequest,
    McuPowerStatus,
    BackendConnections,
    ScreenStatus,
    ScreenStatusRequest,
    RotaryEncoder,
    SystemSettings,
    SystemSettingsRequest,
    FrontendDisplaySetting,
    FrontendDisplaySettingRequest,
    Ping,
    Announcement,
);
