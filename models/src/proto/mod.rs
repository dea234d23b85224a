//! Protobuf payload types.
//!
//! Field numbers follow the controller's versioned contract and must not be
//! renumbered. Types are declared with `prost` derives directly so the crate
//! builds without a `protoc` toolchain.

mod alarm_limits;
mod alarm_mute;
mod frontend;
mod log_events;
mod measurements;
mod parameters;
mod system;

pub use alarm_limits::{AlarmLimits, AlarmLimitsRequest, Range};
pub use alarm_mute::{AlarmMute, AlarmMuteRequest, AlarmMuteSource};
pub use frontend::{
    FrontendDisplaySetting, FrontendDisplaySettingRequest, RotaryEncoder, SystemSettings,
    SystemSettingsRequest, ThemeVariant, Unit,
};
pub use log_events::{
    ActiveLogEvents, ExpectedLogEvent, LogEvent, LogEventCode, LogEventType, NextLogEvents,
};
pub use measurements::{CycleMeasurements, SensorMeasurements};
pub use parameters::{Parameters, ParametersRequest, VentilationMode};
pub use system::{Announcement, BackendConnections, McuPowerStatus, Ping, ScreenStatus, ScreenStatusRequest};
