use crate::proto::alarm_limits::Range;

use serde::{Deserialize, Serialize};

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration, Serialize, Deserialize,
)]
#[repr(i32)]
pub enum LogEventCode {
    // Patient
    Fio2TooLow = 0,
    Fio2TooHigh = 1,
    FlowTooLow = 2,
    FlowTooHigh = 3,
    Spo2TooLow = 4,
    Spo2TooHigh = 5,
    HrTooLow = 6,
    HrTooHigh = 7,
    // Control settings
    VentilationOperationChanged = 64,
    VentilationModeChanged = 65,
    Fio2SettingChanged = 66,
    FlowSettingChanged = 67,
    // Alarm limits
    Fio2AlarmLimitsChanged = 80,
    FlowAlarmLimitsChanged = 81,
    Spo2AlarmLimitsChanged = 82,
    HrAlarmLimitsChanged = 83,
    // System
    ScreenLocked = 129,
    McuBackendConnectionDown = 130,
    BackendMcuConnectionDown = 131,
    BackendFrontendConnectionDown = 132,
    FrontendBackendConnectionDown = 133,
    McuBackendConnectionUp = 134,
    BackendMcuConnectionUp = 135,
    BackendFrontendConnectionUp = 136,
    FrontendBackendConnectionUp = 137,
    BatteryLow = 138,
    BatteryCritical = 139,
    ChargerDisconnected = 140,
    McuStarted = 141,
    BackendStarted = 142,
    McuShutdown = 143,
    BackendShutdown = 144,
    // Alarm muting
    AlarmsMutedUserSoftware = 145,
    AlarmsMutedUserHardware = 146,
    AlarmsMutedUnknown = 147,
    AlarmsUnmutedUserSoftware = 148,
    AlarmsUnmutedUserHardware = 149,
    AlarmsUnmutedInitialization = 150,
    AlarmsUnmutedTimeout = 151,
    AlarmsUnmutedMcuBackendLoss = 152,
    AlarmsUnmutedBackendMcuLoss = 153,
    AlarmsUnmutedBackendFrontendLoss = 154,
    AlarmsUnmutedFrontendBackendLoss = 155,
    AlarmsUnmutedUnknown = 156,
    // Sensors
    Sfm3019AirDisconnected = 160,
    Sfm3019O2Disconnected = 161,
    Fdo2Disconnected = 162,
    NoninDisconnected = 163,
    NoninFingerSensorDisconnected = 164,
    NoninSensorAlarm = 165,
    NoninOutOfTrackMeasurements = 166,
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration, Serialize, Deserialize,
)]
#[repr(i32)]
pub enum LogEventType {
    Patient = 0,
    Control = 1,
    AlarmLimits = 2,
    System = 3,
}

/// One entry of the controller's event log.
#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
pub struct LogEvent {
    #[prost(uint32, tag = "1")]
    pub id: u32,
    /// ms
    #[prost(uint64, tag = "2")]
    pub time: u64,
    #[prost(enumeration = "LogEventCode", tag = "3")]
    pub code: i32,
    #[prost(enumeration = "LogEventType", tag = "4")]
    pub event_type: i32,
    #[prost(message, optional, tag = "5")]
    pub alarm_limits: Option<Range>,
    #[prost(float, tag = "6")]
    pub old_float: f32,
    #[prost(float, tag = "7")]
    pub new_float: f32,
    #[prost(uint32, tag = "8")]
    pub old_uint32: u32,
    #[prost(uint32, tag = "9")]
    pub new_uint32: u32,
    #[prost(bool, tag = "10")]
    pub old_bool: bool,
    #[prost(bool, tag = "11")]
    pub new_bool: bool,
    #[prost(message, optional, tag = "12")]
    pub old_range: Option<Range>,
    #[prost(message, optional, tag = "13")]
    pub new_range: Option<Range>,
    #[prost(enumeration = "crate::proto::VentilationMode", tag = "14")]
    pub old_mode: i32,
    #[prost(enumeration = "crate::proto::VentilationMode", tag = "15")]
    pub new_mode: i32,
}

/// Tells the controller which log id the panel wants next.
#[derive(Clone, Copy, PartialEq, Eq, ::prost::Message, Serialize, Deserialize)]
pub struct ExpectedLogEvent {
    #[prost(uint32, tag = "1")]
    pub id: u32,
    #[prost(uint32, tag = "2")]
    pub session_id: u32,
}

/// A batch of log entries starting at or after the expected id.
#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
pub struct NextLogEvents {
    #[prost(uint32, tag = "1")]
    pub next_expected: u32,
    #[prost(uint32, tag = "2")]
    pub total: u32,
    #[prost(uint32, tag = "3")]
    pub remaining: u32,
    #[prost(uint32, tag = "4")]
    pub session_id: u32,
    #[prost(message, repeated, tag = "5")]
    pub elements: Vec<LogEvent>,
}

/// Ids of the log entries that are currently active alarms.
#[derive(Clone, PartialEq, Eq, ::prost::Message, Serialize, Deserialize)]
pub struct ActiveLogEvents {
    #[prost(uint32, repeated, tag = "1")]
    pub id: Vec<u32>,
}
