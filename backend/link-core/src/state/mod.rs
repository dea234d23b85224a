//! Controller state slices.
//!
//! One slot per registry tag, written only by the message router. Most
//! slices merge sparsely; the event log and rotary encoder carry their
//! own merge rules.

pub mod event_log;
pub mod merge;

pub use event_log::EventLog;
pub use merge::{SparseMerge, merge_slot};

use common::Timestamp;

use models::{
    AlarmLimits, AlarmLimitsRequest, AlarmMute, AlarmMuteRequest, Announcement, BackendConnections,
    CycleMeasurements, ExpectedLogEvent, FrontendDisplaySetting, FrontendDisplaySettingRequest,
    McuPowerStatus, Parameters, ParametersRequest, Ping, RotaryEncoder, ScreenStatus,
    ScreenStatusRequest, SensorMeasurements, SystemSettings, SystemSettingsRequest,
};

use serde::Serialize;

/// Last encoder push plus the step delta it implies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct RotaryEncoderState {
    pub encoder: Option<RotaryEncoder>,
    /// New step minus previous step. Zero on the first push.
    pub step_diff: i32,
}

impl RotaryEncoderState {
    pub fn apply(&mut self, incoming: RotaryEncoder) {
        let previous_step = self.encoder.and_then(|encoder| encoder.step);
        merge_slot(&mut self.encoder, incoming);
        let current_step = self.encoder.and_then(|encoder| encoder.step);

        self.step_diff = match (previous_step, current_step) {
            (Some(previous), Some(current)) => current.wrapping_sub(previous),
            _ => 0,
        };
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ControllerState {
    pub sensor_measurements: Option<SensorMeasurements>,
    pub cycle_measurements: Option<CycleMeasurements>,
    pub parameters: Option<Parameters>,
    pub parameters_request: Option<ParametersRequest>,
    pub alarm_limits: Option<AlarmLimits>,
    pub alarm_limits_request: Option<AlarmLimitsRequest>,
    pub expected_log_event: Option<ExpectedLogEvent>,
    pub event_log: EventLog,
    pub alarm_mute: Option<AlarmMute>,
    pub alarm_mute_request: Option<AlarmMuteRequest>,
    pub mcu_power_status: Option<McuPowerStatus>,
    pub backend_connections: Option<BackendConnections>,
    pub screen_status: Option<ScreenStatus>,
    pub screen_status_request: Option<ScreenStatusRequest>,
    pub rotary_encoder: RotaryEncoderState,
    pub system_settings: Option<SystemSettings>,
    pub system_settings_request: Option<SystemSettingsRequest>,
    pub frontend_display_setting: Option<FrontendDisplaySetting>,
    pub frontend_display_setting_request: Option<FrontendDisplaySettingRequest>,
    pub ping: Option<Ping>,
    pub announcement: Option<Announcement>,
    /// Local receive time of the last liveness frame.
    pub last_seen: Option<Timestamp>,
}

impl ControllerState {
    /// Current parameters in request form, empty if none received yet.
    pub fn current_parameters(&self) -> ParametersRequest {
        self.parameters.clone().map(Into::into).unwrap_or_default()
    }

    /// Current alarm limits in request form, empty if none received yet.
    pub fn current_alarm_limits(&self) -> AlarmLimitsRequest {
        self.alarm_limits.clone().map(Into::into).unwrap_or_default()
    }
}
