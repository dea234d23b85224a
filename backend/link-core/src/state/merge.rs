use models::{
    AlarmLimits, AlarmLimitsRequest, AlarmMute, AlarmMuteRequest, Announcement, BackendConnections,
    CycleMeasurements, FrontendDisplaySetting, FrontendDisplaySettingRequest, McuPowerStatus,
    Parameters, ParametersRequest, Ping, RotaryEncoder, ScreenStatus, ScreenStatusRequest,
    SensorMeasurements, SystemSettings, SystemSettingsRequest,
};

/// Partial-state merge: present fields overwrite, absent fields are kept.
pub trait SparseMerge {
    fn merge_sparse(&mut self, incoming: Self);
}

/// Merge into an existing slice, or take the push whole if the slice is empty.
pub fn merge_slot<T: SparseMerge>(slot: &mut Option<T>, incoming: T) {
    match slot {
        Some(existing) => existing.merge_sparse(incoming),
        None => *slot = Some(incoming),
    }
}

macro_rules! sparse_merge {
    ($($schema:ty => [$($field:ident),+ $(,)?]),+ $(,)?) => {
        $(
            impl SparseMerge for $schema {
                fn merge_sparse(&mut self, incoming: Self) {
                    $(
                        if incoming.$field.is_some() {
                            self.$field = incoming.$field;
                        }
                    )+
                }
            }
        )+
    };
}

sparse_merge! {
    SensorMeasurements => [time, cycle, fio2, flow, spo2, hr, paw, volume],
    CycleMeasurements => [time, vt, rr, peep, pip, ip, ve],
    Parameters => [time, ventilating, mode, fio2, flow, pip, peep, vt, rr, ie],
    ParametersRequest => [time, ventilating, mode, fio2, flow, pip, peep, vt, rr, ie],
    AlarmLimits => [
        time, fio2, flow, spo2, hr, rr, pip, peep, ip_above_peep, insp_time, paw, mve, tv, etco2,
        apnea,
    ],
    AlarmLimitsRequest => [
        time, fio2, flow, spo2, hr, rr, pip, peep, ip_above_peep, insp_time, paw, mve, tv, etco2,
        apnea,
    ],
    AlarmMute => [active, seq_num, source, remaining],
    AlarmMuteRequest => [active, seq_num, source],
    McuPowerStatus => [power_left, charging],
    BackendConnections => [has_mcu, has_frontend],
    ScreenStatus => [lock],
    ScreenStatusRequest => [lock],
    RotaryEncoder => [step, last_step_change, button_pressed, last_button_down, last_button_up],
    SystemSettings => [date, display_brightness, seq_num],
    SystemSettingsRequest => [date, display_brightness, seq_num],
    FrontendDisplaySetting => [theme, unit],
    FrontendDisplaySettingRequest => [theme, unit],
    Ping => [time, id],
    Announcement => [time, announcement],
}
