use serde::{Deserialize, Serialize};

/// Inclusive lower/upper alarm bound.
#[derive(Clone, Copy, PartialEq, Eq, ::prost::Message, Serialize, Deserialize)]
pub struct Range {
    #[prost(int32, tag = "1")]
    pub lower: i32,
    #[prost(int32, tag = "2")]
    pub upper: i32,
}

impl Range {
    pub const fn new(lower: i32, upper: i32) -> Self {
        Self { lower, upper }
    }
}

/// Alarm limits currently applied by the controller.
#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
pub struct AlarmLimits {
    #[prost(uint64, optional, tag = "1")]
    pub time: Option<u64>,
    #[prost(message, optional, tag = "2")]
    pub fio2: Option<Range>,
    #[prost(message, optional, tag = "3")]
    pub flow: Option<Range>,
    #[prost(message, optional, tag = "4")]
    pub spo2: Option<Range>,
    #[prost(message, optional, tag = "5")]
    pub hr: Option<Range>,
    #[prost(message, optional, tag = "6")]
    pub rr: Option<Range>,
    #[prost(message, optional, tag = "7")]
    pub pip: Option<Range>,
    #[prost(message, optional, tag = "8")]
    pub peep: Option<Range>,
    #[prost(message, optional, tag = "9")]
    pub ip_above_peep: Option<Range>,
    #[prost(message, optional, tag = "10")]
    pub insp_time: Option<Range>,
    #[prost(message, optional, tag = "11")]
    pub paw: Option<Range>,
    #[prost(message, optional, tag = "12")]
    pub mve: Option<Range>,
    #[prost(message, optional, tag = "13")]
    pub tv: Option<Range>,
    #[prost(message, optional, tag = "14")]
    pub etco2: Option<Range>,
    #[prost(message, optional, tag = "15")]
    pub apnea: Option<Range>,
}

/// Operator request for new alarm limits. Same shape as [`AlarmLimits`].
#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
pub struct AlarmLimitsRequest {
    #[prost(uint64, optional, tag = "1")]
    pub time: Option<u64>,
    #[prost(message, optional, tag = "2")]
    pub fio2: Option<Range>,
    #[prost(message, optional, tag = "3")]
    pub flow: Option<Range>,
    #[prost(message, optional, tag = "4")]
    pub spo2: Option<Range>,
    #[prost(message, optional, tag = "5")]
    pub hr: Option<Range>,
    #[prost(message, optional, tag = "6")]
    pub rr: Option<Range>,
    #[prost(message, optional, tag = "7")]
    pub pip: Option<Range>,
    #[prost(message, optional, tag = "8")]
    pub peep: Option<Range>,
    #[prost(message, optional, tag = "9")]
    pub ip_above_peep: Option<Range>,
    #[prost(message, optional, tag = "10")]
    pub insp_time: Option<Range>,
    #[prost(message, optional, tag = "11")]
    pub paw: Option<Range>,
    #[prost(message, optional, tag = "12")]
    pub mve: Option<Range>,
    #[prost(message, optional, tag = "13")]
    pub tv: Option<Range>,
    #[prost(message, optional, tag = "14")]
    pub etco2: Option<Range>,
    #[prost(message, optional, tag = "15")]
    pub apnea: Option<Range>,
}

impl From<AlarmLimits> for AlarmLimitsRequest {
    fn from(current: AlarmLimits) -> Self {
        Self {
            time: current.time,
            fio2: current.fio2,
            flow: current.flow,
            spo2: current.spo2,
            hr: current.hr,
            rr: current.rr,
            pip: current.pip,
            peep: current.peep,
            ip_above_peep: current.ip_above_peep,
            insp_time: current.insp_time,
            paw: current.paw,
            mve: current.mve,
            tv: current.tv,
            etco2: current.etco2,
            apnea: current.apnea,
        }
    }
}
