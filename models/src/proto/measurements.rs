use serde::{Deserialize, Serialize};

/// Periodic sensor push. Its arrival refreshes link liveness.
#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
pub struct SensorMeasurements {
    /// ms
    #[prost(uint64, optional, tag = "1")]
    pub time: Option<u64>,
    #[prost(uint32, optional, tag = "2")]
    pub cycle: Option<u32>,
    #[prost(float, optional, tag = "3")]
    pub fio2: Option<f32>,
    #[prost(float, optional, tag = "4")]
    pub flow: Option<f32>,
    #[prost(float, optional, tag = "5")]
    pub spo2: Option<f32>,
    #[prost(float, optional, tag = "6")]
    pub hr: Option<f32>,
    #[prost(float, optional, tag = "7")]
    pub paw: Option<f32>,
    #[prost(float, optional, tag = "8")]
    pub volume: Option<f32>,
}

/// Per-breath-cycle summary push.
#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
pub struct CycleMeasurements {
    #[prost(uint64, optional, tag = "1")]
    pub time: Option<u64>,
    #[prost(float, optional, tag = "2")]
    pub vt: Option<f32>,
    #[prost(float, optional, tag = "3")]
    pub rr: Option<f32>,
    #[prost(float, optional, tag = "4")]
    pub peep: Option<f32>,
    #[prost(float, optional, tag = "5")]
    pub pip: Option<f32>,
    #[prost(float, optional, tag = "6")]
    pub ip: Option<f32>,
    #[prost(float, optional, tag = "7")]
    pub ve: Option<f32>,
}
