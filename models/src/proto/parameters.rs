use serde::{Deserialize, Serialize};

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration, Serialize, Deserialize,
)]
#[repr(i32)]
pub enum VentilationMode {
    Hfnc = 0,
    PcAc = 1,
    VcAc = 2,
    NivPc = 3,
    NivPs = 4,
    Psv = 5,
    Prvc = 6,
}

/// Operating parameters currently applied by the controller.
#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
pub struct Parameters {
    #[prost(uint64, optional, tag = "1")]
    pub time: Option<u64>,
    #[prost(bool, optional, tag = "2")]
    pub ventilating: Option<bool>,
    #[prost(enumeration = "VentilationMode", optional, tag = "3")]
    pub mode: Option<i32>,
    #[prost(float, optional, tag = "4")]
    pub fio2: Option<f32>,
    #[prost(float, optional, tag = "5")]
    pub flow: Option<f32>,
    #[prost(float, optional, tag = "6")]
    pub pip: Option<f32>,
    #[prost(float, optional, tag = "7")]
    pub peep: Option<f32>,
    #[prost(float, optional, tag = "8")]
    pub vt: Option<f32>,
    #[prost(float, optional, tag = "9")]
    pub rr: Option<f32>,
    #[prost(float, optional, tag = "10")]
    pub ie: Option<f32>,
}

/// Operator request for new parameters. Same shape as [`Parameters`].
#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
pub struct ParametersRequest {
    #[prost(uint64, optional, tag = "1")]
    pub time: Option<u64>,
    #[prost(bool, optional, tag = "2")]
    pub ventilating: Option<bool>,
    #[prost(enumeration = "VentilationMode", optional, tag = "3")]
    pub mode: Option<i32>,
    #[prost(float, optional, tag = "4")]
    pub fio2: Option<f32>,
    #[prost(float, optional, tag = "5")]
    pub flow: Option<f32>,
    #[prost(float, optional, tag = "6")]
    pub pip: Option<f32>,
    #[prost(float, optional, tag = "7")]
    pub peep: Option<f32>,
    #[prost(float, optional, tag = "8")]
    pub vt: Option<f32>,
    #[prost(float, optional, tag = "9")]
    pub rr: Option<f32>,
    #[prost(float, optional, tag = "10")]
    pub ie: Option<f32>,
}

impl From<Parameters> for ParametersRequest {
    fn from(current: Parameters) -> Self {
        Self {
            time: current.time,
            ventilating: current.ventilating,
            mode: current.mode,
            fio2: current.fio2,
            flow: current.flow,
            pip: current.pip,
            peep: current.peep,
            vt: current.vt,
            rr: current.rr,
            ie: current.ie,
        }
    }
}
